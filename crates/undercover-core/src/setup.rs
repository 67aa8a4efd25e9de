//! Local validation of a session before it is sent to the server.
//!
//! Every rule here blocks the create-session call entirely: a violated
//! invariant produces a structured [`SetupError`] and zero network calls.

use thiserror::Error;

use crate::model::{GameMode, SessionConfig};

/// Minimum number of agents required for a game.
pub const MIN_PLAYERS: usize = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("at least {MIN_PLAYERS} agents are required, found {found}")]
    TooFewPlayers { found: usize },

    #[error("duplicate agent identity: \"{name}\"")]
    DuplicateName { name: String },

    #[error("at least one spy is required")]
    NoSpies,

    #[error("too many spies: {requested} configured, at most {max} allowed for {players} agents")]
    TooManySpies {
        requested: u32,
        max: u32,
        players: usize,
    },
}

/// Validates player names and configuration, returning the trimmed roster
/// that should be sent to the server.
///
/// Rules, in order:
/// - blank entries are dropped, everything else is trimmed;
/// - fewer than [`MIN_PLAYERS`] remaining names is rejected;
/// - names must be unique after trimming;
/// - classic mode always plays with exactly one spy (the config value is
///   ignored);
/// - multi-spy mode requires `1..=floor(players / 2)` spies.
pub fn session_setup(names: &[String], config: &SessionConfig) -> Result<Vec<String>, SetupError> {
    let roster: Vec<String> = names
        .iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();

    if roster.len() < MIN_PLAYERS {
        return Err(SetupError::TooFewPlayers {
            found: roster.len(),
        });
    }

    for (i, name) in roster.iter().enumerate() {
        if roster[..i].contains(name) {
            return Err(SetupError::DuplicateName { name: name.clone() });
        }
    }

    if config.game_mode == GameMode::MultiSpy {
        if config.spies_count < 1 {
            return Err(SetupError::NoSpies);
        }
        let max = max_spies(roster.len());
        if config.spies_count > max {
            return Err(SetupError::TooManySpies {
                requested: config.spies_count,
                max,
                players: roster.len(),
            });
        }
    }

    Ok(roster)
}

/// Upper bound on simultaneous spies for a given roster size.
pub fn max_spies(players: usize) -> u32 {
    ((players / 2).max(1)) as u32
}

/// Pre-fill value for the spy-count field in the setup form.
pub fn recommended_spies(players: usize) -> u32 {
    match players {
        0..=4 => 1,
        5..=6 => 2,
        7..=8 => 3,
        _ => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rejects_fewer_than_three_players() {
        let cfg = SessionConfig::classic(1, 3);
        let err = session_setup(&names(&["Ada", "Bob"]), &cfg).unwrap_err();
        assert_eq!(err, SetupError::TooFewPlayers { found: 2 });
    }

    #[test]
    fn blank_entries_do_not_count() {
        let cfg = SessionConfig::classic(1, 3);
        let err = session_setup(&names(&["Ada", "  ", "Bob", ""]), &cfg).unwrap_err();
        assert_eq!(err, SetupError::TooFewPlayers { found: 2 });
    }

    #[test]
    fn rejects_duplicate_names_after_trimming() {
        let cfg = SessionConfig::classic(1, 3);
        let err = session_setup(&names(&["Ada", "Bob ", " Bob", "Cyd"]), &cfg).unwrap_err();
        assert_eq!(
            err,
            SetupError::DuplicateName {
                name: "Bob".into()
            }
        );
    }

    #[test]
    fn trims_and_returns_roster() {
        let cfg = SessionConfig::classic(1, 3);
        let roster = session_setup(&names(&[" Ada", "Bob ", "Cyd"]), &cfg).unwrap();
        assert_eq!(roster, names(&["Ada", "Bob", "Cyd"]));
    }

    #[test]
    fn classic_ignores_spy_count() {
        // A stale spies_count from a previous multi-spy setup must not
        // block a classic game.
        let mut cfg = SessionConfig::classic(1, 3);
        cfg.spies_count = 9;
        assert!(session_setup(&names(&["Ada", "Bob", "Cyd"]), &cfg).is_ok());
    }

    #[test]
    fn multi_spy_enforces_range() {
        let cfg = SessionConfig::multi_spy(1, 3, 2);
        let err = session_setup(&names(&["Ada", "Bob", "Cyd"]), &cfg).unwrap_err();
        assert_eq!(
            err,
            SetupError::TooManySpies {
                requested: 2,
                max: 1,
                players: 3
            }
        );

        let cfg = SessionConfig::multi_spy(1, 3, 0);
        let err = session_setup(&names(&["Ada", "Bob", "Cyd"]), &cfg).unwrap_err();
        assert_eq!(err, SetupError::NoSpies);

        let cfg = SessionConfig::multi_spy(1, 3, 3);
        assert!(session_setup(&names(&["A", "B", "C", "D", "E", "F"]), &cfg).is_ok());
    }

    #[test]
    fn recommended_spies_table() {
        assert_eq!(recommended_spies(3), 1);
        assert_eq!(recommended_spies(4), 1);
        assert_eq!(recommended_spies(6), 2);
        assert_eq!(recommended_spies(8), 3);
        assert_eq!(recommended_spies(9), 4);
    }
}
