//! Entities exchanged with the game backend.
//!
//! All of these are owned by the remote service; the client only holds
//! transient copies refreshed from server responses. Field names follow
//! the backend's camelCase JSON. Fields that older payloads omit carry
//! `#[serde(default)]` so a sparse session snapshot still deserializes.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

pub type SessionId = i64;
pub type PlayerId = i64;
pub type RoundId = i64;
pub type QuestionId = i64;
pub type CategoryId = i64;
pub type VoteId = i64;

/// How a session decides its outcome: one spy and a single voting phase
/// per round, or several spies hunted through repeated eliminations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameMode {
    #[default]
    #[strum(serialize = "Classic")]
    Classic,
    #[strum(serialize = "Multi-spy")]
    MultiSpy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub is_eliminated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eliminated_in_round_id: Option<RoundId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    /// Shown to everyone who is not a spy.
    pub text: String,
    /// Shown to the spies instead of `text`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub id: RoundId,
    #[serde(default)]
    pub round_number: u32,
    #[serde(default)]
    pub completed: bool,
    pub question: Question,
    /// Single spy reference (always set for classic rounds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spy: Option<Player>,
    /// Serialized multi-spy descriptor, a JSON object `{"spyIds": [...]}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spy_data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    /// Rounds completed so far. Invariant: never above `number_of_rounds`.
    #[serde(default)]
    pub current_round: u32,
    #[serde(default)]
    pub finished: bool,
    pub number_of_rounds: u32,
    #[serde(default)]
    pub game_mode: GameMode,
    #[serde(default = "default_spies_count")]
    pub spies_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Insertion order is seating order; the sequencers rely on it.
    #[serde(default)]
    pub players: Vec<Player>,
}

fn default_spies_count() -> u32 {
    1
}

impl Session {
    /// Players still in the game, in original seating order.
    pub fn active_players(&self) -> Vec<Player> {
        self.players
            .iter()
            .filter(|p| !p.is_eliminated)
            .cloned()
            .collect()
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_name(&self, id: PlayerId) -> String {
        self.player(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("Player #{id}"))
    }

    /// True once the configured round budget has been used up.
    pub fn rounds_exhausted(&self) -> bool {
        self.current_round >= self.number_of_rounds
    }

    /// Absorbs a fresh server snapshot. Elimination flags never revert,
    /// so a snapshot that "un-eliminates" a player keeps the local flag.
    pub fn absorb(&mut self, snapshot: Session) {
        let eliminated: Vec<PlayerId> = self
            .players
            .iter()
            .filter(|p| p.is_eliminated)
            .map(|p| p.id)
            .collect();
        *self = snapshot;
        for p in &mut self.players {
            if eliminated.contains(&p.id) {
                p.is_eliminated = true;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: VoteId,
    /// The backend has been observed to return votes with null players;
    /// the tally skips those instead of failing the whole round.
    #[serde(default)]
    pub voter: Option<Player>,
    #[serde(default)]
    pub voted_for: Option<Player>,
}

/// Session configuration sent when creating a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    pub category_id: CategoryId,
    pub total_rounds: u32,
    pub game_mode: GameMode,
    pub spies_count: u32,
}

impl SessionConfig {
    pub fn classic(category_id: CategoryId, total_rounds: u32) -> Self {
        Self {
            category_id,
            total_rounds,
            game_mode: GameMode::Classic,
            spies_count: 1,
        }
    }

    pub fn multi_spy(category_id: CategoryId, total_rounds: u32, spies_count: u32) -> Self {
        Self {
            category_id,
            total_rounds,
            game_mode: GameMode::MultiSpy,
            spies_count,
        }
    }
}

/// What the eliminate endpoint reports back: the player as the server now
/// sees them plus a session snapshot with refreshed flags and counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EliminationResult {
    pub player: Player,
    #[serde(default)]
    pub session: Option<Session>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: PlayerId, name: &str) -> Player {
        Player {
            id,
            name: name.into(),
            score: 0,
            is_eliminated: false,
            eliminated_in_round_id: None,
        }
    }

    fn session(players: Vec<Player>) -> Session {
        Session {
            id: 1,
            current_round: 0,
            finished: false,
            number_of_rounds: 3,
            game_mode: GameMode::Classic,
            spies_count: 1,
            category: None,
            players,
        }
    }

    #[test]
    fn game_mode_uses_backend_spelling() {
        assert_eq!(
            serde_json::to_string(&GameMode::MultiSpy).unwrap(),
            "\"MULTI_SPY\""
        );
        assert_eq!(
            serde_json::from_str::<GameMode>("\"CLASSIC\"").unwrap(),
            GameMode::Classic
        );
    }

    #[test]
    fn sparse_session_payload_deserializes() {
        let json = r#"{
            "id": 7,
            "numberOfRounds": 3,
            "players": [{"id": 1, "name": "Ada"}]
        }"#;
        let s: Session = serde_json::from_str(json).unwrap();
        assert_eq!(s.game_mode, GameMode::Classic);
        assert_eq!(s.spies_count, 1);
        assert_eq!(s.players[0].score, 0);
        assert!(!s.players[0].is_eliminated);
    }

    #[test]
    fn absorb_never_reverts_elimination() {
        let mut local = session(vec![player(1, "Ada"), player(2, "Bob")]);
        local.players[1].is_eliminated = true;

        let stale = session(vec![player(1, "Ada"), player(2, "Bob")]);
        local.absorb(stale);
        assert!(local.players[1].is_eliminated);
    }

    #[test]
    fn active_players_keep_seating_order() {
        let mut s = session(vec![player(1, "Ada"), player(2, "Bob"), player(3, "Cyd")]);
        s.players[1].is_eliminated = true;
        let active: Vec<PlayerId> = s.active_players().iter().map(|p| p.id).collect();
        assert_eq!(active, vec![1, 3]);
    }

    #[test]
    fn vote_with_null_players_deserializes() {
        let json = r#"{"id": 9, "voter": null, "votedFor": null}"#;
        let v: Vote = serde_json::from_str(json).unwrap();
        assert!(v.voter.is_none());
        assert!(v.voted_for.is_none());
    }

    #[test]
    fn session_config_serializes_backend_shape() {
        let cfg = SessionConfig::multi_spy(2, 5, 2);
        let json = serde_json::to_value(&cfg).unwrap();
        assert_eq!(json["categoryId"], 2);
        assert_eq!(json["totalRounds"], 5);
        assert_eq!(json["gameMode"], "MULTI_SPY");
        assert_eq!(json["spiesCount"], 2);
    }
}
