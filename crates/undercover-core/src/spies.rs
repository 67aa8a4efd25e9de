//! Resolves which players are spies in a round.
//!
//! Classic rounds carry a single `spy` player reference. Multi-spy rounds
//! embed a serialized descriptor (`{"spyIds": [...]}`) in `spyData`.
//! Malformed descriptors are not silently papered over: resolution is a
//! tagged result so callers can tell a by-design single spy apart from
//! corrupt multi-spy data that was degraded to a guess.

use std::collections::BTreeSet;

use serde::Deserialize;
use tracing::warn;

use crate::model::{GameMode, PlayerId, Round};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpyData {
    spy_ids: Vec<PlayerId>,
}

/// Outcome of decoding a round's spy descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpyResolution {
    /// The descriptor was well-formed; these are the spies this round.
    Resolved { ids: BTreeSet<PlayerId> },
    /// The descriptor was absent or unparsable. `fallback` carries the
    /// round's single `spy` reference when one exists, so play can still
    /// degrade to a one-spy round, but the degradation is observable.
    Malformed { fallback: Option<PlayerId> },
}

impl SpyResolution {
    /// Decodes the spy set for `round` under the session's game mode.
    pub fn resolve(round: &Round, mode: GameMode) -> Self {
        let single = round.spy.as_ref().map(|p| p.id);

        match mode {
            GameMode::Classic => match single {
                Some(id) => Self::Resolved {
                    ids: BTreeSet::from([id]),
                },
                None => {
                    warn!(round = round.id, "classic round has no spy reference");
                    Self::Malformed { fallback: None }
                }
            },
            GameMode::MultiSpy => match &round.spy_data {
                Some(raw) => match serde_json::from_str::<SpyData>(raw) {
                    Ok(data) if !data.spy_ids.is_empty() => Self::Resolved {
                        ids: data.spy_ids.into_iter().collect(),
                    },
                    Ok(_) => {
                        warn!(round = round.id, "spy descriptor lists no spies");
                        Self::Malformed { fallback: single }
                    }
                    Err(err) => {
                        warn!(round = round.id, %err, "unparsable spy descriptor");
                        Self::Malformed { fallback: single }
                    }
                },
                None => {
                    warn!(round = round.id, "multi-spy round is missing spyData");
                    Self::Malformed { fallback: single }
                }
            },
        }
    }

    /// The effective spy-id set: resolved ids, or the degraded single-spy
    /// fallback for malformed rounds (possibly empty).
    pub fn ids(&self) -> BTreeSet<PlayerId> {
        match self {
            Self::Resolved { ids } => ids.clone(),
            Self::Malformed { fallback } => fallback.iter().copied().collect(),
        }
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        match self {
            Self::Resolved { ids } => ids.contains(&id),
            Self::Malformed { fallback } => *fallback == Some(id),
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Player, Question, Round};

    fn question() -> Question {
        Question {
            id: 1,
            text: "Where are we?".into(),
            alt_text: Some("Blend in!".into()),
            locale: None,
            category: None,
        }
    }

    fn spy(id: PlayerId) -> Player {
        Player {
            id,
            name: format!("p{id}"),
            score: 0,
            is_eliminated: false,
            eliminated_in_round_id: None,
        }
    }

    fn round(spy_player: Option<Player>, spy_data: Option<&str>) -> Round {
        Round {
            id: 42,
            round_number: 1,
            completed: false,
            question: question(),
            spy: spy_player,
            spy_data: spy_data.map(|s| s.to_string()),
        }
    }

    #[test]
    fn classic_resolves_to_singleton() {
        let r = round(Some(spy(5)), None);
        let res = SpyResolution::resolve(&r, GameMode::Classic);
        assert_eq!(res.ids(), BTreeSet::from([5]));
        assert!(!res.is_malformed());
    }

    #[test]
    fn classic_without_spy_is_malformed() {
        let r = round(None, None);
        let res = SpyResolution::resolve(&r, GameMode::Classic);
        assert!(res.is_malformed());
        assert!(res.ids().is_empty());
    }

    #[test]
    fn multi_spy_parses_descriptor() {
        let r = round(None, Some(r#"{"spyIds": [3, 7]}"#));
        let res = SpyResolution::resolve(&r, GameMode::MultiSpy);
        assert_eq!(res.ids(), BTreeSet::from([3, 7]));
        assert!(res.contains(3));
        assert!(!res.contains(4));
    }

    #[test]
    fn resolution_is_idempotent() {
        let r = round(None, Some(r#"{"spyIds": [3, 7]}"#));
        let a = SpyResolution::resolve(&r, GameMode::MultiSpy);
        let b = SpyResolution::resolve(&r, GameMode::MultiSpy);
        assert_eq!(a, b);
    }

    #[test]
    fn garbage_descriptor_degrades_to_fallback() {
        let r = round(Some(spy(9)), Some("not json at all"));
        let res = SpyResolution::resolve(&r, GameMode::MultiSpy);
        assert!(res.is_malformed());
        assert_eq!(res.ids(), BTreeSet::from([9]));
    }

    #[test]
    fn missing_descriptor_without_spy_resolves_empty() {
        let r = round(None, None);
        let res = SpyResolution::resolve(&r, GameMode::MultiSpy);
        assert!(res.is_malformed());
        assert!(res.ids().is_empty());
    }

    #[test]
    fn empty_spy_list_counts_as_malformed() {
        let r = round(Some(spy(2)), Some(r#"{"spyIds": []}"#));
        let res = SpyResolution::resolve(&r, GameMode::MultiSpy);
        assert!(res.is_malformed());
        assert_eq!(res.ids(), BTreeSet::from([2]));
    }
}
