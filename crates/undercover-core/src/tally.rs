//! Vote counting and the classic-mode round verdict.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{PlayerId, Vote};
use crate::spies::SpyResolution;

/// Per-target vote counts for one round.
///
/// Votes with a null target are skipped; the backend has returned such
/// records and one bad row must not void the round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteTally {
    counts: BTreeMap<PlayerId, u32>,
}

impl VoteTally {
    pub fn count(votes: &[Vote]) -> Self {
        let mut counts = BTreeMap::new();
        for vote in votes {
            if let Some(target) = &vote.voted_for {
                *counts.entry(target.id).or_insert(0) += 1;
            }
        }
        Self { counts }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn votes_for(&self, id: PlayerId) -> u32 {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    /// All targets tied for the highest count. Ties are kept, never broken.
    pub fn accused(&self) -> BTreeSet<PlayerId> {
        let max = self.counts.values().copied().max().unwrap_or(0);
        self.counts
            .iter()
            .filter(|(_, &n)| n == max && max > 0)
            .map(|(&id, _)| id)
            .collect()
    }

    pub fn counts(&self) -> &BTreeMap<PlayerId, u32> {
        &self.counts
    }
}

/// What the votes of a finished round amount to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundVerdict {
    /// No votes were recorded. A distinct state, not an outcome.
    NoVotes,
    /// Exactly one accused player and it was the spy.
    SpyCaught { spy: PlayerId },
    /// Anything else, including a tie that happens to contain the spy.
    SpyEscaped { accused: BTreeSet<PlayerId> },
}

/// Derives the classic-mode verdict from a round's full vote list.
pub fn evaluate(votes: &[Vote], spies: &SpyResolution) -> RoundVerdict {
    let tally = VoteTally::count(votes);
    if tally.is_empty() {
        return RoundVerdict::NoVotes;
    }

    let accused = tally.accused();
    if accused.len() == 1 {
        let sole = *accused.iter().next().expect("non-empty accused set");
        if spies.contains(sole) {
            return RoundVerdict::SpyCaught { spy: sole };
        }
    }
    RoundVerdict::SpyEscaped { accused }
}
