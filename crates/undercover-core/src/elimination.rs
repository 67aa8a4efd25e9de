//! Multi-spy win-condition evaluation.
//!
//! Mirrors the server's rules so the client can navigate immediately after
//! an elimination instead of waiting for a session refresh. Runs after
//! every single elimination, not only at round boundaries.

use std::collections::BTreeSet;

use crate::model::{Player, PlayerId};

/// Head count after an elimination has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Standing {
    pub remaining_spies: usize,
    pub remaining_agents: usize,
}

impl Standing {
    pub fn of(players: &[Player], spy_ids: &BTreeSet<PlayerId>) -> Self {
        let active: Vec<PlayerId> = players
            .iter()
            .filter(|p| !p.is_eliminated)
            .map(|p| p.id)
            .collect();
        let remaining_spies = active.iter().filter(|id| spy_ids.contains(id)).count();
        Self {
            remaining_spies,
            remaining_agents: active.len() - remaining_spies,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentsWinReason {
    /// Every spy has been eliminated.
    AllSpiesEliminated,
    /// The round budget ran out with spies still outnumbered.
    SurvivedAllRounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EliminationVerdict {
    Continue,
    AgentsWin(AgentsWinReason),
    /// Spies equal or outnumber the remaining agents.
    SpiesWin,
}

/// Evaluates the win conditions in priority order.
pub fn evaluate(
    players: &[Player],
    spy_ids: &BTreeSet<PlayerId>,
    rounds_completed: u32,
    total_rounds: u32,
) -> (Standing, EliminationVerdict) {
    let standing = Standing::of(players, spy_ids);

    let verdict = if standing.remaining_spies == 0 {
        EliminationVerdict::AgentsWin(AgentsWinReason::AllSpiesEliminated)
    } else if standing.remaining_spies >= standing.remaining_agents {
        EliminationVerdict::SpiesWin
    } else if rounds_completed >= total_rounds {
        EliminationVerdict::AgentsWin(AgentsWinReason::SurvivedAllRounds)
    } else {
        EliminationVerdict::Continue
    };

    (standing, verdict)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(total: usize, eliminated: &[PlayerId]) -> Vec<Player> {
        (1..=total as PlayerId)
            .map(|id| Player {
                id,
                name: format!("p{id}"),
                score: 0,
                is_eliminated: eliminated.contains(&id),
                eliminated_in_round_id: None,
            })
            .collect()
    }

    #[test]
    fn continue_when_agents_still_outnumber() {
        // 6 players, 2 spies, one non-spy eliminated: 2 spies vs 3 agents.
        let players = roster(6, &[3]);
        let spies = BTreeSet::from([1, 2]);
        let (standing, verdict) = evaluate(&players, &spies, 1, 5);
        assert_eq!(standing.remaining_spies, 2);
        assert_eq!(standing.remaining_agents, 3);
        assert_eq!(verdict, EliminationVerdict::Continue);
    }

    #[test]
    fn spies_win_on_equal_numbers() {
        // 2 spies vs 2 agents left.
        let players = roster(6, &[3, 4]);
        let spies = BTreeSet::from([1, 2]);
        let (standing, verdict) = evaluate(&players, &spies, 1, 5);
        assert_eq!(standing.remaining_agents, 2);
        assert_eq!(verdict, EliminationVerdict::SpiesWin);
    }

    #[test]
    fn agents_win_when_all_spies_out() {
        let players = roster(5, &[1, 2]);
        let spies = BTreeSet::from([1, 2]);
        let (_, verdict) = evaluate(&players, &spies, 1, 5);
        assert_eq!(
            verdict,
            EliminationVerdict::AgentsWin(AgentsWinReason::AllSpiesEliminated)
        );
    }

    #[test]
    fn all_spies_out_beats_round_exhaustion() {
        let players = roster(5, &[1]);
        let spies = BTreeSet::from([1]);
        let (_, verdict) = evaluate(&players, &spies, 5, 5);
        assert_eq!(
            verdict,
            EliminationVerdict::AgentsWin(AgentsWinReason::AllSpiesEliminated)
        );
    }

    #[test]
    fn agents_win_by_surviving_all_rounds() {
        let players = roster(6, &[6]);
        let spies = BTreeSet::from([1]);
        let (_, verdict) = evaluate(&players, &spies, 5, 5);
        assert_eq!(
            verdict,
            EliminationVerdict::AgentsWin(AgentsWinReason::SurvivedAllRounds)
        );
    }

    #[test]
    fn verdict_is_deterministic() {
        let players = roster(6, &[3]);
        let spies = BTreeSet::from([1, 2]);
        assert_eq!(
            evaluate(&players, &spies, 1, 5),
            evaluate(&players, &spies, 1, 5)
        );
    }
}
