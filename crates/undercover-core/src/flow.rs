//! The game-flow controller.
//!
//! One tagged phase value owns all cross-screen state; navigation is
//! driven by reading the current tag instead of scattering booleans
//! across screens. Every transition that depends on server data takes a
//! payload struct built from a successful network call, so each edge's
//! required data is statically known. On a failed call no payload exists
//! and the controller simply stays where it is.

use std::collections::BTreeSet;

use crate::elimination::{self, AgentsWinReason, EliminationVerdict, Standing};
use crate::error::{GameError, Result};
use crate::model::{EliminationResult, GameMode, Player, PlayerId, Round, Session, Vote};
use crate::sequence::{DiscussionWalk, RevealWalk, VotingWalk, DEFAULT_SPEAKING_TICKS};
use crate::spies::SpyResolution;
use crate::tally::{self, RoundVerdict, VoteTally};

/// Payload for entering role reveal: a freshly started server round.
#[derive(Debug, Clone)]
pub struct RoundStarted {
    pub round: Round,
}

/// Payload for leaving the voting phase: the round's full vote list.
#[derive(Debug, Clone)]
pub struct VotesFetched {
    pub votes: Vec<Vote>,
}

/// Payload for an elimination the server has acknowledged.
#[derive(Debug, Clone)]
pub struct EliminationApplied {
    pub result: EliminationResult,
}

/// State shown on the elimination board between eliminations.
#[derive(Debug, Clone)]
pub struct EliminationBoard {
    pub resolution: SpyResolution,
    pub standing: Standing,
    pub last: Option<EliminationRecord>,
}

#[derive(Debug, Clone)]
pub struct EliminationRecord {
    pub player: Player,
    pub was_spy: bool,
}

/// Everything the round-summary screen needs.
#[derive(Debug, Clone)]
pub struct RoundReport {
    pub verdict: RoundVerdict,
    pub votes: Vec<Vote>,
    pub tally: VoteTally,
    pub spy_names: Vec<String>,
    pub question: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Winners {
    Agents,
    Spies,
    /// Classic games end on the score table; ties are kept.
    TopScorers(Vec<PlayerId>),
}

#[derive(Debug, Clone)]
pub struct GameResult {
    pub winners: Winners,
    pub message: String,
    /// Players sorted by score, highest first.
    pub leaderboard: Vec<Player>,
}

#[derive(Debug, Clone)]
pub enum Phase {
    Lobby,
    RoleReveal(RevealWalk),
    Discussion(DiscussionWalk),
    Voting(VotingWalk),
    Elimination(EliminationBoard),
    RoundSummary(RoundReport),
    GameCompleted(GameResult),
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Lobby => "Lobby",
            Phase::RoleReveal(_) => "RoleReveal",
            Phase::Discussion(_) => "Discussion",
            Phase::Voting(_) => "Voting",
            Phase::Elimination(_) => "Elimination",
            Phase::RoundSummary(_) => "RoundSummary",
            Phase::GameCompleted(_) => "GameCompleted",
        }
    }
}

/// Sequences one session from lobby to completion.
///
/// Also acts as the session/round data cache: it holds the last-fetched
/// session and round objects and refreshes them from server responses.
#[derive(Debug, Clone)]
pub struct GameFlow {
    session: Session,
    round: Option<Round>,
    resolution: Option<SpyResolution>,
    speaking_ticks: u32,
    phase: Phase,
}

impl GameFlow {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            round: None,
            resolution: None,
            speaking_ticks: DEFAULT_SPEAKING_TICKS,
            phase: Phase::Lobby,
        }
    }

    pub fn with_speaking_ticks(mut self, ticks: u32) -> Self {
        self.speaking_ticks = ticks.max(1);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn resolution(&self) -> Option<&SpyResolution> {
        self.resolution.as_ref()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn phase_mut(&mut self) -> &mut Phase {
        &mut self.phase
    }

    /// Absorbs a fresh session snapshot into the cache.
    pub fn refresh_session(&mut self, snapshot: Session) {
        self.session.absorb(snapshot);
    }

    fn wrong_phase(&self, expected: &'static str) -> GameError {
        GameError::Phase {
            expected,
            found: self.phase.name(),
        }
    }

    /// Enters role reveal with a freshly started round. Valid from the
    /// lobby, from a round summary (next round) and from the elimination
    /// board after a Continue verdict.
    pub fn begin_round(&mut self, payload: RoundStarted) -> Result<()> {
        match self.phase {
            Phase::Lobby | Phase::RoundSummary(_) | Phase::Elimination(_) => {}
            _ => return Err(self.wrong_phase("Lobby | RoundSummary | Elimination")),
        }
        let resolution = SpyResolution::resolve(&payload.round, self.session.game_mode);
        self.round = Some(payload.round);
        self.resolution = Some(resolution);
        self.phase = Phase::RoleReveal(RevealWalk::new(&self.session.players));
        Ok(())
    }

    /// All roles have been seen; the table talks.
    pub fn complete_reveal(&mut self) -> Result<()> {
        if !matches!(self.phase, Phase::RoleReveal(_)) {
            return Err(self.wrong_phase("RoleReveal"));
        }
        self.phase = Phase::Discussion(DiscussionWalk::new(
            &self.session.players,
            self.speaking_ticks,
        ));
        Ok(())
    }

    /// Discussion is over; classic sessions vote, multi-spy sessions
    /// eliminate.
    pub fn complete_discussion(&mut self) -> Result<()> {
        if !matches!(self.phase, Phase::Discussion(_)) {
            return Err(self.wrong_phase("Discussion"));
        }
        match self.session.game_mode {
            GameMode::Classic => {
                self.phase = Phase::Voting(VotingWalk::new(&self.session.players));
            }
            GameMode::MultiSpy => {
                let resolution = self
                    .resolution
                    .clone()
                    .ok_or_else(|| GameError::internal("elimination entered without a round"))?;
                let standing = Standing::of(&self.session.players, &resolution.ids());
                self.phase = Phase::Elimination(EliminationBoard {
                    resolution,
                    standing,
                    last: None,
                });
            }
        }
        Ok(())
    }

    /// All ballots are in and the server returned the round's votes;
    /// produce the summary.
    pub fn complete_voting(&mut self, payload: VotesFetched) -> Result<&RoundReport> {
        if !matches!(self.phase, Phase::Voting(_)) {
            return Err(self.wrong_phase("Voting"));
        }
        let resolution = self
            .resolution
            .clone()
            .ok_or_else(|| GameError::internal("voting completed without a round"))?;
        let verdict = tally::evaluate(&payload.votes, &resolution);
        let tally = VoteTally::count(&payload.votes);
        let spy_names = resolution
            .ids()
            .iter()
            .map(|id| self.session.player_name(*id))
            .collect();
        let question = self
            .round
            .as_ref()
            .map(|r| r.question.text.clone())
            .unwrap_or_default();

        self.bump_rounds_completed();
        if let Some(round) = &mut self.round {
            round.completed = true;
        }
        self.phase = Phase::RoundSummary(RoundReport {
            verdict,
            votes: payload.votes,
            tally,
            spy_names,
            question,
        });
        match &self.phase {
            Phase::RoundSummary(report) => Ok(report),
            _ => unreachable!(),
        }
    }

    /// Applies one server-acknowledged elimination and re-evaluates the
    /// win conditions. Must run after every elimination.
    pub fn apply_elimination(&mut self, payload: EliminationApplied) -> Result<EliminationVerdict> {
        let resolution = match &self.phase {
            Phase::Elimination(board) => board.resolution.clone(),
            _ => return Err(self.wrong_phase("Elimination")),
        };
        let eliminated = payload.result.player;
        let round_id = self.round.as_ref().map(|r| r.id);

        match payload.result.session {
            Some(snapshot) => self.session.absorb(snapshot),
            None => self.bump_rounds_completed(),
        }
        if let Some(p) = self.session.players.iter_mut().find(|p| p.id == eliminated.id) {
            p.is_eliminated = true;
            if p.eliminated_in_round_id.is_none() {
                p.eliminated_in_round_id = round_id;
            }
        }

        let spy_ids: BTreeSet<PlayerId> = resolution.ids();
        let (standing, verdict) = elimination::evaluate(
            &self.session.players,
            &spy_ids,
            self.session.current_round,
            self.session.number_of_rounds,
        );

        match verdict {
            EliminationVerdict::Continue => {
                let was_spy = spy_ids.contains(&eliminated.id);
                self.phase = Phase::Elimination(EliminationBoard {
                    resolution,
                    standing,
                    last: Some(EliminationRecord {
                        player: eliminated,
                        was_spy,
                    }),
                });
            }
            EliminationVerdict::AgentsWin(reason) => {
                self.finish(Winners::Agents, agents_win_message(reason));
            }
            EliminationVerdict::SpiesWin => {
                self.finish(
                    Winners::Spies,
                    "Covert operatives outnumber the remaining agents".into(),
                );
            }
        }
        Ok(verdict)
    }

    /// Classic endgame: the round budget is spent, rank the table.
    pub fn complete_game(&mut self) -> Result<&GameResult> {
        if !matches!(self.phase, Phase::RoundSummary(_) | Phase::Lobby) {
            return Err(self.wrong_phase("RoundSummary | Lobby"));
        }
        let leaderboard = self.leaderboard();
        let top = leaderboard.first().map(|p| p.score).unwrap_or(0);
        let winners: Vec<PlayerId> = leaderboard
            .iter()
            .filter(|p| p.score == top)
            .map(|p| p.id)
            .collect();
        self.finish(Winners::TopScorers(winners), "Mission complete".into());
        match &self.phase {
            Phase::GameCompleted(result) => Ok(result),
            _ => unreachable!(),
        }
    }

    /// Players sorted by cumulative score, highest first.
    pub fn leaderboard(&self) -> Vec<Player> {
        let mut players = self.session.players.clone();
        players.sort_by(|a, b| b.score.cmp(&a.score));
        players
    }

    fn finish(&mut self, winners: Winners, message: String) {
        self.session.finished = true;
        self.phase = Phase::GameCompleted(GameResult {
            winners,
            message,
            leaderboard: self.leaderboard(),
        });
    }

    fn bump_rounds_completed(&mut self) {
        if self.session.current_round < self.session.number_of_rounds {
            self.session.current_round += 1;
        }
    }
}

fn agents_win_message(reason: AgentsWinReason) -> String {
    match reason {
        AgentsWinReason::AllSpiesEliminated => {
            "All covert operatives identified and eliminated".into()
        }
        AgentsWinReason::SurvivedAllRounds => "Survived all rounds, mission accomplished".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Question};

    fn player(id: PlayerId, score: u32) -> Player {
        Player {
            id,
            name: format!("p{id}"),
            score,
            is_eliminated: false,
            eliminated_in_round_id: None,
        }
    }

    fn session(mode: GameMode, players: usize, rounds: u32) -> Session {
        Session {
            id: 1,
            current_round: 0,
            finished: false,
            number_of_rounds: rounds,
            game_mode: mode,
            spies_count: if mode == GameMode::MultiSpy { 2 } else { 1 },
            category: Some(Category {
                id: 1,
                name: "Locations".into(),
                logo_url: None,
            }),
            players: (1..=players as PlayerId).map(|id| player(id, 0)).collect(),
        }
    }

    fn classic_round(spy_id: PlayerId) -> Round {
        Round {
            id: 10,
            round_number: 1,
            completed: false,
            question: Question {
                id: 1,
                text: "Where are we?".into(),
                alt_text: Some("Blend in!".into()),
                locale: None,
                category: None,
            },
            spy: Some(player(spy_id, 0)),
            spy_data: None,
        }
    }

    fn multi_round(ids: &[PlayerId]) -> Round {
        let mut r = classic_round(ids[0]);
        r.spy_data = Some(format!(
            "{{\"spyIds\": [{}]}}",
            ids.iter()
                .map(|i| i.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ));
        r
    }

    fn vote(id: i64, voter: PlayerId, target: PlayerId) -> Vote {
        Vote {
            id,
            voter: Some(player(voter, 0)),
            voted_for: Some(player(target, 0)),
        }
    }

    #[test]
    fn classic_round_walks_all_phases() {
        let mut flow = GameFlow::new(session(GameMode::Classic, 4, 2));
        assert_eq!(flow.phase().name(), "Lobby");

        flow.begin_round(RoundStarted {
            round: classic_round(2),
        })
        .unwrap();
        assert_eq!(flow.phase().name(), "RoleReveal");

        flow.complete_reveal().unwrap();
        assert_eq!(flow.phase().name(), "Discussion");

        flow.complete_discussion().unwrap();
        assert_eq!(flow.phase().name(), "Voting");

        let votes = vec![vote(1, 1, 2), vote(2, 3, 2), vote(3, 4, 2), vote(4, 2, 1)];
        let report = flow.complete_voting(VotesFetched { votes }).unwrap();
        assert_eq!(report.verdict, RoundVerdict::SpyCaught { spy: 2 });
        assert_eq!(flow.session().current_round, 1);
    }

    #[test]
    fn transitions_from_wrong_phase_are_rejected() {
        let mut flow = GameFlow::new(session(GameMode::Classic, 4, 2));
        let err = flow.complete_reveal().unwrap_err();
        assert!(matches!(err, GameError::Phase { .. }));
        let err = flow
            .complete_voting(VotesFetched { votes: vec![] })
            .unwrap_err();
        assert!(matches!(err, GameError::Phase { .. }));
        // The failed transition leaves the phase unchanged.
        assert_eq!(flow.phase().name(), "Lobby");
    }

    #[test]
    fn discussion_branches_on_game_mode() {
        let mut flow = GameFlow::new(session(GameMode::MultiSpy, 6, 5));
        flow.begin_round(RoundStarted {
            round: multi_round(&[1, 2]),
        })
        .unwrap();
        flow.complete_reveal().unwrap();
        flow.complete_discussion().unwrap();
        assert_eq!(flow.phase().name(), "Elimination");
    }

    #[test]
    fn elimination_continue_keeps_the_board() {
        let mut flow = GameFlow::new(session(GameMode::MultiSpy, 6, 5));
        flow.begin_round(RoundStarted {
            round: multi_round(&[1, 2]),
        })
        .unwrap();
        flow.complete_reveal().unwrap();
        flow.complete_discussion().unwrap();

        // Eliminate a non-spy: 2 spies vs 3 agents, game continues.
        let verdict = flow
            .apply_elimination(EliminationApplied {
                result: EliminationResult {
                    player: player(3, 0),
                    session: None,
                },
            })
            .unwrap();
        assert_eq!(verdict, EliminationVerdict::Continue);
        match flow.phase() {
            Phase::Elimination(board) => {
                assert_eq!(board.standing.remaining_spies, 2);
                assert_eq!(board.standing.remaining_agents, 3);
                let last = board.last.as_ref().unwrap();
                assert_eq!(last.player.id, 3);
                assert!(!last.was_spy);
            }
            other => panic!("expected Elimination, got {}", other.name()),
        }
        // A Continue verdict lets the controller request the next round.
        flow.begin_round(RoundStarted {
            round: multi_round(&[1, 2]),
        })
        .unwrap();
        assert_eq!(flow.phase().name(), "RoleReveal");
    }

    #[test]
    fn spies_win_ends_the_game() {
        let mut flow = GameFlow::new(session(GameMode::MultiSpy, 6, 5));
        flow.begin_round(RoundStarted {
            round: multi_round(&[1, 2]),
        })
        .unwrap();
        flow.complete_reveal().unwrap();
        flow.complete_discussion().unwrap();

        for victim in [3, 4] {
            flow.apply_elimination(EliminationApplied {
                result: EliminationResult {
                    player: player(victim, 0),
                    session: None,
                },
            })
            .unwrap();
            if victim == 3 {
                assert_eq!(flow.phase().name(), "Elimination");
            }
        }
        // 2 spies vs 2 agents: spies win, terminal phase.
        match flow.phase() {
            Phase::GameCompleted(result) => assert_eq!(result.winners, Winners::Spies),
            other => panic!("expected GameCompleted, got {}", other.name()),
        }
        assert!(flow.session().finished);
        assert!(flow
            .begin_round(RoundStarted {
                round: multi_round(&[1, 2])
            })
            .is_err());
    }

    #[test]
    fn eliminating_all_spies_wins_for_agents() {
        let mut flow = GameFlow::new(session(GameMode::MultiSpy, 6, 5));
        flow.begin_round(RoundStarted {
            round: multi_round(&[1]),
        })
        .unwrap();
        flow.complete_reveal().unwrap();
        flow.complete_discussion().unwrap();

        flow.apply_elimination(EliminationApplied {
            result: EliminationResult {
                player: player(1, 0),
                session: None,
            },
        })
        .unwrap();
        match flow.phase() {
            Phase::GameCompleted(result) => assert_eq!(result.winners, Winners::Agents),
            other => panic!("expected GameCompleted, got {}", other.name()),
        }
    }

    #[test]
    fn reveal_walk_excludes_players_eliminated_earlier() {
        let mut base = session(GameMode::MultiSpy, 5, 5);
        base.players[2].is_eliminated = true;
        let mut flow = GameFlow::new(base);
        flow.begin_round(RoundStarted {
            round: multi_round(&[1]),
        })
        .unwrap();
        match flow.phase() {
            Phase::RoleReveal(walk) => assert_eq!(walk.position(), (0, 4)),
            other => panic!("expected RoleReveal, got {}", other.name()),
        }
    }

    #[test]
    fn classic_game_ends_on_score_table() {
        let mut s = session(GameMode::Classic, 3, 1);
        s.players = vec![player(1, 5), player(2, 5), player(3, 2)];
        let mut flow = GameFlow::new(s);
        flow.begin_round(RoundStarted {
            round: classic_round(2),
        })
        .unwrap();
        flow.complete_reveal().unwrap();
        flow.complete_discussion().unwrap();
        flow.complete_voting(VotesFetched {
            votes: vec![vote(1, 1, 2)],
        })
        .unwrap();
        assert!(flow.session().rounds_exhausted());

        let result = flow.complete_game().unwrap().clone();
        assert_eq!(result.winners, Winners::TopScorers(vec![1, 2]));
        assert_eq!(result.leaderboard.last().unwrap().id, 3);
    }

    #[test]
    fn no_votes_reported_distinctly() {
        let mut flow = GameFlow::new(session(GameMode::Classic, 3, 3));
        flow.begin_round(RoundStarted {
            round: classic_round(1),
        })
        .unwrap();
        flow.complete_reveal().unwrap();
        flow.complete_discussion().unwrap();
        let report = flow.complete_voting(VotesFetched { votes: vec![] }).unwrap();
        assert_eq!(report.verdict, RoundVerdict::NoVotes);
    }
}
