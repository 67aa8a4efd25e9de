//! The turn sequencers: three linear walks over the active player list.
//!
//! One shared device, one human acting at a time; each walk advances a
//! single index and never runs two players concurrently. Walks are built
//! from the session's active players only, so an eliminated player is
//! never re-admitted, and the original seating order is preserved.

use crate::error::{GameError, Result};
use crate::model::{Player, PlayerId};

/// What a walk did as a result of one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStep {
    /// Moved on to the next player.
    Advanced,
    /// The last player is done; the phase is complete.
    Complete,
}

fn active(players: &[Player]) -> Vec<Player> {
    players.iter().filter(|p| !p.is_eliminated).cloned().collect()
}

/// Role-reveal walk: pass the device around, each player peeks once.
#[derive(Debug, Clone)]
pub struct RevealWalk {
    players: Vec<Player>,
    index: usize,
    revealed: bool,
}

impl RevealWalk {
    pub fn new(players: &[Player]) -> Self {
        Self {
            players: active(players),
            index: 0,
            revealed: false,
        }
    }

    pub fn current(&self) -> Option<&Player> {
        self.players.get(self.index)
    }

    pub fn revealed(&self) -> bool {
        self.revealed
    }

    pub fn position(&self) -> (usize, usize) {
        (self.index, self.players.len())
    }

    /// Shows the current player their role. Only this player's card is
    /// ever face-up.
    pub fn reveal(&mut self) {
        self.revealed = true;
    }

    /// Hides the card again and hands the device to the next player.
    pub fn advance(&mut self) -> WalkStep {
        self.revealed = false;
        self.index += 1;
        if self.index >= self.players.len() {
            WalkStep::Complete
        } else {
            WalkStep::Advanced
        }
    }
}

/// Discussion walk: a fixed per-player countdown, skippable by hand.
#[derive(Debug, Clone)]
pub struct DiscussionWalk {
    players: Vec<Player>,
    index: usize,
    remaining: u32,
    per_player: u32,
}

/// Default speaking time per player, in ticks (one tick per second).
pub const DEFAULT_SPEAKING_TICKS: u32 = 20;

impl DiscussionWalk {
    pub fn new(players: &[Player], per_player: u32) -> Self {
        Self {
            players: active(players),
            index: 0,
            remaining: per_player,
            per_player,
        }
    }

    pub fn current(&self) -> Option<&Player> {
        self.players.get(self.index)
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn per_player(&self) -> u32 {
        self.per_player
    }

    pub fn position(&self) -> (usize, usize) {
        (self.index, self.players.len())
    }

    /// One timer tick. Reaching zero auto-advances to the next speaker.
    pub fn tick(&mut self) -> Option<WalkStep> {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Manual skip to the next speaker.
    pub fn skip(&mut self) -> WalkStep {
        self.advance()
    }

    fn advance(&mut self) -> WalkStep {
        self.index += 1;
        self.remaining = self.per_player;
        if self.index >= self.players.len() {
            WalkStep::Complete
        } else {
            WalkStep::Advanced
        }
    }
}

/// A recorded ballot: who voted for whom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ballot {
    pub voter: PlayerId,
    pub target: PlayerId,
}

/// Voting walk: voters take turns, one ballot each, no self-votes.
#[derive(Debug, Clone)]
pub struct VotingWalk {
    players: Vec<Player>,
    index: usize,
    ballots: Vec<Ballot>,
}

impl VotingWalk {
    pub fn new(players: &[Player]) -> Self {
        Self {
            players: active(players),
            index: 0,
            ballots: Vec::new(),
        }
    }

    pub fn current_voter(&self) -> Option<&Player> {
        self.players.get(self.index)
    }

    pub fn candidates(&self) -> &[Player] {
        &self.players
    }

    pub fn ballots(&self) -> &[Ballot] {
        &self.ballots
    }

    pub fn position(&self) -> (usize, usize) {
        (self.index, self.players.len())
    }

    pub fn has_voted(&self, voter: PlayerId) -> bool {
        self.ballots.iter().any(|b| b.voter == voter)
    }

    /// Whether the current voter may pick this target. Drives button
    /// disabling in the UI, so the rejection happens before any network
    /// call is attempted.
    pub fn can_vote_for(&self, target: PlayerId) -> bool {
        match self.current_voter() {
            Some(voter) => {
                voter.id != target
                    && !self.has_voted(voter.id)
                    && self.players.iter().any(|p| p.id == target)
            }
            None => false,
        }
    }

    /// Records the current voter's ballot and advances to the next voter.
    pub fn record(&mut self, target: PlayerId) -> Result<WalkStep> {
        let voter = self
            .current_voter()
            .ok_or_else(|| GameError::internal("vote recorded with no voter remaining"))?
            .id;
        if !self.can_vote_for(target) {
            return Err(GameError::internal(format!(
                "ballot rejected: voter {voter} may not vote for {target}"
            )));
        }
        self.ballots.push(Ballot { voter, target });
        self.index += 1;
        if self.index >= self.players.len() {
            Ok(WalkStep::Complete)
        } else {
            Ok(WalkStep::Advanced)
        }
    }
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
    fn reveal_walk_clears_flag_on_advance() {
        let mut walk = RevealWalk::new(&roster(3, &[]));
        assert!(!walk.revealed());
        walk.reveal();
        assert!(walk.revealed());
        assert_eq!(walk.advance(), WalkStep::Advanced);
        assert!(!walk.revealed());
        assert_eq!(walk.advance(), WalkStep::Advanced);
        assert_eq!(walk.advance(), WalkStep::Complete);
    }

    #[test]
    fn walks_skip_eliminated_players_in_order() {
        // 5 players with player 3 eliminated mid-game: the walk must
        // enumerate exactly 1, 2, 4, 5.
        let players = roster(5, &[3]);
        let mut walk = RevealWalk::new(&players);
        let mut seen = Vec::new();
        while let Some(p) = walk.current() {
            seen.push(p.id);
            walk.advance();
        }
        assert_eq!(seen, vec![1, 2, 4, 5]);
    }

    #[test]
    fn discussion_ticks_down_and_auto_advances() {
        let mut walk = DiscussionWalk::new(&roster(2, &[]), 3);
        assert_eq!(walk.tick(), None);
        assert_eq!(walk.tick(), None);
        assert_eq!(walk.tick(), Some(WalkStep::Advanced));
        assert_eq!(walk.remaining(), 3);
        assert_eq!(walk.skip(), WalkStep::Complete);
    }

    #[test]
    fn voting_walk_blocks_self_votes() {
        let walk = VotingWalk::new(&roster(3, &[]));
        assert!(!walk.can_vote_for(1));
        assert!(walk.can_vote_for(2));
    }

    #[test]
    fn voting_walk_rejects_second_ballot() {
        let mut walk = VotingWalk::new(&roster(3, &[]));
        assert_eq!(walk.record(2).unwrap(), WalkStep::Advanced);
        assert!(walk.has_voted(1));
        // Voter 1 is no longer current; a ballot in their name cannot be
        // recorded again because the walk has moved on.
        assert_eq!(walk.current_voter().unwrap().id, 2);
        assert!(!walk.can_vote_for(2));
    }

    #[test]
    fn voting_walk_completes_after_last_voter() {
        let mut walk = VotingWalk::new(&roster(3, &[]));
        assert_eq!(walk.record(2).unwrap(), WalkStep::Advanced);
        assert_eq!(walk.record(3).unwrap(), WalkStep::Advanced);
        assert_eq!(walk.record(1).unwrap(), WalkStep::Complete);
        assert_eq!(walk.ballots().len(), 3);
    }

    #[test]
    fn voting_walk_rejects_unknown_target() {
        let mut walk = VotingWalk::new(&roster(3, &[]));
        assert!(walk.record(99).is_err());
        // The failed ballot must not consume the turn.
        assert_eq!(walk.current_voter().unwrap().id, 1);
    }

    #[test]
    fn eliminated_player_cannot_be_voted_for() {
        let walk = VotingWalk::new(&roster(4, &[3]));
        assert!(!walk.can_vote_for(3));
    }
}
