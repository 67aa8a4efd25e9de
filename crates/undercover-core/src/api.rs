//! The backend contract consumed by the application layer.
//!
//! The trait lives here so orchestration code depends only on the core
//! crate and tests can run against an in-memory fake; the HTTP
//! implementation lives in `undercover-api`.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{
    Category, EliminationResult, PlayerId, Question, Round, RoundId, Session, SessionConfig,
    SessionId, Vote,
};

/// Every logical operation of the game backend, JSON over HTTP.
///
/// Calls are asynchronous and not cancellable once issued; a caller that
/// loses interest simply drops the future's result. No operation retries
/// on its own.
#[async_trait]
pub trait GameApi: Send + Sync {
    async fn create_session(&self, names: &[String], config: &SessionConfig) -> Result<Session>;

    async fn start_round(&self, session_id: SessionId) -> Result<Round>;

    async fn session_status(&self, session_id: SessionId) -> Result<Session>;

    async fn finish_round(&self, round_id: RoundId) -> Result<()>;

    async fn next_round(&self, session_id: SessionId, current_round_id: RoundId) -> Result<Round>;

    async fn finish_session(&self, session_id: SessionId) -> Result<()>;

    async fn cast_vote(&self, round_id: RoundId, voter: PlayerId, target: PlayerId)
        -> Result<Vote>;

    /// The round's full vote list. Implementations must shape-check the
    /// payload: a non-list is invalid data, an empty list is a
    /// legitimate "no votes" state.
    async fn votes_for_round(&self, round_id: RoundId) -> Result<Vec<Vote>>;

    async fn player_vote(&self, round_id: RoundId, player: PlayerId) -> Result<Option<Vote>>;

    async fn vote_count(&self, round_id: RoundId) -> Result<u32>;

    async fn eliminate_player(&self, round_id: RoundId, player: PlayerId)
        -> Result<EliminationResult>;

    async fn categories(&self) -> Result<Vec<Category>>;

    async fn random_question(&self) -> Result<Question>;
}
