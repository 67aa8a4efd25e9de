pub mod api;
pub mod elimination;
pub mod error;
pub mod flow;
pub mod model;
pub mod sequence;
pub mod setup;
pub mod spies;
pub mod tally;

// Re-export common error type
pub use error::{GameError, Result};
pub use model::{GameMode, Player, PlayerId, Round, RoundId, Session, SessionId, Vote};
