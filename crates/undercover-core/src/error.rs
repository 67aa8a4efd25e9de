//! Error types for the Undercover client.

use thiserror::Error;

use crate::setup::SetupError;

/// A shared error type for the entire client.
///
/// Mirrors the failure taxonomy the screens have to handle: transport
/// failures, non-2xx responses, malformed payloads, locally violated
/// invariants, and phase mismatches in the flow controller. Nothing here
/// is fatal to the process; every variant is surfaced where the action
/// was initiated and the user retries by hand.
#[derive(Error, Debug)]
pub enum GameError {
    /// The request could not complete at all (DNS, connect, timeout).
    #[error("could not reach mission control: {message}")]
    Transport { message: String },

    /// The server answered with a non-success status. The body text is
    /// kept verbatim for logging; it is never parsed into error codes.
    #[error("server rejected the request ({status}): {body}")]
    Api { status: u16, body: String },

    /// A response arrived but did not have the expected shape
    /// (e.g. the votes endpoint returning a non-list). Distinct from
    /// "no data": an empty vote list is a legitimate state.
    #[error("invalid data from server: {0}")]
    InvalidData(String),

    /// A local invariant was violated before any network call was made.
    #[error(transparent)]
    Setup(#[from] SetupError),

    /// A flow transition was requested from the wrong phase.
    #[error("wrong phase: expected {expected}, currently in {found}")]
    Phase {
        expected: &'static str,
        found: &'static str,
    },

    /// Internal error (should not happen in normal operation)
    #[error("internal error: {0}")]
    Internal(String),
}

impl GameError {
    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates an invalid-data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData(message.into())
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this failure came from the network (transport or status),
    /// i.e. the user can retry the exact same action.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Api { .. })
    }

    /// Check if this is a local validation failure.
    pub fn is_setup(&self) -> bool {
        matches!(self, Self::Setup(_))
    }

    /// Check if this is an invalid-data failure.
    pub fn is_invalid_data(&self) -> bool {
        matches!(self, Self::InvalidData(_))
    }
}

impl From<reqwest::Error> for GameError {
    fn from(err: reqwest::Error) -> Self {
        let detail = if err.is_timeout() {
            "timed out"
        } else if err.is_connect() {
            "connection refused"
        } else {
            "request failed"
        };
        Self::Transport {
            message: format!("{detail}: {err}"),
        }
    }
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidData(err.to_string())
    }
}

impl From<std::io::Error> for GameError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(format!("{} (kind: {:?})", err, err.kind()))
    }
}

/// A type alias for `Result<T, GameError>`.
pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_predicate_covers_transport_and_status() {
        assert!(GameError::transport("no route").is_network());
        assert!(GameError::Api {
            status: 500,
            body: "boom".into()
        }
        .is_network());
        assert!(!GameError::invalid_data("not a list").is_network());
    }

    #[test]
    fn invalid_data_is_distinct_from_network() {
        let err = GameError::invalid_data("votes endpoint returned an object");
        assert!(err.is_invalid_data());
        assert!(!err.is_network());
    }
}
