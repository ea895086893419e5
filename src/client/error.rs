//! Client-side error taxonomy
//!
//! Every failure of a Start/Message exchange collapses into one of four
//! categories; none of them is fatal to the session.

use thiserror::Error;

/// Error surfaced by the interview client. The payload is always a single
/// human-readable message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// Bad local input: empty message, no transfer id, call already in
    /// flight. Never reaches the network.
    #[error("{0}")]
    Validation(String),
    /// The server rejected the caller's credentials or role.
    #[error("{0}")]
    Authorization(String),
    /// The transfer id does not exist.
    #[error("{0}")]
    NotFound(String),
    /// Network failure, timeout, or an unreadable response body.
    #[error("{0}")]
    Transport(String),
}

impl ClientError {
    /// Classify a non-success HTTP status with its extracted detail message.
    pub fn from_status(status: u16, detail: String) -> Self {
        match status {
            400 | 422 => ClientError::Validation(detail),
            401 | 403 => ClientError::Authorization(detail),
            404 => ClientError::NotFound(detail),
            _ => ClientError::Transport(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert!(matches!(
            ClientError::from_status(400, "x".into()),
            ClientError::Validation(_)
        ));
        assert!(matches!(
            ClientError::from_status(401, "x".into()),
            ClientError::Authorization(_)
        ));
        assert!(matches!(
            ClientError::from_status(403, "x".into()),
            ClientError::Authorization(_)
        ));
        assert!(matches!(
            ClientError::from_status(404, "x".into()),
            ClientError::NotFound(_)
        ));
        assert!(matches!(
            ClientError::from_status(500, "x".into()),
            ClientError::Transport(_)
        ));
    }
}
