//! Error kinds shared by the session store, prompt engine and pipeline
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Storage, Backend, Rejected and NotFound kinds with user-facing replies

use std::fmt;

/// Opaque, stable identifier of a chat user
pub type UserId = u64;

/// Why an inbound message was refused before reaching the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Message is empty after trimming
    Empty,
    /// Message contains the reserved quoting glyph
    ForbiddenCharacter,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Empty => write!(f, "Please send a message with some text in it."),
            RejectReason::ForbiddenCharacter => {
                write!(f, "Please do not use the ` character in your message.")
            }
        }
    }
}

/// Errors surfaced by the conversation core
///
/// Every kind is terminal for the current pipeline run. None of them is
/// retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// I/O failure against the persistence layer
    #[error("storage error: {0}")]
    Storage(#[from] sqlite::Error),

    /// Completion call failed or timed out
    #[error("completion backend error: {0}")]
    Backend(String),

    /// User input violates framing or emptiness constraints
    #[error("message rejected: {0}")]
    Rejected(RejectReason),

    /// Operation referenced a session that does not exist
    #[error("no session for user {0}")]
    NotFound(UserId),
}

impl SessionError {
    /// Single reply shown to the end user; never exposes internal details
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Storage(_) => {
                "Sorry, I couldn't reach my memory right now. Please try again later.".to_string()
            }
            SessionError::Backend(_) => {
                "Sorry, I encountered an error while thinking about that. Please try again."
                    .to_string()
            }
            SessionError::Rejected(reason) => reason.to_string(),
            SessionError::NotFound(_) => "You have not started a conversation yet!".to_string(),
        }
    }
}
