//! Session record shapes
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Add QuotaStatus and DeletedSession
//! - 1.0.0: Initial release

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::UserId;

/// Persisted conversational state for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    /// Instruction prefix prepended to every prompt
    pub persona: String,
    /// Transcript since the last reset; empty means no history
    pub history: String,
    /// Turns consumed since the last quota reset
    pub message_count: u32,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn has_history(&self) -> bool {
        !self.history.is_empty()
    }

    /// Whether another turn is allowed under `limit`
    pub fn within_quota(&self, limit: u32) -> bool {
        self.message_count < limit
    }
}

/// Audit row written when a session is deleted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedSession {
    pub user_id: UserId,
    pub history: String,
    pub persona: String,
    pub deleted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaStatus {
    pub used: u32,
    pub limit: u32,
    pub remaining: u32,
}

impl QuotaStatus {
    pub fn new(used: u32, limit: u32) -> Self {
        Self {
            used,
            limit,
            remaining: limit.saturating_sub(used),
        }
    }

    pub fn exhausted(&self) -> bool {
        self.remaining == 0
    }
}
