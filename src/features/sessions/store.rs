//! Per-user session store
//!
//! Owns creation, lookup, quota accounting, history replacement, persona
//! updates and resets. Each mutation is a single statement against the
//! database, so concurrent readers never observe a torn record.
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.2.0: Administrative delete with audit trail
//! - 1.1.0: Persona updates create the session when absent
//! - 1.0.0: Initial release

use chrono::Utc;
use log::{debug, error, info};

use crate::core::error::{SessionError, UserId};
use crate::database::Database;

use super::model::{DeletedSession, QuotaStatus, Session};

#[derive(Clone)]
pub struct SessionStore {
    database: Database,
    default_persona: String,
}

impl SessionStore {
    pub fn new(database: Database, default_persona: impl Into<String>) -> Self {
        Self {
            database,
            default_persona: default_persona.into(),
        }
    }

    pub fn default_persona(&self) -> &str {
        &self.default_persona
    }

    pub async fn get(&self, user_id: UserId) -> Result<Option<Session>, SessionError> {
        self.database.fetch_session(user_id).await
    }

    /// Return the existing session untouched, or insert a fresh one with the default persona
    pub async fn create_if_absent(&self, user_id: UserId) -> Result<Session, SessionError> {
        self.create_with_persona_if_absent(user_id, &self.default_persona)
            .await
    }

    pub async fn create_with_persona_if_absent(
        &self,
        user_id: UserId,
        persona: &str,
    ) -> Result<Session, SessionError> {
        if self
            .database
            .insert_session_if_absent(user_id, persona, Utc::now())
            .await?
        {
            info!("New session for user {user_id}");
        }
        self.database
            .fetch_session(user_id)
            .await?
            .ok_or(SessionError::NotFound(user_id))
    }

    /// `message_count += 1`. A missing session is ignored.
    pub async fn increment_count(&self, user_id: UserId) -> Result<(), SessionError> {
        if !self.database.increment_message_count(user_id).await? {
            debug!("increment_count: no session for user {user_id}");
        }
        Ok(())
    }

    /// Overwrite the stored transcript wholesale
    pub async fn replace_history(
        &self,
        user_id: UserId,
        new_history: &str,
    ) -> Result<(), SessionError> {
        if !self.database.update_history(user_id, new_history).await? {
            debug!("replace_history: no session for user {user_id}");
        }
        Ok(())
    }

    pub async fn set_persona(&self, user_id: UserId, persona: &str) -> Result<(), SessionError> {
        self.database
            .upsert_persona(user_id, persona, Utc::now())
            .await?;
        info!("Persona updated for user {user_id}");
        Ok(())
    }

    /// Clear the transcript, keeping the counter and persona
    pub async fn reset_history(&self, user_id: UserId) -> Result<(), SessionError> {
        if self.database.clear_history(user_id).await? {
            info!("History reset for user {user_id}");
            Ok(())
        } else {
            Err(SessionError::NotFound(user_id))
        }
    }

    /// Zero every session's counter. Safe to call repeatedly.
    pub async fn reset_all_counts(&self) -> Result<usize, SessionError> {
        let touched = self.database.reset_all_message_counts().await.map_err(|e| {
            error!("Failed to reset message counts: {e}");
            e
        })?;
        info!("Daily quota reset: {touched} session(s) returned to zero");
        Ok(touched)
    }

    /// `max(limit - message_count, 0)`
    pub async fn quota_remaining(&self, user_id: UserId, limit: u32) -> Result<u32, SessionError> {
        Ok(self.usage(user_id, limit).await?.remaining)
    }

    pub async fn usage(&self, user_id: UserId, limit: u32) -> Result<QuotaStatus, SessionError> {
        let session = self
            .get(user_id)
            .await?
            .ok_or(SessionError::NotFound(user_id))?;
        Ok(QuotaStatus::new(session.message_count, limit))
    }

    /// Administrative delete. The final state lands in the deletion log.
    pub async fn delete(&self, user_id: UserId) -> Result<(), SessionError> {
        if self.database.delete_session(user_id).await? {
            info!("Session for user {user_id} deleted and archived");
            Ok(())
        } else {
            Err(SessionError::NotFound(user_id))
        }
    }

    pub async fn deletion_log(&self, user_id: UserId) -> Result<Vec<DeletedSession>, SessionError> {
        self.database.deletion_log(user_id).await
    }

    pub async fn session_count(&self) -> Result<u64, SessionError> {
        self.database.session_count().await
    }
}
