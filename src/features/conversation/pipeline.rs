//! Per-message conversation pipeline
//!
//! `Idle -> Validating -> QuotaCheck -> Requesting -> Persisting -> Idle`.
//! A message may be dropped or answered at each step; only a successful
//! backend call mutates the session.
//!
//! Two messages from the same user racing through the quota check can both
//! pass before either increment lands. That undercount is accepted; the store
//! is not locked per user.
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.2.0: One-shot `ask` turns without transcript
//! - 1.1.0: Backend failures discard the turn entirely
//! - 1.0.0: Initial release

use log::{debug, error, info, warn};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{RejectReason, SessionError, UserId};
use crate::features::prompting::{
    apply_completion, build_request, clean_completion, validate_message, CompletionBackend,
    CompletionConfig, PromptBuilder,
};
use crate::features::sessions::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatType {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatType {
    pub fn is_private(self) -> bool {
        matches!(self, ChatType::Private)
    }
}

/// Message as received from the transport
#[derive(Debug, Clone)]
pub struct InboundEvent {
    pub user_id: UserId,
    pub chat_type: ChatType,
    pub text: String,
}

impl InboundEvent {
    pub fn new(user_id: UserId, chat_type: ChatType, text: impl Into<String>) -> Self {
        Self {
            user_id,
            chat_type,
            text: text.into(),
        }
    }

    pub fn is_command(&self) -> bool {
        self.text.trim_start().starts_with('/')
    }
}

/// Where a pipeline run ended
#[derive(Debug)]
pub enum Outcome {
    /// Not for the conversation core (non-private chat or a command)
    Ignored,
    Rejected(RejectReason),
    LimitReached { limit: u32 },
    Replied { reply: String },
    Failed(SessionError),
}

impl Outcome {
    /// Text to send back, if any
    pub fn reply_text(&self) -> Option<String> {
        match self {
            Outcome::Ignored => None,
            Outcome::Rejected(reason) => Some(reason.to_string()),
            Outcome::LimitReached { limit } => Some(format!(
                "You have reached the message limit of {limit} messages. Please wait until tomorrow for more messages."
            )),
            Outcome::Replied { reply } => Some(reply.clone()),
            Outcome::Failed(e) => Some(e.user_message()),
        }
    }

    fn from_error(e: SessionError) -> Self {
        match e {
            SessionError::Rejected(reason) => Outcome::Rejected(reason),
            other => Outcome::Failed(other),
        }
    }
}

#[derive(Clone)]
pub struct ConversationPipeline {
    store: SessionStore,
    backend: Arc<dyn CompletionBackend>,
    completion: CompletionConfig,
    daily_limit: u32,
}

impl ConversationPipeline {
    pub fn new(
        store: SessionStore,
        backend: Arc<dyn CompletionBackend>,
        completion: CompletionConfig,
        daily_limit: u32,
    ) -> Self {
        Self {
            store,
            backend,
            completion,
            daily_limit,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    pub fn completion(&self) -> &CompletionConfig {
        &self.completion
    }

    /// Run one inbound chat message through the conversation
    pub async fn handle(&self, event: &InboundEvent, request_id: Uuid) -> Outcome {
        if !event.chat_type.is_private() {
            debug!("[{request_id}] Ignoring {:?} chat message", event.chat_type);
            return Outcome::Ignored;
        }
        if event.is_command() {
            return Outcome::Ignored;
        }

        match self.converse(event.user_id, &event.text, request_id).await {
            Ok(outcome) => outcome,
            Err(e) => Outcome::from_error(e),
        }
    }

    async fn converse(
        &self,
        user_id: UserId,
        text: &str,
        request_id: Uuid,
    ) -> Result<Outcome, SessionError> {
        validate_message(text)?;

        let session = self.store.create_if_absent(user_id).await?;
        if !session.within_quota(self.daily_limit) {
            info!(
                "[{request_id}] User {user_id} at limit ({}/{})",
                session.message_count, self.daily_limit
            );
            return Ok(Outcome::LimitReached {
                limit: self.daily_limit,
            });
        }

        let request = self.completion.request(build_request(&session, text));
        info!("[{request_id}] Requesting completion for user {user_id}");
        let raw = self.backend.complete(&request).await.map_err(|e| {
            warn!("[{request_id}] Backend failed, turn discarded: {e}");
            e
        })?;

        let (reply, new_history) = apply_completion(&session, text, &raw);
        self.persist(user_id, &new_history, request_id).await;

        Ok(Outcome::Replied { reply })
    }

    /// Counter first, then transcript. Both writes are attempted; failures are logged, never retried.
    async fn persist(&self, user_id: UserId, new_history: &str, request_id: Uuid) {
        if let Err(e) = self.store.increment_count(user_id).await {
            error!("[{request_id}] Failed to increment message count for {user_id}: {e}");
        }
        if let Err(e) = self.store.replace_history(user_id, new_history).await {
            error!("[{request_id}] Failed to store history for {user_id}: {e}");
        }
    }

    /// One-shot question using the user's persona and no transcript.
    ///
    /// Works in any chat type and counts against the same quota.
    pub async fn ask(&self, user_id: UserId, question: &str, request_id: Uuid) -> Outcome {
        match self.ask_inner(user_id, question, request_id).await {
            Ok(outcome) => outcome,
            Err(e) => Outcome::from_error(e),
        }
    }

    async fn ask_inner(
        &self,
        user_id: UserId,
        question: &str,
        request_id: Uuid,
    ) -> Result<Outcome, SessionError> {
        validate_message(question)?;

        let session = self.store.create_if_absent(user_id).await?;
        if !session.within_quota(self.daily_limit) {
            return Ok(Outcome::LimitReached {
                limit: self.daily_limit,
            });
        }

        let prompt = PromptBuilder::stateless(&session.persona).build(question);
        info!("[{request_id}] One-shot question for user {user_id}");
        let raw = self.backend.complete(&self.completion.request(prompt)).await?;

        if let Err(e) = self.store.increment_count(user_id).await {
            error!("[{request_id}] Failed to increment message count for {user_id}: {e}");
        }
        Ok(Outcome::Replied {
            reply: clean_completion(&raw),
        })
    }
}
