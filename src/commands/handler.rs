//! Text command handler trait and invocation parsing
//!
//! - **Version**: 2.0.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 2.0.0: Transport-neutral text commands returning replies
//! - 1.0.0: Initial implementation for modular command handling

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::context::CommandContext;
use super::reply::Reply;
use crate::core::error::UserId;
use crate::features::conversation::{ChatType, InboundEvent};

/// A parsed `/name args` message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub user_id: UserId,
    pub chat_type: ChatType,
    /// Lowercase command name without the slash or `@botname` suffix
    pub name: String,
    /// Everything after the command name, trimmed
    pub args: String,
    pub request_id: Uuid,
}

impl CommandInvocation {
    /// `None` when the event is not a command
    pub fn parse(event: &InboundEvent, request_id: Uuid) -> Option<Self> {
        let text = event.text.trim();
        let body = text.strip_prefix('/')?;

        let (head, args) = match body.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (body, ""),
        };
        let name = head.split('@').next().unwrap_or(head).to_lowercase();
        if name.is_empty() {
            return None;
        }

        Some(Self {
            user_id: event.user_id,
            chat_type: event.chat_type,
            name,
            args: args.to_string(),
            request_id,
        })
    }
}

/// Trait for text command handlers
///
/// Each handler processes one or more commands and returns the replies to
/// deliver. Handlers are registered with a `CommandRegistry` and dispatched
/// by command name.
///
/// # Example
///
/// ```ignore
/// pub struct PingHandler;
///
/// #[async_trait]
/// impl TextCommandHandler for PingHandler {
///     fn command_names(&self) -> &'static [&'static str] {
///         &["ping"]
///     }
///
///     async fn handle(
///         &self,
///         ctx: Arc<CommandContext>,
///         invocation: &CommandInvocation,
///     ) -> Result<Vec<Reply>> {
///         Ok(vec![Reply::text("Pong!")])
///     }
/// }
/// ```
#[async_trait]
pub trait TextCommandHandler: Send + Sync {
    /// Command name(s) this handler processes
    fn command_names(&self) -> &'static [&'static str];

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        invocation: &CommandInvocation,
    ) -> Result<Vec<Reply>>;
}
