//! Ask command handler
//!
//! Handles: ask
//!
//! - **Version**: 2.0.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 2.0.0: One-shot question with the user's persona and no transcript
//! - 1.0.0: Extracted from command_handler.rs

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::{CommandInvocation, TextCommandHandler};
use crate::commands::reply::Reply;

/// Handler for /ask: a single question answered without the conversation history
pub struct AskHandler;

#[async_trait]
impl TextCommandHandler for AskHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["ask"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        invocation: &CommandInvocation,
    ) -> Result<Vec<Reply>> {
        if invocation.args.is_empty() {
            return Ok(vec![Reply::text("Usage: /ask <question>")]);
        }

        let outcome = ctx
            .pipeline
            .ask(invocation.user_id, &invocation.args, invocation.request_id)
            .await;
        info!(
            "[{}] Ask command finished for user {}: {outcome:?}",
            invocation.request_id, invocation.user_id
        );

        Ok(outcome.reply_text().map(Reply::Text).into_iter().collect())
    }
}
