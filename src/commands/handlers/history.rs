//! Conversation history command handlers
//!
//! Handles: reset, save
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Export transcript as a file with /save
//! - 1.0.0: Initial release with /reset

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use std::path::Path;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::{CommandInvocation, TextCommandHandler};
use crate::commands::reply::Reply;
use crate::core::error::SessionError;
use crate::features::transcript::export_transcript;

pub const SAVE_CAPTION: &str = "Here is our chat history so far";

pub struct HistoryHandler;

#[async_trait]
impl TextCommandHandler for HistoryHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["reset", "save"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        invocation: &CommandInvocation,
    ) -> Result<Vec<Reply>> {
        match invocation.name.as_str() {
            "reset" => self.handle_reset(&ctx, invocation).await,
            "save" => self.handle_save(&ctx, invocation).await,
            _ => Ok(Vec::new()),
        }
    }
}

impl HistoryHandler {
    /// Handle /reset: clear the transcript, keep persona and counter
    async fn handle_reset(
        &self,
        ctx: &CommandContext,
        invocation: &CommandInvocation,
    ) -> Result<Vec<Reply>> {
        match ctx.store().reset_history(invocation.user_id).await {
            Ok(()) => Ok(vec![Reply::text(
                "Our conversation has been reset. What would you like to talk about?",
            )]),
            Err(e @ SessionError::NotFound(_)) => Ok(vec![Reply::text(e.user_message())]),
            Err(e) => Err(e.into()),
        }
    }

    /// Handle /save: write the transcript to a file for upload
    async fn handle_save(
        &self,
        ctx: &CommandContext,
        invocation: &CommandInvocation,
    ) -> Result<Vec<Reply>> {
        let session = ctx
            .store()
            .get(invocation.user_id)
            .await?
            .filter(|session| session.has_history());

        let Some(session) = session else {
            return Ok(vec![Reply::text(
                SessionError::NotFound(invocation.user_id).user_message(),
            )]);
        };

        let path = export_transcript(
            Path::new(&ctx.config.transcript_dir),
            session.user_id,
            &session.history,
        )
        .await?;
        info!(
            "[{}] Transcript exported for user {}",
            invocation.request_id, invocation.user_id
        );

        Ok(vec![Reply::File {
            path,
            caption: SAVE_CAPTION.to_string(),
        }])
    }
}
