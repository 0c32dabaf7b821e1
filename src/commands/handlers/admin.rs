//! Admin command handlers
//!
//! Handles: purge
//!
//! - **Version**: 2.0.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 2.0.0: Session purge into the deletion log, gated by ADMIN_USER_IDS
//! - 1.0.0: Extracted from command_handler.rs

use anyhow::Result;
use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::{CommandInvocation, TextCommandHandler};
use crate::commands::reply::Reply;
use crate::core::error::{SessionError, UserId};

pub struct AdminHandler;

#[async_trait]
impl TextCommandHandler for AdminHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["purge"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        invocation: &CommandInvocation,
    ) -> Result<Vec<Reply>> {
        if !ctx.config.is_admin(invocation.user_id) {
            warn!(
                "[{}] User {} attempted /{} without permission",
                invocation.request_id, invocation.user_id, invocation.name
            );
            return Ok(vec![Reply::text(
                "This command is only available to administrators.",
            )]);
        }

        match invocation.name.as_str() {
            "purge" => self.handle_purge(&ctx, invocation).await,
            _ => Ok(Vec::new()),
        }
    }
}

impl AdminHandler {
    /// Handle /purge <user_id>: delete a session, archiving it in the deletion log
    async fn handle_purge(
        &self,
        ctx: &CommandContext,
        invocation: &CommandInvocation,
    ) -> Result<Vec<Reply>> {
        let Ok(target) = invocation.args.parse::<UserId>() else {
            return Ok(vec![Reply::text("Usage: /purge <user_id>")]);
        };

        match ctx.store().delete(target).await {
            Ok(()) => {
                info!(
                    "[{}] Admin {} purged session of user {target}",
                    invocation.request_id, invocation.user_id
                );
                Ok(vec![Reply::text(format!(
                    "Session of user {target} deleted."
                ))])
            }
            Err(SessionError::NotFound(_)) => Ok(vec![Reply::text(format!(
                "User {target} has no conversation."
            ))]),
            Err(e) => Err(e.into()),
        }
    }
}
