//! Utility command handlers
//!
//! Handles: start, help, info
//!
//! - **Version**: 2.0.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 2.0.0: Welcome, usage and configuration replies for the chat bot
//! - 1.0.0: Extracted from command_handler.rs

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;
use std::time::Duration;

use super::quota::current_quota;
use crate::commands::context::CommandContext;
use crate::commands::handler::{CommandInvocation, TextCommandHandler};
use crate::commands::reply::Reply;
use crate::features::{get_bot_version, get_features};

const COMMAND_LIST: &str = "/help - show this message
/limit - show how many messages you have left today
/reset - forget our conversation so far
/save - download our conversation as a text file
/persona - show the persona I am using with you
/persona <text> - give me a new persona
/ask <question> - ask a single question without our history
/info - show the model settings";

/// Handler for utility commands: start, help, info
pub struct UtilityHandler;

#[async_trait]
impl TextCommandHandler for UtilityHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["start", "help", "info"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        invocation: &CommandInvocation,
    ) -> Result<Vec<Reply>> {
        match invocation.name.as_str() {
            "start" => self.handle_start(&ctx, invocation).await,
            "help" => self.handle_help(&ctx, invocation).await,
            "info" => self.handle_info(&ctx, invocation).await,
            _ => Ok(Vec::new()),
        }
    }
}

impl UtilityHandler {
    /// Handle /start: open a session and introduce the bot
    async fn handle_start(
        &self,
        ctx: &CommandContext,
        invocation: &CommandInvocation,
    ) -> Result<Vec<Reply>> {
        let session = ctx.store().create_if_absent(invocation.user_id).await?;
        let remaining = ctx.daily_limit().saturating_sub(session.message_count);

        info!(
            "[{}] Start command completed for user {}",
            invocation.request_id, invocation.user_id
        );
        Ok(vec![Reply::text(format!(
            "Hi! I am an AI you can chat with. Just send me a message and I will answer.\n\n\
            You have {remaining} of {} messages left today.\n\n{COMMAND_LIST}",
            ctx.daily_limit()
        ))])
    }

    /// Handle /help
    async fn handle_help(
        &self,
        ctx: &CommandContext,
        invocation: &CommandInvocation,
    ) -> Result<Vec<Reply>> {
        let quota = current_quota(ctx, invocation.user_id).await?;

        Ok(vec![Reply::text(format!(
            "Send me any message in a private chat and I will reply.\n\n{COMMAND_LIST}\n\n\
            You have used {} of {} messages today ({} left). The counter resets daily at {}.",
            quota.used,
            quota.limit,
            quota.remaining,
            ctx.reset_time_display()
        ))])
    }

    /// Handle /info
    async fn handle_info(
        &self,
        ctx: &CommandContext,
        invocation: &CommandInvocation,
    ) -> Result<Vec<Reply>> {
        let completion = ctx.pipeline.completion();
        let sessions = ctx.store().session_count().await?;

        let mut response = format!(
            "Model: {}\nMax tokens: {}\nTemperature: {}\nDaily message limit: {}\n\
            Quota resets at: {}\nConversations: {sessions}\nUptime: {}\nVersion: {}\n",
            completion.model,
            completion.max_tokens,
            completion.temperature,
            ctx.daily_limit(),
            ctx.reset_time_display(),
            format_uptime(ctx.start_time.elapsed()),
            get_bot_version(),
        );
        for feature in get_features() {
            response.push_str(&format!("\n- {} v{}", feature.name, feature.version));
        }

        info!(
            "[{}] Info command completed for user {}",
            invocation.request_id, invocation.user_id
        );
        Ok(vec![Reply::text(response)])
    }
}

fn format_uptime(uptime: Duration) -> String {
    let days = uptime.as_secs() / 86400;
    let hours = (uptime.as_secs() % 86400) / 3600;
    let minutes = (uptime.as_secs() % 3600) / 60;
    let seconds = uptime.as_secs() % 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m {seconds}s")
    } else if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}
