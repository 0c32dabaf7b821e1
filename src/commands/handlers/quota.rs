//! Quota command handler
//!
//! Handles: limit
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::{CommandInvocation, TextCommandHandler};
use crate::commands::reply::Reply;
use crate::core::error::{SessionError, UserId};
use crate::features::sessions::QuotaStatus;

/// Usage of `user_id` today. A user without a session has used nothing.
pub(crate) async fn current_quota(ctx: &CommandContext, user_id: UserId) -> Result<QuotaStatus> {
    match ctx.store().usage(user_id, ctx.daily_limit()).await {
        Ok(quota) => Ok(quota),
        Err(SessionError::NotFound(_)) => Ok(QuotaStatus::new(0, ctx.daily_limit())),
        Err(e) => Err(e.into()),
    }
}

pub struct QuotaHandler;

#[async_trait]
impl TextCommandHandler for QuotaHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["limit"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        invocation: &CommandInvocation,
    ) -> Result<Vec<Reply>> {
        let quota = current_quota(&ctx, invocation.user_id).await?;

        let text = if quota.exhausted() {
            format!(
                "You have reached the message limit of {} messages. It resets at {}.",
                quota.limit,
                ctx.reset_time_display()
            )
        } else {
            format!(
                "You have {} messages left today (limit {}).",
                quota.remaining, quota.limit
            )
        };
        Ok(vec![Reply::text(text)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::context::testing::test_context;
    use crate::features::conversation::{ChatType, InboundEvent};
    use crate::features::prompting::mock::ScriptedBackend;
    use uuid::Uuid;

    fn limit_invocation(user_id: UserId) -> CommandInvocation {
        let event = InboundEvent::new(user_id, ChatType::Private, "/limit");
        CommandInvocation::parse(&event, Uuid::new_v4()).unwrap()
    }

    #[tokio::test]
    async fn test_limit_for_unknown_user() {
        let ctx = test_context(Arc::new(ScriptedBackend::default())).await;
        let replies = QuotaHandler.handle(ctx, &limit_invocation(9)).await.unwrap();
        assert_eq!(replies[0].content(), "You have 3 messages left today (limit 3).");
    }

    #[tokio::test]
    async fn test_limit_counts_down() {
        let ctx = test_context(Arc::new(ScriptedBackend::default())).await;
        ctx.store().create_if_absent(9).await.unwrap();
        ctx.store().increment_count(9).await.unwrap();

        let replies = QuotaHandler.handle(ctx, &limit_invocation(9)).await.unwrap();
        assert_eq!(replies[0].content(), "You have 2 messages left today (limit 3).");
    }

    #[tokio::test]
    async fn test_limit_reached() {
        let ctx = test_context(Arc::new(ScriptedBackend::default())).await;
        ctx.store().create_if_absent(9).await.unwrap();
        for _ in 0..3 {
            ctx.store().increment_count(9).await.unwrap();
        }

        let replies = QuotaHandler.handle(ctx, &limit_invocation(9)).await.unwrap();
        assert!(replies[0]
            .content()
            .starts_with("You have reached the message limit of 3 messages."));
    }
}
