//! Persona command handler
//!
//! Handles: persona
//!
//! - **Version**: 2.0.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 2.0.0: Free-text persona per user instead of a fixed persona list
//! - 1.0.0: Extracted from command_handler.rs

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::{CommandInvocation, TextCommandHandler};
use crate::commands::reply::Reply;
use crate::core::error::SessionError;
use crate::features::prompting::validate_message;

/// `/persona` shows the current persona, `/persona <text>` replaces it
pub struct PersonaHandler;

#[async_trait]
impl TextCommandHandler for PersonaHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["persona"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        invocation: &CommandInvocation,
    ) -> Result<Vec<Reply>> {
        if invocation.args.is_empty() {
            self.handle_show(&ctx, invocation).await
        } else {
            self.handle_set(&ctx, invocation).await
        }
    }
}

impl PersonaHandler {
    async fn handle_show(
        &self,
        ctx: &CommandContext,
        invocation: &CommandInvocation,
    ) -> Result<Vec<Reply>> {
        let persona = match ctx.store().get(invocation.user_id).await? {
            Some(session) => session.persona,
            None => ctx.store().default_persona().to_string(),
        };
        Ok(vec![Reply::text(format!(
            "My current persona is:\n{persona}\n\nUse /persona <text> to change it."
        ))])
    }

    async fn handle_set(
        &self,
        ctx: &CommandContext,
        invocation: &CommandInvocation,
    ) -> Result<Vec<Reply>> {
        if let Err(SessionError::Rejected(reason)) = validate_message(&invocation.args) {
            return Ok(vec![Reply::text(reason.to_string())]);
        }

        ctx.store()
            .set_persona(invocation.user_id, &invocation.args)
            .await?;
        info!(
            "[{}] Persona updated for user {}",
            invocation.request_id, invocation.user_id
        );

        // Stored history already opens with the previous persona
        let has_history = ctx
            .store()
            .get(invocation.user_id)
            .await?
            .is_some_and(|session| session.has_history());
        let text = if has_history {
            "Persona updated. Use /reset to start a new conversation with it."
        } else {
            "Persona updated."
        };
        Ok(vec![Reply::text(text)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::context::testing::{test_context, TEST_PERSONA};
    use crate::features::conversation::{ChatType, InboundEvent};
    use crate::features::prompting::mock::ScriptedBackend;
    use uuid::Uuid;

    fn invocation(text: &str) -> CommandInvocation {
        let event = InboundEvent::new(3, ChatType::Private, text);
        CommandInvocation::parse(&event, Uuid::new_v4()).unwrap()
    }

    #[tokio::test]
    async fn test_show_default_persona() {
        let ctx = test_context(Arc::new(ScriptedBackend::default())).await;
        let replies = PersonaHandler
            .handle(ctx.clone(), &invocation("/persona"))
            .await
            .unwrap();
        assert!(replies[0].content().contains(TEST_PERSONA));
        assert!(ctx.store().get(3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_creates_session() {
        let ctx = test_context(Arc::new(ScriptedBackend::default())).await;
        let replies = PersonaHandler
            .handle(ctx.clone(), &invocation("/persona You are a pirate."))
            .await
            .unwrap();

        assert_eq!(replies[0].content(), "Persona updated.");
        let session = ctx.store().get(3).await.unwrap().unwrap();
        assert_eq!(session.persona, "You are a pirate.");
    }

    #[tokio::test]
    async fn test_set_with_history_suggests_reset() {
        let ctx = test_context(Arc::new(ScriptedBackend::default())).await;
        ctx.store().create_if_absent(3).await.unwrap();
        ctx.store().replace_history(3, "old").await.unwrap();

        let replies = PersonaHandler
            .handle(ctx, &invocation("/persona You are a poet."))
            .await
            .unwrap();
        assert!(replies[0].content().contains("/reset"));
    }

    #[tokio::test]
    async fn test_set_rejects_forbidden_character() {
        let ctx = test_context(Arc::new(ScriptedBackend::default())).await;
        let replies = PersonaHandler
            .handle(ctx.clone(), &invocation("/persona Use `ticks`"))
            .await
            .unwrap();

        assert_eq!(
            replies[0].content(),
            "Please do not use the ` character in your message."
        );
        assert!(ctx.store().get(3).await.unwrap().is_none());
    }
}
