use crate::commands::context::CommandContext;
use crate::commands::handler::CommandInvocation;
use crate::commands::handlers::create_all_handlers;
use crate::commands::registry::CommandRegistry;
use crate::commands::reply::Reply;
use crate::core::chunk_for_message;
use crate::core::error::SessionError;
use crate::features::conversation::InboundEvent;
use log::{debug, error, info};
use std::sync::Arc;
use uuid::Uuid;

const COMMAND_FAILED_REPLY: &str = "Sorry, something went wrong while running that command.";

/// Entry point for every inbound chat message
///
/// Commands go to the registry, everything else to the conversation pipeline.
/// Text replies come back already split to the transport's message size.
#[derive(Clone)]
pub struct CommandHandler {
    context: Arc<CommandContext>,
    registry: CommandRegistry,
}

impl CommandHandler {
    pub fn new(context: CommandContext) -> Self {
        let mut registry = CommandRegistry::new();
        for handler in create_all_handlers() {
            registry.register(handler);
        }
        debug!("Registered {} command names", registry.len());

        CommandHandler {
            context: Arc::new(context),
            registry,
        }
    }

    pub fn context(&self) -> &CommandContext {
        &self.context
    }

    pub async fn handle_message(&self, event: &InboundEvent) -> Vec<Reply> {
        let request_id = Uuid::new_v4();

        info!("[{}] 📥 Message received | User: {} | Chat: {:?} | Content: '{}'",
              request_id, event.user_id, event.chat_type,
              event.text.chars().take(100).collect::<String>());

        let replies = match CommandInvocation::parse(event, request_id) {
            Some(invocation) => {
                info!("[{}] 🎯 Processing text command: /{} | User: {}",
                      request_id, invocation.name, invocation.user_id);
                self.run_command(&invocation).await
            }
            None => {
                let outcome = self.context.pipeline.handle(event, request_id).await;
                debug!("[{request_id}] 💬 Pipeline outcome: {outcome:?}");
                outcome.reply_text().map(Reply::Text).into_iter().collect()
            }
        };

        info!("[{}] ✅ Message processing completed ({} replies)", request_id, replies.len());
        split_replies(replies)
    }

    async fn run_command(&self, invocation: &CommandInvocation) -> Vec<Reply> {
        match self.registry.dispatch(Arc::clone(&self.context), invocation).await {
            Ok(replies) => replies,
            Err(e) => {
                error!("[{}] ❌ Command /{} failed: {e:#}", invocation.request_id, invocation.name);
                let text = match e.downcast_ref::<SessionError>() {
                    Some(session_error) => session_error.user_message(),
                    None => COMMAND_FAILED_REPLY.to_string(),
                };
                vec![Reply::text(text)]
            }
        }
    }
}

fn split_replies(replies: Vec<Reply>) -> Vec<Reply> {
    replies
        .into_iter()
        .flat_map(|reply| match reply {
            Reply::Text(text) => chunk_for_message(&text).into_iter().map(Reply::Text).collect(),
            file => vec![file],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::context::testing::{test_context, test_context_with_database};
    use crate::commands::registry::UNKNOWN_COMMAND_REPLY;
    use crate::core::MESSAGE_LIMIT;
    use crate::features::conversation::ChatType;
    use crate::features::prompting::mock::ScriptedBackend;

    async fn handler_with(backend: Arc<ScriptedBackend>) -> CommandHandler {
        let ctx = test_context(backend).await;
        CommandHandler::new((*ctx).clone())
    }

    #[tokio::test]
    async fn test_private_message_goes_to_pipeline() {
        let backend = Arc::new(ScriptedBackend::replying([" Hello human."]));
        let handler = handler_with(backend.clone()).await;

        let replies = handler
            .handle_message(&InboundEvent::new(1, ChatType::Private, "hi"))
            .await;
        assert_eq!(replies, vec![Reply::text("Hello human.")]);
        assert_eq!(backend.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_group_message_gets_no_reply() {
        let backend = Arc::new(ScriptedBackend::replying(["unused"]));
        let handler = handler_with(backend.clone()).await;

        let replies = handler
            .handle_message(&InboundEvent::new(1, ChatType::Group, "hi"))
            .await;
        assert!(replies.is_empty());
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_commands_never_reach_pipeline() {
        let backend = Arc::new(ScriptedBackend::replying(["unused"]));
        let handler = handler_with(backend.clone()).await;

        let replies = handler
            .handle_message(&InboundEvent::new(1, ChatType::Private, "/limit"))
            .await;
        assert_eq!(replies, vec![Reply::text("You have 3 messages left today (limit 3).")]);

        let replies = handler
            .handle_message(&InboundEvent::new(1, ChatType::Private, "/nope"))
            .await;
        assert_eq!(replies, vec![Reply::text(UNKNOWN_COMMAND_REPLY)]);
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_long_reply_is_chunked() {
        let long = "word ".repeat(1000);
        let backend = Arc::new(ScriptedBackend::replying([long]));
        let handler = handler_with(backend).await;

        let replies = handler
            .handle_message(&InboundEvent::new(1, ChatType::Private, "talk a lot"))
            .await;
        assert!(replies.len() > 1);
        assert!(replies
            .iter()
            .all(|r| r.content().chars().count() <= MESSAGE_LIMIT));
    }

    #[tokio::test]
    async fn test_storage_failure_in_command_gives_generic_reply() {
        let (ctx, database) = test_context_with_database(Arc::new(ScriptedBackend::default())).await;
        let handler = CommandHandler::new((*ctx).clone());
        database.execute_batch("DROP TABLE sessions;").await.unwrap();

        let replies = handler
            .handle_message(&InboundEvent::new(1, ChatType::Private, "/reset"))
            .await;

        let expected = SessionError::Storage(sqlite::Error {
            code: None,
            message: None,
        })
        .user_message();
        assert_eq!(replies, vec![Reply::text(expected)]);
        assert!(!replies[0].content().contains("no such table"));
    }
}
