//! Command handler registry
//!
//! - **Version**: 2.0.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 2.0.0: Text command dispatch with an unknown-command reply
//! - 1.0.0: Initial implementation for handler dispatch

use anyhow::Result;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

use super::context::CommandContext;
use super::handler::{CommandInvocation, TextCommandHandler};
use super::reply::Reply;

pub const UNKNOWN_COMMAND_REPLY: &str = "Unknown command. Use /help to see available commands.";

/// Registry mapping command names to handlers
///
/// Multiple command names can map to the same handler if they share logic.
///
/// # Example
///
/// ```ignore
/// let mut registry = CommandRegistry::new();
/// registry.register(Arc::new(UtilityHandler));
///
/// let replies = registry.dispatch(ctx, &invocation).await?;
/// ```
#[derive(Clone)]
pub struct CommandRegistry {
    handlers: HashMap<&'static str, Arc<dyn TextCommandHandler>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for all names returned by `command_names()`
    pub fn register(&mut self, handler: Arc<dyn TextCommandHandler>) {
        for name in handler.command_names() {
            self.handlers.insert(name, Arc::clone(&handler));
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn TextCommandHandler>> {
        self.handlers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Number of registered command names, not unique handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn command_names(&self) -> impl Iterator<Item = &&'static str> {
        self.handlers.keys()
    }

    /// Route an invocation to its handler, or answer with the unknown-command text
    pub async fn dispatch(
        &self,
        ctx: Arc<CommandContext>,
        invocation: &CommandInvocation,
    ) -> Result<Vec<Reply>> {
        match self.get(&invocation.name) {
            Some(handler) => handler.handle(ctx, invocation).await,
            None => {
                debug!(
                    "[{}] Unknown command /{} from user {}",
                    invocation.request_id, invocation.name, invocation.user_id
                );
                Ok(vec![Reply::text(UNKNOWN_COMMAND_REPLY)])
            }
        }
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::context::testing::test_context;
    use crate::features::conversation::{ChatType, InboundEvent};
    use crate::features::prompting::mock::ScriptedBackend;
    use async_trait::async_trait;
    use uuid::Uuid;

    struct MockHandler {
        names: &'static [&'static str],
    }

    #[async_trait]
    impl TextCommandHandler for MockHandler {
        fn command_names(&self) -> &'static [&'static str] {
            self.names
        }

        async fn handle(
            &self,
            _ctx: Arc<CommandContext>,
            invocation: &CommandInvocation,
        ) -> Result<Vec<Reply>> {
            Ok(vec![Reply::text(format!("handled {}", invocation.name))])
        }
    }

    fn invocation(text: &str) -> CommandInvocation {
        let event = InboundEvent::new(1, ChatType::Private, text);
        CommandInvocation::parse(&event, Uuid::new_v4()).unwrap()
    }

    #[test]
    fn test_registry_new_is_empty() {
        let registry = CommandRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_registry_register_multiple_names() {
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(MockHandler {
            names: &["start", "help"],
        }));

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("start"));
        assert!(registry.contains("help"));
        assert!(!registry.contains("limit"));
        assert!(registry.get("missing").is_none());
    }

    #[tokio::test]
    async fn test_dispatch_routes_by_name() {
        let mut registry = CommandRegistry::default();
        registry.register(Arc::new(MockHandler { names: &["limit"] }));
        let ctx = test_context(Arc::new(ScriptedBackend::default())).await;

        let replies = registry
            .dispatch(ctx, &invocation("/LIMIT"))
            .await
            .unwrap();
        assert_eq!(replies, vec![Reply::text("handled limit")]);
    }

    #[tokio::test]
    async fn test_dispatch_unknown_command() {
        let registry = CommandRegistry::new();
        let ctx = test_context(Arc::new(ScriptedBackend::default())).await;

        let replies = registry
            .dispatch(ctx, &invocation("/frobnicate now"))
            .await
            .unwrap();
        assert_eq!(replies, vec![Reply::text(UNKNOWN_COMMAND_REPLY)]);
    }
}
