//! Per-command handler implementations
//!
//! - **Version**: 3.0.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 3.0.0: Text commands for the chat bot (start, help, info, limit, reset, save, persona, ask, purge)
//! - 2.0.0: Remove AiChatHandler (hey, explain, simple, steps, recipe) - consolidated into /ask
//! - 1.0.0: Initial extraction from monolithic command_handler.rs

pub mod admin;
pub mod ask;
pub mod history;
pub mod persona;
pub mod quota;
pub mod utility;

use std::sync::Arc;

use super::handler::TextCommandHandler;

/// Create all registered command handlers
///
/// Returns a vector of handlers ready to be registered with CommandRegistry.
pub fn create_all_handlers() -> Vec<Arc<dyn TextCommandHandler>> {
    vec![
        Arc::new(utility::UtilityHandler),
        Arc::new(quota::QuotaHandler),
        Arc::new(history::HistoryHandler),
        Arc::new(persona::PersonaHandler),
        Arc::new(ask::AskHandler),
        Arc::new(admin::AdminHandler),
    ]
}
