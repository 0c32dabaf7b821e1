//! # Command System
//!
//! Slash-prefixed text commands (`/limit`, `/reset`, ...) sent in chat.
//!
//! - **Version**: 3.1.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 3.1.0: Register the commands as Discord slash commands
//! - 3.0.0: Transport-neutral text commands returning `Reply` values
//! - 2.1.0: Add modular handler infrastructure (handler trait, context, registry)
//! - 2.0.0: Remove bang commands, slash-only command system
//! - 1.0.0: Initial reorganization with modular command structure

pub mod context;
pub mod handler;
pub mod handlers;
pub mod registry;
pub mod reply;
pub mod slash;

pub use crate::command_handler::CommandHandler;

pub use context::CommandContext;
pub use handler::{CommandInvocation, TextCommandHandler};
pub use handlers::create_all_handlers;
pub use registry::{CommandRegistry, UNKNOWN_COMMAND_REPLY};
pub use reply::Reply;
pub use slash::{create_slash_commands, interaction_text, register_global_commands};
