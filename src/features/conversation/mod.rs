//! # Conversation Feature
//!
//! Inbound private messages to persisted turns.
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod pipeline;

pub use pipeline::{ChatType, ConversationPipeline, InboundEvent, Outcome};
