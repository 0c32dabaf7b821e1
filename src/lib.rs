// Core layer - shared types and configuration
pub mod core;

// Features layer - sessions, prompting, conversation, quota, transcripts
pub mod features;

// Infrastructure
pub mod database;

// Application layer
pub mod command_handler;
pub mod commands;

pub use core::{Config, SessionError};

pub use features::{
    // Conversation
    ChatType, ConversationPipeline, InboundEvent, Outcome,
    // Prompting
    CompletionBackend, OpenAiBackend,
    // Quota
    DailyQuotaResetter, ResetSchedule,
    // Sessions
    Session, SessionStore,
};
