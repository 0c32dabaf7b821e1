//! Shared context for command handlers
//!
//! - **Version**: 2.0.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 2.0.0: Session store and conversation pipeline replace per-feature services
//! - 1.0.0: Initial implementation with core shared state

use std::time::Instant;

use crate::core::config::Config;
use crate::features::conversation::ConversationPipeline;
use crate::features::sessions::SessionStore;

/// Shared context for all command handlers
///
/// Contains the services most handlers need:
/// - ConversationPipeline for completions (and its SessionStore)
/// - Config for limits, model info and administrators
/// - Bot start time for uptime reporting
#[derive(Clone)]
pub struct CommandContext {
    pub pipeline: ConversationPipeline,
    pub config: Config,
    pub start_time: Instant,
}

impl CommandContext {
    pub fn new(pipeline: ConversationPipeline, config: Config) -> Self {
        Self {
            pipeline,
            config,
            start_time: Instant::now(),
        }
    }

    pub fn store(&self) -> &SessionStore {
        self.pipeline.store()
    }

    pub fn daily_limit(&self) -> u32 {
        self.pipeline.daily_limit()
    }

    /// Quota reset time as shown to users
    pub fn reset_time_display(&self) -> String {
        format!("{} UTC", self.config.quota_reset_time.format("%H:%M"))
    }
}
