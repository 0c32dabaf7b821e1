//! # Features
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Session chat features replace the persona/plugin features
//! - 1.0.0: Initial feature registry

pub mod conversation;
pub mod prompting;
pub mod quota;
pub mod sessions;
pub mod transcript;

pub use conversation::{ChatType, ConversationPipeline, InboundEvent, Outcome};
pub use prompting::{CompletionBackend, CompletionConfig, CompletionRequest, OpenAiBackend};
pub use quota::{DailyQuotaResetter, ResetSchedule};
pub use sessions::{DeletedSession, QuotaStatus, Session, SessionStore};
pub use transcript::{discard_transcript, export_transcript};

/// Name and version of a feature module, as listed by `/info`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureInfo {
    pub name: &'static str,
    pub version: &'static str,
}

pub fn get_bot_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub fn get_features() -> Vec<FeatureInfo> {
    vec![
        FeatureInfo { name: "Conversation", version: "1.2.0" },
        FeatureInfo { name: "Prompting", version: "2.0.0" },
        FeatureInfo { name: "Quota", version: "1.1.0" },
        FeatureInfo { name: "Sessions", version: "1.2.0" },
        FeatureInfo { name: "Transcript", version: "1.0.0" },
    ]
}
