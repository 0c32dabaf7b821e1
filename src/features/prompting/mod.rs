//! # Prompting Feature
//!
//! Turn-frame prompt assembly, message validation and the completion backend.
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Completion backend trait with an OpenAI implementation
//! - 1.0.0: Initial release

pub mod backend;
pub mod prompt_builder;

pub use backend::{CompletionBackend, CompletionConfig, CompletionRequest, OpenAiBackend};
pub use prompt_builder::{
    apply_completion, build_request, clean_completion, validate_message, PromptBuilder,
    FALLBACK_REPLY, FORBIDDEN_CHARACTER, STOP_SEQUENCES,
};

#[cfg(test)]
pub(crate) mod mock;
