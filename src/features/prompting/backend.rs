//! Text-completion backend
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Request timeout surfaces as a backend error
//! - 1.0.0: OpenAI completions backend

use async_trait::async_trait;
use log::debug;
use openai::completions::Completion;
use std::time::Duration;
use tokio::time::timeout;

use crate::core::config::Config;
use crate::core::error::SessionError;

use super::prompt_builder::STOP_SEQUENCES;

/// Fixed sampling configuration for every request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u16,
}

impl CompletionConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.openai_model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Request for `prompt` with the turn-boundary stop sequences attached
    pub fn request(&self, prompt: String) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            prompt,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stop_sequences: STOP_SEQUENCES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u16,
    pub stop_sequences: Vec<String>,
}

/// Prompt in, completion text out. Latency is unbounded.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, SessionError>;
}

/// Backend calling the OpenAI completions endpoint.
///
/// Credentials come from the `OPENAI_KEY` / `OPENAI_API_KEY` environment variables.
pub struct OpenAiBackend {
    request_timeout: Duration,
}

impl OpenAiBackend {
    pub fn new(request_timeout: Duration) -> Self {
        Self { request_timeout }
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, SessionError> {
        debug!(
            "Sending completion request | model: {} | prompt: {} chars",
            request.model,
            request.prompt.len()
        );

        let call = Completion::builder(&request.model)
            .prompt(request.prompt.clone())
            .temperature(request.temperature)
            .max_tokens(request.max_tokens)
            .stop(request.stop_sequences.clone())
            .create();

        let completion = timeout(self.request_timeout, call)
            .await
            .map_err(|_| {
                SessionError::Backend(format!(
                    "completion timed out after {} seconds",
                    self.request_timeout.as_secs()
                ))
            })?
            .map_err(|e| SessionError::Backend(e.to_string()))?;

        let text = completion
            .choices
            .first()
            .map(|choice| choice.text.clone())
            .unwrap_or_default();

        debug!("Got completion: {} chars", text.len());
        Ok(text)
    }
}
