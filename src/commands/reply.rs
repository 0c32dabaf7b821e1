//! Transport-neutral replies produced by commands and the conversation
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    /// Upload a file, then remove it locally
    File { path: PathBuf, caption: String },
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Reply::Text(content.into())
    }

    /// Text content, or the caption for file replies
    pub fn content(&self) -> &str {
        match self {
            Reply::Text(text) => text,
            Reply::File { caption, .. } => caption,
        }
    }
}
