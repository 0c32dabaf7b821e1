//! # Core Module
//!
//! Configuration, error kinds and reply utilities shared by every layer.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.7.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Add error module with session error kinds
//! - 1.1.0: Add response module with message chunking utilities
//! - 1.0.0: Initial creation with config module

pub mod config;
pub mod error;
pub mod response;

pub use config::Config;
pub use error::{RejectReason, SessionError, UserId};
pub use response::{chunk_for_message, chunk_text, MESSAGE_LIMIT};
