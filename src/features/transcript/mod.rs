//! # Transcript Feature
//!
//! Exports a user's conversation to a file for download.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.1.0
//! - **Toggleable**: false

pub mod export;

pub use export::{discard_transcript, export_transcript};
