//! # Sessions Feature
//!
//! Per-user conversation records: persona, transcript and daily counter.
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod model;
pub mod store;

pub use model::{DeletedSession, QuotaStatus, Session};
pub use store::SessionStore;
