//! # Quota Feature
//!
//! Daily reset of every user's message counter.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod resetter;

pub use resetter::{DailyQuotaResetter, ResetSchedule};
