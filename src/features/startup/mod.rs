//! # Startup Feature
//!
//! Startup banner and first-Ready detection.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod banner;

pub use banner::{banner_lines, log_banner, ReadyOnce};
