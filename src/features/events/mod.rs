//! # Events Feature
//!
//! Scheduled-event lifecycle: announcements, reminder derivation, startup reconciliation.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//! - **Toggleable**: true

pub mod model;
pub mod sync;

pub use model::{EventNotice, EventStatus, ScheduledEvent};
pub use sync::{derive_reminders, EventSync};
