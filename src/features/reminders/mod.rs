//! # Reminders Feature
//!
//! Time-triggered event reminders: in-memory store, wording, and the ticking scheduler.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true

pub mod scheduler;
pub mod store;
pub mod wording;

pub use scheduler::{ReminderScheduler, ReminderSettings};
pub use store::{Reminder, ReminderStore};
pub use wording::{announcement, format_instant, reminder_message};
