//! # Features Layer
//!
//! Each feature lives in its own directory with a versioned module header.

pub mod events;
pub mod presence;
pub mod reminders;
pub mod startup;

pub use events::{EventNotice, EventStatus, EventSync, ScheduledEvent};
pub use presence::{
    HttpPresenceSource, MessagePointer, PresenceDiffer, PresencePipeline, PresenceSource,
    StatusPublisher,
};
pub use reminders::{Reminder, ReminderScheduler, ReminderSettings, ReminderStore};
pub use startup::{log_banner, ReadyOnce};
