// Core layer - configuration and outbound messaging
pub mod core;

// Features layer - reminders, event sync, presence
pub mod features;

// Re-export core config
pub use core::Config;

// Re-export feature items
pub use features::{
    // Events
    EventNotice, EventSync, ScheduledEvent,
    // Presence
    HttpPresenceSource, PresencePipeline, StatusPublisher,
    // Reminders
    ReminderScheduler, ReminderSettings, ReminderStore,
};
