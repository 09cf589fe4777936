//! # Reminder Store
//!
//! Pending event reminders behind a single async mutex. Every operation holds the lock
//! for its whole duration and never across an outbound call.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

/// A notification to emit at `remind_at` for one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub event_id: String,
    pub event_name: String,
    pub event_url: String,
    /// Event start, frozen when the reminder was derived
    pub start_time: DateTime<Utc>,
    pub remind_at: DateTime<Utc>,
    /// Set only on the reminder firing at `start_time` ("starting now" wording)
    pub is_immediate: bool,
}

/// Unordered collection of pending reminders.
///
/// At most one reminder per (event, remind_at) exists because callers purge an event's
/// reminders before re-deriving them.
#[derive(Debug, Default)]
pub struct ReminderStore {
    pending: Mutex<Vec<Reminder>>,
}

impl ReminderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append without de-duplication
    pub async fn enqueue(&self, reminder: Reminder) {
        self.pending.lock().await.push(reminder);
    }

    /// Remove every reminder for `event_id`, returning how many were dropped
    pub async fn purge_by_event(&self, event_id: &str) -> usize {
        let mut pending = self.pending.lock().await;
        let before = pending.len();
        pending.retain(|r| r.event_id != event_id);
        before - pending.len()
    }

    /// Take every reminder with `remind_at <= now`, keeping the rest
    pub async fn drain_due(&self, now: DateTime<Utc>) -> Vec<Reminder> {
        let mut pending = self.pending.lock().await;
        let (due, remaining): (Vec<Reminder>, Vec<Reminder>) =
            pending.drain(..).partition(|r| r.remind_at <= now);
        *pending = remaining;
        due
    }

    pub async fn len(&self) -> usize {
        self.pending.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.pending.lock().await.is_empty()
    }

    /// Copy of the reminders queued for one event
    pub async fn for_event(&self, event_id: &str) -> Vec<Reminder> {
        self.pending
            .lock()
            .await
            .iter()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect()
    }
}
