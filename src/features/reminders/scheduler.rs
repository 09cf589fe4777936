//! # Feature: Reminder Scheduler
//!
//! Periodic actor that drains due reminders and posts them to the events channel.
//! Delivery is at-most-once: a reminder is gone as soon as it is handed to the
//! outbound sender, whether or not the send succeeds.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 2.0.0: In-memory store shared with event sync, localized wording, fixed tick
//! - 1.0.0: Initial release

use crate::core::duration::Language;
use crate::core::outbound::{Outbound, Payload};
use crate::features::reminders::store::ReminderStore;
use crate::features::reminders::wording::reminder_message;
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tokio::time::MissedTickBehavior;

/// Settings shared by event sync and the scheduler
#[derive(Debug, Clone)]
pub struct ReminderSettings {
    /// Channel receiving announcements and reminders
    pub channel_id: u64,
    /// Offsets before an event's start at which reminders fire
    pub offsets: Vec<Duration>,
    pub tick: StdDuration,
    pub timezone: Tz,
    pub language: Language,
}

pub struct ReminderScheduler {
    store: Arc<ReminderStore>,
    outbound: Arc<dyn Outbound>,
    settings: ReminderSettings,
    last_pending: usize,
}

impl ReminderScheduler {
    pub fn new(
        store: Arc<ReminderStore>,
        outbound: Arc<dyn Outbound>,
        settings: ReminderSettings,
    ) -> Self {
        Self {
            store,
            outbound,
            settings,
            last_pending: 0,
        }
    }

    /// Tick forever at the configured interval
    pub async fn run(mut self) {
        info!(
            "⏰ Reminder scheduler started (tick every {}ms)",
            self.settings.tick.as_millis()
        );
        self.last_pending = self.store.len().await;

        let mut interval = tokio::time::interval(self.settings.tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            self.tick(Utc::now()).await;
        }
    }

    /// Deliver everything due at `now`; returns how many reminders were handed off
    pub async fn tick(&mut self, now: DateTime<Utc>) -> usize {
        let due = self.store.drain_due(now).await;

        for reminder in &due {
            let text = reminder_message(reminder, now, self.settings.timezone, self.settings.language);
            if let Err(e) = self
                .outbound
                .send(self.settings.channel_id, &Payload::text(text))
                .await
            {
                warn!(
                    "Failed to send reminder for event '{}' (dropped): {}",
                    reminder.event_name, e
                );
            }
        }

        let pending = self.store.len().await;
        if pending != self.last_pending {
            info!("Now {} reminders in queue", pending);
            self.last_pending = pending;
        }

        due.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::outbound::testing::{Call, RecordingOutbound};
    use crate::features::reminders::store::Reminder;
    use chrono::TimeZone;
    use std::sync::atomic::Ordering;

    const CHANNEL: u64 = 77;

    fn settings() -> ReminderSettings {
        ReminderSettings {
            channel_id: CHANNEL,
            offsets: vec![Duration::minutes(15)],
            tick: StdDuration::from_secs(1),
            timezone: chrono_tz::UTC,
            language: Language::English,
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 18, 0, 0).unwrap()
    }

    fn reminder(remind_at: DateTime<Utc>, is_immediate: bool) -> Reminder {
        Reminder {
            event_id: "42".to_string(),
            event_name: "Boss Raid".to_string(),
            event_url: "https://discord.com/events/1/42".to_string(),
            start_time: start(),
            remind_at,
            is_immediate,
        }
    }

    #[tokio::test]
    async fn test_tick_delivers_only_due() {
        let store = Arc::new(ReminderStore::new());
        let outbound = Arc::new(RecordingOutbound::new());
        store.enqueue(reminder(start() - Duration::minutes(15), false)).await;
        store.enqueue(reminder(start(), true)).await;

        let mut scheduler = ReminderScheduler::new(store.clone(), outbound.clone(), settings());

        assert_eq!(scheduler.tick(start() - Duration::minutes(16)).await, 0);
        assert!(outbound.calls().is_empty());

        assert_eq!(scheduler.tick(start() - Duration::minutes(15)).await, 1);
        let texts = outbound.sent_texts();
        assert_eq!(texts.len(), 1);
        assert!(texts[0].contains("(in 15 minutes)"));

        assert_eq!(scheduler.tick(start()).await, 1);
        assert!(outbound.sent_texts()[1].contains("starts NOW!"));
        assert!(store.is_empty().await);

        assert!(outbound
            .calls()
            .iter()
            .all(|c| matches!(c, Call::Send { channel_id, .. } if *channel_id == CHANNEL)));
    }

    #[tokio::test]
    async fn test_failed_send_is_not_retried() {
        let store = Arc::new(ReminderStore::new());
        let outbound = Arc::new(RecordingOutbound::new());
        outbound.fail_send.store(true, Ordering::SeqCst);
        store.enqueue(reminder(start(), true)).await;

        let mut scheduler = ReminderScheduler::new(store.clone(), outbound.clone(), settings());
        assert_eq!(scheduler.tick(start()).await, 1);
        assert!(store.is_empty().await);

        outbound.fail_send.store(false, Ordering::SeqCst);
        assert_eq!(scheduler.tick(start() + Duration::seconds(1)).await, 0);
        assert_eq!(outbound.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_tracks_pending_count() {
        let store = Arc::new(ReminderStore::new());
        let outbound = Arc::new(RecordingOutbound::new());
        store.enqueue(reminder(start() - Duration::minutes(15), false)).await;
        store.enqueue(reminder(start(), true)).await;

        let mut scheduler = ReminderScheduler::new(store.clone(), outbound, settings());
        scheduler.tick(start() - Duration::minutes(15)).await;
        assert_eq!(scheduler.last_pending, 1);

        scheduler.tick(start() - Duration::minutes(10)).await;
        assert_eq!(scheduler.last_pending, 1);
    }
}
