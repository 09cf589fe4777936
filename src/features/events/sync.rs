//! # Feature: Event Lifecycle Sync
//!
//! Keeps the reminder store in step with scheduled events: announces new events,
//! re-derives reminders on reschedule, and seeds the store from the gateway at startup.
//!
//! Status changes other than "scheduled" are only logged. Reminders of a cancelled or
//! completed event are left to expire on their own.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.2.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.2.0: One reminder per fire time; out-of-range offsets are skipped
//! - 1.1.0: Single `handle` intake for created/updated notices
//! - 1.0.0: Initial release

use crate::core::duration::{format_duration, Language};
use crate::core::outbound::{Outbound, Payload};
use crate::features::events::model::{EventNotice, EventStatus, ScheduledEvent};
use crate::features::reminders::{announcement, format_instant, Reminder, ReminderSettings, ReminderStore};
use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use std::sync::Arc;

/// Reminders for `event` that are still in the future at `now`.
///
/// One per offset whose fire time is strictly after `now`, plus the immediate
/// reminder at the start time when the event has not started yet. Each fire time
/// appears once; zero and unrepresentable offsets are skipped.
pub fn derive_reminders(
    event: &ScheduledEvent,
    offsets: &[Duration],
    now: DateTime<Utc>,
) -> Vec<Reminder> {
    let url = event.url();
    let reminder = |remind_at: DateTime<Utc>, is_immediate: bool| Reminder {
        event_id: event.id.clone(),
        event_name: event.name.clone(),
        event_url: url.clone(),
        start_time: event.start_time,
        remind_at,
        is_immediate,
    };

    if event.start_time <= now {
        return Vec::new();
    }

    let mut reminders = vec![reminder(event.start_time, true)];
    for offset in offsets.iter().filter(|o| **o > Duration::zero()) {
        let Some(remind_at) = event.start_time.checked_sub_signed(*offset) else {
            warn!("Skipping reminder offset {offset} for event '{}': out of range", event.name);
            continue;
        };
        if remind_at > now && reminders.iter().all(|r| r.remind_at != remind_at) {
            reminders.push(reminder(remind_at, false));
        }
    }

    reminders
}

pub struct EventSync {
    store: Arc<ReminderStore>,
    outbound: Arc<dyn Outbound>,
    settings: ReminderSettings,
}

impl EventSync {
    pub fn new(
        store: Arc<ReminderStore>,
        outbound: Arc<dyn Outbound>,
        settings: ReminderSettings,
    ) -> Self {
        Self {
            store,
            outbound,
            settings,
        }
    }

    pub async fn handle(&self, notice: EventNotice) {
        self.handle_at(notice, Utc::now()).await;
    }

    /// Apply a lifecycle notice as of `now`
    pub async fn handle_at(&self, notice: EventNotice, now: DateTime<Utc>) {
        match notice {
            EventNotice::Created(event) => self.on_created(event, now).await,
            EventNotice::Updated(event) => self.on_updated(event, now).await,
        }
    }

    async fn on_created(&self, event: ScheduledEvent, now: DateTime<Utc>) {
        if let Err(e) = event.validate() {
            warn!("Ignoring malformed event creation: {e}");
            return;
        }

        info!(
            "New event '{}' at {} has been created, scheduling reminders and posting notification",
            event.name,
            format_instant(event.start_time, self.settings.timezone)
        );

        let text = announcement(&event.url(), self.settings.language);
        if let Err(e) = self
            .outbound
            .send(self.settings.channel_id, &Payload::text(text))
            .await
        {
            warn!("Failed to announce event '{}': {}", event.name, e);
        }

        self.queue(&event, now).await;
    }

    async fn on_updated(&self, event: ScheduledEvent, now: DateTime<Utc>) {
        if let Err(e) = event.validate() {
            warn!("Ignoring malformed event update: {e}");
            return;
        }

        if event.status != EventStatus::Scheduled {
            info!("Event '{}' status update: {}", event.name, event.status);
            return;
        }

        info!("Event '{}' was updated. Rescheduling reminders.", event.name);
        let purged = self.store.purge_by_event(&event.id).await;
        debug!("Purged {purged} stale reminders for event {}", event.id);
        self.queue(&event, now).await;
    }

    /// Seed reminders for every currently scheduled event; returns the queue size afterwards
    pub async fn reconcile(&self, events: Vec<ScheduledEvent>) -> usize {
        self.reconcile_at(events, Utc::now()).await
    }

    pub async fn reconcile_at(&self, events: Vec<ScheduledEvent>, now: DateTime<Utc>) -> usize {
        for event in events {
            if let Err(e) = event.validate() {
                warn!("Skipping malformed event during sync: {e}");
                continue;
            }
            if event.status != EventStatus::Scheduled {
                continue;
            }

            info!(
                "Found pending event '{}' at {}",
                event.name,
                format_instant(event.start_time, self.settings.timezone)
            );
            self.queue(&event, now).await;
        }

        let pending = self.store.len().await;
        info!("Sync complete. {pending} reminders in queue");
        pending
    }

    async fn queue(&self, event: &ScheduledEvent, now: DateTime<Utc>) {
        for reminder in derive_reminders(event, &self.settings.offsets, now) {
            info!(
                "   Scheduling reminder for event '{}' at {} (in {})",
                reminder.event_name,
                format_instant(reminder.remind_at, self.settings.timezone),
                format_duration(reminder.remind_at - now, Language::English)
            );
            self.store.enqueue(reminder).await;
        }
    }
}
