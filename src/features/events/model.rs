//! Scheduled event model and gateway conversion
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serenity::model::guild::{ScheduledEvent as GatewayEvent, ScheduledEventStatus};

/// Lifecycle status reported by the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventStatus {
    Scheduled,
    Active,
    Completed,
    Cancelled,
    Unknown(String),
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventStatus::Scheduled => write!(f, "Scheduled"),
            EventStatus::Active => write!(f, "Active (Started)"),
            EventStatus::Completed => write!(f, "Completed"),
            EventStatus::Cancelled => write!(f, "Cancelled"),
            EventStatus::Unknown(raw) => write!(f, "Unknown ({raw})"),
        }
    }
}

/// An externally scheduled activity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledEvent {
    pub id: String,
    pub guild_id: String,
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub status: EventStatus,
}

impl ScheduledEvent {
    /// Stable link to the event page
    pub fn url(&self) -> String {
        format!("https://discord.com/events/{}/{}", self.guild_id, self.id)
    }

    /// Missing identity or name makes a notification unusable
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(anyhow!("event has no id"));
        }
        if self.guild_id.trim().is_empty() {
            return Err(anyhow!("event {} has no guild id", self.id));
        }
        if self.name.trim().is_empty() {
            return Err(anyhow!("event {} has no name", self.id));
        }
        Ok(())
    }
}

/// Lifecycle notification dispatched through `EventSync::handle`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventNotice {
    Created(ScheduledEvent),
    Updated(ScheduledEvent),
}

impl TryFrom<&GatewayEvent> for ScheduledEvent {
    type Error = anyhow::Error;

    fn try_from(event: &GatewayEvent) -> Result<Self> {
        let start_time = DateTime::from_timestamp(event.start_time.unix_timestamp(), 0)
            .ok_or_else(|| anyhow!("event {} has an out-of-range start time", event.id.0))?;

        let status = match &event.status {
            ScheduledEventStatus::Scheduled => EventStatus::Scheduled,
            ScheduledEventStatus::Active => EventStatus::Active,
            ScheduledEventStatus::Completed => EventStatus::Completed,
            ScheduledEventStatus::Canceled => EventStatus::Cancelled,
            other => EventStatus::Unknown(format!("{other:?}")),
        };

        Ok(ScheduledEvent {
            id: event.id.0.to_string(),
            guild_id: event.guild_id.0.to_string(),
            name: event.name.clone(),
            start_time,
            status,
        })
    }
}
