//! # Feature: Status Publisher
//!
//! Keeps exactly one live player-list message per status channel. A known message id
//! is tried first; otherwise the channel's recent history is scanned for a message by
//! this bot carrying the title marker. Found messages are edited in place, otherwise a
//! new one is created.
//!
//! - **Version**: 1.3.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.3.0: Servers past the embed limit share one block
//! - 1.2.0: Pin failure no longer loses the message id
//! - 1.1.0: Rediscovery by title marker when the stored id is stale
//! - 1.0.0: Initial release

use crate::core::outbound::{EmbedBlock, Outbound, Payload, COLOR_DOWN, COLOR_OK};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::sync::Arc;

use super::snapshot::Generation;

/// How many recent messages are scanned during rediscovery
pub const RECENT_SCAN_LIMIT: u8 = 100;

/// Discord accepts at most this many embeds per message
pub const MAX_EMBEDS: usize = 10;

pub const NO_PLAYERS: &str = "No players online";
pub const UNREACHABLE: &str = "Server unreachable";
pub const MORE_SERVERS: &str = "More servers";

/// Render the status payload, one block per server in name order.
///
/// Servers past the embed limit share the last block.
pub fn render_status(title: &str, generation: &Generation) -> Payload {
    let mut names: Vec<&String> = generation.keys().collect();
    names.sort();

    let embeds = names
        .into_iter()
        .map(|name| {
            let server = &generation[name];
            let (description, color) = if !server.reachable {
                (UNREACHABLE.to_string(), COLOR_DOWN)
            } else if server.players.is_empty() {
                (NO_PLAYERS.to_string(), COLOR_OK)
            } else {
                let lines: Vec<String> = server.players.iter().map(|p| format!("- {p}")).collect();
                (lines.join("\n"), COLOR_OK)
            };

            EmbedBlock {
                title: name.clone(),
                description,
                color,
            }
        })
        .collect();

    Payload {
        content: format!("# {title}"),
        embeds: fold_overflow(embeds),
    }
}

fn fold_overflow(mut embeds: Vec<EmbedBlock>) -> Vec<EmbedBlock> {
    if embeds.len() <= MAX_EMBEDS {
        return embeds;
    }

    let overflow = embeds.split_off(MAX_EMBEDS - 1);
    let color = if overflow.iter().any(|b| b.color == COLOR_DOWN) {
        COLOR_DOWN
    } else {
        COLOR_OK
    };
    let description = overflow
        .iter()
        .map(|b| format!("**{}**\n{}", b.title, b.description))
        .collect::<Vec<_>>()
        .join("\n\n");

    embeds.push(EmbedBlock {
        title: MORE_SERVERS.to_string(),
        description,
        color,
    });
    embeds
}

pub struct StatusPublisher {
    outbound: Arc<dyn Outbound>,
    channel_id: u64,
    title: String,
    /// The bot's own user id; rediscovery is skipped when unknown
    author_id: Option<u64>,
    pin: bool,
}

impl StatusPublisher {
    pub fn new(
        outbound: Arc<dyn Outbound>,
        channel_id: u64,
        title: impl Into<String>,
        author_id: Option<u64>,
        pin: bool,
    ) -> Self {
        Self {
            outbound,
            channel_id,
            title: title.into(),
            author_id,
            pin,
        }
    }

    /// Publish `generation`, returning the id of the message now showing it
    pub async fn publish(&self, generation: &Generation, known: Option<u64>) -> Result<u64> {
        let payload = render_status(&self.title, generation);

        let message_id = match self.locate(known).await? {
            Some(id) => {
                self.outbound
                    .edit(self.channel_id, id, &payload)
                    .await
                    .context("Failed to edit status message")?
                    .id
            }
            None => {
                let msg = self
                    .outbound
                    .send(self.channel_id, &payload)
                    .await
                    .context("Failed to create status message")?;
                info!("📌 Created new status message {}", msg.id);
                msg.id
            }
        };

        if self.pin {
            if let Err(e) = self.outbound.pin(self.channel_id, message_id).await {
                warn!("Failed to pin status message {message_id}: {e}");
            }
        }

        Ok(message_id)
    }

    /// The message to edit, if one exists
    async fn locate(&self, known: Option<u64>) -> Result<Option<u64>> {
        if let Some(id) = known {
            match self.outbound.fetch_by_id(self.channel_id, id).await {
                Ok(msg) => return Ok(Some(msg.id)),
                Err(e) => warn!("Stored status message {id} not available ({e}), scanning channel"),
            }
        }

        let Some(author_id) = self.author_id else {
            debug!("Own user id unknown, skipping status message rediscovery");
            return Ok(None);
        };

        let recent = self
            .outbound
            .fetch_recent(self.channel_id, RECENT_SCAN_LIMIT)
            .await
            .context("Failed to fetch recent status channel messages")?;

        let found = recent
            .iter()
            .find(|m| m.author_id == author_id && m.content.contains(&self.title))
            .map(|m| m.id);

        if let Some(id) = found {
            info!("🔎 Rediscovered status message {id}");
        }
        Ok(found)
    }
}
