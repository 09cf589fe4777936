//! Serenity-backed `Outbound` implementation
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0

use crate::core::embeds::payload_embeds;
use crate::core::outbound::{Outbound, Payload, PostedMessage};
use anyhow::Result;
use async_trait::async_trait;
use serenity::http::Http;
use serenity::model::channel::Message;
use serenity::model::id::{ChannelId, MessageId};
use std::sync::Arc;

/// REST client wrapper used by the reminder scheduler, event sync and status publisher
#[derive(Clone)]
pub struct SerenityOutbound {
    http: Arc<Http>,
}

impl SerenityOutbound {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    /// Resolve the bot's own user id (needed to recognise its status message)
    pub async fn current_user_id(&self) -> Result<u64> {
        let me = self.http.get_current_user().await?;
        Ok(me.id.0)
    }

    fn posted(msg: &Message) -> PostedMessage {
        PostedMessage {
            id: msg.id.0,
            author_id: msg.author.id.0,
            content: msg.content.clone(),
        }
    }
}

#[async_trait]
impl Outbound for SerenityOutbound {
    async fn send(&self, channel_id: u64, payload: &Payload) -> Result<PostedMessage> {
        let embeds = payload_embeds(&payload.embeds);
        let msg = ChannelId(channel_id)
            .send_message(&*self.http, |m| {
                m.content(&payload.content);
                if !embeds.is_empty() {
                    m.set_embeds(embeds);
                }
                m
            })
            .await?;
        Ok(Self::posted(&msg))
    }

    async fn edit(
        &self,
        channel_id: u64,
        message_id: u64,
        payload: &Payload,
    ) -> Result<PostedMessage> {
        let embeds = payload_embeds(&payload.embeds);
        let msg = ChannelId(channel_id)
            .edit_message(&*self.http, MessageId(message_id), |m| {
                m.content(&payload.content).set_embeds(embeds)
            })
            .await?;
        Ok(Self::posted(&msg))
    }

    async fn fetch_by_id(&self, channel_id: u64, message_id: u64) -> Result<PostedMessage> {
        let msg = ChannelId(channel_id)
            .message(&*self.http, MessageId(message_id))
            .await?;
        Ok(Self::posted(&msg))
    }

    async fn fetch_recent(&self, channel_id: u64, limit: u8) -> Result<Vec<PostedMessage>> {
        let messages = ChannelId(channel_id)
            .messages(&*self.http, |retriever| retriever.limit(u64::from(limit)))
            .await?;
        Ok(messages.iter().map(Self::posted).collect())
    }

    async fn pin(&self, channel_id: u64, message_id: u64) -> Result<()> {
        ChannelId(channel_id)
            .pin(&*self.http, MessageId(message_id))
            .await?;
        Ok(())
    }
}
