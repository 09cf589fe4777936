//! Outbound message capability
//!
//! The only surface the reminder and presence features use to talk to a chat
//! platform. `SerenityOutbound` (see `core::discord`) is the production implementation.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0

use anyhow::Result;
use async_trait::async_trait;

/// Discord green, used for reachable servers
pub const COLOR_OK: u32 = 0x57F287;
/// Red, used for unreachable servers
pub const COLOR_DOWN: u32 = 0xC1121F;

/// One rich content block (rendered as an embed on Discord)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedBlock {
    pub title: String,
    pub description: String,
    pub color: u32,
}

/// Text plus optional rich blocks
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Payload {
    pub content: String,
    pub embeds: Vec<EmbedBlock>,
}

impl Payload {
    /// Plain text message without embeds
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            embeds: Vec::new(),
        }
    }
}

/// The parts of a posted message the core inspects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedMessage {
    pub id: u64,
    pub author_id: u64,
    pub content: String,
}

/// Send/edit/fetch/pin against a channel
#[async_trait]
pub trait Outbound: Send + Sync {
    async fn send(&self, channel_id: u64, payload: &Payload) -> Result<PostedMessage>;

    /// Replace both text and embeds of an existing message
    async fn edit(&self, channel_id: u64, message_id: u64, payload: &Payload)
        -> Result<PostedMessage>;

    async fn fetch_by_id(&self, channel_id: u64, message_id: u64) -> Result<PostedMessage>;

    /// Most recent messages first, at most `limit`
    async fn fetch_recent(&self, channel_id: u64, limit: u8) -> Result<Vec<PostedMessage>>;

    async fn pin(&self, channel_id: u64, message_id: u64) -> Result<()>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory `Outbound` that records every call.

    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::Mutex;

    pub const BOT_ID: u64 = 4242;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Send { channel_id: u64, payload: Payload },
        Edit { channel_id: u64, message_id: u64, payload: Payload },
        FetchById { channel_id: u64, message_id: u64 },
        FetchRecent { channel_id: u64, limit: u8 },
        Pin { channel_id: u64, message_id: u64 },
    }

    /// Stored channel message
    #[derive(Debug, Clone)]
    struct Stored {
        channel_id: u64,
        message: PostedMessage,
    }

    pub struct RecordingOutbound {
        calls: Mutex<Vec<Call>>,
        messages: Mutex<Vec<Stored>>,
        next_id: AtomicU64,
        pub fail_send: AtomicBool,
        pub fail_fetch: AtomicBool,
        pub fail_pin: AtomicBool,
    }

    impl RecordingOutbound {
        pub fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                messages: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1000),
                fail_send: AtomicBool::new(false),
                fail_fetch: AtomicBool::new(false),
                fail_pin: AtomicBool::new(false),
            }
        }

        /// Pre-seed a message authored by `author_id`
        pub fn seed(&self, channel_id: u64, author_id: u64, content: &str) -> u64 {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            self.messages.lock().unwrap().push(Stored {
                channel_id,
                message: PostedMessage {
                    id,
                    author_id,
                    content: content.to_string(),
                },
            });
            id
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        pub fn sent_texts(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    Call::Send { payload, .. } => Some(payload.content),
                    _ => None,
                })
                .collect()
        }

        pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
            self.calls().iter().filter(|c| pred(c)).count()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl Outbound for RecordingOutbound {
        async fn send(&self, channel_id: u64, payload: &Payload) -> Result<PostedMessage> {
            self.record(Call::Send {
                channel_id,
                payload: payload.clone(),
            });
            if self.fail_send.load(Ordering::SeqCst) {
                return Err(anyhow!("send failed"));
            }
            let id = self.seed(channel_id, BOT_ID, &payload.content);
            Ok(PostedMessage {
                id,
                author_id: BOT_ID,
                content: payload.content.clone(),
            })
        }

        async fn edit(
            &self,
            channel_id: u64,
            message_id: u64,
            payload: &Payload,
        ) -> Result<PostedMessage> {
            self.record(Call::Edit {
                channel_id,
                message_id,
                payload: payload.clone(),
            });
            let mut messages = self.messages.lock().unwrap();
            let stored = messages
                .iter_mut()
                .find(|m| m.channel_id == channel_id && m.message.id == message_id)
                .ok_or_else(|| anyhow!("unknown message {message_id}"))?;
            stored.message.content = payload.content.clone();
            Ok(stored.message.clone())
        }

        async fn fetch_by_id(&self, channel_id: u64, message_id: u64) -> Result<PostedMessage> {
            self.record(Call::FetchById {
                channel_id,
                message_id,
            });
            if self.fail_fetch.load(Ordering::SeqCst) {
                return Err(anyhow!("fetch failed"));
            }
            self.messages
                .lock()
                .unwrap()
                .iter()
                .find(|m| m.channel_id == channel_id && m.message.id == message_id)
                .map(|m| m.message.clone())
                .ok_or_else(|| anyhow!("Unknown Message"))
        }

        async fn fetch_recent(&self, channel_id: u64, limit: u8) -> Result<Vec<PostedMessage>> {
            self.record(Call::FetchRecent { channel_id, limit });
            if self.fail_fetch.load(Ordering::SeqCst) {
                return Err(anyhow!("fetch failed"));
            }
            Ok(self
                .messages
                .lock()
                .unwrap()
                .iter()
                .rev()
                .filter(|m| m.channel_id == channel_id)
                .take(limit as usize)
                .map(|m| m.message.clone())
                .collect())
        }

        async fn pin(&self, channel_id: u64, message_id: u64) -> Result<()> {
            self.record(Call::Pin {
                channel_id,
                message_id,
            });
            if self.fail_pin.load(Ordering::SeqCst) {
                return Err(anyhow!("pin failed"));
            }
            Ok(())
        }
    }
}
