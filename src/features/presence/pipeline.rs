//! # Feature: Presence Pipeline
//!
//! Single consumer of polled generations. Each cycle diffs against the previous
//! generation, posts join/leave notices, then publishes the status message and
//! persists its id. Cycles never overlap because this is the only task that
//! touches the differ or the known message id.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Join/leave notices are optional
//! - 1.0.0: Initial release

use crate::core::outbound::{Outbound, Payload};
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::differ::PresenceDiffer;
use super::pointer::MessagePointer;
use super::publisher::StatusPublisher;
use super::snapshot::Generation;

pub struct PresencePipeline {
    differ: PresenceDiffer,
    publisher: StatusPublisher,
    pointer: MessagePointer,
    outbound: Arc<dyn Outbound>,
    join_leave_channel: Option<u64>,
    known_message: Option<u64>,
}

impl PresencePipeline {
    /// Build the pipeline, loading the persisted status message id once
    pub async fn start(
        publisher: StatusPublisher,
        pointer: MessagePointer,
        outbound: Arc<dyn Outbound>,
        join_leave_channel: Option<u64>,
    ) -> Self {
        let known_message = pointer.read().await;
        match known_message {
            Some(id) => info!("📌 Loaded status message id {id}"),
            None => debug!("No stored status message id"),
        }

        Self {
            differ: PresenceDiffer::new(),
            publisher,
            pointer,
            outbound,
            join_leave_channel,
            known_message,
        }
    }

    pub fn known_message(&self) -> Option<u64> {
        self.known_message
    }

    /// Run one cycle for `generation`
    pub async fn process(&mut self, generation: Generation) {
        let transitions = self.differ.diff(&generation);

        if let Some(channel_id) = self.join_leave_channel {
            for transition in &transitions {
                let notice = transition.notice();
                if let Err(e) = self
                    .outbound
                    .send(channel_id, &Payload::text(notice.clone()))
                    .await
                {
                    warn!("Failed to post presence notice '{notice}': {e}");
                }
            }
        } else if !transitions.is_empty() {
            debug!("{} presence transitions (notices disabled)", transitions.len());
        }

        match self.publisher.publish(&generation, self.known_message).await {
            Ok(id) => {
                self.known_message = Some(id);
                if let Err(e) = self.pointer.write(id).await {
                    warn!("{e:#}");
                }
            }
            Err(e) => warn!("Failed to publish player list: {e:#}"),
        }
    }

    /// Consume generations until the poller side closes
    pub async fn run(mut self, mut rx: mpsc::Receiver<Generation>) {
        info!("📋 Presence pipeline started");
        while let Some(generation) = rx.recv().await {
            self.process(generation).await;
        }
        info!("Presence pipeline stopped");
    }
}
