//! # Presence Feature
//!
//! Polls the monitored servers, announces join/leave/move transitions and keeps a
//! single player-list message up to date in the status channel.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod differ;
pub mod pipeline;
pub mod pointer;
pub mod publisher;
pub mod snapshot;
pub mod source;

pub use differ::{diff_generations, PresenceDiffer, PresenceTransition};
pub use pipeline::PresencePipeline;
pub use pointer::MessagePointer;
pub use publisher::{render_status, StatusPublisher};
pub use snapshot::{Generation, ServerSnapshot};
pub use source::{run_poller, HttpPresenceSource, PresenceSource, SNAPSHOT_QUEUE_CAPACITY};
