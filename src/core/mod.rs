//! # Core Module
//!
//! Configuration, outbound messaging abstraction and text helpers shared by features.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Outbound trait with serenity adapter; duration formatting
//! - 1.1.0: Add response module with Discord message limits
//! - 1.0.0: Initial creation with config module

pub mod config;
pub mod discord;
pub mod duration;
pub mod embeds;
pub mod outbound;
pub mod response;

// Re-export commonly used items
pub use config::{Config, ServerEndpoint};
pub use discord::SerenityOutbound;
pub use duration::{format_duration, Language};
pub use outbound::{EmbedBlock, Outbound, Payload, PostedMessage};
pub use response::{truncate_for_embed, truncate_for_message, EMBED_LIMIT, MESSAGE_LIMIT};
