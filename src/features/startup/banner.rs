//! # Feature: Startup Banner
//!
//! Logs the effective configuration once at boot (never the token) and tells the
//! first gateway Ready apart from reconnects.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Replaced channel notification with a log banner
//! - 1.0.0: Initial release

use crate::core::duration::{format_duration, Language};
use crate::core::Config;
use log::info;
use std::sync::atomic::{AtomicBool, Ordering};

/// Summary of the effective configuration, one line per entry
pub fn banner_lines(config: &Config) -> Vec<String> {
    let mut lines = vec![
        format!("🚀 herald v{}", env!("CARGO_PKG_VERSION")),
        format!("   Status channel: {}", config.status_channel_id),
        format!("   Status title: {}", config.status_title),
        format!(
            "   Join/leave notices: {}",
            if config.show_join_leave {
                config.join_leave_channel_id.to_string()
            } else {
                "disabled".to_string()
            }
        ),
        format!("   Pin player list: {}", config.pin_player_list),
        format!(
            "   Servers: {} (every {}s)",
            config
                .servers
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            config.poll_interval.as_secs()
        ),
    ];

    match (config.eventer_enabled, config.events_channel_id) {
        (true, Some(channel)) => {
            let offsets: Vec<String> = config
                .reminder_offsets
                .iter()
                .map(|o| format_duration(*o, Language::English))
                .collect();
            lines.push(format!("   Event reminders: channel {channel}, {}", offsets.join(" / ")));
            lines.push(format!(
                "   Display: {} ({:?})",
                config.display_timezone, config.language
            ));
        }
        _ => lines.push("   Event reminders: disabled".to_string()),
    }

    lines
}

pub fn log_banner(config: &Config) {
    for line in banner_lines(config) {
        info!("{line}");
    }
}

/// True exactly once, for the first gateway Ready
#[derive(Debug)]
pub struct ReadyOnce {
    first: AtomicBool,
}

impl Default for ReadyOnce {
    fn default() -> Self {
        Self {
            first: AtomicBool::new(true),
        }
    }
}

impl ReadyOnce {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true on the first call only
    pub fn claim(&self) -> bool {
        self.first.swap(false, Ordering::SeqCst)
    }
}
