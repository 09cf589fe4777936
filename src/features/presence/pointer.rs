//! Persisted status message pointer
//!
//! The last known status message id survives restarts as a single decimal number in
//! a plain text file. A missing or unreadable file simply means "unknown".
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::{Context, Result};
use log::warn;
use std::io::ErrorKind;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct MessagePointer {
    path: PathBuf,
}

impl MessagePointer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn read(&self) -> Option<u64> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Failed to read message pointer {}: {}", self.path.display(), e);
                return None;
            }
        };

        match raw.trim().parse::<u64>() {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(
                    "Ignoring malformed message pointer {} ({:?}): {}",
                    self.path.display(),
                    raw.trim(),
                    e
                );
                None
            }
        }
    }

    pub async fn write(&self, id: u64) -> Result<()> {
        tokio::fs::write(&self.path, id.to_string())
            .await
            .with_context(|| format!("Failed to write message pointer {}", self.path.display()))
    }
}
