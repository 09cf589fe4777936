//! # Feature: Presence Source
//!
//! Queries every monitored server for its current player list and hands complete
//! generations to the publishing pipeline over a bounded channel. A server that
//! cannot be queried is reported as unreachable with no players.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Accept `{"players": [...]}` bodies alongside bare arrays
//! - 1.0.0: Initial release

use crate::core::config::ServerEndpoint;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

use super::snapshot::{Generation, ServerSnapshot};

/// Bounded queue between the poller and the pipeline
pub const SNAPSHOT_QUEUE_CAPACITY: usize = 100;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Produces one full generation per call
#[async_trait]
pub trait PresenceSource: Send + Sync {
    async fn snapshot(&self) -> Generation;
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PlayerReport {
    List(Vec<String>),
    Object { players: Vec<String> },
}

/// Player names from a status endpoint body
pub fn parse_players(body: &str) -> Result<Vec<String>> {
    let report: PlayerReport =
        serde_json::from_str(body).context("Unrecognised player list format")?;
    Ok(match report {
        PlayerReport::List(players) => players,
        PlayerReport::Object { players } => players,
    })
}

/// Polls HTTP status endpoints returning JSON player lists
pub struct HttpPresenceSource {
    client: reqwest::Client,
    servers: Vec<ServerEndpoint>,
}

impl HttpPresenceSource {
    pub fn new(servers: Vec<ServerEndpoint>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, servers })
    }

    async fn query(&self, server: &ServerEndpoint) -> Result<Vec<String>> {
        let response = self.client.get(&server.url).send().await.map_err(|e| {
            if e.is_timeout() {
                anyhow!("Request timed out after {}s", REQUEST_TIMEOUT.as_secs())
            } else if e.is_connect() {
                anyhow!("Could not connect to the server")
            } else {
                anyhow!("HTTP request failed: {e}")
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Server returned HTTP {status}"));
        }

        let body = response.text().await.context("Failed to read response body")?;
        parse_players(&body)
    }
}

#[async_trait]
impl PresenceSource for HttpPresenceSource {
    async fn snapshot(&self) -> Generation {
        let mut generation = Generation::new();
        for server in &self.servers {
            let snapshot = match self.query(server).await {
                Ok(players) => ServerSnapshot::online(&server.name, players),
                Err(e) => {
                    warn!("Failed to query server '{}': {}", server.name, e);
                    ServerSnapshot::unreachable(&server.name)
                }
            };
            generation.insert(server.name.clone(), snapshot);
        }
        generation
    }
}

/// Take a snapshot every `every` and queue it. Returns once the receiver is gone.
pub async fn run_poller(
    source: Arc<dyn PresenceSource>,
    every: Duration,
    tx: mpsc::Sender<Generation>,
) {
    info!("👥 Presence poller started (every {}s)", every.as_secs());
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let generation = source.snapshot().await;
        debug!("Polled {} servers", generation.len());

        if tx.send(generation).await.is_err() {
            info!("Presence pipeline closed, stopping poller");
            break;
        }
    }
}
