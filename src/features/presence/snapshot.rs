//! Server presence snapshots
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use std::collections::HashMap;

/// Players present on one monitored server at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSnapshot {
    pub name: String,
    pub players: Vec<String>,
    pub reachable: bool,
}

impl ServerSnapshot {
    pub fn online(name: impl Into<String>, players: Vec<String>) -> Self {
        Self {
            name: name.into(),
            players,
            reachable: true,
        }
    }

    pub fn unreachable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            players: Vec::new(),
            reachable: false,
        }
    }
}

/// One full polling cycle, keyed by server name. Never a delta.
pub type Generation = HashMap<String, ServerSnapshot>;

/// Build a generation from `(server, players)` pairs, all reachable
pub fn generation<S, P>(servers: impl IntoIterator<Item = (S, Vec<P>)>) -> Generation
where
    S: Into<String>,
    P: Into<String>,
{
    servers
        .into_iter()
        .map(|(name, players)| {
            let name = name.into();
            let players = players.into_iter().map(Into::into).collect();
            (name.clone(), ServerSnapshot::online(name, players))
        })
        .collect()
}
