//! # Presence Differ
//!
//! Turns consecutive full snapshots into join/leave/move transitions. Both
//! player→server indices are built before anything is emitted, so a player changing
//! servers is exactly one move, never a leave plus a join.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Sorted, order-independent output
//! - 1.0.0: Initial join/leave detection

use crate::features::presence::snapshot::Generation;
use std::collections::HashMap;

/// A change in where a player is online
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum PresenceTransition {
    Joined { player: String, server: String },
    Left { player: String, server: String },
    Moved { player: String, from: String, to: String },
}

impl PresenceTransition {
    /// Chat line for the join/leave channel
    pub fn notice(&self) -> String {
        match self {
            PresenceTransition::Joined { player, server } => {
                format!("[{server}] {player} joined the server")
            }
            PresenceTransition::Left { player, server } => {
                format!("[{server}] {player} left the server")
            }
            PresenceTransition::Moved { player, from, to } => {
                format!("[{from} -> {to}] {player} moved servers")
            }
        }
    }
}

/// player → server. Servers are visited in name order and the first occurrence wins,
/// so a player listed on two servers maps the same way whatever the input order.
fn index(generation: &Generation) -> HashMap<String, String> {
    let mut servers: Vec<&String> = generation.keys().collect();
    servers.sort();

    let mut index = HashMap::new();
    for server in servers {
        for player in &generation[server].players {
            index
                .entry(player.clone())
                .or_insert_with(|| server.clone());
        }
    }
    index
}

/// Transitions from `previous` (absent on the first cycle) to `current`, sorted
pub fn diff_generations(
    previous: Option<&Generation>,
    current: &Generation,
) -> Vec<PresenceTransition> {
    let prev_index = previous.map(index).unwrap_or_default();
    let curr_index = index(current);
    let mut transitions = Vec::new();

    for (player, server) in &curr_index {
        match prev_index.get(player) {
            None => transitions.push(PresenceTransition::Joined {
                player: player.clone(),
                server: server.clone(),
            }),
            Some(old) if old != server => transitions.push(PresenceTransition::Moved {
                player: player.clone(),
                from: old.clone(),
                to: server.clone(),
            }),
            Some(_) => {}
        }
    }

    for (player, server) in &prev_index {
        if !curr_index.contains_key(player) {
            transitions.push(PresenceTransition::Left {
                player: player.clone(),
                server: server.clone(),
            });
        }
    }

    transitions.sort();
    transitions
}

/// Holds the previous generation between cycles
#[derive(Debug, Default)]
pub struct PresenceDiffer {
    previous: Option<Generation>,
}

impl PresenceDiffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff against the retained generation, then retain an owned copy of `current`
    pub fn diff(&mut self, current: &Generation) -> Vec<PresenceTransition> {
        let transitions = diff_generations(self.previous.as_ref(), current);
        self.previous = Some(current.clone());
        transitions
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}
