//! Stats and health state exchanged with the control loop

use std::collections::HashMap;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::{Server, ServerId};

/// Replication stats reported by one server.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ServerStats {
    /// Time since the server last heard from the leader.
    pub last_contact: Option<Duration>,

    /// Last consensus term the server saw.
    pub last_term: u64,

    /// Last log index the server holds.
    pub last_index: u64,
}

/// Health verdict for one server.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServerHealth {
    /// Whether the server is currently healthy.
    pub healthy: bool,

    /// When the server last changed health.
    pub stable_since: Option<SystemTime>,
}

/// Everything the control loop knows about one server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerState {
    /// Descriptor the loop was given.
    pub server: Server,

    /// Latest stats.
    pub stats: ServerStats,

    /// Health verdict.
    pub health: ServerHealth,
}

/// The control loop's assessment of the whole cluster.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct State {
    /// Whether every voter is healthy.
    pub healthy: bool,

    /// Additional voter failures the group can sustain.
    pub failure_tolerance: u32,

    /// Current leader, if any.
    pub leader: Option<ServerId>,

    /// Current voters.
    pub voters: Vec<ServerId>,

    /// Per-server state.
    pub servers: HashMap<ServerId, ServerState>,
}
