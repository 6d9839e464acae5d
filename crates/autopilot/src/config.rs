//! Policy the control loop runs with

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Control loop policy.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Remove dead servers when a replacement joins.
    pub cleanup_dead_servers: bool,

    /// Maximum time since last leader contact before a server is unhealthy.
    pub last_contact_threshold: Duration,

    /// Maximum number of log entries a server may trail the leader by.
    pub max_trailing_logs: u64,

    /// Minimum number of voters to keep when pruning.
    pub min_quorum: u32,

    /// Time a server must be healthy before it is promoted to voter.
    pub server_stabilization_time: Duration,
}
