//! Server descriptors handed to the control loop

use std::collections::HashMap;
use std::fmt;
use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// Stable identity of a server, distinct from its display name.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct ServerId(String);

impl ServerId {
    /// Create a new server ID
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ServerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ServerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Node status as understood by the control loop.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum NodeStatus {
    /// Status could not be determined.
    #[default]
    Unknown,

    /// The node is up.
    Alive,

    /// The node stopped responding.
    Failed,

    /// The node departed the cluster.
    Left,
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unknown => "unknown",
            Self::Alive => "alive",
            Self::Failed => "failed",
            Self::Left => "left",
        };
        f.write_str(s)
    }
}

/// Deployment-specific flags carried with a server.
///
/// The control loop passes these through untouched; only promotion and
/// removal strategies outside the core loop consult them.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ServerExt {
    /// The server replicates but never votes.
    pub read_replica: bool,

    /// Redundancy zone the server is placed in.
    pub redundancy_zone: Option<String>,

    /// Version used to stage upgrades.
    pub upgrade_version: Option<String>,
}

/// Canonical view of one server.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Server {
    /// Stable identity.
    pub id: ServerId,

    /// Display name as known to the local-region gossip pool.
    pub name: String,

    /// Consensus RPC address.
    pub address: SocketAddr,

    /// Derived node status.
    pub node_status: NodeStatus,

    /// Build version of the server binary.
    pub version: String,

    /// Consensus protocol version.
    pub raft_version: u32,

    /// Node metadata from durable cluster state. Empty if the node has not
    /// registered itself yet.
    pub meta: HashMap<String, String>,

    /// Deployment-specific flags.
    pub ext: ServerExt,
}

impl Server {
    /// Whether this server counts towards quorum.
    #[must_use]
    pub const fn is_voter_eligible(&self) -> bool {
        !self.ext.read_replica
    }
}
