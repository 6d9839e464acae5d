//! Read-only view of the local consensus instance

use std::error::Error;
use std::fmt::{self, Debug};
use std::net::SocketAddr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ServerId;

/// Marker trait for `Raft` errors
pub trait RaftError: Debug + Error + Send + Sync + 'static {}

/// Role of the local consensus instance.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum RaftState {
    /// Following a leader.
    Follower,

    /// Campaigning for leadership.
    Candidate,

    /// Elected leader.
    Leader,

    /// Stopped.
    Shutdown,
}

impl fmt::Display for RaftState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Whether a configured server votes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Suffrage {
    /// Counts toward quorum.
    Voter,

    /// Replicates without voting.
    Nonvoter,
}

/// One entry of the consensus configuration.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RaftServer {
    /// Server identity.
    pub id: ServerId,

    /// Consensus RPC address.
    pub address: SocketAddr,

    /// Voting rights.
    pub suffrage: Suffrage,
}

/// The consensus instance of the local process.
#[async_trait]
pub trait Raft: Send + Sync + 'static {
    /// The error type for configuration queries.
    type Error: RaftError;

    /// Current role of the local instance.
    async fn state(&self) -> RaftState;

    /// Latest committed consensus configuration.
    async fn configuration(&self) -> Result<Vec<RaftServer>, Self::Error>;

    /// Whether the local instance is the elected leader.
    async fn is_leader(&self) -> bool {
        self.state().await == RaftState::Leader
    }

    /// Identities of the servers with voter suffrage.
    async fn voters(&self) -> Result<Vec<ServerId>, Self::Error> {
        Ok(self
            .configuration()
            .await?
            .into_iter()
            .filter(|server| server.suffrage == Suffrage::Voter)
            .map(|server| server.id)
            .collect())
    }
}
