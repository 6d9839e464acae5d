//! Contract between a cluster-health control loop and the process hosting it.
//!
//! The control loop ("autopilot") decides when servers are healthy, when to
//! promote them and when to remove them. It learns about the cluster and acts
//! on it exclusively through the `AutopilotDelegate` implemented by the host.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod raft;
pub mod server;
pub mod state;

pub use config::Config;
pub use raft::{Raft, RaftError, RaftServer, RaftState, Suffrage};
pub use server::{NodeStatus, Server, ServerExt, ServerId};
pub use state::{ServerHealth, ServerState, ServerStats, State};

use std::collections::HashMap;
use std::error::Error;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Collects replication stats from a set of servers concurrently.
#[async_trait]
pub trait StatsFetcher: Send + Sync + 'static {
    /// Fetches stats from every server in `servers`.
    ///
    /// Servers that fail to respond, or that have not responded when `cancel`
    /// fires, are left out of the result.
    async fn fetch(
        &self,
        cancel: &CancellationToken,
        servers: &HashMap<ServerId, Server>,
    ) -> HashMap<ServerId, ServerStats>;
}

/// Capabilities the control loop requires from its host.
#[async_trait]
pub trait AutopilotDelegate: Send + Sync + 'static {
    /// The error type for removals.
    type Error: Error + Send + Sync + 'static;

    /// Current policy, or `None` if it cannot be read this cycle.
    async fn autopilot_config(&self) -> Option<Config>;

    /// All servers currently known, keyed by identity.
    async fn known_servers(&self) -> HashMap<ServerId, Server>;

    /// Replication stats for the given servers.
    async fn fetch_server_stats(
        &self,
        cancel: &CancellationToken,
        servers: &HashMap<ServerId, Server>,
    ) -> HashMap<ServerId, ServerStats>;

    /// Called whenever the loop's health assessment changes.
    async fn notify_state(&self, state: &State);

    /// Removes a server the loop has declared dead.
    async fn remove_failed_server(&self, server: &Server) -> Result<(), Self::Error>;
}
