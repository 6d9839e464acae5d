//! The delegate the control loop drives

use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::sync::Arc;

use async_trait::async_trait;
use steward_autopilot::{
    AutopilotDelegate, Config, Raft, Server, ServerId, ServerStats, State, StatsFetcher,
};
use steward_gossip::GossipPool;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::{AutopilotConfig, AutopilotMetrics, DelegateConfig, Error, RemovalHook, StateStore};

/// Adapts the local server's gossip pools, consensus instance and durable
/// state to the capabilities the autopilot control loop expects.
///
/// Holds no mutable state of its own; every call reads the collaborators
/// afresh.
pub struct ServerDelegate<G, S, R, F>
where
    G: GossipPool,
    S: StateStore,
    R: Raft,
    F: StatsFetcher,
{
    pub(crate) config: DelegateConfig,
    /// Local-region gossip pool
    pub(crate) lan: Arc<G>,
    /// Wide-area gossip pool
    pub(crate) wan: Arc<G>,
    pub(crate) state_store: Arc<S>,
    pub(crate) raft: Arc<R>,
    pub(crate) stats_fetcher: Arc<F>,
    pub(crate) removal_hook: Arc<dyn RemovalHook>,
    pub(crate) metrics: AutopilotMetrics,
}

impl<G, S, R, F> ServerDelegate<G, S, R, F>
where
    G: GossipPool,
    S: StateStore,
    R: Raft,
    F: StatsFetcher,
{
    /// Datacenter of the local process
    #[must_use]
    pub fn datacenter(&self) -> &str {
        &self.config.datacenter
    }

    /// Health gauges this delegate emits
    #[must_use]
    pub const fn metrics(&self) -> &AutopilotMetrics {
        &self.metrics
    }

    /// Whether the local consensus instance is the elected leader
    pub async fn is_leader(&self) -> bool {
        self.raft.is_leader().await
    }

    /// Current voters according to the consensus configuration
    ///
    /// # Errors
    ///
    /// Returns the consensus instance's error if the configuration cannot be read.
    pub async fn voters(&self) -> Result<Vec<ServerId>, R::Error> {
        self.raft.voters().await
    }

    /// Stored policy, or the configured default if none has been stored.
    pub(crate) async fn current_autopilot_config(&self) -> Result<AutopilotConfig, S::Error> {
        Ok(self
            .state_store
            .autopilot_config()
            .await?
            .unwrap_or_else(|| self.config.autopilot.clone()))
    }
}

#[async_trait]
impl<G, S, R, F> AutopilotDelegate for ServerDelegate<G, S, R, F>
where
    G: GossipPool,
    S: StateStore,
    R: Raft,
    F: StatsFetcher,
{
    type Error = Error;

    async fn autopilot_config(&self) -> Option<Config> {
        match self.current_autopilot_config().await {
            Ok(config) => Some(config.to_autopilot_config()),
            Err(e) => {
                error!("Failed to read autopilot config from state store: {}", e);
                None
            }
        }
    }

    async fn known_servers(&self) -> HashMap<ServerId, Server> {
        self.autopilot_servers().await
    }

    async fn fetch_server_stats(
        &self,
        cancel: &CancellationToken,
        servers: &HashMap<ServerId, Server>,
    ) -> HashMap<ServerId, ServerStats> {
        self.stats_fetcher.fetch(cancel, servers).await
    }

    async fn notify_state(&self, state: &State) {
        // only the leader reports cluster-wide health
        if !self.raft.is_leader().await {
            debug!("Not the leader, skipping autopilot health gauges");
            return;
        }

        self.metrics.record(state);
    }

    async fn remove_failed_server(&self, server: &Server) -> Result<(), Self::Error> {
        self.remove_from_pools(server).await?;

        self.removal_hook
            .remove_failed_server(server)
            .await
            .map_err(Error::RemovalHook)
    }
}

impl<G, S, R, F> Debug for ServerDelegate<G, S, R, F>
where
    G: GossipPool,
    S: StateStore,
    R: Raft,
    F: StatsFetcher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerDelegate")
            .field("datacenter", &self.config.datacenter)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}
