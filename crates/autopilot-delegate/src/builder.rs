//! Builder for `ServerDelegate`

use std::sync::Arc;

use prometheus::Registry;
use steward_autopilot::{Raft, StatsFetcher};
use steward_gossip::GossipPool;
use tracing::info;

use crate::{
    AutopilotMetrics, DelegateConfig, Error, NoopRemovalHook, RemovalHook, ServerDelegate,
    StateStore,
};

/// Collects the collaborators of a `ServerDelegate`.
pub struct ServerDelegateBuilder<G, S, R, F>
where
    G: GossipPool,
    S: StateStore,
    R: Raft,
    F: StatsFetcher,
{
    config: Option<DelegateConfig>,
    lan: Option<Arc<G>>,
    wan: Option<Arc<G>>,
    state_store: Option<Arc<S>>,
    raft: Option<Arc<R>>,
    stats_fetcher: Option<Arc<F>>,
    removal_hook: Option<Arc<dyn RemovalHook>>,
    registry: Option<Registry>,
}

impl<G, S, R, F> Default for ServerDelegateBuilder<G, S, R, F>
where
    G: GossipPool,
    S: StateStore,
    R: Raft,
    F: StatsFetcher,
{
    fn default() -> Self {
        Self {
            config: None,
            lan: None,
            wan: None,
            state_store: None,
            raft: None,
            stats_fetcher: None,
            removal_hook: None,
            registry: None,
        }
    }
}

impl<G, S, R, F> ServerDelegateBuilder<G, S, R, F>
where
    G: GossipPool,
    S: StateStore,
    R: Raft,
    F: StatsFetcher,
{
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration
    #[must_use]
    pub fn config(mut self, config: DelegateConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the local-region gossip pool
    #[must_use]
    pub fn lan(mut self, lan: Arc<G>) -> Self {
        self.lan = Some(lan);
        self
    }

    /// Set the wide-area gossip pool
    #[must_use]
    pub fn wan(mut self, wan: Arc<G>) -> Self {
        self.wan = Some(wan);
        self
    }

    /// Set the durable state store
    #[must_use]
    pub fn state_store(mut self, state_store: Arc<S>) -> Self {
        self.state_store = Some(state_store);
        self
    }

    /// Set the local consensus instance
    #[must_use]
    pub fn raft(mut self, raft: Arc<R>) -> Self {
        self.raft = Some(raft);
        self
    }

    /// Set the stats fetcher
    #[must_use]
    pub fn stats_fetcher(mut self, stats_fetcher: Arc<F>) -> Self {
        self.stats_fetcher = Some(stats_fetcher);
        self
    }

    /// Set a deployment-specific removal hook. Defaults to a no-op.
    #[must_use]
    pub fn removal_hook(mut self, removal_hook: Arc<dyn RemovalHook>) -> Self {
        self.removal_hook = Some(removal_hook);
        self
    }

    /// Register health gauges with this registry. Defaults to a private one.
    #[must_use]
    pub fn metrics_registry(mut self, registry: Registry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Build the delegate
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if a required collaborator is missing,
    /// the configuration is invalid, or the gauges cannot be registered.
    pub fn build(self) -> Result<ServerDelegate<G, S, R, F>, Error> {
        let config = self
            .config
            .ok_or_else(|| Error::Configuration("config is required".to_string()))?;
        config.validate()?;

        let lan = self
            .lan
            .ok_or_else(|| Error::Configuration("local gossip pool is required".to_string()))?;
        let wan = self
            .wan
            .ok_or_else(|| Error::Configuration("wide-area gossip pool is required".to_string()))?;
        let state_store = self
            .state_store
            .ok_or_else(|| Error::Configuration("state store is required".to_string()))?;
        let raft = self
            .raft
            .ok_or_else(|| Error::Configuration("raft is required".to_string()))?;
        let stats_fetcher = self
            .stats_fetcher
            .ok_or_else(|| Error::Configuration("stats fetcher is required".to_string()))?;

        let removal_hook = self
            .removal_hook
            .unwrap_or_else(|| Arc::new(NoopRemovalHook));

        let registry = self.registry.unwrap_or_default();
        let metrics = AutopilotMetrics::new(&registry)
            .map_err(|e| Error::Configuration(format!("failed to register metrics: {e}")))?;

        info!(
            "Creating autopilot delegate for datacenter {}",
            config.datacenter
        );

        Ok(ServerDelegate {
            config,
            lan,
            wan,
            state_store,
            raft,
            stats_fetcher,
            removal_hook,
            metrics,
        })
    }
}
