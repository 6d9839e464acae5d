//! Read-only access to durable cluster state

use std::collections::HashMap;
use std::error::Error;
use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use steward_autopilot::ServerId;

use crate::AutopilotConfig;

/// Marker trait for `StateStore` errors
pub trait StateStoreError: Debug + Error + Send + Sync + 'static {}

/// A node registered in the catalog.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct CatalogNode {
    /// Node identity. Servers register under their server ID.
    pub id: String,

    /// Operator-defined metadata.
    pub meta: HashMap<String, String>,
}

/// Durable cluster state, replicated through consensus.
#[async_trait]
pub trait StateStore: Send + Sync + 'static {
    /// The error type for state reads.
    type Error: StateStoreError;

    /// Looks up a catalog node by identity.
    ///
    /// Returns `Ok(None)` if no node with that identity has registered.
    async fn node_by_id(&self, id: &ServerId) -> Result<Option<CatalogNode>, Self::Error>;

    /// Reads the stored autopilot policy, if an operator has set one.
    async fn autopilot_config(&self) -> Result<Option<AutopilotConfig>, Self::Error>;
}
