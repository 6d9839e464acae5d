//! Error type shared by the mock collaborators.

use steward_autopilot::RaftError;
use steward_autopilot_delegate::StateStoreError;
use steward_gossip::GossipPoolError;
use thiserror::Error;

/// Error injected by the mocks.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{0}")]
pub struct Error(pub String);

impl GossipPoolError for Error {}
impl StateStoreError for Error {}
impl RaftError for Error {}
