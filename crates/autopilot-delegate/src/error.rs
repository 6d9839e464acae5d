//! Error types for the autopilot delegate

use std::fmt;

use steward_autopilot::ServerId;
use steward_gossip::TagError;
use thiserror::Error;

/// Boxed error from a collaborator
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by `ServerDelegate`
#[derive(Debug, Error)]
pub enum Error {
    /// A member claiming the server role carries malformed tags
    #[error("member {name} has malformed server tags: {source}")]
    ServerTags {
        /// Member name
        name: String,
        /// Tag parse failure
        #[source]
        source: TagError,
    },

    /// Durable state lookup failed while building a server
    #[error("error retrieving node {server_id} from state store: {source}")]
    StateLookup {
        /// Server being built
        server_id: ServerId,
        /// Underlying store error
        #[source]
        source: BoxError,
    },

    /// The local gossip pool refused the removal
    #[error("failed to remove server {name} from the local gossip pool: {source}")]
    LocalPoolRemoval {
        /// Member name used with the local pool
        name: String,
        /// Underlying pool error
        #[source]
        source: BoxError,
    },

    /// The wide-area gossip pool refused the removal
    #[error("failed to remove server {name} from the wide-area gossip pool: {source}")]
    WideAreaPoolRemoval {
        /// Member name used with the wide-area pool
        name: String,
        /// Underlying pool error
        #[source]
        source: BoxError,
    },

    /// The deployment removal hook failed
    #[error(transparent)]
    RemovalHook(BoxError),

    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Returns the kind of this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ServerTags { .. } => ErrorKind::ServerTags,
            Self::StateLookup { .. } => ErrorKind::StateLookup,
            Self::LocalPoolRemoval { .. } => ErrorKind::LocalPoolRemoval,
            Self::WideAreaPoolRemoval { .. } => ErrorKind::WideAreaPoolRemoval,
            Self::RemovalHook(_) => ErrorKind::RemovalHook,
            Self::Configuration(_) => ErrorKind::Configuration,
        }
    }
}

/// The kind of delegate error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Malformed server tags
    ServerTags,

    /// Durable state lookup failure
    StateLookup,

    /// Local-pool removal failure
    LocalPoolRemoval,

    /// Wide-area-pool removal failure, after the local removal succeeded
    WideAreaPoolRemoval,

    /// Deployment hook failure
    RemovalHook,

    /// Configuration error
    Configuration,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
