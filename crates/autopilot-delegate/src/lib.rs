//! Autopilot delegate for servers
//!
//! This crate adapts a server's collaborators to the autopilot control loop:
//! - Known servers are built from the local gossip pool and enriched with node
//!   meta from durable state
//! - Stats requests are forwarded to a concurrent fetcher
//! - Health gauges are emitted by the leader only
//! - Failed servers are removed from the local pool, then the wide-area pool
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod builder;
mod catalog;
mod config;
mod delegate;
mod error;
mod hook;
mod metrics;
mod removal;
mod servers;
pub mod view;

pub use builder::ServerDelegateBuilder;
pub use catalog::{CatalogNode, StateStore, StateStoreError};
pub use config::{AutopilotConfig, DelegateConfig};
pub use delegate::ServerDelegate;
pub use error::{BoxError, Error, ErrorKind};
pub use hook::{NoopRemovalHook, RemovalHook};
pub use metrics::AutopilotMetrics;
pub use removal::wide_area_member_name;
