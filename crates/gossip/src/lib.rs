//! Abstract interface over a gossip membership pool.
//!
//! This crate provides:
//! - Membership records as seen by a gossip pool (`Member`, `MemberStatus`)
//! - The `GossipPool` trait used to enumerate members and mark them failed
//! - Classification of members into servers via their tags (`metadata`)
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod member;
pub mod metadata;

pub use member::{Member, MemberStatus};
pub use metadata::{ServerMetadata, TagError};

use std::error::Error;
use std::fmt::Debug;

use async_trait::async_trait;

/// Marker trait for `GossipPool` errors
pub trait GossipPoolError: Debug + Error + Send + Sync + 'static {}

/// A gossip membership pool scoped to one region (local) or spanning all
/// regions (wide-area).
#[async_trait]
pub trait GossipPool: Send + Sync + 'static {
    /// The error type for pool operations.
    type Error: GossipPoolError;

    /// Returns a point-in-time snapshot of the pool's current members.
    async fn members(&self) -> Vec<Member>;

    /// Forcibly transitions a failed member to the left state.
    ///
    /// Removing a member that is already absent is not an error.
    ///
    /// # Arguments
    /// * `name`: The member name as known to this pool.
    async fn remove_failed_node(&self, name: &str) -> Result<(), Self::Error>;
}
