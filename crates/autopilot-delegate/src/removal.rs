//! Removal of failed servers from both gossip pools

use steward_autopilot::{Raft, Server, StatsFetcher};
use steward_gossip::GossipPool;
use tracing::info;

use crate::{Error, ServerDelegate, StateStore};

/// Name of a server in the wide-area pool, which qualifies names with the
/// datacenter so identically named servers in different regions stay distinct.
#[must_use]
pub fn wide_area_member_name(name: &str, datacenter: &str) -> String {
    format!("{name}.{datacenter}")
}

impl<G, S, R, F> ServerDelegate<G, S, R, F>
where
    G: GossipPool,
    S: StateStore,
    R: Raft,
    F: StatsFetcher,
{
    /// Forces a failed server out of the local pool, then the wide-area pool.
    ///
    /// A wide-area failure leaves the local removal in place; the control loop
    /// retries on its next cycle.
    pub(crate) async fn remove_from_pools(&self, server: &Server) -> Result<(), Error> {
        info!(
            "Removing failed server {} ({}) from the local gossip pool",
            server.name, server.id
        );

        self.lan
            .remove_failed_node(&server.name)
            .await
            .map_err(|e| Error::LocalPoolRemoval {
                name: server.name.clone(),
                source: Box::new(e),
            })?;

        let wan_name = wide_area_member_name(&server.name, &self.config.datacenter);

        info!(
            "Removing failed server {} from the wide-area gossip pool",
            wan_name
        );

        self.wan
            .remove_failed_node(&wan_name)
            .await
            .map_err(|e| Error::WideAreaPoolRemoval {
                name: wan_name,
                source: Box::new(e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_area_member_name() {
        assert_eq!(wide_area_member_name("node1", "dc1"), "node1.dc1");
        assert_eq!(wide_area_member_name("web-01", "us-east"), "web-01.us-east");
    }
}
