//! Assembly of the known-servers view

use std::collections::HashMap;

use steward_autopilot::{Raft, Server, ServerId, StatsFetcher};
use steward_gossip::{GossipPool, Member, ServerMetadata, TagError};
use tracing::{debug, warn};

use crate::view::server_from_metadata;
use crate::{AutopilotConfig, Error, ServerDelegate, StateStore};

impl<G, S, R, F> ServerDelegate<G, S, R, F>
where
    G: GossipPool,
    S: StateStore,
    R: Raft,
    F: StatsFetcher,
{
    /// Builds the descriptor for every server in the local gossip pool.
    ///
    /// Members that fail to build are logged and left out; clients are
    /// skipped silently.
    pub async fn autopilot_servers(&self) -> HashMap<ServerId, Server> {
        let config = match self.current_autopilot_config().await {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to read autopilot config, using configured defaults: {}",
                    e
                );
                self.config.autopilot.clone()
            }
        };

        let mut servers = HashMap::new();

        for member in self.lan.members().await {
            match self.autopilot_server(&member, &config).await {
                Ok(Some(server)) => {
                    servers.insert(server.id.clone(), server);
                }
                // this member was a client
                Ok(None) => {}
                Err(e) => {
                    warn!("Error parsing server info for member {}: {}", member.name, e);
                }
            }
        }

        debug!("Built {} autopilot servers", servers.len());

        servers
    }

    /// Builds the descriptor for a single member.
    ///
    /// Returns `Ok(None)` if the member is not a server.
    ///
    /// # Errors
    ///
    /// Returns `Error::ServerTags` if the member claims the server role with
    /// malformed tags, and `Error::StateLookup` if the catalog node cannot be
    /// read.
    pub async fn autopilot_server(
        &self,
        member: &Member,
        config: &AutopilotConfig,
    ) -> Result<Option<Server>, Error> {
        let meta = match ServerMetadata::from_member(member) {
            Ok(meta) => meta,
            Err(TagError::NotServer) => return Ok(None),
            Err(source) => {
                return Err(Error::ServerTags {
                    name: member.name.clone(),
                    source,
                });
            }
        };

        self.autopilot_server_from_metadata(&meta, config)
            .await
            .map(Some)
    }

    /// Builds a descriptor from decoded server metadata, attaching node meta
    /// from the catalog.
    ///
    /// A server that has not registered itself in the catalog yet (it just
    /// joined, or cannot write to the catalog) gets empty node meta.
    ///
    /// # Errors
    ///
    /// Returns `Error::StateLookup` if the catalog node cannot be read.
    pub async fn autopilot_server_from_metadata(
        &self,
        meta: &ServerMetadata,
        config: &AutopilotConfig,
    ) -> Result<Server, Error> {
        let server_id = ServerId::new(meta.id.clone());

        let node = self
            .state_store
            .node_by_id(&server_id)
            .await
            .map_err(|e| Error::StateLookup {
                server_id,
                source: Box::new(e),
            })?;

        Ok(server_from_metadata(meta, node, config))
    }
}
