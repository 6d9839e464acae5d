//! Translation of gossip members into server descriptors

use steward_autopilot::{NodeStatus, Server, ServerExt, ServerId};
use steward_gossip::{MemberStatus, ServerMetadata};

use crate::{AutopilotConfig, CatalogNode};

/// Maps gossip liveness onto the control loop's node status.
///
/// Leaving members count as alive so a graceful shutdown in progress is not
/// mistaken for a dead server.
#[must_use]
pub const fn node_status(status: MemberStatus) -> NodeStatus {
    match status {
        MemberStatus::Left => NodeStatus::Left,
        MemberStatus::Alive | MemberStatus::Leaving => NodeStatus::Alive,
        MemberStatus::Failed => NodeStatus::Failed,
        MemberStatus::None => NodeStatus::Unknown,
    }
}

/// Builds the extension block from a server's tags and the policy's tag names.
#[must_use]
pub fn server_ext(meta: &ServerMetadata, config: &AutopilotConfig) -> ServerExt {
    let redundancy_zone = lookup_tag(meta, &config.redundancy_zone_tag);

    let upgrade_version = if config.upgrade_version_tag.is_empty() {
        Some(meta.build.to_string())
    } else {
        lookup_tag(meta, &config.upgrade_version_tag)
    };

    ServerExt {
        read_replica: meta.non_voter,
        redundancy_zone,
        upgrade_version,
    }
}

/// Assembles a descriptor from decoded metadata and the catalog node, if the
/// server has registered one.
#[must_use]
pub fn server_from_metadata(
    meta: &ServerMetadata,
    node: Option<CatalogNode>,
    config: &AutopilotConfig,
) -> Server {
    Server {
        id: ServerId::new(meta.id.clone()),
        name: meta.short_name.clone(),
        address: meta.addr,
        node_status: node_status(meta.status),
        version: meta.build.to_string(),
        raft_version: meta.raft_version,
        meta: node.map(|node| node.meta).unwrap_or_default(),
        ext: server_ext(meta, config),
    }
}

fn lookup_tag(meta: &ServerMetadata, tag: &str) -> Option<String> {
    if tag.is_empty() {
        return None;
    }

    meta.tag(tag).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use steward_gossip::Member;

    use super::*;

    fn metadata(status: MemberStatus) -> ServerMetadata {
        let member = Member::new("node1", "10.0.0.1".parse().unwrap(), 8301, status)
            .with_tag("role", "server")
            .with_tag("dc", "dc1")
            .with_tag("id", "server-1")
            .with_tag("build", "1.9.2")
            .with_tag("port", "8300")
            .with_tag("raft_vsn", "3")
            .with_tag("zone", "us-east-1a")
            .with_tag("upgrade", "2.0.0");

        ServerMetadata::from_member(&member).unwrap()
    }

    #[test]
    fn test_node_status_mapping() {
        assert_eq!(node_status(MemberStatus::Left), NodeStatus::Left);
        assert_eq!(node_status(MemberStatus::Alive), NodeStatus::Alive);
        assert_eq!(node_status(MemberStatus::Leaving), NodeStatus::Alive);
        assert_eq!(node_status(MemberStatus::Failed), NodeStatus::Failed);
        assert_eq!(node_status(MemberStatus::None), NodeStatus::Unknown);
    }

    #[test]
    fn test_server_fields_copied() {
        let server = server_from_metadata(
            &metadata(MemberStatus::Leaving),
            None,
            &AutopilotConfig::default(),
        );

        assert_eq!(server.id, ServerId::from("server-1"));
        assert_eq!(server.name, "node1");
        assert_eq!(server.address, "10.0.0.1:8300".parse().unwrap());
        assert_eq!(server.node_status, NodeStatus::Alive);
        assert_eq!(server.version, "1.9.2");
        assert_eq!(server.raft_version, 3);
        assert!(server.meta.is_empty());
    }

    #[test]
    fn test_catalog_meta_attached() {
        let node = CatalogNode {
            id: "server-1".to_string(),
            meta: HashMap::from([("rack".to_string(), "r1".to_string())]),
        };

        let server = server_from_metadata(
            &metadata(MemberStatus::Alive),
            Some(node),
            &AutopilotConfig::default(),
        );

        assert_eq!(server.meta.get("rack").map(String::as_str), Some("r1"));
    }

    #[test]
    fn test_ext_without_tag_names() {
        let ext = server_ext(&metadata(MemberStatus::Alive), &AutopilotConfig::default());

        assert!(!ext.read_replica);
        assert_eq!(ext.redundancy_zone, None);
        assert_eq!(ext.upgrade_version.as_deref(), Some("1.9.2"));
    }

    #[test]
    fn test_ext_with_tag_names() {
        let config = AutopilotConfig {
            redundancy_zone_tag: "zone".to_string(),
            upgrade_version_tag: "upgrade".to_string(),
            ..AutopilotConfig::default()
        };

        let ext = server_ext(&metadata(MemberStatus::Alive), &config);
        assert_eq!(ext.redundancy_zone.as_deref(), Some("us-east-1a"));
        assert_eq!(ext.upgrade_version.as_deref(), Some("2.0.0"));

        let config = AutopilotConfig {
            upgrade_version_tag: "missing".to_string(),
            ..AutopilotConfig::default()
        };
        assert_eq!(server_ext(&metadata(MemberStatus::Alive), &config).upgrade_version, None);
    }
}
