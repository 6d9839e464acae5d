//! Server classification from member tags
//!
//! Servers advertise their role and build through gossip tags. Members without
//! the server role are clients; members claiming it with malformed tags are
//! reported as errors rather than quietly demoted.

use std::collections::HashMap;
use std::net::SocketAddr;

use semver::Version;
use thiserror::Error;

use crate::{Member, MemberStatus};

/// Tag holding the member's role.
pub const ROLE_TAG: &str = "role";

/// Role value advertised by servers.
pub const SERVER_ROLE: &str = "server";

const DATACENTER_TAG: &str = "dc";
const ID_TAG: &str = "id";
const BUILD_TAG: &str = "build";
const RAFT_VERSION_TAG: &str = "raft_vsn";
const PORT_TAG: &str = "port";
const NON_VOTER_TAG: &str = "nonvoter";
const READ_REPLICA_TAG: &str = "read_replica";

/// Why a member's tags do not describe a server.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TagError {
    /// The member does not advertise the server role.
    #[error("member is not a server")]
    NotServer,

    /// A required tag is absent.
    #[error("missing tag '{0}'")]
    Missing(&'static str),

    /// A tag is present but cannot be parsed.
    #[error("invalid value '{value}' for tag '{tag}'")]
    Invalid {
        /// Tag key
        tag: &'static str,
        /// Offending value
        value: String,
    },
}

/// Server details decoded from a member's tags.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerMetadata {
    /// Full member name.
    pub name: String,

    /// Member name with any `.<datacenter>` suffix removed.
    pub short_name: String,

    /// Stable server identity.
    pub id: String,

    /// Datacenter (region) the server belongs to.
    pub datacenter: String,

    /// RPC address: the gossip address with the advertised server port.
    pub addr: SocketAddr,

    /// Build version of the server binary.
    pub build: Version,

    /// Consensus protocol version.
    pub raft_version: u32,

    /// The server replicates but does not vote.
    pub non_voter: bool,

    /// Liveness of the underlying member.
    pub status: MemberStatus,

    /// All tags, for deployment-specific lookups.
    pub tags: HashMap<String, String>,
}

impl ServerMetadata {
    /// Decodes server metadata from a member.
    ///
    /// # Errors
    ///
    /// Returns `TagError::NotServer` for members without the server role and a
    /// descriptive error for servers with missing or malformed tags.
    pub fn from_member(member: &Member) -> Result<Self, TagError> {
        if member.tag(ROLE_TAG) != Some(SERVER_ROLE) {
            return Err(TagError::NotServer);
        }

        let datacenter = required(member, DATACENTER_TAG)?.to_string();
        let id = required(member, ID_TAG)?.to_string();

        let build_tag = required(member, BUILD_TAG)?;
        // builds may carry a revision: "1.2.3:abcdef"
        let build_str = build_tag.split(':').next().unwrap_or(build_tag);
        let build = Version::parse(build_str).map_err(|_| TagError::Invalid {
            tag: BUILD_TAG,
            value: build_tag.to_string(),
        })?;

        let port: u16 = parse(member, PORT_TAG)?.ok_or(TagError::Missing(PORT_TAG))?;
        let raft_version = parse(member, RAFT_VERSION_TAG)?.unwrap_or(1);

        let non_voter =
            member.tag(NON_VOTER_TAG) == Some("1") || member.tag(READ_REPLICA_TAG) == Some("1");

        let suffix = format!(".{datacenter}");
        let short_name = member
            .name
            .strip_suffix(&suffix)
            .unwrap_or(&member.name)
            .to_string();

        Ok(Self {
            name: member.name.clone(),
            short_name,
            id,
            datacenter,
            addr: SocketAddr::new(member.addr, port),
            build,
            raft_version,
            non_voter,
            status: member.status,
            tags: member.tags.clone(),
        })
    }

    /// Looks up an arbitrary tag by key.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}

fn required<'a>(member: &'a Member, tag: &'static str) -> Result<&'a str, TagError> {
    member.tag(tag).ok_or(TagError::Missing(tag))
}

fn parse<T: std::str::FromStr>(member: &Member, tag: &'static str) -> Result<Option<T>, TagError> {
    member
        .tag(tag)
        .map(|value| {
            value.parse().map_err(|_| TagError::Invalid {
                tag,
                value: value.to_string(),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use maplit::hashmap;

    use super::*;

    fn server_tags() -> HashMap<String, String> {
        hashmap! {
            "role".to_string() => "server".to_string(),
            "dc".to_string() => "dc1".to_string(),
            "id".to_string() => "7c0bd4ad-65ac-4d5c-9e41-0a1f1a7a1a01".to_string(),
            "build".to_string() => "1.9.0:a1b2c3d".to_string(),
            "port".to_string() => "8300".to_string(),
            "raft_vsn".to_string() => "3".to_string(),
        }
    }

    fn member(name: &str, tags: HashMap<String, String>) -> Member {
        Member {
            name: name.to_string(),
            addr: "10.0.0.1".parse().unwrap(),
            port: 8301,
            tags,
            status: MemberStatus::Alive,
        }
    }

    #[test]
    fn test_server_metadata_parsed() {
        let meta = ServerMetadata::from_member(&member("node1.dc1", server_tags())).unwrap();

        assert_eq!(meta.name, "node1.dc1");
        assert_eq!(meta.short_name, "node1");
        assert_eq!(meta.datacenter, "dc1");
        assert_eq!(meta.id, "7c0bd4ad-65ac-4d5c-9e41-0a1f1a7a1a01");
        assert_eq!(meta.addr, "10.0.0.1:8300".parse().unwrap());
        assert_eq!(meta.build, Version::new(1, 9, 0));
        assert_eq!(meta.raft_version, 3);
        assert!(!meta.non_voter);
    }

    #[test]
    fn test_short_name_without_suffix() {
        let meta = ServerMetadata::from_member(&member("node1", server_tags())).unwrap();
        assert_eq!(meta.short_name, "node1");
    }

    #[test]
    fn test_client_is_not_server() {
        let mut tags = server_tags();
        tags.insert("role".to_string(), "node".to_string());

        assert_matches!(
            ServerMetadata::from_member(&member("client1", tags)),
            Err(TagError::NotServer)
        );
    }

    #[test]
    fn test_non_voter_flags() {
        let mut tags = server_tags();
        tags.insert("nonvoter".to_string(), "1".to_string());
        assert!(ServerMetadata::from_member(&member("node1", tags)).unwrap().non_voter);

        let mut tags = server_tags();
        tags.insert("read_replica".to_string(), "1".to_string());
        assert!(ServerMetadata::from_member(&member("node1", tags)).unwrap().non_voter);
    }

    #[test]
    fn test_malformed_server_tags() {
        let mut tags = server_tags();
        tags.remove("port");
        assert_matches!(
            ServerMetadata::from_member(&member("node1", tags)),
            Err(TagError::Missing("port"))
        );

        let mut tags = server_tags();
        tags.insert("build".to_string(), "not-a-version".to_string());
        assert_matches!(
            ServerMetadata::from_member(&member("node1", tags)),
            Err(TagError::Invalid { tag: "build", .. })
        );
    }

    #[test]
    fn test_unread_tags_do_not_reject_server() {
        let mut tags = server_tags();
        tags.insert("expect".to_string(), "three".to_string());
        tags.insert("vsn".to_string(), "2.x".to_string());
        tags.insert("bootstrap".to_string(), "maybe".to_string());

        assert!(ServerMetadata::from_member(&member("node1", tags)).is_ok());
    }
}
