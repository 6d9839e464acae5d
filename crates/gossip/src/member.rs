//! Membership records reported by a gossip pool

use std::collections::HashMap;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// Liveness of a member as reported by the gossip protocol.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum MemberStatus {
    /// No status has been observed yet.
    #[default]
    None,

    /// The member is responding to probes.
    Alive,

    /// The member announced a graceful departure that has not completed.
    Leaving,

    /// The member departed gracefully.
    Left,

    /// The member stopped responding to probes.
    Failed,
}

/// One entry from a gossip pool's member list.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Name of the member, unique within its pool.
    pub name: String,

    /// Address the member gossips on.
    pub addr: IpAddr,

    /// Gossip port.
    pub port: u16,

    /// Metadata the member advertises about itself.
    pub tags: HashMap<String, String>,

    /// Last observed liveness.
    pub status: MemberStatus,
}

impl Member {
    /// Create a new member with no tags.
    #[must_use]
    pub fn new(name: impl Into<String>, addr: IpAddr, port: u16, status: MemberStatus) -> Self {
        Self {
            name: name.into(),
            addr,
            port,
            tags: HashMap::new(),
            status,
        }
    }

    /// Adds a tag, replacing any previous value.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Looks up a tag by key.
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags() {
        let member = Member::new(
            "node1",
            "10.0.0.1".parse().unwrap(),
            8301,
            MemberStatus::Alive,
        )
        .with_tag("role", "server")
        .with_tag("role", "node");

        assert_eq!(member.tag("role"), Some("node"));
        assert_eq!(member.tag("dc"), None);
    }
}
