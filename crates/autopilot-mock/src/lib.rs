//! In-memory collaborators for the autopilot delegate, for tests and local
//! development.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use error::Error;

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use steward_autopilot::{
    Raft, RaftServer, RaftState, Server, ServerId, ServerStats, StatsFetcher, Suffrage,
};
use steward_autopilot_delegate::{
    AutopilotConfig, BoxError, CatalogNode, RemovalHook, StateStore,
};
use steward_gossip::{GossipPool, Member, MemberStatus};
use tokio_util::sync::CancellationToken;

/// Build version advertised by mock servers.
pub const MOCK_BUILD: &str = "1.9.0";

/// Creates a member advertising the server role.
#[must_use]
pub fn server_member(name: &str, id: &str, datacenter: &str, status: MemberStatus) -> Member {
    Member::new(name, mock_addr(name), 8301, status)
        .with_tag("role", "server")
        .with_tag("dc", datacenter)
        .with_tag("id", id)
        .with_tag("build", format!("{MOCK_BUILD}:deadbeef"))
        .with_tag("port", "8300")
        .with_tag("vsn", "2")
        .with_tag("raft_vsn", "3")
}

/// Creates a plain client member.
#[must_use]
pub fn client_member(name: &str, status: MemberStatus) -> Member {
    Member::new(name, mock_addr(name), 8301, status).with_tag("role", "node")
}

/// Address in 10.0.0.0/8 derived from a hash of the member name.
fn mock_addr(name: &str) -> IpAddr {
    let mut hasher = DefaultHasher::new();
    name.hash(&mut hasher);
    let [_, b, c, d, ..] = hasher.finish().to_be_bytes();
    IpAddr::V4(Ipv4Addr::new(10, b, c, d))
}

/// Mock gossip pool.
///
/// Removing a member marks it `Left`, the same as a real pool does after a
/// forced leave.
#[derive(Clone, Debug, Default)]
pub struct MockGossipPool {
    members: Arc<Mutex<Vec<Member>>>,
    removal_attempts: Arc<Mutex<Vec<String>>>,
    failing_removals: Arc<Mutex<HashSet<String>>>,
}

impl MockGossipPool {
    /// Create a pool with the given members.
    #[must_use]
    pub fn new(members: Vec<Member>) -> Self {
        Self {
            members: Arc::new(Mutex::new(members)),
            ..Self::default()
        }
    }

    /// Add a member to the pool.
    pub fn add_member(&self, member: Member) {
        self.members.lock().push(member);
    }

    /// Make removals of `name` fail.
    pub fn fail_removal_of(&self, name: impl Into<String>) {
        self.failing_removals.lock().insert(name.into());
    }

    /// Names passed to `remove_failed_node`, in call order.
    #[must_use]
    pub fn removal_attempts(&self) -> Vec<String> {
        self.removal_attempts.lock().clone()
    }

    /// Current status of a member, if present.
    #[must_use]
    pub fn status_of(&self, name: &str) -> Option<MemberStatus> {
        self.members
            .lock()
            .iter()
            .find(|member| member.name == name)
            .map(|member| member.status)
    }
}

#[async_trait]
impl GossipPool for MockGossipPool {
    type Error = Error;

    async fn members(&self) -> Vec<Member> {
        self.members.lock().clone()
    }

    async fn remove_failed_node(&self, name: &str) -> Result<(), Self::Error> {
        self.removal_attempts.lock().push(name.to_string());

        if self.failing_removals.lock().contains(name) {
            return Err(Error(format!("removal of {name} rejected")));
        }

        for member in self.members.lock().iter_mut() {
            if member.name == name {
                member.status = MemberStatus::Left;
            }
        }

        Ok(())
    }
}

/// Mock durable state store.
#[derive(Clone, Debug, Default)]
pub struct MockStateStore {
    nodes: Arc<Mutex<HashMap<ServerId, CatalogNode>>>,
    failing_lookups: Arc<Mutex<HashSet<ServerId>>>,
    autopilot_config: Arc<Mutex<Option<AutopilotConfig>>>,
    fail_config_reads: Arc<Mutex<bool>>,
}

impl MockStateStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a catalog node with the given metadata.
    pub fn register_node(&self, id: &str, meta: HashMap<String, String>) {
        let node = CatalogNode {
            id: id.to_string(),
            meta,
        };

        self.nodes.lock().insert(ServerId::from(id), node);
    }

    /// Make lookups of `id` fail.
    pub fn fail_lookup_of(&self, id: &str) {
        self.failing_lookups.lock().insert(ServerId::from(id));
    }

    /// Store an operator policy.
    pub fn set_autopilot_config(&self, config: AutopilotConfig) {
        *self.autopilot_config.lock() = Some(config);
    }

    /// Make policy reads fail.
    pub fn fail_config_reads(&self) {
        *self.fail_config_reads.lock() = true;
    }
}

#[async_trait]
impl StateStore for MockStateStore {
    type Error = Error;

    async fn node_by_id(&self, id: &ServerId) -> Result<Option<CatalogNode>, Self::Error> {
        if self.failing_lookups.lock().contains(id) {
            return Err(Error(format!("lookup of {id} failed")));
        }

        Ok(self.nodes.lock().get(id).cloned())
    }

    async fn autopilot_config(&self) -> Result<Option<AutopilotConfig>, Self::Error> {
        if *self.fail_config_reads.lock() {
            return Err(Error("autopilot config unreadable".to_string()));
        }

        Ok(self.autopilot_config.lock().clone())
    }
}

/// Mock consensus instance.
#[derive(Clone, Debug)]
pub struct MockRaft {
    state: Arc<Mutex<RaftState>>,
    servers: Arc<Mutex<Vec<RaftServer>>>,
}

impl MockRaft {
    /// Create an instance in the given role with an empty configuration.
    #[must_use]
    pub fn new(state: RaftState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            servers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create an elected leader.
    #[must_use]
    pub fn leader() -> Self {
        Self::new(RaftState::Leader)
    }

    /// Create a follower.
    #[must_use]
    pub fn follower() -> Self {
        Self::new(RaftState::Follower)
    }

    /// Change role.
    pub fn set_state(&self, state: RaftState) {
        *self.state.lock() = state;
    }

    /// Add a server to the configuration.
    pub fn add_server(&self, server: &Server, suffrage: Suffrage) {
        self.servers.lock().push(RaftServer {
            id: server.id.clone(),
            address: server.address,
            suffrage,
        });
    }
}

#[async_trait]
impl Raft for MockRaft {
    type Error = Error;

    async fn state(&self) -> RaftState {
        *self.state.lock()
    }

    async fn configuration(&self) -> Result<Vec<RaftServer>, Self::Error> {
        Ok(self.servers.lock().clone())
    }
}

/// Mock stats fetcher.
///
/// Servers without canned stats are treated as unresponsive and left out.
#[derive(Clone, Debug, Default)]
pub struct MockStatsFetcher {
    stats: Arc<Mutex<HashMap<ServerId, ServerStats>>>,
    delay: Option<Duration>,
}

impl MockStatsFetcher {
    /// Create a fetcher with no canned stats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every fetch, to exercise cancellation.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the stats a server responds with.
    pub fn set_stats(&self, id: &str, stats: ServerStats) {
        self.stats.lock().insert(ServerId::from(id), stats);
    }
}

#[async_trait]
impl StatsFetcher for MockStatsFetcher {
    async fn fetch(
        &self,
        cancel: &CancellationToken,
        servers: &HashMap<ServerId, Server>,
    ) -> HashMap<ServerId, ServerStats> {
        if let Some(delay) = self.delay {
            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                () = cancel.cancelled() => return HashMap::new(),
            }
        }

        if cancel.is_cancelled() {
            return HashMap::new();
        }

        let stats = self.stats.lock();
        servers
            .keys()
            .filter_map(|id| stats.get(id).map(|s| (id.clone(), s.clone())))
            .collect()
    }
}

/// Removal hook that records the servers it was called with.
#[derive(Clone, Debug, Default)]
pub struct RecordingRemovalHook {
    removed: Arc<Mutex<Vec<ServerId>>>,
    failure: Option<String>,
}

impl RecordingRemovalHook {
    /// Create a hook that succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hook that fails with `message` after recording the call.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            removed: Arc::default(),
            failure: Some(message.into()),
        }
    }

    /// Servers the hook was called with.
    #[must_use]
    pub fn removed(&self) -> Vec<ServerId> {
        self.removed.lock().clone()
    }
}

#[async_trait]
impl RemovalHook for RecordingRemovalHook {
    async fn remove_failed_server(&self, server: &Server) -> Result<(), BoxError> {
        self.removed.lock().push(server.id.clone());

        match &self.failure {
            Some(message) => Err(Box::new(Error(message.clone()))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_removal_marks_member_left() {
        let pool = MockGossipPool::new(vec![server_member(
            "node1",
            "id-1",
            "dc1",
            MemberStatus::Failed,
        )]);

        pool.remove_failed_node("node1").await.unwrap();
        pool.remove_failed_node("absent").await.unwrap();

        assert_eq!(pool.status_of("node1"), Some(MemberStatus::Left));
        assert_eq!(pool.removal_attempts(), vec!["node1", "absent"]);
    }

    #[test]
    fn test_member_addresses_differ_by_name() {
        let node1 = server_member("node1", "id-1", "dc1", MemberStatus::Alive);
        let node2 = server_member("node2", "id-2", "dc1", MemberStatus::Alive);
        let again = client_member("node1", MemberStatus::Alive);

        assert_ne!(node1.addr, node2.addr);
        assert_eq!(node1.addr, again.addr);
    }

    #[tokio::test]
    async fn test_failing_removal() {
        let pool = MockGossipPool::default();
        pool.fail_removal_of("node1");

        assert!(pool.remove_failed_node("node1").await.is_err());
        assert_eq!(pool.removal_attempts(), vec!["node1"]);
    }

    #[tokio::test]
    async fn test_state_store_lookups() {
        let store = MockStateStore::new();
        store.register_node("id-1", HashMap::new());
        store.fail_lookup_of("id-2");

        assert!(store.node_by_id(&ServerId::from("id-1")).await.unwrap().is_some());
        assert!(store.node_by_id(&ServerId::from("id-3")).await.unwrap().is_none());
        assert!(store.node_by_id(&ServerId::from("id-2")).await.is_err());
    }

    #[tokio::test]
    async fn test_cancelled_fetch_returns_nothing() {
        let fetcher = MockStatsFetcher::new().with_delay(Duration::from_secs(60));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let stats = fetcher.fetch(&cancel, &HashMap::new()).await;
        assert!(stats.is_empty());
    }
}
