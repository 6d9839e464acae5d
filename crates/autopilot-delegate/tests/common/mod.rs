//! Shared fixture for delegate integration tests

#![allow(dead_code)]

use std::sync::Arc;

use prometheus::Registry;
use steward_autopilot_delegate::{DelegateConfig, RemovalHook, ServerDelegate, ServerDelegateBuilder};
use steward_autopilot_mock::{MockGossipPool, MockRaft, MockStateStore, MockStatsFetcher};
use steward_gossip::Member;

pub type TestDelegate = ServerDelegate<MockGossipPool, MockStateStore, MockRaft, MockStatsFetcher>;

pub const DATACENTER: &str = "dc1";

/// A delegate wired to mocks, with handles to each mock.
pub struct Fixture {
    pub lan: MockGossipPool,
    pub wan: MockGossipPool,
    pub state_store: MockStateStore,
    pub raft: MockRaft,
    pub stats_fetcher: MockStatsFetcher,
    pub registry: Registry,
    pub delegate: TestDelegate,
}

impl Fixture {
    pub fn new(members: Vec<Member>) -> Self {
        Self::build(members, MockStatsFetcher::new(), None)
    }

    pub fn with_hook(members: Vec<Member>, hook: Arc<dyn RemovalHook>) -> Self {
        Self::build(members, MockStatsFetcher::new(), Some(hook))
    }

    pub fn with_stats_fetcher(members: Vec<Member>, stats_fetcher: MockStatsFetcher) -> Self {
        Self::build(members, stats_fetcher, None)
    }

    fn build(
        members: Vec<Member>,
        stats_fetcher: MockStatsFetcher,
        hook: Option<Arc<dyn RemovalHook>>,
    ) -> Self {
        let lan = MockGossipPool::new(members);
        let wan = MockGossipPool::default();
        let state_store = MockStateStore::new();
        let raft = MockRaft::follower();
        let registry = Registry::new();

        let mut builder = ServerDelegateBuilder::new()
            .config(DelegateConfig::new(DATACENTER))
            .lan(Arc::new(lan.clone()))
            .wan(Arc::new(wan.clone()))
            .state_store(Arc::new(state_store.clone()))
            .raft(Arc::new(raft.clone()))
            .stats_fetcher(Arc::new(stats_fetcher.clone()))
            .metrics_registry(registry.clone());

        if let Some(hook) = hook {
            builder = builder.removal_hook(hook);
        }

        let delegate = builder.build().expect("delegate should build");

        Self {
            lan,
            wan,
            state_store,
            raft,
            stats_fetcher,
            registry,
            delegate,
        }
    }
}
