//! Mock `GraphNode` for integration tests.
//!
//! Nodes are `Arc`s; identity is the pointer, so two handles are the same
//! node only if they share an allocation. Every resolution yields once so a
//! fan-out batch is genuinely interleaved, and the shared `Stats` records how
//! many resolutions were in flight at the same time.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use graph_lens::{EdgeKind, Error, GraphNode, Result};

#[derive(Debug, Default)]
pub struct Stats {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    resolutions: AtomicUsize,
}

impl Stats {
    fn enter(&self) {
        self.resolutions.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Clone)]
enum MockEdge {
    One(Option<MockNode>),
    Many(Vec<MockNode>),
    Fail(EdgeKind, String),
}

struct Inner {
    name: String,
    edges: RwLock<HashMap<String, MockEdge>>,
    stats: Arc<Stats>,
}

#[derive(Clone)]
pub struct MockNode(Arc<Inner>);

impl std::fmt::Debug for MockNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.name)
    }
}

/// Factory sharing one `Stats` across all nodes it creates.
#[derive(Default)]
pub struct MockGraph {
    stats: Arc<Stats>,
}

impl MockGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, name: &str) -> MockNode {
        MockNode(Arc::new(Inner {
            name: name.to_string(),
            edges: RwLock::new(HashMap::new()),
            stats: Arc::clone(&self.stats),
        }))
    }

    pub fn peak_in_flight(&self) -> usize {
        self.stats.peak.load(Ordering::SeqCst)
    }

    pub fn resolutions(&self) -> usize {
        self.stats.resolutions.load(Ordering::SeqCst)
    }
}

impl MockNode {
    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn set_one(&self, edge: &str, target: Option<&MockNode>) -> &Self {
        self.0.edges.write().insert(edge.into(), MockEdge::One(target.cloned()));
        self
    }

    pub fn set_many(&self, edge: &str, targets: &[&MockNode]) -> &Self {
        let targets = targets.iter().map(|&t| t.clone()).collect();
        self.0.edges.write().insert(edge.into(), MockEdge::Many(targets));
        self
    }

    pub fn fail(&self, edge: &str, kind: EdgeKind, message: &str) -> &Self {
        self.0.edges.write().insert(edge.into(), MockEdge::Fail(kind, message.into()));
        self
    }

    fn lookup(&self, edge: &str) -> Option<MockEdge> {
        self.0.edges.read().get(edge).cloned()
    }

    fn failure(&self, edge: &str, message: String) -> Error {
        Error::EdgeResolution {
            node: self.0.name.clone(),
            edge: edge.to_string(),
            message,
        }
    }
}

#[async_trait]
impl GraphNode for MockNode {
    type Key = usize;

    fn node_key(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    fn edge_kind(&self, edge: &str) -> Option<EdgeKind> {
        match self.lookup(edge)? {
            MockEdge::One(_) => Some(EdgeKind::Singular),
            MockEdge::Many(_) => Some(EdgeKind::Plural),
            MockEdge::Fail(kind, _) => Some(kind),
        }
    }

    fn describe(&self) -> String {
        self.0.name.clone()
    }

    async fn resolve_one(&self, edge: &str) -> Result<Option<Self>> {
        self.0.stats.enter();
        tokio::task::yield_now().await;
        let result = match self.lookup(edge) {
            Some(MockEdge::One(target)) => Ok(target),
            Some(MockEdge::Fail(_, message)) => Err(self.failure(edge, message)),
            _ => Err(self.failure(edge, "not a singular edge".into())),
        };
        self.0.stats.exit();
        result
    }

    async fn resolve_many(&self, edge: &str) -> Result<Vec<Self>> {
        self.0.stats.enter();
        tokio::task::yield_now().await;
        let result = match self.lookup(edge) {
            Some(MockEdge::Many(targets)) => Ok(targets),
            Some(MockEdge::Fail(_, message)) => Err(self.failure(edge, message)),
            _ => Err(self.failure(edge, "not a plural edge".into())),
        };
        self.0.stats.exit();
        result
    }
}

/// Node names of a result, in order.
pub fn names(nodes: &[MockNode]) -> Vec<&str> {
    nodes.iter().map(MockNode::name).collect()
}
