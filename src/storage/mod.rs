//! # Storage Backend Trait
//!
//! The contract between the lens engine's entity handles and whatever holds
//! the data. Backends store entity nodes and the links between them; the
//! [`Entity`] handle turns a backend into a traversable [`GraphNode`].
//!
//! ## Implementations
//!
//! | Backend | Module | Description |
//! |---------|--------|-------------|
//! | `MemoryBackend` | `memory` | In-memory for testing/embedding |
//!
//! [`GraphNode`]: crate::lens::GraphNode

pub mod memory;
pub mod entity;

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use crate::model::*;
use crate::Result;

pub use memory::MemoryBackend;
pub use entity::Entity;

// ============================================================================
// Backend Configuration
// ============================================================================

/// Configuration for opening a storage backend.
#[derive(Debug, Clone)]
pub enum BackendConfig {
    /// In-memory (no persistence)
    Memory { schema: Schema },
}

// ============================================================================
// Load statistics
// ============================================================================

/// Counters of edge loads served by a backend.
#[derive(Debug, Default)]
pub struct LoadStats {
    pub reference_loads: AtomicU64,
    pub collection_loads: AtomicU64,
}

impl LoadStats {
    pub fn snapshot(&self) -> LoadStatsSnapshot {
        LoadStatsSnapshot {
            reference_loads: self.reference_loads.load(Ordering::Relaxed),
            collection_loads: self.collection_loads.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn record(&self, kind: EdgeKind) {
        let counter = match kind {
            EdgeKind::Singular => &self.reference_loads,
            EdgeKind::Plural => &self.collection_loads,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// A point-in-time snapshot of load counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStatsSnapshot {
    pub reference_loads: u64,
    pub collection_loads: u64,
}

impl LoadStatsSnapshot {
    pub fn total(&self) -> u64 {
        self.reference_loads + self.collection_loads
    }
}

// ============================================================================
// StorageBackend Trait
// ============================================================================

/// The entity storage contract.
///
/// Links are validated against [`schema`](StorageBackend::schema): a link
/// must use an edge declared on the source label and point at a node of the
/// edge's target label. Inverse edges are maintained by the backend.
#[async_trait]
pub trait StorageBackend: Send + Sync + 'static {
    /// Edge declarations this backend enforces.
    fn schema(&self) -> &Schema;

    // ========================================================================
    // Nodes
    // ========================================================================

    /// Create a node with the given label and properties.
    async fn create_node(&self, label: &str, props: PropertyMap) -> Result<NodeId>;

    /// Get a node by ID. Returns None if not found.
    async fn get_node(&self, id: NodeId) -> Result<Option<Node>>;

    /// Set a property on a node (upsert).
    async fn set_property(&self, id: NodeId, key: &str, val: Value) -> Result<()>;

    // ========================================================================
    // Links
    // ========================================================================

    /// Link `src -[edge]-> dst`.
    ///
    /// A singular edge replaces its previous target; a plural edge appends
    /// `dst` unless it is already present.
    async fn link(&self, src: NodeId, edge: &str, dst: NodeId) -> Result<()>;

    /// Remove `src -[edge]-> dst`. Returns true if the link existed.
    async fn unlink(&self, src: NodeId, edge: &str, dst: NodeId) -> Result<bool>;

    // ========================================================================
    // Edge loads
    // ========================================================================

    /// Target of a singular edge, or None if unset.
    async fn load_reference(&self, id: NodeId, edge: &str) -> Result<Option<NodeId>>;

    /// Targets of a plural edge, in link order.
    async fn load_collection(&self, id: NodeId, edge: &str) -> Result<Vec<NodeId>>;

    // ========================================================================
    // Scan / introspection
    // ========================================================================

    /// All nodes, ordered by id.
    async fn all_nodes(&self) -> Result<Vec<Node>>;

    /// All nodes with a given label, ordered by id.
    async fn nodes_by_label(&self, label: &str) -> Result<Vec<Node>>;

    /// All stored links, including inverse entries.
    async fn links(&self) -> Result<Vec<Link>>;

    /// Total number of nodes.
    async fn node_count(&self) -> Result<u64>;

    /// Total number of stored links.
    ///
    /// Default: counts `links()`.
    async fn link_count(&self) -> Result<u64> {
        Ok(self.links().await?.len() as u64)
    }

    /// Edge load counters. Backends that do not count report zeros.
    fn stats(&self) -> LoadStatsSnapshot {
        LoadStatsSnapshot::default()
    }
}
