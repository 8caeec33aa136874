//! # graph-lens — Declarative Traversal over Async Entity Graphs
//!
//! Describe a walk through related entities as a chain of hops, and let the
//! engine replay it against real data:
//!
//! ```rust,no_run
//! use graph_lens::{Graph, Schema, Traverse, props};
//!
//! # async fn example() -> graph_lens::Result<()> {
//! let graph = Graph::open_memory(Schema::library()).await?;
//! let publisher = graph.create("Publisher", props([("name", "Chapman")])).await?;
//! let author = graph.create("Author", props([("name", "Ada")])).await?;
//! graph.link(&author, "publisher", &publisher).await?;
//!
//! // Singular chain → Option<Entity>
//! let found = author.traverse(|a| a.one("publisher")).await?;
//! assert_eq!(found, Some(publisher.clone()));
//!
//! // Crossing a plural edge → Vec<Entity>, de-duplicated
//! let books = publisher.traverse(|p| p.many("authors").many("books")).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Design Principles
//!
//! 1. **Record, then walk**: the path is captured from a probe before any
//!    data is touched; a malformed chain fails before the first load
//! 2. **Trait-first**: `GraphNode` is the contract between the engine and any
//!    entity provider; `StorageBackend` is the contract behind `Entity`
//! 3. **Tagged edges**: every edge declares itself singular or plural
//! 4. **Typed results**: the chain's cardinality decides `Option<N>` vs `Vec<N>`
//!
//! ## Storage Backends
//!
//! | Backend | Description |
//! |---------|-------------|
//! | Memory | In-memory entity store for testing/embedding |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod lens;
pub mod storage;
pub mod export;

use std::sync::Arc;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    Node, NodeId, Value, PropertyMap, props,
    EdgeDef, EdgeKind, Link, Hop, Path, Schema,
};

// ============================================================================
// Re-exports: Lens
// ============================================================================

pub use lens::{
    GraphNode, Traverse, Frontier, Probe, Cardinality, One, Many,
    Walker, WalkerConfig, record, walk, traverse,
};

// ============================================================================
// Re-exports: Storage
// ============================================================================

pub use storage::{
    StorageBackend, BackendConfig, MemoryBackend, Entity, LoadStatsSnapshot,
};

// ============================================================================
// Top-level Graph handle
// ============================================================================

/// The primary entry point. A `Graph` wraps a storage backend and hands out
/// traversable [`Entity`] handles.
pub struct Graph<B: StorageBackend> {
    backend: Arc<B>,
}

impl<B: StorageBackend> Graph<B> {
    /// Create a Graph with the given backend. The backend's schema must validate.
    pub fn with_backend(backend: B) -> Result<Self> {
        backend.schema().validate()?;
        Ok(Self { backend: Arc::new(backend) })
    }

    /// Create an entity and return its handle.
    pub async fn create(&self, label: &str, props: PropertyMap) -> Result<Entity<B>> {
        let id = self.backend.create_node(label, props).await?;
        Ok(Entity::new(id, label, Arc::clone(&self.backend)))
    }

    /// Handle to an existing entity.
    pub async fn entity(&self, id: NodeId) -> Result<Entity<B>> {
        let node = self
            .backend
            .get_node(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Node {id}")))?;
        Ok(Entity::new(id, node.label, Arc::clone(&self.backend)))
    }

    /// All entities with a given label, in creation order.
    pub async fn entities(&self, label: &str) -> Result<Vec<Entity<B>>> {
        let nodes = self.backend.nodes_by_label(label).await?;
        Ok(nodes
            .into_iter()
            .map(|node| Entity::new(node.id, node.label, Arc::clone(&self.backend)))
            .collect())
    }

    /// Link `src -[edge]-> dst`, maintaining the inverse edge if declared.
    pub async fn link(&self, src: &Entity<B>, edge: &str, dst: &Entity<B>) -> Result<()> {
        self.backend.link(src.id(), edge, dst.id()).await
    }

    /// Remove `src -[edge]-> dst`. Returns true if the link existed.
    pub async fn unlink(&self, src: &Entity<B>, edge: &str, dst: &Entity<B>) -> Result<bool> {
        self.backend.unlink(src.id(), edge, dst.id()).await
    }

    /// Access the underlying backend (for advanced use).
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl Graph<MemoryBackend> {
    /// Open a graph from a backend configuration.
    pub async fn open(config: BackendConfig) -> Result<Self> {
        match config {
            BackendConfig::Memory { schema } => Self::open_memory(schema).await,
        }
    }

    /// In-memory graph for testing and embedding.
    pub async fn open_memory(schema: Schema) -> Result<Self> {
        Self::with_backend(MemoryBackend::new(schema))
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The path-building closure did not form a straight chain of hops.
    #[error("Malformed path: {reason}")]
    MalformedPath { reason: String },

    /// A provider failed to resolve an edge.
    #[error("Failed to resolve '{edge}' on {node}: {message}")]
    EdgeResolution { node: String, edge: String, message: String },

    #[error("Unknown edge '{edge}' on {node}")]
    UnknownEdge { node: String, edge: String },

    /// A chain declared singular resolved through a plural edge.
    #[error("Cardinality mismatch: expected {expected}, got {got}")]
    CardinalityMismatch { expected: &'static str, got: &'static str },

    #[error("Path too long: {len} hops (max {max})")]
    PathTooLong { len: usize, max: usize },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
