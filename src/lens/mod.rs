//! # Lens Traversal
//!
//! Declarative traversal of an entity graph in two phases:
//!
//! 1. **Record** — a path-building closure runs against a [`Probe`] and the
//!    hops it chains are captured as a [`Path`]. No data is touched.
//! 2. **Walk** — the [`Path`] is replayed against a real root node. Each hop is
//!    resolved asynchronously; after the first plural edge the frontier is a
//!    de-duplicated sequence.
//!
//! ```rust,no_run
//! use graph_lens::{Graph, Schema, Traverse, props};
//!
//! # async fn example() -> graph_lens::Result<()> {
//! let graph = Graph::open_memory(Schema::library()).await?;
//! let author = graph.create("Author", props([("name", "Ada")])).await?;
//!
//! // Option<Entity>: every hop is singular.
//! let publisher = author.traverse(|a| a.one("publisher")).await?;
//!
//! // Vec<Entity>: the plural `authors` hop turns the result into a sequence.
//! let colleagues = author.traverse(|a| a.one("publisher").many("authors")).await?;
//! # Ok(())
//! # }
//! ```
//!
//! The provider side is the [`GraphNode`] trait. Any type that can name its
//! edges and resolve them asynchronously can be traversed.

pub mod cardinality;
pub mod config;
pub mod recorder;
pub mod walker;

use std::fmt::Debug;
use std::hash::Hash;

use async_trait::async_trait;

use crate::model::{EdgeKind, Path};
use crate::Result;

pub use cardinality::{Cardinality, Many, One};
pub use config::WalkerConfig;
pub use recorder::{record, Probe};
pub use walker::{traverse, walk, Walker};

// ============================================================================
// GraphNode — the provider contract
// ============================================================================

/// A traversable graph vertex.
///
/// Handles are cheap to clone. Identity for de-duplication is [`node_key`]:
/// two handles to the same logical entity must return equal keys no matter
/// which path produced them.
///
/// Resolution must be idempotent. Whether a repeated resolution hits the
/// underlying store again is up to the implementation.
///
/// [`node_key`]: GraphNode::node_key
#[async_trait]
pub trait GraphNode: Clone + Send + Sync + 'static {
    /// Stable identity key.
    type Key: Eq + Hash + Clone + Debug + Send + Sync;

    fn node_key(&self) -> Self::Key;

    /// Kind of the named edge, or `None` if this node declares no such edge.
    fn edge_kind(&self, edge: &str) -> Option<EdgeKind>;

    /// Human-readable name used in error messages.
    fn describe(&self) -> String {
        format!("{:?}", self.node_key())
    }

    /// Resolve a singular edge. `Ok(None)` when the edge is unset.
    async fn resolve_one(&self, edge: &str) -> Result<Option<Self>>;

    /// Resolve a plural edge to all associated nodes.
    async fn resolve_many(&self, edge: &str) -> Result<Vec<Self>>;
}

// ============================================================================
// Frontier
// ============================================================================

/// The nodes reached so far while replaying a path.
#[derive(Debug, Clone, PartialEq)]
pub enum Frontier<N> {
    /// No plural edge crossed yet. `None` once a singular edge came back unset.
    One(Option<N>),
    /// At least one plural edge crossed; de-duplicated, absent entries dropped.
    Many(Vec<N>),
}

impl<N> Frontier<N> {
    pub fn is_many(&self) -> bool {
        matches!(self, Frontier::Many(_))
    }

    /// Number of present nodes.
    pub fn len(&self) -> usize {
        match self {
            Frontier::One(node) => usize::from(node.is_some()),
            Frontier::Many(nodes) => nodes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten into a sequence; an absent single node becomes empty.
    pub fn into_vec(self) -> Vec<N> {
        match self {
            Frontier::One(node) => node.into_iter().collect(),
            Frontier::Many(nodes) => nodes,
        }
    }

    pub fn as_slice(&self) -> &[N] {
        match self {
            Frontier::One(node) => node.as_slice(),
            Frontier::Many(nodes) => nodes,
        }
    }

    pub fn shape(&self) -> &'static str {
        match self {
            Frontier::One(_) => "one",
            Frontier::Many(_) => "many",
        }
    }
}

// ============================================================================
// Traverse — entry point on every node
// ============================================================================

/// `node.traverse(|x| ...)` and `node.walk(&path)` for every [`GraphNode`].
#[async_trait]
pub trait Traverse: GraphNode {
    /// Record the hops chained by `build`, replay them from `self`, and shape
    /// the result by the cardinality the chain declared.
    async fn traverse<C, F>(&self, build: F) -> Result<C::Output<Self>>
    where
        C: Cardinality,
        C::Output<Self>: Send,
        F: FnOnce(Probe<One>) -> Probe<C> + Send;

    /// Replay an already-built path from `self`.
    async fn walk(&self, path: &Path) -> Result<Frontier<Self>>;
}

#[async_trait]
impl<N: GraphNode> Traverse for N {
    async fn traverse<C, F>(&self, build: F) -> Result<C::Output<Self>>
    where
        C: Cardinality,
        C::Output<Self>: Send,
        F: FnOnce(Probe<One>) -> Probe<C> + Send,
    {
        walker::traverse(self, build).await
    }

    async fn walk(&self, path: &Path) -> Result<Frontier<Self>> {
        walker::walk(self, path).await
    }
}
