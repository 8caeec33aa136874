//! Edge declarations and stored links.

use std::fmt;

use serde::{Deserialize, Serialize};
use super::NodeId;

/// Whether an edge leads to at most one node or to many.
///
/// Every edge declares its kind up front; the walker dispatches on this tag
/// and never inspects resolved values to guess the shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    Singular,
    Plural,
}

impl EdgeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeKind::Singular => "singular",
            EdgeKind::Plural => "plural",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declaration of one named edge on an entity label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDef {
    pub name: String,
    pub kind: EdgeKind,
    /// Label of the nodes this edge points to.
    pub target: String,
    /// Edge on the target label that mirrors this one, kept in sync on link/unlink.
    pub inverse: Option<String>,
}

impl EdgeDef {
    pub fn singular(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EdgeKind::Singular,
            target: target.into(),
            inverse: None,
        }
    }

    pub fn plural(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EdgeKind::Plural,
            target: target.into(),
            inverse: None,
        }
    }

    pub fn with_inverse(mut self, inverse: impl Into<String>) -> Self {
        self.inverse = Some(inverse.into());
        self
    }
}

/// A stored, directed link `src -[edge]-> dst`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Link {
    pub src: NodeId,
    pub edge: String,
    pub dst: NodeId,
}

impl Link {
    pub fn new(src: NodeId, edge: impl Into<String>, dst: NodeId) -> Self {
        Self { src, edge: edge.into(), dst }
    }
}
