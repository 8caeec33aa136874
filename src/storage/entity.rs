//! Entity handle — a node of a storage backend, traversable as a [`GraphNode`].

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::lens::GraphNode;
use crate::model::{EdgeKind, Node, NodeId, Value};
use crate::{Error, Result};
use super::StorageBackend;

/// Handle to one stored entity.
///
/// Cloning is cheap. Two handles are the same entity iff they share a backend
/// and their ids are equal, whichever traversal produced them. The traversal
/// key is the bare [`NodeId`], which is only unique within one backend.
pub struct Entity<B: StorageBackend> {
    id: NodeId,
    label: Arc<str>,
    backend: Arc<B>,
}

impl<B: StorageBackend> Clone for Entity<B> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            label: Arc::clone(&self.label),
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: StorageBackend> fmt::Debug for Entity<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.label, self.id)
    }
}

impl<B: StorageBackend> PartialEq for Entity<B> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Arc::ptr_eq(&self.backend, &other.backend)
    }
}

impl<B: StorageBackend> Eq for Entity<B> {}

impl<B: StorageBackend> Entity<B> {
    pub(crate) fn new(id: NodeId, label: impl Into<Arc<str>>, backend: Arc<B>) -> Self {
        Self { id, label: label.into(), backend }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Load the stored node (label and properties).
    pub async fn node(&self) -> Result<Node> {
        self.backend
            .get_node(self.id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Node {}", self.id)))
    }

    /// Load a single property; `Value::Null` if unset.
    pub async fn get(&self, key: &str) -> Result<Value> {
        Ok(self.node().await?.get(key).cloned().unwrap_or(Value::Null))
    }

    /// Set a property on the stored node (upsert).
    pub async fn set(&self, key: &str, val: impl Into<Value>) -> Result<()> {
        self.backend.set_property(self.id, key, val.into()).await
    }

    fn related(&self, edge: &str, id: NodeId) -> Result<Self> {
        let target = self
            .backend
            .schema()
            .edge(&self.label, edge)
            .map(|def| def.target.as_str())
            .ok_or_else(|| self.resolution_error(edge, "edge not declared"))?;
        Ok(Self::new(id, target, Arc::clone(&self.backend)))
    }

    fn resolution_error(&self, edge: &str, message: impl fmt::Display) -> Error {
        Error::EdgeResolution {
            node: self.describe(),
            edge: edge.to_string(),
            message: message.to_string(),
        }
    }

    /// Wrap a backend failure so the walker reports which edge failed.
    fn wrap(&self, edge: &str, err: Error) -> Error {
        match err {
            err @ Error::EdgeResolution { .. } => err,
            other => self.resolution_error(edge, other),
        }
    }
}

#[async_trait]
impl<B: StorageBackend> GraphNode for Entity<B> {
    type Key = NodeId;

    fn node_key(&self) -> NodeId {
        self.id
    }

    fn edge_kind(&self, edge: &str) -> Option<EdgeKind> {
        self.backend.schema().edge_kind(&self.label, edge)
    }

    fn describe(&self) -> String {
        format!("{}#{}", self.label, self.id)
    }

    async fn resolve_one(&self, edge: &str) -> Result<Option<Self>> {
        let target = self
            .backend
            .load_reference(self.id, edge)
            .await
            .map_err(|err| self.wrap(edge, err))?;
        target.map(|id| self.related(edge, id)).transpose()
    }

    async fn resolve_many(&self, edge: &str) -> Result<Vec<Self>> {
        let targets = self
            .backend
            .load_collection(self.id, edge)
            .await
            .map_err(|err| self.wrap(edge, err))?;
        targets.into_iter().map(|id| self.related(edge, id)).collect()
    }
}
