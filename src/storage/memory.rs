//! In-memory storage backend.
//!
//! This is the reference implementation of `StorageBackend`.
//! It uses simple HashMaps protected by RwLock.
//!
//! ## Limitations
//!
//! - **No persistence**: everything lives for the lifetime of the backend.
//! - **No transactions**: writes are applied immediately.
//! - **No identity cache**: every edge load reads the adjacency map again.
//!   Loads are cheap and idempotent, so repeated resolution is harmless.
//!
//! Use this backend for:
//! - Testing lens traversals end to end
//! - Embedding small entity graphs that don't need persistence

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use parking_lot::RwLock;
use async_trait::async_trait;
use tracing::debug;

use crate::model::*;
use crate::{Error, Result};
use super::{LoadStats, LoadStatsSnapshot, StorageBackend};

/// node_id → edge name → targets (at most one for singular edges)
type Adjacency = HashMap<NodeId, HashMap<String, Vec<NodeId>>>;

// ============================================================================
// MemoryBackend
// ============================================================================

/// In-memory entity storage.
#[derive(Clone)]
pub struct MemoryBackend {
    inner: Arc<MemoryInner>,
}

struct MemoryInner {
    schema: Schema,
    nodes: RwLock<HashMap<NodeId, Node>>,
    adjacency: RwLock<Adjacency>,
    /// label → node IDs in creation order
    label_index: RwLock<HashMap<String, Vec<NodeId>>>,
    next_node_id: AtomicU64,
    stats: LoadStats,
}

impl MemoryBackend {
    pub fn new(schema: Schema) -> Self {
        Self {
            inner: Arc::new(MemoryInner {
                schema,
                nodes: RwLock::new(HashMap::new()),
                adjacency: RwLock::new(HashMap::new()),
                label_index: RwLock::new(HashMap::new()),
                next_node_id: AtomicU64::new(1),
                stats: LoadStats::default(),
            }),
        }
    }

    fn label_of(&self, id: NodeId, role: &str) -> Result<String> {
        self.inner
            .nodes
            .read()
            .get(&id)
            .map(|node| node.label.clone())
            .ok_or_else(|| Error::NotFound(format!("{role} node {id}")))
    }

    /// Look up the edge and its inverse for a prospective link.
    fn link_defs(&self, src: NodeId, edge: &str, dst: NodeId) -> Result<(EdgeDef, Option<EdgeDef>)> {
        let src_label = self.label_of(src, "Source")?;
        let dst_label = self.label_of(dst, "Target")?;
        let schema = &self.inner.schema;

        let def = schema.edge(&src_label, edge).ok_or_else(|| {
            Error::SchemaViolation(format!("{src_label} has no edge '{edge}'"))
        })?;
        if def.target != dst_label {
            return Err(Error::SchemaViolation(format!(
                "{src_label}.{edge} expects {}, got {dst_label} node {dst}",
                def.target,
            )));
        }
        let inverse = match &def.inverse {
            Some(name) => Some(
                schema
                    .edge(&dst_label, name)
                    .ok_or_else(|| {
                        Error::SchemaViolation(format!("{dst_label} has no inverse edge '{name}'"))
                    })?
                    .clone(),
            ),
            None => None,
        };
        Ok((def.clone(), inverse))
    }

    /// Check that `id` exists and declares `edge` with the expected kind.
    fn check_load(&self, id: NodeId, edge: &str, expected: EdgeKind) -> Result<()> {
        let label = self.label_of(id, "Source")?;
        match self.inner.schema.edge_kind(&label, edge) {
            Some(kind) if kind == expected => Ok(()),
            Some(kind) => Err(Error::SchemaViolation(format!(
                "{label}.{edge} is {kind}, not {expected}"
            ))),
            None => Err(Error::SchemaViolation(format!("{label} has no edge '{edge}'"))),
        }
    }

    fn targets(&self, id: NodeId, edge: &str) -> Vec<NodeId> {
        self.inner
            .adjacency
            .read()
            .get(&id)
            .and_then(|edges| edges.get(edge))
            .cloned()
            .unwrap_or_default()
    }
}

/// Add `from -[def]-> to`. Replacing a singular target also drops the old
/// target's inverse entry.
fn attach(adj: &mut Adjacency, from: NodeId, def: &EdgeDef, to: NodeId) {
    let replaced = {
        let targets = adj.entry(from).or_default().entry(def.name.clone()).or_default();
        match def.kind {
            EdgeKind::Singular => {
                let previous = targets.first().copied();
                targets.clear();
                targets.push(to);
                previous.filter(|prev| *prev != to)
            }
            EdgeKind::Plural => {
                if !targets.contains(&to) {
                    targets.push(to);
                }
                None
            }
        }
    };
    if let (Some(previous), Some(inverse)) = (replaced, &def.inverse) {
        detach(adj, previous, inverse, from);
    }
}

fn detach(adj: &mut Adjacency, from: NodeId, edge: &str, to: NodeId) -> bool {
    let Some(targets) = adj.get_mut(&from).and_then(|edges| edges.get_mut(edge)) else {
        return false;
    };
    let before = targets.len();
    targets.retain(|target| *target != to);
    targets.len() != before
}

// ============================================================================
// StorageBackend impl
// ============================================================================

#[async_trait]
impl StorageBackend for MemoryBackend {
    fn schema(&self) -> &Schema {
        &self.inner.schema
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    async fn create_node(&self, label: &str, props: PropertyMap) -> Result<NodeId> {
        if !self.inner.schema.has_label(label) {
            return Err(Error::SchemaViolation(format!("undeclared label '{label}'")));
        }
        let id = NodeId(self.inner.next_node_id.fetch_add(1, Ordering::Relaxed));
        let node = Node {
            id,
            label: label.to_string(),
            properties: props,
        };

        self.inner.label_index.write().entry(node.label.clone()).or_default().push(id);
        self.inner.nodes.write().insert(id, node);

        Ok(id)
    }

    async fn get_node(&self, id: NodeId) -> Result<Option<Node>> {
        Ok(self.inner.nodes.read().get(&id).cloned())
    }

    async fn set_property(&self, id: NodeId, key: &str, val: Value) -> Result<()> {
        let mut nodes = self.inner.nodes.write();
        let node = nodes.get_mut(&id).ok_or_else(|| Error::NotFound(format!("Node {id}")))?;
        node.properties.insert(key.to_string(), val);
        Ok(())
    }

    // ========================================================================
    // Links
    // ========================================================================

    async fn link(&self, src: NodeId, edge: &str, dst: NodeId) -> Result<()> {
        let (def, inverse) = self.link_defs(src, edge, dst)?;
        let mut adj = self.inner.adjacency.write();
        attach(&mut adj, src, &def, dst);
        if let Some(inverse) = &inverse {
            attach(&mut adj, dst, inverse, src);
        }
        debug!(%src, edge, %dst, "linked");
        Ok(())
    }

    async fn unlink(&self, src: NodeId, edge: &str, dst: NodeId) -> Result<bool> {
        let label = self.label_of(src, "Source")?;
        let def = self.inner.schema.edge(&label, edge).ok_or_else(|| {
            Error::SchemaViolation(format!("{label} has no edge '{edge}'"))
        })?;

        let mut adj = self.inner.adjacency.write();
        let removed = detach(&mut adj, src, edge, dst);
        if removed {
            if let Some(inverse) = &def.inverse {
                detach(&mut adj, dst, inverse, src);
            }
            debug!(%src, edge, %dst, "unlinked");
        }
        Ok(removed)
    }

    // ========================================================================
    // Edge loads
    // ========================================================================

    async fn load_reference(&self, id: NodeId, edge: &str) -> Result<Option<NodeId>> {
        self.check_load(id, edge, EdgeKind::Singular)?;
        self.inner.stats.record(EdgeKind::Singular);
        Ok(self.targets(id, edge).first().copied())
    }

    async fn load_collection(&self, id: NodeId, edge: &str) -> Result<Vec<NodeId>> {
        self.check_load(id, edge, EdgeKind::Plural)?;
        self.inner.stats.record(EdgeKind::Plural);
        Ok(self.targets(id, edge))
    }

    // ========================================================================
    // Scan / introspection
    // ========================================================================

    async fn all_nodes(&self) -> Result<Vec<Node>> {
        let mut nodes: Vec<Node> = self.inner.nodes.read().values().cloned().collect();
        nodes.sort_by_key(|node| node.id);
        Ok(nodes)
    }

    async fn nodes_by_label(&self, label: &str) -> Result<Vec<Node>> {
        let idx = self.inner.label_index.read();
        let nodes = self.inner.nodes.read();

        let ids = idx.get(label).cloned().unwrap_or_default();
        Ok(ids.iter().filter_map(|id| nodes.get(id).cloned()).collect())
    }

    async fn links(&self) -> Result<Vec<Link>> {
        let adj = self.inner.adjacency.read();
        let mut links: Vec<Link> = adj
            .iter()
            .flat_map(|(src, edges)| {
                edges.iter().flat_map(move |(edge, targets)| {
                    targets.iter().map(move |dst| Link::new(*src, edge.clone(), *dst))
                })
            })
            .collect();
        links.sort();
        Ok(links)
    }

    async fn node_count(&self) -> Result<u64> {
        Ok(self.inner.nodes.read().len() as u64)
    }

    fn stats(&self) -> LoadStatsSnapshot {
        self.inner.stats.snapshot()
    }
}

// ============================================================================
// Tests
// ============================================================================
