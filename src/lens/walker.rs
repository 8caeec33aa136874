//! Graph walker.
//!
//! Replays a [`Path`] against a root node:
//!
//! - From a single node, the hop is resolved directly. A singular edge keeps
//!   the frontier single (possibly absent); a plural edge turns it into a
//!   sequence, taken as the provider returned it.
//! - From a sequence, the hop is resolved on every member together, the
//!   results are concatenated in frontier order, absent singular targets are
//!   dropped, and the sequence is de-duplicated by node key (first seen wins).
//! - An absent single node stays absent; nothing is resolved for it.
//!
//! Hops run strictly one after another. Any resolution error aborts the walk
//! and is returned as-is.

use futures::future::try_join_all;
use hashbrown::HashSet;
use tracing::{debug, trace};

use super::cardinality::{Cardinality, One};
use super::config::WalkerConfig;
use super::recorder::{record, Probe};
use super::{Frontier, GraphNode};
use crate::model::{EdgeKind, Hop, Path};
use crate::{Error, Result};

/// Replays paths against nodes.
#[derive(Debug, Clone, Default)]
pub struct Walker {
    config: WalkerConfig,
}

impl Walker {
    pub fn with_config(config: WalkerConfig) -> Self {
        Self { config }
    }

    /// Replay `path` from `root`. The empty path yields `One(Some(root))`.
    #[tracing::instrument(level = "debug", skip_all, fields(path = %path))]
    pub async fn walk<N: GraphNode>(&self, root: &N, path: &Path) -> Result<Frontier<N>> {
        if path.len() > self.config.max_hops {
            return Err(Error::PathTooLong {
                len: path.len(),
                max: self.config.max_hops,
            });
        }

        let mut frontier = Frontier::One(Some(root.clone()));
        for (index, hop) in path.iter().enumerate() {
            let before = frontier.len();
            frontier = match frontier {
                Frontier::One(None) => Frontier::One(None),
                Frontier::One(Some(node)) => resolve_hop(&node, hop).await?,
                Frontier::Many(nodes) => Frontier::Many(self.fan_out(nodes, hop).await?),
            };
            debug!(index, hop = %hop, before, after = frontier.len(), shape = frontier.shape(), "hop resolved");
        }
        Ok(frontier)
    }

    /// Record the chain built by `build`, walk it from `root`, and shape the
    /// result by the chain's declared cardinality.
    pub async fn traverse<N, C, F>(&self, root: &N, build: F) -> Result<C::Output<N>>
    where
        N: GraphNode,
        C: Cardinality,
        F: FnOnce(Probe<One>) -> Probe<C>,
    {
        let path = record(build)?;
        let frontier = self.walk(root, &path).await?;
        C::shape(frontier)
    }

    async fn fan_out<N: GraphNode>(&self, nodes: Vec<N>, hop: &Hop) -> Result<Vec<N>> {
        let width = self.config.batch_width.unwrap_or(nodes.len()).max(1);
        let mut reached = Vec::with_capacity(nodes.len());
        for chunk in nodes.chunks(width) {
            let pending: Vec<_> = chunk.iter().map(|node| resolve_hop(node, hop)).collect();
            let batch = try_join_all(pending).await?;
            for resolved in batch {
                reached.extend(resolved.into_vec());
            }
        }
        Ok(dedup_by_key(reached))
    }
}

/// Replay `path` from `root` with the default configuration.
pub async fn walk<N: GraphNode>(root: &N, path: &Path) -> Result<Frontier<N>> {
    Walker::default().walk(root, path).await
}

/// Record and replay `build` from `root` with the default configuration.
pub async fn traverse<N, C, F>(root: &N, build: F) -> Result<C::Output<N>>
where
    N: GraphNode,
    C: Cardinality,
    F: FnOnce(Probe<One>) -> Probe<C>,
{
    Walker::default().traverse(root, build).await
}

async fn resolve_hop<N: GraphNode>(node: &N, hop: &Hop) -> Result<Frontier<N>> {
    match node.edge_kind(hop.as_str()) {
        Some(EdgeKind::Singular) => Ok(Frontier::One(node.resolve_one(hop.as_str()).await?)),
        Some(EdgeKind::Plural) => Ok(Frontier::Many(node.resolve_many(hop.as_str()).await?)),
        None => Err(Error::UnknownEdge {
            node: node.describe(),
            edge: hop.to_string(),
        }),
    }
}

fn dedup_by_key<N: GraphNode>(nodes: Vec<N>) -> Vec<N> {
    let total = nodes.len();
    let mut seen = HashSet::with_capacity(total);
    let unique: Vec<N> = nodes
        .into_iter()
        .filter(|node| seen.insert(node.node_key()))
        .collect();
    if unique.len() < total {
        trace!(dropped = total - unique.len(), "collapsed duplicate nodes");
    }
    unique
}
