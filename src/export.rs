//! JSON export — serialize a stored entity graph.
//!
//! ```text
//! MemoryBackend → export_json() → { "nodes": [...], "links": [...] }
//! ```
//!
//! Inverse links are included as stored, so a `Book.author` link appears
//! next to the matching `Author.books` entry.

use std::io::Write;

use serde::Serialize;

use crate::lens::{Frontier, GraphNode};
use crate::model::*;
use crate::storage::StorageBackend;
use crate::Result;

#[derive(Debug, Serialize)]
struct Dump {
    nodes: Vec<Node>,
    links: Vec<Link>,
}

/// Export all nodes and links of a backend as pretty-printed JSON.
pub async fn export_json<B: StorageBackend>(
    backend: &B,
    writer: &mut dyn Write,
) -> Result<()> {
    let dump = Dump {
        nodes: backend.all_nodes().await?,
        links: backend.links().await?,
    };
    serde_json::to_writer_pretty(&mut *writer, &dump)?;
    writeln!(writer)?;
    Ok(())
}

/// Keys of the nodes in a traversal result, in frontier order.
pub fn frontier_keys<N: GraphNode>(frontier: &Frontier<N>) -> Vec<N::Key> {
    frontier.as_slice().iter().map(GraphNode::node_key).collect()
}
