//! # Entity Graph Model
//!
//! Plain data shared by the lens engine and the providers: node ids, edge
//! declarations, hop paths, property values and the schema.
//!
//! This module is pure data — no I/O, no state, no async.

pub mod node;
pub mod edge;
pub mod path;
pub mod value;
pub mod property_map;
pub mod schema;

pub use node::{Node, NodeId};
pub use edge::{EdgeDef, EdgeKind, Link};
pub use path::{Hop, Path};
pub use value::Value;
pub use property_map::{PropertyMap, props};
pub use schema::Schema;
