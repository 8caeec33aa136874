//! Schema — which edges each entity label declares.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::{EdgeDef, EdgeKind};
use crate::{Error, Result};

/// Edge declarations keyed by entity label, then by edge name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    labels: HashMap<String, HashMap<String, EdgeDef>>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a label with no edges (leaf entity types such as images).
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.entry(label.into()).or_default();
        self
    }

    /// Declare an edge on `label`. Redeclaring an edge name replaces it.
    pub fn with_edge(mut self, label: impl Into<String>, def: EdgeDef) -> Self {
        self.labels
            .entry(label.into())
            .or_default()
            .insert(def.name.clone(), def);
        self
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains_key(label)
    }

    pub fn edge(&self, label: &str, name: &str) -> Option<&EdgeDef> {
        self.labels.get(label)?.get(name)
    }

    pub fn edge_kind(&self, label: &str, name: &str) -> Option<EdgeKind> {
        self.edge(label, name).map(|def| def.kind)
    }

    /// Edges of a label, sorted by name.
    pub fn edges(&self, label: &str) -> Vec<&EdgeDef> {
        let mut defs: Vec<&EdgeDef> = self
            .labels
            .get(label)
            .map(|edges| edges.values().collect())
            .unwrap_or_default();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.labels.keys().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }

    /// Check that every edge targets a declared label and that every inverse
    /// exists on the target and points back.
    pub fn validate(&self) -> Result<()> {
        for (label, edges) in &self.labels {
            for def in edges.values() {
                if !self.has_label(&def.target) {
                    return Err(Error::SchemaViolation(format!(
                        "{label}.{} targets undeclared label '{}'",
                        def.name, def.target,
                    )));
                }
                let Some(inverse) = &def.inverse else { continue };
                let back = self.edge(&def.target, inverse).ok_or_else(|| {
                    Error::SchemaViolation(format!(
                        "{label}.{} declares inverse '{}.{inverse}' which does not exist",
                        def.name, def.target,
                    ))
                })?;
                if back.target != *label || back.inverse.as_deref() != Some(def.name.as_str()) {
                    return Err(Error::SchemaViolation(format!(
                        "{}.{inverse} does not mirror {label}.{}",
                        def.target, def.name,
                    )));
                }
            }
        }
        Ok(())
    }

    /// Publishers, authors, books and images.
    ///
    /// ```text
    /// Publisher.authors  (plural)   <-> Author.publisher (singular)
    /// Author.books       (plural)   <-> Book.author      (singular)
    /// Author.mentees     (plural)   <-> Author.mentor    (singular)
    /// Publisher.image, Author.image, Book.image (singular, -> Image)
    /// ```
    pub fn library() -> Self {
        Self::new()
            .with_edge("Publisher", EdgeDef::plural("authors", "Author").with_inverse("publisher"))
            .with_edge("Publisher", EdgeDef::singular("image", "Image"))
            .with_edge("Author", EdgeDef::singular("publisher", "Publisher").with_inverse("authors"))
            .with_edge("Author", EdgeDef::plural("books", "Book").with_inverse("author"))
            .with_edge("Author", EdgeDef::singular("mentor", "Author").with_inverse("mentees"))
            .with_edge("Author", EdgeDef::plural("mentees", "Author").with_inverse("mentor"))
            .with_edge("Author", EdgeDef::singular("image", "Image"))
            .with_edge("Book", EdgeDef::singular("author", "Author").with_inverse("books"))
            .with_edge("Book", EdgeDef::singular("image", "Image"))
            .with_label("Image")
    }
}
