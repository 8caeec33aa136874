//! Path — an ordered sequence of hops recorded from a lens.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{Error, Result};

/// One edge traversal step, named by the edge it follows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hop(String);

impl Hop {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Hop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Hop {
    fn from(name: &str) -> Self { Hop::new(name) }
}

impl From<String> for Hop {
    fn from(name: String) -> Self { Hop(name) }
}

/// A fixed sequence of hops: `author.publisher`.
///
/// Built once per traversal and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    hops: SmallVec<[Hop; 4]>,
}

impl Path {
    pub fn new(hops: impl IntoIterator<Item = impl Into<Hop>>) -> Self {
        Self { hops: hops.into_iter().map(Into::into).collect() }
    }

    /// The path with no hops; walking it yields the root.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a dot-separated path such as `"authors.publisher"`.
    ///
    /// The empty string is the empty path. Empty segments (`"a..b"`, `".a"`)
    /// are rejected.
    pub fn parse(source: &str) -> Result<Self> {
        if source.is_empty() {
            return Ok(Self::empty());
        }
        let mut hops = SmallVec::new();
        for (position, segment) in source.split('.').enumerate() {
            let segment = segment.trim();
            if segment.is_empty() {
                return Err(Error::MalformedPath {
                    reason: format!("empty hop at position {position} in '{source}'"),
                });
            }
            hops.push(Hop::new(segment));
        }
        Ok(Self { hops })
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    pub fn hops(&self) -> &[Hop] {
        &self.hops
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Hop> {
        self.hops.iter()
    }

    /// Hop names in order.
    pub fn names(&self) -> Vec<&str> {
        self.hops.iter().map(Hop::as_str).collect()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, hop) in self.hops.iter().enumerate() {
            if i > 0 { f.write_str(".")?; }
            write!(f, "{hop}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Hop;
    type IntoIter = std::slice::Iter<'a, Hop>;

    fn into_iter(self) -> Self::IntoIter {
        self.hops.iter()
    }
}
