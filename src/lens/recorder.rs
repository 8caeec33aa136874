//! Path recorder.
//!
//! A [`Probe`] stands in for a real node while the caller's path-building
//! closure runs. Every `one`/`many`/`edge` call appends a hop to a shared log
//! and hands back a probe positioned at the new tip. The closure runs exactly
//! once and never sees real data.
//!
//! The closure must be a straight chain. Branching (extending a probe that is
//! no longer the tip) or returning anything but the tip is reported as
//! [`Error::MalformedPath`] before any resolution starts.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::Mutex;

use super::cardinality::{Cardinality, One};
use crate::model::{Hop, Path};
use crate::{Error, Result};

#[derive(Debug, Default)]
struct HopLog {
    hops: Vec<Hop>,
    /// First violation seen; later hops are ignored once set.
    violation: Option<String>,
}

/// Synthetic stand-in for a node during recording.
pub struct Probe<C> {
    log: Arc<Mutex<HopLog>>,
    /// Number of hops before this probe's position.
    depth: usize,
    _cardinality: PhantomData<fn() -> C>,
}

impl<C> Clone for Probe<C> {
    fn clone(&self) -> Self {
        Self {
            log: Arc::clone(&self.log),
            depth: self.depth,
            _cardinality: PhantomData,
        }
    }
}

impl<C: Cardinality> fmt::Debug for Probe<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Probe")
            .field("depth", &self.depth)
            .field("cardinality", &C::NAME)
            .finish()
    }
}

impl Probe<One> {
    fn root() -> Self {
        Self {
            log: Arc::new(Mutex::new(HopLog::default())),
            depth: 0,
            _cardinality: PhantomData,
        }
    }
}

impl<C: Cardinality> Probe<C> {
    /// Follow a singular edge.
    pub fn one(self, edge: impl fmt::Display) -> Probe<C::ThenOne> {
        self.push(edge)
    }

    /// Follow a plural edge. The result becomes a sequence from here on.
    pub fn many(self, edge: impl fmt::Display) -> Probe<C::ThenMany> {
        self.push(edge)
    }

    /// Follow an edge without declaring its kind; cardinality is unchanged.
    pub fn edge(self, edge: impl fmt::Display) -> Probe<C> {
        self.push(edge)
    }

    /// Hops recorded before this probe.
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn push<D>(self, edge: impl fmt::Display) -> Probe<D> {
        let name = edge.to_string();
        {
            let mut log = self.log.lock();
            if log.violation.is_none() {
                if name.is_empty() {
                    log.violation = Some(format!("empty hop name at position {}", self.depth));
                } else if log.hops.len() != self.depth {
                    log.violation = Some(format!(
                        "hop '{name}' branches from position {} but the chain already has {} hops",
                        self.depth,
                        log.hops.len(),
                    ));
                } else {
                    log.hops.push(Hop::new(name));
                }
            }
        }
        Probe {
            log: self.log,
            depth: self.depth + 1,
            _cardinality: PhantomData,
        }
    }
}

/// Run `build` once against a fresh probe and return the hops it chained.
pub fn record<C, F>(build: F) -> Result<Path>
where
    C: Cardinality,
    F: FnOnce(Probe<One>) -> Probe<C>,
{
    let root = Probe::<One>::root();
    let shared = Arc::clone(&root.log);
    let tip = build(root);

    if !Arc::ptr_eq(&tip.log, &shared) {
        return Err(Error::MalformedPath {
            reason: "returned probe belongs to a different recording".into(),
        });
    }

    let log = shared.lock();
    if let Some(reason) = &log.violation {
        return Err(Error::MalformedPath { reason: reason.clone() });
    }
    if tip.depth != log.hops.len() {
        return Err(Error::MalformedPath {
            reason: format!(
                "returned probe stops after {} of {} recorded hops",
                tip.depth,
                log.hops.len(),
            ),
        });
    }
    Ok(Path::new(log.hops.iter().cloned()))
}
