//! Compile-time cardinality of a recorded chain.
//!
//! A chain starts as [`One`]. Declaring a plural hop moves it to [`Many`], and
//! nothing moves it back. The marker decides the result type of a traversal:
//! `Option<N>` for `One`, `Vec<N>` for `Many`.

use super::Frontier;
use crate::{Error, Result};

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::One {}
    impl Sealed for super::Many {}
}

/// Cardinality marker carried by [`Probe`](super::Probe).
pub trait Cardinality: sealed::Sealed + Send + Sync + 'static {
    /// Cardinality after a singular hop.
    type ThenOne: Cardinality;
    /// Cardinality after a plural hop.
    type ThenMany: Cardinality;
    /// Result type of a traversal ending in this cardinality.
    type Output<N>;

    const NAME: &'static str;

    /// Convert a walked frontier into the declared result type.
    fn shape<N>(frontier: Frontier<N>) -> Result<Self::Output<N>>;
}

/// No plural hop declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum One {}

/// At least one plural hop declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Many {}

impl Cardinality for One {
    type ThenOne = One;
    type ThenMany = Many;
    type Output<N> = Option<N>;

    const NAME: &'static str = "one";

    /// A `Many` frontier here means a hop declared singular crossed a plural edge.
    fn shape<N>(frontier: Frontier<N>) -> Result<Option<N>> {
        match frontier {
            Frontier::One(node) => Ok(node),
            Frontier::Many(_) => Err(Error::CardinalityMismatch {
                expected: Self::NAME,
                got: Many::NAME,
            }),
        }
    }
}

impl Cardinality for Many {
    type ThenOne = Many;
    type ThenMany = Many;
    type Output<N> = Vec<N>;

    const NAME: &'static str = "many";

    fn shape<N>(frontier: Frontier<N>) -> Result<Vec<N>> {
        Ok(frontier.into_vec())
    }
}
