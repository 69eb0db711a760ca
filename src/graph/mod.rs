//! Graph containers used by the triangulation engine.
//!
//! - [`UndiGraph`]: deterministic undirected graph (the moral graph and the
//!   mutable working copies derived from it).
//! - [`CliqueGraph`]: a graph whose nodes carry node sets; junction trees and
//!   elimination trees are clique graphs.
//! - [`chordal`]: perfect-elimination and chordality utilities.

pub mod chordal;
pub mod clique_graph;
pub mod undigraph;

pub use chordal::{
    connected_components, induced_subgraph, is_chordal, is_perfect_elimination_order,
    maximum_cardinality_search,
};
pub use clique_graph::{CliqueGraph, CliqueId};
pub use undigraph::UndiGraph;

use std::fmt;

use crate::error::TriangulationError;

/// Identifier of a graph node.
pub type NodeId = usize;

/// An undirected edge, stored with `first < second`.
///
/// Normalisation happens at construction so `Edge::new(a, b) == Edge::new(b, a)`
/// and edges sort and hash consistently. Deserialisation normalises too.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "RawEdge")]
pub struct Edge {
    first: NodeId,
    second: NodeId,
}

#[derive(serde::Deserialize)]
struct RawEdge {
    first: NodeId,
    second: NodeId,
}

impl TryFrom<RawEdge> for Edge {
    type Error = TriangulationError;

    fn try_from(raw: RawEdge) -> Result<Self, Self::Error> {
        Edge::new(raw.first, raw.second)
    }
}

impl Edge {
    /// Creates a normalised edge.
    ///
    /// # Errors
    /// [`TriangulationError::SelfLoop`] if `a == b`.
    #[inline]
    pub fn new(a: NodeId, b: NodeId) -> Result<Self, TriangulationError> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Ok(Edge { first: a, second: b }),
            std::cmp::Ordering::Greater => Ok(Edge { first: b, second: a }),
            std::cmp::Ordering::Equal => Err(TriangulationError::SelfLoop(a)),
        }
    }

    /// Edge from endpoints already known to satisfy `a < b`.
    #[inline]
    pub(crate) const fn ordered(a: NodeId, b: NodeId) -> Self {
        debug_assert!(a < b);
        Edge { first: a, second: b }
    }

    /// Smaller endpoint.
    #[inline]
    pub const fn first(self) -> NodeId {
        self.first
    }

    /// Larger endpoint.
    #[inline]
    pub const fn second(self) -> NodeId {
        self.second
    }

    /// The endpoint opposite to `node`, if `node` is an endpoint.
    #[inline]
    pub fn other(self, node: NodeId) -> Option<NodeId> {
        if node == self.first {
            Some(self.second)
        } else if node == self.second {
            Some(self.first)
        } else {
            None
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.second)
    }
}
