//! TriangulationError: Unified error type for junction-sieve public APIs
//!
//! Errors fall into three families:
//! - **structural** errors: a supplied order or layering does not match the
//!   graph. Raised immediately, never silently ignored.
//! - **exhaustion** signals: no candidate is left to eliminate. The default
//!   strategy consumes tier exhaustion internally; the driver only surfaces
//!   [`TriangulationError::NoNodeToEliminate`] when the working graph is not
//!   yet empty.
//! - **precondition** errors: output accessors called before the driver is
//!   triangulated, or a junction-tree builder used without a matching run.

use thiserror::Error;

use crate::graph::NodeId;

/// Unified error type for triangulation and junction-tree operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TriangulationError {
    /// An edge was requested between a node and itself.
    #[error("Graph error: self-loop on node {0} is not allowed")]
    SelfLoop(NodeId),
    /// The node does not exist in the graph it was looked up in.
    #[error("Graph error: node {0} not found")]
    NodeNotFound(NodeId),
    /// A domain-size map has no entry for a graph node.
    #[error("Domain sizes: missing domain size for node {0}")]
    MissingDomainSize(NodeId),
    /// A domain size of zero was supplied.
    #[error("Domain sizes: node {0} has a zero domain size")]
    InvalidDomainSize(NodeId),
    /// A total order does not cover exactly the nodes of the graph.
    #[error(
        "Order error: order does not match graph nodes ({missing} missing, {extra} unknown)"
    )]
    OrderDoesNotMatchGraph {
        /// Number of graph nodes absent from the order.
        missing: usize,
        /// Number of order entries that are not graph nodes.
        extra: usize,
    },
    /// The same node occurs twice in an order or in two layers.
    #[error("Order error: node {0} occurs more than once")]
    DuplicateInOrder(NodeId),
    /// A node appears in more than one layer of a partial order.
    #[error("Order error: node {0} belongs to more than one layer")]
    OverlappingLayers(NodeId),
    /// An ordered strategy was used before its order was supplied.
    #[error("Order error: no elimination order has been set")]
    MissingOrder,
    /// The ordered strategy was asked for a node that is no longer in the graph.
    #[error("Order error: node {0} was already eliminated")]
    NodeAlreadyEliminated(NodeId),
    /// A node was removed as simplicial while its neighbours are not a clique.
    #[error("Elimination: node {0} is not simplicial")]
    NotSimplicial(NodeId),
    /// Every candidate tier is exhausted.
    #[error("Elimination: no node can be eliminated")]
    NoNodeToEliminate,
    /// A strategy was queried before [`set_graph`](crate::triangulation::EliminationSequenceStrategy::set_graph).
    #[error("Precondition: no graph has been assigned")]
    NoGraph,
    /// An output accessor was called before the run reached `Triangulated`.
    #[error("Precondition: triangulation has not completed")]
    NotTriangulated,
    /// The junction-tree builder has no attached triangulation.
    #[error("Precondition: no triangulation attached to the junction-tree builder")]
    JunctionTreeNotAttached,
    /// The junction-tree builder was handed a run other than the one it was attached to.
    #[error("Precondition: triangulation changed since the junction-tree builder was attached")]
    StaleTriangulation,
    /// A data structure failed its consistency check.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
    /// Configuration values outside their valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
