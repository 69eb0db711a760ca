//! Elimination-sequence strategies.
//!
//! A strategy owns the working graph of a run and decides, one call at a
//! time, which node is eliminated next:
//!
//! 1. [`set_graph`](EliminationSequenceStrategy::set_graph) installs a fresh
//!    working copy;
//! 2. [`next_node_to_eliminate`](EliminationSequenceStrategy::next_node_to_eliminate)
//!    proposes a node (idempotent until the next update);
//! 3. [`elimination_update`](EliminationSequenceStrategy::elimination_update)
//!    completes the node's neighbourhood and removes it.
//!
//! Variants:
//! - [`DefaultEliminationStrategy`]: tiered heuristic (simplicial, then
//!   almost simplicial, then quasi simplicial, then lightest clique);
//! - [`OrderedEliminationStrategy`]: follows a caller-supplied total order;
//! - [`PartialOrderedEliminationStrategy`]: layered order, heuristic inside
//!   each layer.

pub mod default;
pub mod ordered;
pub mod partial_ordered;

pub use default::DefaultEliminationStrategy;
pub use ordered::OrderedEliminationStrategy;
pub use partial_ordered::PartialOrderedEliminationStrategy;

use std::fmt::Debug;

use crate::error::TriangulationError;
use crate::graph::{Edge, NodeId, UndiGraph};
use crate::triangulation::config::DomainSizes;
use crate::triangulation::simplicial_set::SimplicialSet;

/// Decides the elimination order of a triangulation run.
pub trait EliminationSequenceStrategy: Debug + Send {
    /// Install a working copy of `graph`, discarding any previous run state.
    fn set_graph(
        &mut self,
        graph: &UndiGraph,
        domain_sizes: &DomainSizes,
    ) -> Result<(), TriangulationError>;

    /// The working graph in its current, partially eliminated state.
    fn graph(&self) -> Option<&UndiGraph>;

    /// The node to eliminate next.
    ///
    /// # Errors
    /// [`TriangulationError::NoNodeToEliminate`] once the graph is empty;
    /// [`TriangulationError::NoGraph`] before `set_graph`.
    fn next_node_to_eliminate(&mut self) -> Result<NodeId, TriangulationError>;

    /// Eliminate `node` from the working graph.
    fn elimination_update(&mut self, node: NodeId) -> Result<(), TriangulationError>;

    /// Whether [`fill_ins`](Self::fill_ins) is populated by this strategy.
    fn provides_fill_ins(&self) -> bool;

    /// Ask the strategy to record fill-ins, if it is able to.
    fn ask_fill_ins(&mut self, ask: bool);

    /// Fill-ins added so far, in creation order (empty unless provided).
    fn fill_ins(&self) -> &[Edge];

    /// Drop the working graph and run state; configuration is kept.
    fn clear(&mut self);

    /// A fresh, graph-less strategy with the same configuration.
    fn new_instance(&self) -> Box<dyn EliminationSequenceStrategy>;
}

/// Complete the neighbourhood of `node` in a plain graph and remove it.
pub(crate) fn eliminate_in_graph(
    graph: &mut UndiGraph,
    node: NodeId,
) -> Result<Vec<Edge>, TriangulationError> {
    let nbrs: Vec<NodeId> = graph.neighbours(node)?.iter().copied().collect();
    let mut added = Vec::new();
    for (i, &a) in nbrs.iter().enumerate() {
        for &b in &nbrs[i + 1..] {
            let edge = Edge::new(a, b)?;
            if graph.insert_edge(edge) {
                added.push(edge);
            }
        }
    }
    graph.erase_node(node);
    Ok(added)
}

/// Tiered choice restricted to nodes accepted by `allowed`.
///
/// Tiers are tried in order (simplicial, almost simplicial within the
/// limit, quasi simplicial within the limit) before falling back to the
/// lightest allowed node. Within a tier the lightest candidate wins, ties
/// going to the smaller `NodeId`.
pub(crate) fn pick_tiered<F>(set: &mut SimplicialSet, allowed: F) -> Option<NodeId>
where
    F: Fn(NodeId) -> bool,
{
    if let Some((n, _)) = set.all_simplicial_nodes().iter().find(|&(n, _)| allowed(n)) {
        return Some(n);
    }
    let almost = set
        .all_almost_simplicial_nodes()
        .iter()
        .find(|&(n, _)| allowed(n));
    if let Some((n, w)) = almost {
        if set.within_limit(w) {
            return Some(n);
        }
    }
    let quasi = set
        .all_quasi_simplicial_nodes()
        .iter()
        .find(|&(n, _)| allowed(n));
    if let Some((n, w)) = quasi {
        if set.within_limit(w) {
            return Some(n);
        }
    }
    set.all_nodes_by_weight()
        .iter()
        .find(|&(n, _)| allowed(n))
        .map(|(n, _)| n)
}
