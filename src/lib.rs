#![cfg_attr(docsrs, feature(doc_cfg))]
//! # junction-sieve
//!
//! junction-sieve triangulates undirected graphs by node elimination and turns the
//! elimination history into a junction tree, the backbone of exact message-passing
//! inference in probabilistic graphical models. The input is a moral graph plus the
//! domain size of the variable behind each node.
//!
//! ## Features
//! - Lazy candidate classification into simplicial, almost-simplicial and
//!   quasi-simplicial tiers, weighted by log clique domain size
//! - Pluggable elimination strategies: tiered heuristic, fixed total order, layered order
//! - Optional minimality pass (recursive thinning of redundant fill-ins)
//! - Junction trees (forests for disconnected graphs) with memoisation and a compact
//!   variant without subsumed cliques
//! - Per-component and per-configuration batch runs, parallel with the `rayon` feature
//!
//! ## Determinism
//!
//! Every choice is made on `(weight, NodeId)` keys and every observable collection is
//! ordered, so two runs on the same graph, domain sizes and configuration produce the
//! same elimination order and the same junction tree.
//!
//! ## Usage
//!
//! ```
//! use junction_sieve::prelude::*;
//!
//! let g = UndiGraph::from_edges(&[(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap();
//! let dom = uniform_domain_sizes(&g, 2);
//! let mut t = DefaultTriangulation::with_graph(&g, &dom, TriangulationConfig::default()).unwrap();
//! assert_eq!(t.max_clique_size().unwrap(), 3);
//! assert_eq!(t.junction_tree().unwrap().size_edges(), 3);
//! ```

pub mod debug_invariants;
pub mod error;
pub mod graph;
pub mod triangulation;

pub use debug_invariants::DebugInvariants;
pub use error::TriangulationError;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::error::TriangulationError;
    pub use crate::graph::{CliqueGraph, CliqueId, Edge, NodeId, UndiGraph};
    pub use crate::triangulation::{
        CompactJunctionTree, DefaultEliminationStrategy, DefaultJunctionTreeStrategy,
        DefaultTriangulation, DomainSizes, EliminationHistory, EliminationSequenceStrategy,
        JunctionTreeStrategy, OrderedEliminationStrategy, PartialOrderedEliminationStrategy,
        StaticTriangulation, TriangulationConfig, TriangulationState, uniform_domain_sizes,
    };
}
