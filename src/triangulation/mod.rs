//! Triangulation by node elimination and junction-tree construction.
//!
//! - [`config`]: run options and domain-size helpers;
//! - [`simplicial_set`]: the lazy candidate classifier;
//! - [`strategy`]: elimination-order strategies;
//! - [`static_triangulation`]: the driver and its state machine;
//! - [`thinning`]: minimality post-processing;
//! - [`history`]: the frozen record of a run;
//! - [`junction_tree`]: junction-tree builders;
//! - [`batch`]: independent runs per component or per configuration.

pub mod batch;
pub mod config;
pub mod history;
pub mod junction_tree;
pub mod simplicial_set;
pub mod static_triangulation;
pub mod strategy;
pub mod thinning;

pub use batch::{Comparison, ComponentTriangulation, RunSummary, compare_configurations, triangulate_components};
pub use config::{DomainSizes, TriangulationConfig, uniform_domain_sizes};
pub use history::{EliminationHistory, RunToken};
pub use junction_tree::{
    CompactJunctionTree, DefaultJunctionTreeStrategy, JunctionTreeStrategy, compact_junction_tree,
};
pub use simplicial_set::{NodeTier, SimplicialSet};
pub use static_triangulation::{DefaultTriangulation, StaticTriangulation, TriangulationState};
pub use strategy::{
    DefaultEliminationStrategy, EliminationSequenceStrategy, OrderedEliminationStrategy,
    PartialOrderedEliminationStrategy,
};
