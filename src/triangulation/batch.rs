//! Independent triangulation runs: one per connected component, or one per
//! candidate configuration.
//!
//! Every run owns its own driver, so runs share nothing mutable. With the
//! `rayon` feature they execute on the rayon pool; without it they run
//! sequentially. Results are returned in input order either way.

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::error::TriangulationError;
use crate::graph::{NodeId, UndiGraph, connected_components, induced_subgraph};
use crate::triangulation::config::{DomainSizes, TriangulationConfig};
use crate::triangulation::history::EliminationHistory;
use crate::triangulation::static_triangulation::DefaultTriangulation;

/// Triangulation of one connected component.
#[derive(Debug)]
pub struct ComponentTriangulation {
    /// Nodes of the component, ascending.
    pub nodes: Vec<NodeId>,
    pub triangulation: DefaultTriangulation,
}

/// Key figures of one completed run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub config: TriangulationConfig,
    pub elimination_order: Vec<NodeId>,
    pub max_clique_size: usize,
    pub fill_ins: usize,
    pub max_log10_clique_domain_size: f64,
    /// `ln` of the summed joint domain sizes of all cliques.
    pub log_total_weight: f64,
}

impl RunSummary {
    pub fn from_history(config: TriangulationConfig, history: &EliminationHistory) -> Self {
        Self {
            config,
            elimination_order: history.order().to_vec(),
            max_clique_size: history.max_clique_size(),
            fill_ins: history.fill_in_count(),
            max_log10_clique_domain_size: history.max_log10_clique_domain_size(),
            log_total_weight: history.log_total_weight(),
        }
    }
}

/// Outcome of [`compare_configurations`].
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    /// One summary per configuration, in input order.
    pub summaries: Vec<RunSummary>,
    /// Index of the configuration with the smallest total clique weight
    /// (first one on ties); `None` when no configuration was given.
    pub best: Option<usize>,
}

impl Comparison {
    pub fn best_summary(&self) -> Option<&RunSummary> {
        self.best.and_then(|i| self.summaries.get(i))
    }
}

/// Triangulate every connected component of `graph` separately.
///
/// Components come back ordered by their smallest node.
pub fn triangulate_components(
    graph: &UndiGraph,
    domain_sizes: &DomainSizes,
    config: TriangulationConfig,
) -> Result<Vec<ComponentTriangulation>, TriangulationError> {
    config.validate()?;
    let components = connected_components(graph);
    log::debug!(
        "triangulating {} components of a {}-node graph",
        components.len(),
        graph.size()
    );
    let run = |nodes: Vec<NodeId>| -> Result<ComponentTriangulation, TriangulationError> {
        let sub = induced_subgraph(graph, &nodes);
        let triangulation = DefaultTriangulation::with_graph(&sub, domain_sizes, config)?;
        Ok(ComponentTriangulation {
            nodes,
            triangulation,
        })
    };
    #[cfg(feature = "rayon")]
    let runs = components.into_par_iter().map(run).collect();
    #[cfg(not(feature = "rayon"))]
    let runs = components.into_iter().map(run).collect();
    runs
}

/// Triangulate `graph` once per configuration and pick the cheapest run.
pub fn compare_configurations(
    graph: &UndiGraph,
    domain_sizes: &DomainSizes,
    configs: &[TriangulationConfig],
) -> Result<Comparison, TriangulationError> {
    let run = |&config: &TriangulationConfig| -> Result<RunSummary, TriangulationError> {
        let t = DefaultTriangulation::with_graph(graph, domain_sizes, config)?;
        Ok(RunSummary::from_history(config, t.history()?))
    };
    #[cfg(feature = "rayon")]
    let summaries: Vec<RunSummary> = configs.par_iter().map(run).collect::<Result<_, _>>()?;
    #[cfg(not(feature = "rayon"))]
    let summaries: Vec<RunSummary> = configs.iter().map(run).collect::<Result<_, _>>()?;
    let best = summaries
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.log_total_weight.total_cmp(&b.log_total_weight))
        .map(|(i, _)| i);
    if let Some(i) = best {
        log::debug!(
            "configuration {i} of {} wins with max clique {}",
            summaries.len(),
            summaries[i].max_clique_size
        );
    }
    Ok(Comparison { summaries, best })
}
