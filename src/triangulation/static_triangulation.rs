//! The triangulation driver.
//!
//! [`StaticTriangulation`] runs one elimination loop over a snapshot of the
//! input graph:
//!
//! ```text
//! Uninitialized --triangulate--> Eliminating --strategy exhausted--> Triangulated
//!       ^                                                                 |
//!       +----------------------- set_graph / clear -----------------------+
//! ```
//!
//! Each step asks the strategy for a node, records the clique made of the
//! node and its current neighbours, and lets the strategy eliminate it. Once
//! the working graph is empty the run is frozen into an
//! [`EliminationHistory`]; every output accessor reads from that history and
//! fails with [`TriangulationError::NotTriangulated`] before it exists.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::{Deref, DerefMut};

use itertools::Itertools;

use crate::debug_invariants::DebugInvariants;
use crate::error::TriangulationError;
use crate::graph::{CliqueGraph, CliqueId, Edge, NodeId, UndiGraph};
use crate::triangulation::config::{DomainSizes, TriangulationConfig, log_domain_sizes};
use crate::triangulation::history::{EliminationHistory, fill_graph};
use crate::triangulation::junction_tree::{
    CompactJunctionTree, DefaultJunctionTreeStrategy, JunctionTreeStrategy, compact_junction_tree,
};
use crate::triangulation::strategy::{
    DefaultEliminationStrategy, EliminationSequenceStrategy, OrderedEliminationStrategy,
    PartialOrderedEliminationStrategy,
};
use crate::triangulation::thinning::{elimination_cliques, recursive_thinning, repair_order};

/// Lifecycle of a [`StaticTriangulation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TriangulationState {
    /// No run has completed since the last `set_graph`/`clear`.
    Uninitialized,
    /// A run is in progress, or was aborted by an error.
    Eliminating,
    /// Outputs are frozen and readable.
    Triangulated,
}

/// Triangulation driver parameterised by an elimination strategy and a
/// junction-tree builder.
#[derive(Debug)]
pub struct StaticTriangulation {
    config: TriangulationConfig,
    strategy: Box<dyn EliminationSequenceStrategy>,
    junction_tree: Box<dyn JunctionTreeStrategy>,
    original: Option<UndiGraph>,
    domain_sizes: DomainSizes,
    state: TriangulationState,
    generation: u64,
    history: Option<EliminationHistory>,
}

impl StaticTriangulation {
    pub fn new(
        config: TriangulationConfig,
        strategy: Box<dyn EliminationSequenceStrategy>,
        junction_tree: Box<dyn JunctionTreeStrategy>,
    ) -> Self {
        Self {
            config,
            strategy,
            junction_tree,
            original: None,
            domain_sizes: DomainSizes::new(),
            state: TriangulationState::Uninitialized,
            generation: 0,
            history: None,
        }
    }

    /// Driver eliminating nodes exactly in `order`.
    pub fn ordered(
        order: Vec<NodeId>,
        config: TriangulationConfig,
    ) -> Result<Self, TriangulationError> {
        Ok(Self::new(
            config,
            Box::new(OrderedEliminationStrategy::with_order(order)?),
            Box::new(DefaultJunctionTreeStrategy::new()),
        ))
    }

    /// Driver eliminating `layers` one after the other, heuristically inside
    /// each layer.
    pub fn partial_ordered(
        layers: Vec<Vec<NodeId>>,
        config: TriangulationConfig,
    ) -> Result<Self, TriangulationError> {
        Ok(Self::new(
            config,
            Box::new(PartialOrderedEliminationStrategy::with_layers(config, layers)?),
            Box::new(DefaultJunctionTreeStrategy::new()),
        ))
    }

    /// A graph-less driver with the same configuration and strategy kinds.
    pub fn new_instance(&self) -> Self {
        Self::new(
            self.config,
            self.strategy.new_instance(),
            self.junction_tree.new_instance(),
        )
    }

    pub fn config(&self) -> &TriangulationConfig {
        &self.config
    }

    pub fn state(&self) -> TriangulationState {
        self.state
    }

    pub fn strategy(&self) -> &dyn EliminationSequenceStrategy {
        self.strategy.as_ref()
    }

    /// The graph installed by [`set_graph`](Self::set_graph).
    pub fn original_graph(&self) -> Option<&UndiGraph> {
        self.original.as_ref()
    }

    /// Install a new input, discarding any previous run.
    ///
    /// # Errors
    /// Invalid configuration, or a node without a positive domain size.
    pub fn set_graph(
        &mut self,
        graph: &UndiGraph,
        domain_sizes: &DomainSizes,
    ) -> Result<(), TriangulationError> {
        self.config.validate()?;
        log_domain_sizes(graph, domain_sizes)?;
        self.clear();
        self.domain_sizes = graph
            .nodes()
            .filter_map(|v| domain_sizes.get(&v).map(|&d| (v, d)))
            .collect();
        self.original = Some(graph.clone());
        Ok(())
    }

    /// Drop the input and every result; the driver returns to `Uninitialized`.
    pub fn clear(&mut self) {
        self.strategy.clear();
        self.junction_tree.clear();
        self.original = None;
        self.domain_sizes.clear();
        self.history = None;
        self.state = TriangulationState::Uninitialized;
    }

    /// [`set_graph`](Self::set_graph) followed by [`triangulate`](Self::triangulate).
    pub fn triangulate_graph(
        &mut self,
        graph: &UndiGraph,
        domain_sizes: &DomainSizes,
    ) -> Result<(), TriangulationError> {
        self.set_graph(graph, domain_sizes)?;
        self.triangulate()
    }

    /// Run the elimination loop. A no-op once `Triangulated`.
    ///
    /// # Errors
    /// [`TriangulationError::NoGraph`] without an input; any strategy error
    /// (structural order errors, exhaustion with nodes left). On error the
    /// driver stays in `Eliminating` and exposes no result.
    pub fn triangulate(&mut self) -> Result<(), TriangulationError> {
        if self.state == TriangulationState::Triangulated {
            return Ok(());
        }
        let original = self.original.as_ref().ok_or(TriangulationError::NoGraph)?;
        self.history = None;
        self.junction_tree.clear();
        self.state = TriangulationState::Eliminating;
        self.generation += 1;

        let log_sizes = log_domain_sizes(original, &self.domain_sizes)?;
        let track = self.config.ask_fill_ins || self.config.minimality;
        self.strategy.ask_fill_ins(track);
        self.strategy.set_graph(original, &self.domain_sizes)?;
        let provides = self.strategy.provides_fill_ins();
        log::debug!(
            "triangulation #{}: {} nodes, {} edges",
            self.generation,
            original.size(),
            original.size_edges()
        );

        let mut order = Vec::with_capacity(original.size());
        let mut cliques = Vec::with_capacity(original.size());
        let mut fill_seq: Vec<Edge> = Vec::new();
        let mut cursor = 0;
        while let Some(left) = self.strategy.graph().map(UndiGraph::size).filter(|&n| n > 0) {
            let node = self.strategy.next_node_to_eliminate().inspect_err(|e| {
                log::warn!("elimination stopped with {left} nodes left: {e}");
            })?;
            let working = self.strategy.graph().ok_or(TriangulationError::NoGraph)?;
            let mut clique = working.neighbours(node)?.clone();
            if track && !provides {
                fill_seq.extend(
                    clique
                        .iter()
                        .tuple_combinations()
                        .filter(|&(&a, &b)| !working.exists_edge(a, b))
                        .map(|(&a, &b)| Edge::ordered(a, b)),
                );
            }
            clique.insert(node);
            self.strategy.elimination_update(node)?;
            if track && provides {
                let all = self.strategy.fill_ins();
                fill_seq.extend_from_slice(all.get(cursor..).unwrap_or_default());
                cursor = all.len();
            }
            log::trace!(
                "step {}: eliminated {node}, clique of {}",
                order.len(),
                clique.len()
            );
            order.push(node);
            cliques.push(clique);
        }
        if order.len() != original.size() {
            return Err(TriangulationError::InvariantViolation(format!(
                "eliminated {} of {} nodes",
                order.len(),
                original.size()
            )));
        }

        if self.config.minimality && !fill_seq.is_empty() {
            let mut triangulated = fill_graph(original, &cliques);
            let removed: BTreeSet<Edge> = recursive_thinning(&mut triangulated, &fill_seq)
                .into_iter()
                .collect();
            log::debug!(
                "thinning removed {} of {} fill-ins",
                removed.len(),
                fill_seq.len()
            );
            if !removed.is_empty() {
                fill_seq.retain(|e| !removed.contains(e));
                order = repair_order(&triangulated, &order);
                cliques = elimination_cliques(&triangulated, &order);
            }
        }

        let fill_ins = self
            .config
            .ask_fill_ins
            .then(|| fill_seq.into_iter().collect::<BTreeSet<Edge>>());
        let history = EliminationHistory::new(
            self.generation,
            original.clone(),
            log_sizes,
            order,
            cliques,
            fill_ins,
        );
        history.debug_assert_invariants();
        log::debug!(
            "triangulation #{} done: {} cliques, {} fill-ins, max clique {}",
            self.generation,
            history.cliques().len(),
            history.fill_in_count(),
            history.max_clique_size()
        );
        self.junction_tree.set_triangulation(&history);
        self.history = Some(history);
        self.state = TriangulationState::Triangulated;
        Ok(())
    }

    /// The frozen run.
    pub fn history(&self) -> Result<&EliminationHistory, TriangulationError> {
        self.history
            .as_ref()
            .ok_or(TriangulationError::NotTriangulated)
    }

    /// Original graph plus surviving fill-ins.
    pub fn triangulated_graph(&self) -> Result<&UndiGraph, TriangulationError> {
        Ok(self.history()?.triangulated_graph())
    }

    pub fn elimination_order(&self) -> Result<&[NodeId], TriangulationError> {
        Ok(self.history()?.order())
    }

    pub fn reverse_elimination_order(&self) -> Result<Vec<NodeId>, TriangulationError> {
        Ok(self.history()?.reverse_order())
    }

    /// Step at which `node` was eliminated.
    pub fn elimination_position(&self, node: NodeId) -> Result<usize, TriangulationError> {
        self.history()?
            .position(node)
            .ok_or(TriangulationError::NodeNotFound(node))
    }

    /// Cliques indexed by elimination step.
    pub fn cliques(&self) -> Result<&[BTreeSet<NodeId>], TriangulationError> {
        Ok(self.history()?.cliques())
    }

    pub fn max_clique_size(&self) -> Result<usize, TriangulationError> {
        Ok(self.history()?.max_clique_size())
    }

    /// Fill-ins of the run; empty unless `ask_fill_ins` was set before it.
    pub fn fill_ins(&self) -> Result<BTreeSet<Edge>, TriangulationError> {
        Ok(self.history()?.fill_ins().cloned().unwrap_or_default())
    }

    pub fn max_log10_clique_domain_size(&self) -> Result<f64, TriangulationError> {
        Ok(self.history()?.max_log10_clique_domain_size())
    }

    /// Elimination tree, rebuilt on every call.
    pub fn elimination_tree(&self) -> Result<CliqueGraph, TriangulationError> {
        Ok(self.history()?.elimination_tree())
    }

    /// The memoised junction tree (a forest for disconnected inputs).
    pub fn junction_tree(&mut self) -> Result<&CliqueGraph, TriangulationError> {
        let history = self
            .history
            .as_ref()
            .ok_or(TriangulationError::NotTriangulated)?;
        self.junction_tree.junction_tree(history)
    }

    pub fn created_cliques(&mut self) -> Result<&BTreeMap<NodeId, CliqueId>, TriangulationError> {
        let history = self
            .history
            .as_ref()
            .ok_or(TriangulationError::NotTriangulated)?;
        self.junction_tree.created_cliques(history)
    }

    /// Clique created when `node` was eliminated.
    pub fn created_clique(&mut self, node: NodeId) -> Result<CliqueId, TriangulationError> {
        let history = self
            .history
            .as_ref()
            .ok_or(TriangulationError::NotTriangulated)?;
        self.junction_tree.created_clique(history, node)
    }

    /// Junction tree with subsumed cliques merged into their neighbours.
    pub fn compact_junction_tree(&mut self) -> Result<CompactJunctionTree, TriangulationError> {
        let history = self
            .history
            .as_ref()
            .ok_or(TriangulationError::NotTriangulated)?;
        let tree = self.junction_tree.junction_tree(history)?.clone();
        let created = self.junction_tree.created_cliques(history)?;
        compact_junction_tree(&tree, created)
    }
}

impl DebugInvariants for StaticTriangulation {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "StaticTriangulation");
    }

    fn validate_invariants(&self) -> Result<(), TriangulationError> {
        match (self.state, &self.history) {
            (TriangulationState::Triangulated, Some(h)) => {
                if self.original.as_ref() != Some(h.original_graph()) {
                    return Err(TriangulationError::InvariantViolation(
                        "history was built from another graph".into(),
                    ));
                }
                h.validate_invariants()
            }
            (TriangulationState::Triangulated, None) => Err(TriangulationError::InvariantViolation(
                "triangulated without a history".into(),
            )),
            (_, Some(_)) => Err(TriangulationError::InvariantViolation(
                "history kept outside the Triangulated state".into(),
            )),
            (_, None) => Ok(()),
        }
    }
}

/// [`StaticTriangulation`] with the tiered heuristic and the elimination-tree
/// junction-tree builder.
#[derive(Debug)]
pub struct DefaultTriangulation {
    inner: StaticTriangulation,
}

impl Default for DefaultTriangulation {
    fn default() -> Self {
        Self::new(TriangulationConfig::default())
    }
}

impl DefaultTriangulation {
    pub fn new(config: TriangulationConfig) -> Self {
        Self {
            inner: StaticTriangulation::new(
                config,
                Box::new(DefaultEliminationStrategy::new(config)),
                Box::new(DefaultJunctionTreeStrategy::new()),
            ),
        }
    }

    /// Set up and triangulate `graph` in one go.
    pub fn with_graph(
        graph: &UndiGraph,
        domain_sizes: &DomainSizes,
        config: TriangulationConfig,
    ) -> Result<Self, TriangulationError> {
        let mut t = Self::new(config);
        t.triangulate_graph(graph, domain_sizes)?;
        Ok(t)
    }

    pub fn into_inner(self) -> StaticTriangulation {
        self.inner
    }
}

impl Deref for DefaultTriangulation {
    type Target = StaticTriangulation;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for DefaultTriangulation {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl From<DefaultTriangulation> for StaticTriangulation {
    fn from(t: DefaultTriangulation) -> Self {
        t.inner
    }
}

#[cfg(test)]
mod send_tests {
    use super::*;
    use static_assertions::assert_impl_all;

    assert_impl_all!(StaticTriangulation: Send);
    assert_impl_all!(DefaultTriangulation: Send);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulation::config::uniform_domain_sizes;

    fn square() -> UndiGraph {
        UndiGraph::from_edges(&[(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap()
    }

    #[test]
    fn accessors_wait_for_triangulation() {
        let mut t = DefaultTriangulation::default();
        assert_eq!(t.state(), TriangulationState::Uninitialized);
        assert_eq!(t.triangulate(), Err(TriangulationError::NoGraph));
        let g = square();
        t.set_graph(&g, &uniform_domain_sizes(&g, 2)).unwrap();
        assert_eq!(t.elimination_order().err(), Some(TriangulationError::NotTriangulated));
        assert_eq!(t.junction_tree().err(), Some(TriangulationError::NotTriangulated));
        t.triangulate().unwrap();
        assert_eq!(t.state(), TriangulationState::Triangulated);
        assert_eq!(t.elimination_order().unwrap(), &[0, 1, 2, 3]);
        t.validate_invariants().unwrap();
    }

    #[test]
    fn square_gets_one_chord() {
        let g = square();
        let mut t = DefaultTriangulation::with_graph(
            &g,
            &uniform_domain_sizes(&g, 2),
            TriangulationConfig::default().with_fill_ins(true),
        )
        .unwrap();
        assert_eq!(t.fill_ins().unwrap(), BTreeSet::from([Edge::new(1, 3).unwrap()]));
        assert_eq!(t.max_clique_size().unwrap(), 3);
        assert_eq!(t.elimination_position(2).unwrap(), 2);
        assert_eq!(t.reverse_elimination_order().unwrap(), vec![3, 2, 1, 0]);
        assert_eq!(t.created_clique(0).unwrap(), 0);
        assert!((t.max_log10_clique_domain_size().unwrap() - 8f64.log10()).abs() < 1e-12);
        let compact = t.compact_junction_tree().unwrap();
        assert_eq!(compact.tree.size(), 2);
        assert_eq!(compact.tree.size_edges(), 1);
    }

    #[test]
    fn fill_ins_are_empty_unless_requested() {
        let g = square();
        let t = DefaultTriangulation::with_graph(
            &g,
            &uniform_domain_sizes(&g, 2),
            TriangulationConfig::default(),
        )
        .unwrap();
        assert!(t.fill_ins().unwrap().is_empty());
        assert_eq!(t.history().unwrap().fill_in_count(), 1);
    }

    #[test]
    fn ordered_driver_computes_its_own_fill_ins() {
        let g = square();
        let mut t = StaticTriangulation::ordered(
            vec![1, 0, 2, 3],
            TriangulationConfig::default().with_fill_ins(true),
        )
        .unwrap();
        t.triangulate_graph(&g, &uniform_domain_sizes(&g, 2)).unwrap();
        assert_eq!(t.fill_ins().unwrap(), BTreeSet::from([Edge::new(0, 2).unwrap()]));
        assert_eq!(t.elimination_order().unwrap(), &[1, 0, 2, 3]);
    }

    #[test]
    fn minimality_drops_redundant_fill_ins() {
        // Path 0-1-2 eliminated middle-first adds a useless 0-2.
        let g = UndiGraph::from_edges(&[(0, 1), (1, 2)]).unwrap();
        let dom = uniform_domain_sizes(&g, 2);
        let cfg = TriangulationConfig::default().with_fill_ins(true);
        let mut plain = StaticTriangulation::ordered(vec![1, 0, 2], cfg).unwrap();
        plain.triangulate_graph(&g, &dom).unwrap();
        assert_eq!(plain.fill_ins().unwrap().len(), 1);

        let mut thin = StaticTriangulation::ordered(vec![1, 0, 2], cfg.with_minimality(true)).unwrap();
        thin.triangulate_graph(&g, &dom).unwrap();
        assert!(thin.fill_ins().unwrap().is_empty());
        assert_eq!(thin.triangulated_graph().unwrap(), &g);
        assert_eq!(thin.max_clique_size().unwrap(), 2);
        thin.validate_invariants().unwrap();
    }

    #[test]
    fn set_graph_resets_the_run() {
        let g = square();
        let mut t = DefaultTriangulation::with_graph(
            &g,
            &uniform_domain_sizes(&g, 2),
            TriangulationConfig::default(),
        )
        .unwrap();
        let first = t.history().unwrap().token();
        let path = UndiGraph::from_edges(&[(0, 1)]).unwrap();
        t.set_graph(&path, &uniform_domain_sizes(&path, 2)).unwrap();
        assert_eq!(t.state(), TriangulationState::Uninitialized);
        assert!(t.cliques().is_err());
        t.triangulate().unwrap();
        assert_ne!(t.history().unwrap().token(), first);
        t.clear();
        assert!(t.original_graph().is_none());
    }

    #[test]
    fn failed_runs_expose_nothing() {
        let g = square();
        let mut t = StaticTriangulation::ordered(vec![0, 1, 2], TriangulationConfig::default()).unwrap();
        assert_eq!(
            t.triangulate_graph(&g, &uniform_domain_sizes(&g, 2)),
            Err(TriangulationError::OrderDoesNotMatchGraph { missing: 1, extra: 0 })
        );
        assert_eq!(t.state(), TriangulationState::Eliminating);
        assert_eq!(t.cliques().err(), Some(TriangulationError::NotTriangulated));
        let dom: DomainSizes = [(0, 2)].into_iter().collect();
        assert_eq!(
            t.set_graph(&g, &dom),
            Err(TriangulationError::MissingDomainSize(1))
        );
    }

    #[test]
    fn new_instance_keeps_the_strategy_kind() {
        let t = StaticTriangulation::ordered(vec![1, 0], TriangulationConfig::default()).unwrap();
        let mut fresh = t.new_instance();
        let g = UndiGraph::from_edges(&[(0, 1)]).unwrap();
        fresh.triangulate_graph(&g, &uniform_domain_sizes(&g, 3)).unwrap();
        assert_eq!(fresh.elimination_order().unwrap(), &[1, 0]);
    }
}
