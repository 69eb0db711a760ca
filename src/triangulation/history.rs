//! Frozen record of a completed elimination run.
//!
//! An [`EliminationHistory`] is built once, when a driver reaches
//! `Triangulated`, and never mutated afterwards. Clique ids are elimination
//! steps: clique `i` is the one created when `order[i]` was eliminated.

use std::collections::{BTreeSet, HashMap};
use std::hash::{DefaultHasher, Hash, Hasher};

use itertools::Itertools;

use crate::debug_invariants::DebugInvariants;
use crate::error::TriangulationError;
use crate::graph::{CliqueGraph, CliqueId, Edge, NodeId, UndiGraph, is_perfect_elimination_order};

/// Identity of one completed run.
///
/// Junction-tree builders remember the token of the run they were attached
/// to and refuse to serve any other history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RunToken {
    generation: u64,
    fingerprint: u64,
}

impl RunToken {
    fn new(generation: u64, order: &[NodeId], cliques: &[BTreeSet<NodeId>]) -> Self {
        let mut h = DefaultHasher::new();
        order.hash(&mut h);
        cliques.hash(&mut h);
        Self {
            generation,
            fingerprint: h.finish(),
        }
    }

    /// Run counter of the driver that produced the history.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Elimination order, cliques and elimination tree of a finished run.
#[derive(Clone, Debug)]
pub struct EliminationHistory {
    token: RunToken,
    original: UndiGraph,
    log_domain_sizes: HashMap<NodeId, f64>,
    order: Vec<NodeId>,
    positions: HashMap<NodeId, usize>,
    cliques: Vec<BTreeSet<NodeId>>,
    parents: Vec<Option<CliqueId>>,
    triangulated: UndiGraph,
    fill_ins: Option<BTreeSet<Edge>>,
}

impl EliminationHistory {
    /// Freeze a run. `cliques[i]` must be `order[i]` plus its neighbours at
    /// elimination time; `fill_ins` is `None` when they were not requested.
    pub(crate) fn new(
        generation: u64,
        original: UndiGraph,
        log_domain_sizes: HashMap<NodeId, f64>,
        order: Vec<NodeId>,
        cliques: Vec<BTreeSet<NodeId>>,
        fill_ins: Option<BTreeSet<Edge>>,
    ) -> Self {
        let positions: HashMap<NodeId, usize> =
            order.iter().enumerate().map(|(i, &v)| (v, i)).collect();
        let parents = order
            .iter()
            .zip(&cliques)
            .map(|(&v, clique)| {
                clique
                    .iter()
                    .filter(|&&w| w != v)
                    .filter_map(|w| positions.get(w).copied())
                    .min()
            })
            .collect();
        let triangulated = fill_graph(&original, &cliques);
        Self {
            token: RunToken::new(generation, &order, &cliques),
            original,
            log_domain_sizes,
            order,
            positions,
            cliques,
            parents,
            triangulated,
            fill_ins,
        }
    }

    pub fn token(&self) -> RunToken {
        self.token
    }

    /// The graph the run started from.
    pub fn original_graph(&self) -> &UndiGraph {
        &self.original
    }

    /// Original graph plus every surviving fill-in.
    pub fn triangulated_graph(&self) -> &UndiGraph {
        &self.triangulated
    }

    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    pub fn reverse_order(&self) -> Vec<NodeId> {
        self.order.iter().rev().copied().collect()
    }

    /// Step at which `node` was eliminated.
    pub fn position(&self, node: NodeId) -> Option<usize> {
        self.positions.get(&node).copied()
    }

    /// Cliques indexed by elimination step.
    pub fn cliques(&self) -> &[BTreeSet<NodeId>] {
        &self.cliques
    }

    pub fn clique(&self, id: CliqueId) -> Option<&BTreeSet<NodeId>> {
        self.cliques.get(id)
    }

    /// Clique created when `node` was eliminated.
    pub fn created_clique(&self, node: NodeId) -> Option<CliqueId> {
        self.position(node)
    }

    /// Elimination-tree parent of clique `id`: the clique of its earliest
    /// eliminated neighbour. `None` for roots.
    pub fn parent(&self, id: CliqueId) -> Option<CliqueId> {
        self.parents.get(id).copied().flatten()
    }

    pub fn max_clique_size(&self) -> usize {
        self.cliques.iter().map(BTreeSet::len).max().unwrap_or(0)
    }

    /// Fill-ins of the run, if they were requested before it started.
    pub fn fill_ins(&self) -> Option<&BTreeSet<Edge>> {
        self.fill_ins.as_ref()
    }

    /// Number of fill-ins, whether or not they were materialised.
    pub fn fill_in_count(&self) -> usize {
        self.triangulated.size_edges() - self.original.size_edges()
    }

    /// `Σ ln |dom v|` over clique `id`.
    pub fn clique_log_weight(&self, id: CliqueId) -> Option<f64> {
        self.clique(id).map(|c| {
            c.iter()
                .map(|v| self.log_domain_sizes.get(v).copied().unwrap_or(0.0))
                .sum()
        })
    }

    /// Largest `log10` of a clique's joint domain size (0 when empty).
    pub fn max_log10_clique_domain_size(&self) -> f64 {
        (0..self.cliques.len())
            .filter_map(|id| self.clique_log_weight(id))
            .fold(0.0, f64::max)
            / std::f64::consts::LN_10
    }

    /// `ln Σ_c |dom c|`: the natural log of the total table size over all
    /// cliques. `-∞` when there are no cliques.
    pub fn log_total_weight(&self) -> f64 {
        let weights: Vec<f64> = (0..self.cliques.len())
            .filter_map(|id| self.clique_log_weight(id))
            .collect();
        let Some(max) = weights.iter().copied().reduce(f64::max) else {
            return f64::NEG_INFINITY;
        };
        max + weights.iter().map(|w| (w - max).exp()).sum::<f64>().ln()
    }

    /// One clique per eliminated node, each linked to its parent's clique.
    /// A disconnected input yields a forest with one tree per component.
    pub fn elimination_tree(&self) -> CliqueGraph {
        let mut tree = CliqueGraph::new();
        for (id, clique) in self.cliques.iter().enumerate() {
            tree.add_clique(id, clique.clone());
        }
        for (id, parent) in self.parents.iter().enumerate() {
            if let Some(p) = *parent {
                // Both ids were inserted above and `p != id`.
                let _ = tree.add_edge(id, p);
            }
        }
        tree
    }
}

/// `original` plus every pair inside each clique.
pub(crate) fn fill_graph(original: &UndiGraph, cliques: &[BTreeSet<NodeId>]) -> UndiGraph {
    let mut g = original.clone();
    for clique in cliques {
        for (&a, &b) in clique.iter().tuple_combinations() {
            g.insert_edge(Edge::ordered(a, b));
        }
    }
    g
}

impl DebugInvariants for EliminationHistory {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "EliminationHistory");
    }

    fn validate_invariants(&self) -> Result<(), TriangulationError> {
        if self.order.len() != self.original.size() || self.positions.len() != self.order.len() {
            return Err(TriangulationError::InvariantViolation(format!(
                "order of {} nodes for a graph of {}",
                self.order.len(),
                self.original.size()
            )));
        }
        if self.cliques.len() != self.order.len() {
            return Err(TriangulationError::InvariantViolation(format!(
                "{} cliques for {} eliminations",
                self.cliques.len(),
                self.order.len()
            )));
        }
        for (i, (&v, clique)) in self.order.iter().zip(&self.cliques).enumerate() {
            if !clique.contains(&v) {
                return Err(TriangulationError::InvariantViolation(format!(
                    "clique {i} does not contain its node {v}"
                )));
            }
            if clique.iter().any(|w| self.positions.get(w).is_none_or(|&p| p < i)) {
                return Err(TriangulationError::InvariantViolation(format!(
                    "clique {i} holds a node eliminated before {v}"
                )));
            }
        }
        if !is_perfect_elimination_order(&self.triangulated, &self.order) {
            return Err(TriangulationError::InvariantViolation(
                "elimination order is not perfect for the triangulated graph".into(),
            ));
        }
        if let Some(fill) = &self.fill_ins {
            if let Some(e) = fill
                .iter()
                .find(|e| self.original.exists_edge(e.first(), e.second()))
            {
                return Err(TriangulationError::InvariantViolation(format!(
                    "fill-in {e} is an original edge"
                )));
            }
            if fill.len() != self.fill_in_count() {
                return Err(TriangulationError::InvariantViolation(format!(
                    "{} recorded fill-ins, {} added edges",
                    fill.len(),
                    self.fill_in_count()
                )));
            }
        }
        self.triangulated.validate_invariants()
    }
}
