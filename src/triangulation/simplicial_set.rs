//! Lazy classification of elimination candidates.
//!
//! A [`SimplicialSet`] owns the working graph of one triangulation run and
//! keeps three candidate queues over it:
//!
//! - **simplicial**: the neighbours already form a clique (no fill-in);
//! - **almost simplicial**: exactly one neighbour pair is missing;
//! - **quasi simplicial**: `present / possible` neighbour pairs is at least
//!   `quasi_ratio`.
//!
//! Every queue is ordered by the log-weight of the clique `{v} ∪ N(v)`, i.e.
//! `ln(|dom v| · Π |dom n|)`, ties broken by ascending `NodeId`. The product
//! is taken exactly in `u128` and only then logged, so cliques with equal
//! cardinality products get bit-identical weights. Products that overflow
//! fall back to a sum of logarithms in ascending order.
//!
//! ## Laziness
//! Mutations never reclassify anything. They only add the nodes whose
//! neighbourhood (or the edges among it) changed to a dirty set. A node is
//! reclassified when its own tier or weight is queried; queue-wide queries
//! drain the whole dirty set first. Reclassification is a pure function of
//! the working graph (see [`classify`]).
//!
//! ## Acceptance limit
//! Almost- and quasi-simplicial candidates are only offered while their
//! log-weight stays within `log_tree_width + ln(1 + threshold)`, where
//! `log_tree_width` is the largest clique log-weight eliminated so far.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use hashbrown::{HashMap as FastMap, HashSet as FastSet};
use itertools::Itertools;

use crate::debug_invariants::DebugInvariants;
use crate::error::TriangulationError;
use crate::graph::{Edge, NodeId, UndiGraph};
use crate::triangulation::config::{DomainSizes, TriangulationConfig, log_domain_sizes};

/// Classification of a working-graph node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeTier {
    Simplicial,
    AlmostSimplicial,
    QuasiSimplicial,
    Unclassified,
}

/// Classify a node from the number of `present` and `possible` edges among
/// its neighbours.
///
/// A node with fewer than two neighbours is simplicial.
pub fn classify(present: usize, possible: usize, quasi_ratio: f64) -> NodeTier {
    match possible.saturating_sub(present) {
        0 => NodeTier::Simplicial,
        1 => NodeTier::AlmostSimplicial,
        _ if present as f64 >= quasi_ratio * possible as f64 => NodeTier::QuasiSimplicial,
        _ => NodeTier::Unclassified,
    }
}

/// Totally ordered `f64` used as a queue key.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogWeight(pub f64);

impl Eq for LogWeight {}

impl PartialOrd for LogWeight {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LogWeight {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Min-queue of candidates keyed by `(weight, node)`.
#[derive(Clone, Debug, Default)]
pub struct CandidateQueue {
    order: BTreeSet<(LogWeight, NodeId)>,
    weights: FastMap<NodeId, LogWeight>,
}

impl CandidateQueue {
    fn insert(&mut self, node: NodeId, weight: f64) {
        let w = LogWeight(weight);
        if let Some(old) = self.weights.insert(node, w) {
            self.order.remove(&(old, node));
        }
        self.order.insert((w, node));
    }

    fn remove(&mut self, node: NodeId) -> bool {
        match self.weights.remove(&node) {
            Some(w) => self.order.remove(&(w, node)),
            None => false,
        }
    }

    /// Lowest-weight candidate and its weight.
    pub fn top(&self) -> Option<(NodeId, f64)> {
        self.order.first().map(|&(w, n)| (n, w.0))
    }

    /// Candidates in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.order.iter().map(|&(w, n)| (n, w.0))
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.weights.contains_key(&node)
    }

    pub fn weight(&self, node: NodeId) -> Option<f64> {
        self.weights.get(&node).map(|w| w.0)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Working graph plus lazily maintained candidate queues.
#[derive(Clone, Debug)]
pub struct SimplicialSet {
    graph: UndiGraph,
    domain_sizes: HashMap<NodeId, usize>,
    quasi_ratio: f64,
    log_threshold: f64,
    log_tree_width: f64,
    simplicial: CandidateQueue,
    almost_simplicial: CandidateQueue,
    quasi_simplicial: CandidateQueue,
    by_weight: CandidateQueue,
    tiers: FastMap<NodeId, NodeTier>,
    dirty: FastSet<NodeId>,
    record_fill_ins: bool,
    fill_ins: Vec<Edge>,
}

impl SimplicialSet {
    /// Take ownership of `graph` and prepare lazy classification.
    ///
    /// # Errors
    /// Invalid configuration, or a node without a (positive) domain size.
    pub fn new(
        graph: UndiGraph,
        domain_sizes: &DomainSizes,
        config: &TriangulationConfig,
    ) -> Result<Self, TriangulationError> {
        config.validate()?;
        log_domain_sizes(&graph, domain_sizes)?;
        let domain_sizes: HashMap<NodeId, usize> = graph
            .nodes()
            .filter_map(|v| domain_sizes.get(&v).map(|&d| (v, d)))
            .collect();
        let dirty: FastSet<NodeId> = graph.nodes().collect();
        Ok(Self {
            graph,
            domain_sizes,
            quasi_ratio: config.quasi_ratio,
            log_threshold: config.threshold.ln_1p(),
            log_tree_width: 0.0,
            simplicial: CandidateQueue::default(),
            almost_simplicial: CandidateQueue::default(),
            quasi_simplicial: CandidateQueue::default(),
            by_weight: CandidateQueue::default(),
            tiers: FastMap::with_capacity(dirty.len()),
            dirty,
            record_fill_ins: false,
            fill_ins: Vec::new(),
        })
    }

    /// Read-only view of the working graph.
    #[inline]
    pub fn graph(&self) -> &UndiGraph {
        &self.graph
    }

    /// Largest clique log-weight eliminated so far.
    #[inline]
    pub fn log_tree_width(&self) -> f64 {
        self.log_tree_width
    }

    /// Start (or stop and clear) recording fill-ins added by [`make_clique`](Self::make_clique).
    pub fn set_fill_ins(&mut self, on: bool) {
        self.record_fill_ins = on;
        if !on {
            self.fill_ins.clear();
        }
    }

    /// Fill-ins recorded since recording was switched on, in creation order.
    pub fn fill_ins(&self) -> &[Edge] {
        &self.fill_ins
    }

    // --- queries ---------------------------------------------------------

    /// Whether the neighbours of `id` currently form a clique.
    pub fn is_simplicial(&mut self, id: NodeId) -> Result<bool, TriangulationError> {
        Ok(self.tier(id)? == NodeTier::Simplicial)
    }

    /// Current tier of `id`, reclassifying it first if needed.
    pub fn tier(&mut self, id: NodeId) -> Result<NodeTier, TriangulationError> {
        self.require_node(id)?;
        self.refresh(id);
        Ok(self.tiers.get(&id).copied().unwrap_or(NodeTier::Unclassified))
    }

    /// Log-weight of the clique `{id} ∪ N(id)`.
    pub fn log_weight(&mut self, id: NodeId) -> Result<f64, TriangulationError> {
        self.require_node(id)?;
        self.refresh(id);
        self.by_weight
            .weight(id)
            .ok_or(TriangulationError::NodeNotFound(id))
    }

    pub fn has_simplicial_node(&mut self) -> bool {
        self.best_simplicial_node().is_some()
    }

    pub fn has_almost_simplicial_node(&mut self) -> bool {
        self.best_almost_simplicial_node().is_some()
    }

    pub fn has_quasi_simplicial_node(&mut self) -> bool {
        self.best_quasi_simplicial_node().is_some()
    }

    /// Lowest-weight simplicial node; `None` when the tier is empty.
    pub fn best_simplicial_node(&mut self) -> Option<NodeId> {
        self.update_all();
        self.simplicial.top().map(|(n, _)| n)
    }

    /// Lowest-weight almost-simplicial node within the acceptance limit;
    /// `None` when no candidate qualifies.
    pub fn best_almost_simplicial_node(&mut self) -> Option<NodeId> {
        self.update_all();
        let limit = self.limit();
        self.almost_simplicial
            .top()
            .filter(|&(_, w)| w <= limit)
            .map(|(n, _)| n)
    }

    /// Lowest-weight quasi-simplicial node within the acceptance limit;
    /// `None` when no candidate qualifies.
    pub fn best_quasi_simplicial_node(&mut self) -> Option<NodeId> {
        self.update_all();
        let limit = self.limit();
        self.quasi_simplicial
            .top()
            .filter(|&(_, w)| w <= limit)
            .map(|(n, _)| n)
    }

    /// Lowest-weight node of the whole working graph.
    pub fn best_node_by_weight(&mut self) -> Option<NodeId> {
        self.update_all();
        self.by_weight.top().map(|(n, _)| n)
    }

    /// All simplicial nodes, in priority order.
    pub fn all_simplicial_nodes(&mut self) -> &CandidateQueue {
        self.update_all();
        &self.simplicial
    }

    /// All almost-simplicial nodes (acceptance limit not applied).
    pub fn all_almost_simplicial_nodes(&mut self) -> &CandidateQueue {
        self.update_all();
        &self.almost_simplicial
    }

    /// All quasi-simplicial nodes (acceptance limit not applied).
    pub fn all_quasi_simplicial_nodes(&mut self) -> &CandidateQueue {
        self.update_all();
        &self.quasi_simplicial
    }

    /// Every node of the working graph, by ascending weight.
    pub fn all_nodes_by_weight(&mut self) -> &CandidateQueue {
        self.update_all();
        &self.by_weight
    }

    /// Whether a clique log-weight is within the almost/quasi acceptance limit.
    #[inline]
    pub fn within_limit(&self, log_weight: f64) -> bool {
        log_weight <= self.limit()
    }

    // --- mutations -------------------------------------------------------

    /// Add the edge `a`–`b` between existing nodes. Not recorded as fill-in.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<bool, TriangulationError> {
        self.require_node(a)?;
        self.require_node(b)?;
        let added = self.graph.add_edge(a, b)?;
        if added {
            self.touch_edge(a, b);
        }
        Ok(added)
    }

    /// Remove the edge `a`–`b` (and forget it as a fill-in).
    pub fn erase_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        if !self.graph.exists_edge(a, b) {
            return false;
        }
        self.touch_edge(a, b);
        self.graph.erase_edge(a, b);
        if let Ok(e) = Edge::new(a, b) {
            self.fill_ins.retain(|f| *f != e);
        }
        true
    }

    /// Remove `id` from the graph and from every queue.
    pub fn erase_node(&mut self, id: NodeId) -> Result<(), TriangulationError> {
        let nbrs: Vec<NodeId> = self.graph.neighbours(id)?.iter().copied().collect();
        self.graph.erase_node(id);
        self.forget(id);
        self.dirty.extend(nbrs);
        Ok(())
    }

    /// Connect every pair of neighbours of `id`; returns the added edges.
    pub fn make_clique(&mut self, id: NodeId) -> Result<Vec<Edge>, TriangulationError> {
        let nbrs: Vec<NodeId> = self.graph.neighbours(id)?.iter().copied().collect();
        let mut added = Vec::new();
        for (a, b) in nbrs.into_iter().tuple_combinations() {
            if self.graph.exists_edge(a, b) {
                continue;
            }
            let edge = Edge::new(a, b)?;
            self.graph.insert_edge(edge);
            self.touch_edge(a, b);
            if self.record_fill_ins {
                self.fill_ins.push(edge);
            }
            added.push(edge);
        }
        Ok(added)
    }

    /// Remove a simplicial node, raising the tree width to its clique weight.
    ///
    /// # Errors
    /// [`TriangulationError::NotSimplicial`] if the neighbours of `id` are not a clique.
    pub fn erase_clique(&mut self, id: NodeId) -> Result<(), TriangulationError> {
        if !self.is_simplicial(id)? {
            return Err(TriangulationError::NotSimplicial(id));
        }
        let w = self.log_weight(id)?;
        if w > self.log_tree_width {
            self.log_tree_width = w;
        }
        self.erase_node(id)
    }

    /// Eliminate `id`: complete its neighbourhood, then remove it.
    /// Returns the fill-ins this step introduced.
    pub fn eliminate(&mut self, id: NodeId) -> Result<Vec<Edge>, TriangulationError> {
        let added = self.make_clique(id)?;
        self.erase_clique(id)?;
        Ok(added)
    }

    // --- internals -------------------------------------------------------

    #[inline]
    fn limit(&self) -> f64 {
        self.log_tree_width + self.log_threshold
    }

    #[inline]
    fn domain_size(&self, v: NodeId) -> usize {
        self.domain_sizes.get(&v).copied().unwrap_or(1)
    }

    /// `ln` of the cardinality product of `{id} ∪ nbrs`.
    fn clique_log_weight(&self, id: NodeId, nbrs: &BTreeSet<NodeId>) -> f64 {
        let members = || std::iter::once(id).chain(nbrs.iter().copied());
        let exact = members().try_fold(1u128, |acc, v| acc.checked_mul(self.domain_size(v) as u128));
        match exact {
            Some(product) => (product as f64).ln(),
            None => members()
                .map(|v| (self.domain_size(v) as f64).ln())
                .sorted_by(f64::total_cmp)
                .sum(),
        }
    }

    fn require_node(&self, id: NodeId) -> Result<(), TriangulationError> {
        if self.graph.exists_node(id) {
            Ok(())
        } else {
            Err(TriangulationError::NodeNotFound(id))
        }
    }

    /// Mark the endpoints and their common neighbours dirty.
    fn touch_edge(&mut self, a: NodeId, b: NodeId) {
        self.dirty.insert(a);
        self.dirty.insert(b);
        if let (Ok(na), Ok(nb)) = (self.graph.neighbours(a), self.graph.neighbours(b)) {
            self.dirty.extend(na.intersection(nb).copied());
        }
    }

    fn forget(&mut self, id: NodeId) {
        self.simplicial.remove(id);
        self.almost_simplicial.remove(id);
        self.quasi_simplicial.remove(id);
        self.by_weight.remove(id);
        self.tiers.remove(&id);
        self.dirty.remove(&id);
    }

    fn refresh(&mut self, id: NodeId) {
        if self.dirty.remove(&id) {
            self.reclassify(id);
        }
    }

    fn update_all(&mut self) {
        for id in std::mem::take(&mut self.dirty) {
            self.reclassify(id);
        }
    }

    fn reclassify(&mut self, id: NodeId) {
        let (weight, present, possible) = match self.graph.neighbours(id) {
            Ok(nbrs) => {
                let weight = self.clique_log_weight(id, nbrs);
                let k = nbrs.len();
                let possible = k * k.saturating_sub(1) / 2;
                let present = nbrs
                    .iter()
                    .tuple_combinations()
                    .filter(|&(&a, &b)| self.graph.exists_edge(a, b))
                    .count();
                (weight, present, possible)
            }
            Err(_) => {
                self.forget(id);
                return;
            }
        };
        let tier = classify(present, possible, self.quasi_ratio);
        self.simplicial.remove(id);
        self.almost_simplicial.remove(id);
        self.quasi_simplicial.remove(id);
        match tier {
            NodeTier::Simplicial => self.simplicial.insert(id, weight),
            NodeTier::AlmostSimplicial => self.almost_simplicial.insert(id, weight),
            NodeTier::QuasiSimplicial => self.quasi_simplicial.insert(id, weight),
            NodeTier::Unclassified => {}
        }
        self.by_weight.insert(id, weight);
        self.tiers.insert(id, tier);
    }
}

impl DebugInvariants for SimplicialSet {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "SimplicialSet");
    }

    fn validate_invariants(&self) -> Result<(), TriangulationError> {
        self.graph.validate_invariants()?;
        for v in self.graph.nodes() {
            let memberships = [
                &self.simplicial,
                &self.almost_simplicial,
                &self.quasi_simplicial,
            ]
            .iter()
            .filter(|q| q.contains(v))
            .count();
            if self.dirty.contains(&v) {
                continue;
            }
            if memberships > 1 {
                return Err(TriangulationError::InvariantViolation(format!(
                    "node {v} sits in {memberships} tiers"
                )));
            }
            if !self.by_weight.contains(v) {
                return Err(TriangulationError::InvariantViolation(format!(
                    "clean node {v} has no weight"
                )));
            }
            let nbrs = self.graph.neighbours(v)?;
            let k = nbrs.len();
            let present = nbrs
                .iter()
                .tuple_combinations()
                .filter(|&(&a, &b)| self.graph.exists_edge(a, b))
                .count();
            let expected = classify(present, k * k.saturating_sub(1) / 2, self.quasi_ratio);
            if self.tiers.get(&v) != Some(&expected) {
                return Err(TriangulationError::InvariantViolation(format!(
                    "clean node {v} is tagged {:?}, expected {expected:?}",
                    self.tiers.get(&v)
                )));
            }
        }
        for (n, _) in self.by_weight.iter() {
            if !self.graph.exists_node(n) {
                return Err(TriangulationError::InvariantViolation(format!(
                    "eliminated node {n} is still queued"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulation::config::uniform_domain_sizes;

    fn set_for(edges: &[(NodeId, NodeId)], cfg: TriangulationConfig) -> SimplicialSet {
        let g = UndiGraph::from_edges(edges).unwrap();
        let dom = uniform_domain_sizes(&g, 2);
        SimplicialSet::new(g, &dom, &cfg).unwrap()
    }

    #[test]
    fn classify_is_pure() {
        assert_eq!(classify(0, 0, 0.99), NodeTier::Simplicial);
        assert_eq!(classify(3, 3, 0.99), NodeTier::Simplicial);
        assert_eq!(classify(2, 3, 0.99), NodeTier::AlmostSimplicial);
        assert_eq!(classify(8, 10, 0.75), NodeTier::QuasiSimplicial);
        assert_eq!(classify(8, 10, 0.9), NodeTier::Unclassified);
    }

    #[test]
    fn square_has_only_almost_simplicial_nodes() {
        let mut s = set_for(&[(0, 1), (1, 2), (2, 3), (3, 0)], TriangulationConfig::default());
        assert!(!s.has_simplicial_node());
        assert_eq!(s.all_almost_simplicial_nodes().len(), 4);
        // ln 8 exceeds the initial limit of ln 1.
        assert_eq!(s.best_almost_simplicial_node(), None);
        assert_eq!(s.best_node_by_weight(), Some(0));
        s.validate_invariants().unwrap();
    }

    #[test]
    fn eliminating_square_node_adds_chord() {
        let mut s = set_for(&[(0, 1), (1, 2), (2, 3), (3, 0)], TriangulationConfig::default());
        s.set_fill_ins(true);
        assert!(matches!(s.erase_clique(0), Err(TriangulationError::NotSimplicial(0))));
        let fill = s.eliminate(0).unwrap();
        assert_eq!(fill, vec![Edge::new(1, 3).unwrap()]);
        assert_eq!(s.fill_ins(), &[Edge::new(3, 1).unwrap()]);
        assert!((s.log_tree_width() - 8f64.ln()).abs() < 1e-12);
        assert_eq!(s.all_simplicial_nodes().len(), 3);
        assert_eq!(s.best_simplicial_node(), Some(1));
        s.validate_invariants().unwrap();
    }

    #[test]
    fn complete_graph_is_all_simplicial() {
        let mut s = set_for(&[(0, 1), (0, 2), (1, 2), (0, 3), (1, 3), (2, 3)], TriangulationConfig::default());
        let all: Vec<_> = s.all_simplicial_nodes().iter().map(|(n, _)| n).collect();
        assert_eq!(all, vec![0, 1, 2, 3]);
        assert!(s.make_clique(2).unwrap().is_empty());
    }

    #[test]
    fn weights_follow_domain_sizes() {
        let g = UndiGraph::from_edges(&[(0, 1), (1, 2)]).unwrap();
        let dom: DomainSizes = [(0, 10), (1, 2), (2, 3)].into_iter().collect();
        let mut s = SimplicialSet::new(g, &dom, &TriangulationConfig::default()).unwrap();
        assert!((s.log_weight(2).unwrap() - 6f64.ln()).abs() < 1e-12);
        assert!((s.log_weight(0).unwrap() - 20f64.ln()).abs() < 1e-12);
        // Both ends are simplicial; 2 is lighter.
        assert_eq!(s.best_simplicial_node(), Some(2));
        assert_eq!(s.log_weight(7), Err(TriangulationError::NodeNotFound(7)));
    }

    #[test]
    fn equal_products_tie_on_node_id() {
        // Two disjoint triangles whose clique products are both 18, reached
        // through different factor orders.
        let g = UndiGraph::from_edges(&[(0, 2), (2, 3), (3, 0), (1, 4), (4, 5), (5, 1)]).unwrap();
        let dom: DomainSizes = [(0, 2), (2, 3), (3, 3), (1, 3), (4, 3), (5, 2)].into_iter().collect();
        let mut s = SimplicialSet::new(g, &dom, &TriangulationConfig::default()).unwrap();
        assert_eq!(s.log_weight(0).unwrap(), s.log_weight(1).unwrap());
        assert_eq!(s.best_simplicial_node(), Some(0));
        let order: Vec<_> = s.all_simplicial_nodes().iter().map(|(n, _)| n).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn equal_products_from_different_factors_tie_on_node_id() {
        // 6·1·3 and 2·3·3 are both 18.
        let g = UndiGraph::from_edges(&[(0, 2), (2, 4), (4, 0), (1, 3), (3, 5), (5, 1)]).unwrap();
        let dom: DomainSizes = [(0, 6), (2, 1), (4, 3), (1, 2), (3, 3), (5, 3)].into_iter().collect();
        let mut s = SimplicialSet::new(g, &dom, &TriangulationConfig::default()).unwrap();
        for v in 1..6 {
            assert_eq!(s.log_weight(v).unwrap(), s.log_weight(0).unwrap());
        }
        assert_eq!(s.best_simplicial_node(), Some(0));
        assert_eq!(s.best_node_by_weight(), Some(0));
        s.eliminate(0).unwrap();
        // {2, 4} now weighs 1·3.
        assert_eq!(s.best_simplicial_node(), Some(2));
    }

    #[test]
    fn overflowing_products_fall_back_to_log_sums() {
        let nodes: Vec<NodeId> = (0..6).collect();
        let edges: Vec<_> = nodes.iter().copied().tuple_combinations().collect();
        let g = UndiGraph::from_edges(&edges).unwrap();
        let dom = uniform_domain_sizes(&g, usize::MAX);
        let mut s = SimplicialSet::new(g, &dom, &TriangulationConfig::default()).unwrap();
        let expected = 6.0 * (usize::MAX as f64).ln();
        assert!((s.log_weight(3).unwrap() - expected).abs() < 1e-9);
        assert_eq!(s.best_simplicial_node(), Some(0));
    }

    #[test]
    fn quasi_simplicial_needs_ratio_and_limit() {
        // Node 0 adjacent to 1..=5; neighbours complete except 1-2 and 3-4.
        let mut edges = vec![(0, 1), (0, 2), (0, 3), (0, 4), (0, 5)];
        for (a, b) in (1..=5).tuple_combinations() {
            if (a, b) != (1, 2) && (a, b) != (3, 4) {
                edges.push((a, b));
            }
        }
        let loose = TriangulationConfig::default()
            .with_quasi_ratio(0.75)
            .with_threshold(100.0);
        let mut s = set_for(&edges, loose);
        assert_eq!(s.tier(0).unwrap(), NodeTier::QuasiSimplicial);
        assert_eq!(s.best_quasi_simplicial_node(), Some(0));

        let strict = TriangulationConfig::default().with_quasi_ratio(0.75);
        let mut s = set_for(&edges, strict);
        assert!(s.all_quasi_simplicial_nodes().contains(0));
        assert_eq!(s.best_quasi_simplicial_node(), None);
    }

    #[test]
    fn edits_are_reclassified_lazily() {
        let mut s = set_for(&[(0, 1), (1, 2), (2, 0)], TriangulationConfig::default());
        assert!(s.is_simplicial(0).unwrap());
        assert!(s.erase_edge(1, 2));
        assert!(!s.is_simplicial(0).unwrap());
        assert_eq!(s.tier(0).unwrap(), NodeTier::AlmostSimplicial);
        assert!(s.add_edge(1, 2).unwrap());
        assert!(s.is_simplicial(0).unwrap());
        s.erase_node(1).unwrap();
        assert_eq!(s.tier(1), Err(TriangulationError::NodeNotFound(1)));
        s.validate_invariants().unwrap();
    }

    #[test]
    fn switching_fill_ins_off_clears_them() {
        let mut s = set_for(&[(0, 1), (0, 2)], TriangulationConfig::default());
        s.set_fill_ins(true);
        s.eliminate(0).unwrap();
        assert_eq!(s.fill_ins().len(), 1);
        s.set_fill_ins(false);
        assert!(s.fill_ins().is_empty());
    }

    #[test]
    fn missing_domain_size_fails_at_setup() {
        let g = UndiGraph::from_edges(&[(0, 1)]).unwrap();
        let dom: DomainSizes = [(0, 2)].into_iter().collect();
        assert_eq!(
            SimplicialSet::new(g, &dom, &TriangulationConfig::default()).err(),
            Some(TriangulationError::MissingDomainSize(1))
        );
    }
}
