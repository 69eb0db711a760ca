//! Unconstrained heuristic elimination.

use crate::error::TriangulationError;
use crate::graph::{Edge, NodeId, UndiGraph};
use crate::triangulation::config::{DomainSizes, TriangulationConfig};
use crate::triangulation::simplicial_set::SimplicialSet;
use crate::triangulation::strategy::EliminationSequenceStrategy;

/// Tiered heuristic: a simplicial node if any (no fill-in), else the best
/// almost-simplicial node within tolerance, else the best quasi-simplicial
/// node within tolerance, else the node with the lightest clique.
///
/// Every choice is the minimum of `(clique log-weight, NodeId)`, so two runs
/// on the same input always produce the same order.
#[derive(Debug, Clone)]
pub struct DefaultEliminationStrategy {
    config: TriangulationConfig,
    set: Option<SimplicialSet>,
    want_fill_ins: bool,
}

impl Default for DefaultEliminationStrategy {
    fn default() -> Self {
        Self::new(TriangulationConfig::default())
    }
}

impl DefaultEliminationStrategy {
    /// Only `quasi_ratio` and `threshold` of `config` are used here.
    pub fn new(config: TriangulationConfig) -> Self {
        Self {
            config,
            set: None,
            want_fill_ins: false,
        }
    }

    pub fn config(&self) -> &TriangulationConfig {
        &self.config
    }

    /// The candidate classifier of the current run.
    pub fn simplicial_set(&mut self) -> Option<&mut SimplicialSet> {
        self.set.as_mut()
    }
}

impl EliminationSequenceStrategy for DefaultEliminationStrategy {
    fn set_graph(
        &mut self,
        graph: &UndiGraph,
        domain_sizes: &DomainSizes,
    ) -> Result<(), TriangulationError> {
        self.set = None;
        let mut set = SimplicialSet::new(graph.clone(), domain_sizes, &self.config)?;
        set.set_fill_ins(self.want_fill_ins);
        self.set = Some(set);
        Ok(())
    }

    fn graph(&self) -> Option<&UndiGraph> {
        self.set.as_ref().map(SimplicialSet::graph)
    }

    fn next_node_to_eliminate(&mut self) -> Result<NodeId, TriangulationError> {
        let set = self.set.as_mut().ok_or(TriangulationError::NoGraph)?;
        set.best_simplicial_node()
            .or_else(|| set.best_almost_simplicial_node())
            .or_else(|| set.best_quasi_simplicial_node())
            .or_else(|| set.best_node_by_weight())
            .ok_or(TriangulationError::NoNodeToEliminate)
    }

    fn elimination_update(&mut self, node: NodeId) -> Result<(), TriangulationError> {
        let set = self.set.as_mut().ok_or(TriangulationError::NoGraph)?;
        let fill = set.eliminate(node)?;
        log::trace!("heuristic elimination of {node}: {} fill-ins", fill.len());
        Ok(())
    }

    fn provides_fill_ins(&self) -> bool {
        self.want_fill_ins
    }

    fn ask_fill_ins(&mut self, ask: bool) {
        self.want_fill_ins = ask;
        if let Some(set) = self.set.as_mut() {
            set.set_fill_ins(ask);
        }
    }

    fn fill_ins(&self) -> &[Edge] {
        self.set
            .as_ref()
            .map(SimplicialSet::fill_ins)
            .unwrap_or_default()
    }

    fn clear(&mut self) {
        self.set = None;
    }

    fn new_instance(&self) -> Box<dyn EliminationSequenceStrategy> {
        let mut fresh = Self::new(self.config);
        fresh.want_fill_ins = self.want_fill_ins;
        Box::new(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulation::config::uniform_domain_sizes;
    use crate::triangulation::simplicial_set::NodeTier;

    fn run(edges: &[(NodeId, NodeId)]) -> (Vec<NodeId>, Vec<Edge>) {
        let g = UndiGraph::from_edges(edges).unwrap();
        let dom = uniform_domain_sizes(&g, 2);
        let mut s = DefaultEliminationStrategy::default();
        s.ask_fill_ins(true);
        s.set_graph(&g, &dom).unwrap();
        let mut order = Vec::new();
        while s.graph().is_some_and(|g| !g.is_empty()) {
            let n = s.next_node_to_eliminate().unwrap();
            s.elimination_update(n).unwrap();
            order.push(n);
        }
        (order, s.fill_ins().to_vec())
    }

    #[test]
    fn square_eliminates_first_node_then_simplicial_ones() {
        let (order, fill) = run(&[(0, 1), (1, 2), (2, 3), (3, 0)]);
        assert_eq!(order, vec![0, 1, 2, 3]);
        assert_eq!(fill, vec![Edge::new(1, 3).unwrap()]);
    }

    #[test]
    fn simplicial_nodes_come_first() {
        // Triangle 0-1-2 plus pendant 3 on 2 and a square 2-4-5-6.
        let (order, _) = run(&[(0, 1), (1, 2), (2, 0), (2, 3), (2, 4), (4, 5), (5, 6), (6, 2)]);
        assert_eq!(&order[..2], &[3, 0]);
    }

    fn first_pick(edges: &[(NodeId, NodeId)], sizes: &[usize], cfg: TriangulationConfig) -> NodeId {
        let g = UndiGraph::from_edges(edges).unwrap();
        let dom: DomainSizes = sizes.iter().copied().enumerate().collect();
        let mut s = DefaultEliminationStrategy::new(cfg);
        s.set_graph(&g, &dom).unwrap();
        s.next_node_to_eliminate().unwrap()
    }

    #[test]
    fn almost_simplicial_beats_lighter_unclassified() {
        // K(2,3) with sides {0, 4} and {1, 2, 3}. Node 0 (weight 8) is
        // unclassified; 1, 2 and 3 are almost simplicial (weight 20).
        let edges = [(0, 1), (0, 2), (0, 3), (4, 1), (4, 2), (4, 3)];
        let sizes = [1, 2, 2, 2, 10];
        let wide = TriangulationConfig::default().with_threshold(100.0);
        assert_eq!(first_pick(&edges, &sizes, wide), 1);
        // Outside the limit the lightest node wins.
        assert_eq!(first_pick(&edges, &sizes, TriangulationConfig::default()), 0);
    }

    #[test]
    fn almost_simplicial_beats_quasi_simplicial() {
        // Hub 0 over the 4-cycle 1-2-3-4: the hub misses two neighbour
        // pairs (quasi), every rim node misses one (almost). All weights
        // are ln 1, so the hub would win any weight or id comparison.
        let edges = [(0, 1), (0, 2), (0, 3), (0, 4), (1, 2), (2, 3), (3, 4), (4, 1)];
        let cfg = TriangulationConfig::default().with_quasi_ratio(0.5);
        let g = UndiGraph::from_edges(&edges).unwrap();
        let mut s = DefaultEliminationStrategy::new(cfg);
        s.set_graph(&g, &uniform_domain_sizes(&g, 1)).unwrap();
        let set = s.simplicial_set().unwrap();
        assert_eq!(set.tier(0).unwrap(), NodeTier::QuasiSimplicial);
        assert_eq!(set.best_quasi_simplicial_node(), Some(0));
        assert_eq!(set.best_almost_simplicial_node(), Some(1));
        assert_eq!(s.next_node_to_eliminate().unwrap(), 1);
    }

    #[test]
    fn quasi_simplicial_beats_weight_fallback() {
        // No simplicial or almost-simplicial node. Node 3 is quasi
        // simplicial with weight 12; unclassified node 1 weighs 4.
        let edges = [
            (0, 2), (0, 3), (0, 4), (0, 6), (1, 2), (1, 3), (1, 6),
            (2, 5), (3, 4), (3, 6), (4, 5), (4, 6), (5, 6),
        ];
        let sizes = [2, 1, 2, 1, 3, 3, 2];
        let cfg = TriangulationConfig::default().with_quasi_ratio(0.6);
        let g = UndiGraph::from_edges(&edges).unwrap();
        let dom: DomainSizes = sizes.iter().copied().enumerate().collect();
        let mut s = DefaultEliminationStrategy::new(cfg.with_threshold(20.0));
        s.set_graph(&g, &dom).unwrap();
        let set = s.simplicial_set().unwrap();
        assert!(!set.has_simplicial_node());
        assert!(set.all_almost_simplicial_nodes().is_empty());
        assert_eq!(set.tier(1).unwrap(), NodeTier::Unclassified);
        assert_eq!(set.best_node_by_weight(), Some(1));
        assert_eq!(s.next_node_to_eliminate().unwrap(), 3);

        assert_eq!(first_pick(&edges, &sizes, cfg), 1);
    }

    #[test]
    fn exhausted_and_unset_strategies_fail() {
        let mut s = DefaultEliminationStrategy::default();
        assert_eq!(s.next_node_to_eliminate(), Err(TriangulationError::NoGraph));
        s.set_graph(&UndiGraph::new(), &DomainSizes::new()).unwrap();
        assert_eq!(
            s.next_node_to_eliminate(),
            Err(TriangulationError::NoNodeToEliminate)
        );
        s.clear();
        assert!(s.graph().is_none());
    }

    #[test]
    fn fill_ins_only_when_asked() {
        let g = UndiGraph::from_edges(&[(0, 1), (0, 2)]).unwrap();
        let dom = uniform_domain_sizes(&g, 3);
        let mut s = DefaultEliminationStrategy::default();
        assert!(!s.provides_fill_ins());
        s.set_graph(&g, &dom).unwrap();
        s.elimination_update(0).unwrap();
        assert!(s.fill_ins().is_empty());
        let fresh = s.new_instance();
        assert!(fresh.graph().is_none());
    }
}
