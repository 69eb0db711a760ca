//! Elimination following a caller-supplied total order.

use std::collections::BTreeSet;

use crate::error::TriangulationError;
use crate::graph::{Edge, NodeId, UndiGraph};
use crate::triangulation::config::DomainSizes;
use crate::triangulation::strategy::{EliminationSequenceStrategy, eliminate_in_graph};

/// Eliminates nodes exactly in the order given to [`set_order`](Self::set_order).
///
/// The order must list every graph node once. Fill-ins are left to the
/// driver: this strategy never reports any.
#[derive(Debug, Clone, Default)]
pub struct OrderedEliminationStrategy {
    order: Option<Vec<NodeId>>,
    graph: Option<UndiGraph>,
    cursor: usize,
    eliminated: BTreeSet<NodeId>,
}

impl OrderedEliminationStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strategy with its order already set.
    pub fn with_order(order: Vec<NodeId>) -> Result<Self, TriangulationError> {
        let mut s = Self::new();
        s.set_order(order)?;
        Ok(s)
    }

    /// Install the total order.
    ///
    /// # Errors
    /// - [`TriangulationError::DuplicateInOrder`] if a node repeats;
    /// - [`TriangulationError::OrderDoesNotMatchGraph`] if a graph is already
    ///   set and the order does not cover exactly its nodes.
    pub fn set_order(&mut self, order: Vec<NodeId>) -> Result<(), TriangulationError> {
        let mut seen = BTreeSet::new();
        for &v in &order {
            if !seen.insert(v) {
                return Err(TriangulationError::DuplicateInOrder(v));
            }
        }
        if let Some(g) = &self.graph {
            check_cover(g, &seen)?;
        }
        self.order = Some(order);
        self.cursor = 0;
        Ok(())
    }

    pub fn order(&self) -> Option<&[NodeId]> {
        self.order.as_deref()
    }
}

/// `nodes` must equal the node set of `graph`.
pub(crate) fn check_cover(
    graph: &UndiGraph,
    nodes: &BTreeSet<NodeId>,
) -> Result<(), TriangulationError> {
    let missing = graph.nodes().filter(|v| !nodes.contains(v)).count();
    let extra = nodes.iter().filter(|&&v| !graph.exists_node(v)).count();
    if missing > 0 || extra > 0 {
        return Err(TriangulationError::OrderDoesNotMatchGraph { missing, extra });
    }
    Ok(())
}

impl EliminationSequenceStrategy for OrderedEliminationStrategy {
    fn set_graph(
        &mut self,
        graph: &UndiGraph,
        _domain_sizes: &DomainSizes,
    ) -> Result<(), TriangulationError> {
        self.graph = None;
        self.cursor = 0;
        self.eliminated.clear();
        if let Some(order) = &self.order {
            let nodes: BTreeSet<NodeId> = order.iter().copied().collect();
            check_cover(graph, &nodes)?;
        }
        self.graph = Some(graph.clone());
        Ok(())
    }

    fn graph(&self) -> Option<&UndiGraph> {
        self.graph.as_ref()
    }

    fn next_node_to_eliminate(&mut self) -> Result<NodeId, TriangulationError> {
        let graph = self.graph.as_ref().ok_or(TriangulationError::NoGraph)?;
        let order = self.order.as_ref().ok_or(TriangulationError::MissingOrder)?;
        let &node = order
            .get(self.cursor)
            .ok_or(TriangulationError::NoNodeToEliminate)?;
        if self.eliminated.contains(&node) {
            return Err(TriangulationError::NodeAlreadyEliminated(node));
        }
        if !graph.exists_node(node) {
            return Err(TriangulationError::NodeNotFound(node));
        }
        Ok(node)
    }

    fn elimination_update(&mut self, node: NodeId) -> Result<(), TriangulationError> {
        let graph = self.graph.as_mut().ok_or(TriangulationError::NoGraph)?;
        eliminate_in_graph(graph, node)?;
        self.eliminated.insert(node);
        if self
            .order
            .as_ref()
            .is_some_and(|o| o.get(self.cursor) == Some(&node))
        {
            self.cursor += 1;
        }
        Ok(())
    }

    fn provides_fill_ins(&self) -> bool {
        false
    }

    fn ask_fill_ins(&mut self, _ask: bool) {}

    fn fill_ins(&self) -> &[Edge] {
        &[]
    }

    fn clear(&mut self) {
        self.graph = None;
        self.cursor = 0;
        self.eliminated.clear();
    }

    fn new_instance(&self) -> Box<dyn EliminationSequenceStrategy> {
        Box::new(Self {
            order: self.order.clone(),
            ..Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulation::config::uniform_domain_sizes;

    fn square() -> UndiGraph {
        UndiGraph::from_edges(&[(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap()
    }

    #[test]
    fn follows_the_given_order() {
        let g = square();
        let dom = uniform_domain_sizes(&g, 2);
        let mut s = OrderedEliminationStrategy::with_order(vec![2, 0, 3, 1]).unwrap();
        s.set_graph(&g, &dom).unwrap();
        let mut seen = Vec::new();
        for _ in 0..4 {
            let n = s.next_node_to_eliminate().unwrap();
            assert_eq!(s.next_node_to_eliminate().unwrap(), n);
            s.elimination_update(n).unwrap();
            seen.push(n);
        }
        assert_eq!(seen, vec![2, 0, 3, 1]);
        assert_eq!(
            s.next_node_to_eliminate(),
            Err(TriangulationError::NoNodeToEliminate)
        );
    }

    #[test]
    fn incomplete_orders_are_rejected() {
        let g = square();
        let dom = uniform_domain_sizes(&g, 2);
        let mut s = OrderedEliminationStrategy::with_order(vec![0, 1, 2]).unwrap();
        assert_eq!(
            s.set_graph(&g, &dom),
            Err(TriangulationError::OrderDoesNotMatchGraph { missing: 1, extra: 0 })
        );
        let mut s = OrderedEliminationStrategy::new();
        s.set_graph(&g, &dom).unwrap();
        assert_eq!(
            s.next_node_to_eliminate(),
            Err(TriangulationError::MissingOrder)
        );
        assert_eq!(
            s.set_order(vec![0, 1, 2, 3, 9]),
            Err(TriangulationError::OrderDoesNotMatchGraph { missing: 0, extra: 1 })
        );
        assert_eq!(
            s.set_order(vec![0, 1, 1, 3]),
            Err(TriangulationError::DuplicateInOrder(1))
        );
    }

    #[test]
    fn out_of_order_elimination_is_reported() {
        let g = square();
        let dom = uniform_domain_sizes(&g, 2);
        let mut s = OrderedEliminationStrategy::with_order(vec![0, 1, 2, 3]).unwrap();
        s.set_graph(&g, &dom).unwrap();
        s.elimination_update(0).unwrap();
        s.elimination_update(2).unwrap();
        assert_eq!(s.next_node_to_eliminate().unwrap(), 1);
        s.elimination_update(1).unwrap();
        assert_eq!(
            s.next_node_to_eliminate(),
            Err(TriangulationError::NodeAlreadyEliminated(2))
        );
    }
}
