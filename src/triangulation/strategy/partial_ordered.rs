//! Layered elimination: a heuristic order constrained by a sequence of
//! disjoint node subsets.

use std::collections::BTreeSet;

use crate::error::TriangulationError;
use crate::graph::{Edge, NodeId, UndiGraph};
use crate::triangulation::config::{DomainSizes, TriangulationConfig};
use crate::triangulation::simplicial_set::SimplicialSet;
use crate::triangulation::strategy::ordered::check_cover;
use crate::triangulation::strategy::{EliminationSequenceStrategy, pick_tiered};

/// Every node of layer `i` is eliminated before any node of layer `i + 1`.
/// Inside a layer the same tiered heuristic as
/// [`DefaultEliminationStrategy`](super::DefaultEliminationStrategy) is applied,
/// restricted to the layer's remaining nodes.
#[derive(Debug, Clone)]
pub struct PartialOrderedEliminationStrategy {
    config: TriangulationConfig,
    layers: Option<Vec<BTreeSet<NodeId>>>,
    set: Option<SimplicialSet>,
    /// Nodes of the current layer still in the working graph.
    remaining: BTreeSet<NodeId>,
    layer: usize,
    want_fill_ins: bool,
}

impl Default for PartialOrderedEliminationStrategy {
    fn default() -> Self {
        Self::new(TriangulationConfig::default())
    }
}

impl PartialOrderedEliminationStrategy {
    pub fn new(config: TriangulationConfig) -> Self {
        Self {
            config,
            layers: None,
            set: None,
            remaining: BTreeSet::new(),
            layer: 0,
            want_fill_ins: false,
        }
    }

    /// Strategy with its layers already set.
    pub fn with_layers(
        config: TriangulationConfig,
        layers: Vec<Vec<NodeId>>,
    ) -> Result<Self, TriangulationError> {
        let mut s = Self::new(config);
        s.set_partial_order(layers)?;
        Ok(s)
    }

    /// Install the layers.
    ///
    /// # Errors
    /// - [`TriangulationError::OverlappingLayers`] if layers overlap;
    /// - [`TriangulationError::OrderDoesNotMatchGraph`] if a graph is already
    ///   set and the layers do not partition its nodes.
    pub fn set_partial_order(&mut self, layers: Vec<Vec<NodeId>>) -> Result<(), TriangulationError> {
        let mut all = BTreeSet::new();
        let mut sets = Vec::with_capacity(layers.len());
        for layer in layers {
            let mut set = BTreeSet::new();
            for v in layer {
                if !all.insert(v) {
                    return Err(TriangulationError::OverlappingLayers(v));
                }
                set.insert(v);
            }
            sets.push(set);
        }
        if let Some(set) = &self.set {
            check_cover(set.graph(), &all)?;
        }
        self.layers = Some(sets);
        self.restart_layers();
        Ok(())
    }

    pub fn layers(&self) -> Option<&[BTreeSet<NodeId>]> {
        self.layers.as_deref()
    }

    /// Index of the layer currently being eliminated.
    pub fn current_layer(&self) -> usize {
        self.layer
    }

    fn restart_layers(&mut self) {
        self.layer = 0;
        self.remaining = self
            .layers
            .as_ref()
            .and_then(|l| l.first().cloned())
            .unwrap_or_default();
    }

    /// Skip layers whose nodes are all gone.
    fn advance(&mut self) {
        let Some(layers) = &self.layers else {
            return;
        };
        while self.remaining.is_empty() && self.layer + 1 < layers.len() {
            self.layer += 1;
            self.remaining = layers[self.layer].clone();
        }
    }
}

impl EliminationSequenceStrategy for PartialOrderedEliminationStrategy {
    fn set_graph(
        &mut self,
        graph: &UndiGraph,
        domain_sizes: &DomainSizes,
    ) -> Result<(), TriangulationError> {
        self.set = None;
        if let Some(layers) = &self.layers {
            let all: BTreeSet<NodeId> = layers.iter().flatten().copied().collect();
            check_cover(graph, &all)?;
        }
        let mut set = SimplicialSet::new(graph.clone(), domain_sizes, &self.config)?;
        set.set_fill_ins(self.want_fill_ins);
        self.set = Some(set);
        self.restart_layers();
        Ok(())
    }

    fn graph(&self) -> Option<&UndiGraph> {
        self.set.as_ref().map(SimplicialSet::graph)
    }

    fn next_node_to_eliminate(&mut self) -> Result<NodeId, TriangulationError> {
        if self.set.is_none() {
            return Err(TriangulationError::NoGraph);
        }
        if self.layers.is_none() {
            return Err(TriangulationError::MissingOrder);
        }
        self.advance();
        let remaining = &self.remaining;
        let set = self.set.as_mut().ok_or(TriangulationError::NoGraph)?;
        pick_tiered(set, |n| remaining.contains(&n)).ok_or(TriangulationError::NoNodeToEliminate)
    }

    fn elimination_update(&mut self, node: NodeId) -> Result<(), TriangulationError> {
        let set = self.set.as_mut().ok_or(TriangulationError::NoGraph)?;
        set.eliminate(node)?;
        if !self.remaining.remove(&node) {
            log::trace!("node {node} eliminated outside layer {}", self.layer);
        }
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
        self.restart_layers();
    }

    fn new_instance(&self) -> Box<dyn EliminationSequenceStrategy> {
        let mut fresh = Self::new(self.config);
        fresh.layers = self.layers.clone();
        fresh.want_fill_ins = self.want_fill_ins;
        fresh.restart_layers();
        Box::new(fresh)
    }
}
