//! Deterministic undirected graph backed by `BTreeMap`/`BTreeSet`.
//!
//! Node and neighbour iteration is always ascending, so every algorithm
//! driven by this container is reproducible run to run.

use std::collections::{BTreeMap, BTreeSet};

use crate::debug_invariants::DebugInvariants;
use crate::error::TriangulationError;
use crate::graph::{Edge, NodeId};

/// Undirected simple graph (no self-loops, no parallel edges).
///
/// Deserialisation rejects adjacency that is not mirrored, contains a
/// self-loop, or disagrees with the stored edge count.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawUndiGraph")]
pub struct UndiGraph {
    adjacency: BTreeMap<NodeId, BTreeSet<NodeId>>,
    n_edges: usize,
}

#[derive(serde::Deserialize)]
struct RawUndiGraph {
    adjacency: BTreeMap<NodeId, BTreeSet<NodeId>>,
    n_edges: usize,
}

impl TryFrom<RawUndiGraph> for UndiGraph {
    type Error = TriangulationError;

    fn try_from(raw: RawUndiGraph) -> Result<Self, Self::Error> {
        let graph = Self {
            adjacency: raw.adjacency,
            n_edges: raw.n_edges,
        };
        graph.validate_invariants()?;
        Ok(graph)
    }
}

impl UndiGraph {
    /// Empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Graph with the given isolated nodes.
    pub fn with_nodes<I: IntoIterator<Item = NodeId>>(nodes: I) -> Self {
        let mut g = Self::new();
        for n in nodes {
            g.add_node(n);
        }
        g
    }

    /// Build a graph from an edge list; endpoints are created on demand.
    ///
    /// # Errors
    /// [`TriangulationError::SelfLoop`] if a pair repeats the same node.
    pub fn from_edges<'a, I>(edges: I) -> Result<Self, TriangulationError>
    where
        I: IntoIterator<Item = &'a (NodeId, NodeId)>,
    {
        let mut g = Self::new();
        for &(a, b) in edges {
            g.add_edge(a, b)?;
        }
        Ok(g)
    }

    /// Insert a node. Returns `true` if it was not present.
    pub fn add_node(&mut self, node: NodeId) -> bool {
        if self.adjacency.contains_key(&node) {
            return false;
        }
        self.adjacency.insert(node, BTreeSet::new());
        true
    }

    /// Insert the edge `a`–`b`, creating missing endpoints.
    /// Returns `true` if the edge is new.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<bool, TriangulationError> {
        let edge = Edge::new(a, b)?;
        Ok(self.insert_edge(edge))
    }

    /// Insert an already-normalised edge. Returns `true` if it is new.
    pub fn insert_edge(&mut self, edge: Edge) -> bool {
        let (a, b) = (edge.first(), edge.second());
        let inserted = self.adjacency.entry(a).or_default().insert(b);
        self.adjacency.entry(b).or_default().insert(a);
        if inserted {
            self.n_edges += 1;
        }
        inserted
    }

    /// Remove the edge `a`–`b`. Returns `true` if it existed.
    pub fn erase_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        let removed = self
            .adjacency
            .get_mut(&a)
            .is_some_and(|nbrs| nbrs.remove(&b));
        if removed {
            if let Some(nbrs) = self.adjacency.get_mut(&b) {
                nbrs.remove(&a);
            }
            self.n_edges -= 1;
        }
        removed
    }

    /// Remove a node and all incident edges. Returns `true` if it existed.
    pub fn erase_node(&mut self, node: NodeId) -> bool {
        let Some(nbrs) = self.adjacency.remove(&node) else {
            return false;
        };
        for n in &nbrs {
            if let Some(back) = self.adjacency.get_mut(n) {
                back.remove(&node);
            }
        }
        self.n_edges -= nbrs.len();
        true
    }

    #[inline]
    pub fn exists_node(&self, node: NodeId) -> bool {
        self.adjacency.contains_key(&node)
    }

    #[inline]
    pub fn exists_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.adjacency.get(&a).is_some_and(|nbrs| nbrs.contains(&b))
    }

    /// Neighbour set of `node`.
    ///
    /// # Errors
    /// [`TriangulationError::NodeNotFound`] if `node` is absent.
    pub fn neighbours(&self, node: NodeId) -> Result<&BTreeSet<NodeId>, TriangulationError> {
        self.adjacency
            .get(&node)
            .ok_or(TriangulationError::NodeNotFound(node))
    }

    /// Ascending neighbour iterator; empty for unknown nodes.
    pub fn neighbours_iter(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency.get(&node).into_iter().flatten().copied()
    }

    /// Number of neighbours of `node` (0 for unknown nodes).
    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        self.adjacency.get(&node).map_or(0, BTreeSet::len)
    }

    /// Ascending node iterator.
    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = NodeId> + ExactSizeIterator + '_ {
        self.adjacency.keys().copied()
    }

    /// Ascending edge iterator (each undirected edge once).
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.adjacency.iter().flat_map(|(&a, nbrs)| {
            nbrs.range(a + 1..).map(move |&b| Edge::ordered(a, b))
        })
    }

    /// Number of nodes.
    #[inline]
    pub fn size(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of edges.
    #[inline]
    pub fn size_edges(&self) -> usize {
        self.n_edges
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// `true` if every pair of `nodes` is adjacent.
    pub fn is_clique<'a, I>(&self, nodes: I) -> bool
    where
        I: IntoIterator<Item = &'a NodeId>,
        I::IntoIter: Clone,
    {
        let it = nodes.into_iter();
        let mut outer = it.clone();
        while let Some(&a) = outer.next() {
            if outer.clone().any(|&b| a != b && !self.exists_edge(a, b)) {
                return false;
            }
        }
        true
    }
}

impl DebugInvariants for UndiGraph {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "UndiGraph");
    }

    fn validate_invariants(&self) -> Result<(), TriangulationError> {
        let mut half_edges = 0usize;
        for (&a, nbrs) in &self.adjacency {
            for &b in nbrs {
                if a == b {
                    return Err(TriangulationError::SelfLoop(a));
                }
                if !self.exists_edge(b, a) {
                    return Err(TriangulationError::InvariantViolation(format!(
                        "edge {a}-{b} is not mirrored"
                    )));
                }
                half_edges += 1;
            }
        }
        if half_edges != 2 * self.n_edges {
            return Err(TriangulationError::InvariantViolation(format!(
                "edge counter {} disagrees with adjacency ({} half-edges)",
                self.n_edges, half_edges
            )));
        }
        Ok(())
    }
}
