//! Clique graphs: nodes carry node sets, edges carry separators.
//!
//! Elimination trees and junction trees are both `CliqueGraph`s. The
//! container does not enforce acyclicity; [`CliqueGraph::is_forest`] and
//! [`CliqueGraph::has_running_intersection`] verify the junction-tree
//! properties on demand.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::debug_invariants::DebugInvariants;
use crate::error::TriangulationError;
use crate::graph::{Edge, NodeId};

/// Identifier of a clique inside a [`CliqueGraph`].
pub type CliqueId = usize;

/// Undirected graph of cliques.
///
/// Deserialised values are validated like [`UndiGraph`](crate::graph::UndiGraph)s.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawCliqueGraph")]
pub struct CliqueGraph {
    cliques: BTreeMap<CliqueId, BTreeSet<NodeId>>,
    adjacency: BTreeMap<CliqueId, BTreeSet<CliqueId>>,
    n_edges: usize,
}

#[derive(serde::Deserialize)]
struct RawCliqueGraph {
    cliques: BTreeMap<CliqueId, BTreeSet<NodeId>>,
    adjacency: BTreeMap<CliqueId, BTreeSet<CliqueId>>,
    n_edges: usize,
}

impl TryFrom<RawCliqueGraph> for CliqueGraph {
    type Error = TriangulationError;

    fn try_from(raw: RawCliqueGraph) -> Result<Self, Self::Error> {
        let tree = Self {
            cliques: raw.cliques,
            adjacency: raw.adjacency,
            n_edges: raw.n_edges,
        };
        tree.validate_invariants()?;
        Ok(tree)
    }
}

impl CliqueGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace the content of) clique `id`.
    pub fn add_clique(&mut self, id: CliqueId, nodes: BTreeSet<NodeId>) {
        self.cliques.insert(id, nodes);
        self.adjacency.entry(id).or_default();
    }

    /// Connect two existing cliques. Returns `true` if the edge is new.
    pub fn add_edge(&mut self, a: CliqueId, b: CliqueId) -> Result<bool, TriangulationError> {
        let edge = Edge::new(a, b)?;
        for id in [a, b] {
            if !self.cliques.contains_key(&id) {
                return Err(TriangulationError::NodeNotFound(id));
            }
        }
        let inserted = self.adjacency.entry(edge.first()).or_default().insert(edge.second());
        self.adjacency.entry(edge.second()).or_default().insert(edge.first());
        if inserted {
            self.n_edges += 1;
        }
        Ok(inserted)
    }

    /// Remove the edge `a`–`b`. Returns `true` if it existed.
    pub fn erase_edge(&mut self, a: CliqueId, b: CliqueId) -> bool {
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

    /// Remove a clique and its incident edges. Returns its content.
    pub fn erase_clique(&mut self, id: CliqueId) -> Option<BTreeSet<NodeId>> {
        let content = self.cliques.remove(&id)?;
        if let Some(nbrs) = self.adjacency.remove(&id) {
            for n in &nbrs {
                if let Some(back) = self.adjacency.get_mut(n) {
                    back.remove(&id);
                }
            }
            self.n_edges -= nbrs.len();
        }
        Some(content)
    }

    /// Node set of clique `id`.
    pub fn clique(&self, id: CliqueId) -> Result<&BTreeSet<NodeId>, TriangulationError> {
        self.cliques
            .get(&id)
            .ok_or(TriangulationError::NodeNotFound(id))
    }

    /// Intersection of the two cliques joined by an edge.
    pub fn separator(
        &self,
        a: CliqueId,
        b: CliqueId,
    ) -> Result<BTreeSet<NodeId>, TriangulationError> {
        if !self.exists_edge(a, b) {
            return Err(TriangulationError::InvariantViolation(format!(
                "cliques {a} and {b} are not adjacent"
            )));
        }
        let (ca, cb) = (self.clique(a)?, self.clique(b)?);
        Ok(ca.intersection(cb).copied().collect())
    }

    #[inline]
    pub fn exists_clique(&self, id: CliqueId) -> bool {
        self.cliques.contains_key(&id)
    }

    #[inline]
    pub fn exists_edge(&self, a: CliqueId, b: CliqueId) -> bool {
        self.adjacency.get(&a).is_some_and(|n| n.contains(&b))
    }

    /// Ascending neighbour iterator; empty for unknown cliques.
    pub fn neighbours(&self, id: CliqueId) -> impl Iterator<Item = CliqueId> + '_ {
        self.adjacency.get(&id).into_iter().flatten().copied()
    }

    /// `(id, nodes)` pairs in ascending id order.
    pub fn cliques(&self) -> impl Iterator<Item = (CliqueId, &BTreeSet<NodeId>)> + '_ {
        self.cliques.iter().map(|(&id, c)| (id, c))
    }

    /// Ascending clique id iterator.
    pub fn ids(&self) -> impl Iterator<Item = CliqueId> + '_ {
        self.cliques.keys().copied()
    }

    /// Ascending edge iterator.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.adjacency
            .iter()
            .flat_map(|(&a, nbrs)| nbrs.range(a + 1..).map(move |&b| Edge::ordered(a, b)))
    }

    /// Number of cliques.
    #[inline]
    pub fn size(&self) -> usize {
        self.cliques.len()
    }

    /// Number of edges.
    #[inline]
    pub fn size_edges(&self) -> usize {
        self.n_edges
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cliques.is_empty()
    }

    /// Largest clique cardinality (0 when empty).
    pub fn max_clique_size(&self) -> usize {
        self.cliques.values().map(BTreeSet::len).max().unwrap_or(0)
    }

    /// Connected components as sorted clique-id lists.
    pub fn components(&self) -> Vec<Vec<CliqueId>> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        for start in self.ids() {
            if !seen.insert(start) {
                continue;
            }
            let mut comp = vec![start];
            let mut q = VecDeque::from([start]);
            while let Some(u) = q.pop_front() {
                for w in self.neighbours(u) {
                    if seen.insert(w) {
                        comp.push(w);
                        q.push_back(w);
                    }
                }
            }
            comp.sort_unstable();
            out.push(comp);
        }
        out
    }

    /// Acyclic: `|edges| == |cliques| - |components|`.
    pub fn is_forest(&self) -> bool {
        self.n_edges + self.components().len() == self.size()
    }

    /// Connected and acyclic. The empty graph counts as a tree.
    pub fn is_tree(&self) -> bool {
        self.is_empty() || (self.components().len() == 1 && self.n_edges + 1 == self.size())
    }

    /// For every node, the cliques containing it induce a connected subgraph.
    ///
    /// On a forest this is the running-intersection property: any two cliques
    /// sharing a node have it in every clique on the path between them.
    pub fn has_running_intersection(&self) -> bool {
        let mut containing: BTreeMap<NodeId, BTreeSet<CliqueId>> = BTreeMap::new();
        for (&id, c) in &self.cliques {
            for &v in c {
                containing.entry(v).or_default().insert(id);
            }
        }
        containing.values().all(|ids| {
            let Some(&start) = ids.first() else {
                return true;
            };
            let mut reached = BTreeSet::from([start]);
            let mut q = VecDeque::from([start]);
            while let Some(u) = q.pop_front() {
                for w in self.neighbours(u) {
                    if ids.contains(&w) && reached.insert(w) {
                        q.push_back(w);
                    }
                }
            }
            reached.len() == ids.len()
        })
    }

    /// Cliques containing `node`, ascending.
    pub fn containing(&self, node: NodeId) -> Vec<CliqueId> {
        self.cliques
            .iter()
            .filter(|(_, c)| c.contains(&node))
            .map(|(&id, _)| id)
            .collect()
    }
}

impl DebugInvariants for CliqueGraph {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "CliqueGraph");
    }

    fn validate_invariants(&self) -> Result<(), TriangulationError> {
        let mut half_edges = 0usize;
        for (&a, nbrs) in &self.adjacency {
            if !self.cliques.contains_key(&a) {
                return Err(TriangulationError::InvariantViolation(format!(
                    "adjacency entry for unknown clique {a}"
                )));
            }
            for &b in nbrs {
                if a == b {
                    return Err(TriangulationError::SelfLoop(a));
                }
                if !self.exists_edge(b, a) {
                    return Err(TriangulationError::InvariantViolation(format!(
                        "clique edge {a}-{b} is not mirrored"
                    )));
                }
                half_edges += 1;
            }
        }
        if half_edges != 2 * self.n_edges {
            return Err(TriangulationError::InvariantViolation(format!(
                "clique edge counter {} disagrees with adjacency",
                self.n_edges
            )));
        }
        Ok(())
    }
}
