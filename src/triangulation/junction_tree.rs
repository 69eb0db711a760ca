//! Junction-tree construction from a frozen elimination history.
//!
//! The builder never stores the history it works from. The driver lends the
//! history on every call, and the builder checks it against the
//! [`RunToken`] it was attached with, so a tree built for one run can never
//! be served for another.

use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::error::TriangulationError;
use crate::graph::{CliqueGraph, CliqueId, NodeId};
use crate::triangulation::history::{EliminationHistory, RunToken};

/// Builds (and memoises) a junction tree for one elimination run.
pub trait JunctionTreeStrategy: Debug + Send {
    /// Attach to `history`, dropping anything memoised for a previous run.
    fn set_triangulation(&mut self, history: &EliminationHistory);

    /// The junction tree of the attached run, built on first request.
    ///
    /// # Errors
    /// - [`TriangulationError::JunctionTreeNotAttached`] before
    ///   [`set_triangulation`](Self::set_triangulation);
    /// - [`TriangulationError::StaleTriangulation`] if `history` is not the
    ///   attached run.
    fn junction_tree(
        &mut self,
        history: &EliminationHistory,
    ) -> Result<&CliqueGraph, TriangulationError>;

    /// Map from every node to the clique created at its elimination.
    fn created_cliques(
        &mut self,
        history: &EliminationHistory,
    ) -> Result<&BTreeMap<NodeId, CliqueId>, TriangulationError>;

    /// Clique created when `node` was eliminated.
    fn created_clique(
        &mut self,
        history: &EliminationHistory,
        node: NodeId,
    ) -> Result<CliqueId, TriangulationError> {
        self.created_cliques(history)?
            .get(&node)
            .copied()
            .ok_or(TriangulationError::NodeNotFound(node))
    }

    /// Detach and forget every memoised result.
    fn clear(&mut self);

    /// A fresh, detached builder of the same kind.
    fn new_instance(&self) -> Box<dyn JunctionTreeStrategy>;
}

/// Junction tree = elimination tree: one clique per eliminated node, linked
/// to the clique of its elimination-tree parent.
///
/// Disconnected graphs yield a forest with one tree per component.
#[derive(Clone, Debug, Default)]
pub struct DefaultJunctionTreeStrategy {
    attached: Option<RunToken>,
    tree: Option<CliqueGraph>,
    created: Option<BTreeMap<NodeId, CliqueId>>,
}

impl DefaultJunctionTreeStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the tree has been built since the last attach.
    pub fn is_built(&self) -> bool {
        self.tree.is_some()
    }

    fn check(&self, history: &EliminationHistory) -> Result<(), TriangulationError> {
        match self.attached {
            None => Err(TriangulationError::JunctionTreeNotAttached),
            Some(token) if token != history.token() => Err(TriangulationError::StaleTriangulation),
            Some(_) => Ok(()),
        }
    }
}

impl JunctionTreeStrategy for DefaultJunctionTreeStrategy {
    fn set_triangulation(&mut self, history: &EliminationHistory) {
        self.attached = Some(history.token());
        self.tree = None;
        self.created = None;
    }

    fn junction_tree(
        &mut self,
        history: &EliminationHistory,
    ) -> Result<&CliqueGraph, TriangulationError> {
        self.check(history)?;
        Ok(self.tree.get_or_insert_with(|| {
            let tree = history.elimination_tree();
            log::debug!(
                "junction tree: {} cliques, {} edges",
                tree.size(),
                tree.size_edges()
            );
            tree
        }))
    }

    fn created_cliques(
        &mut self,
        history: &EliminationHistory,
    ) -> Result<&BTreeMap<NodeId, CliqueId>, TriangulationError> {
        self.check(history)?;
        Ok(self.created.get_or_insert_with(|| {
            history
                .order()
                .iter()
                .enumerate()
                .map(|(id, &v)| (v, id))
                .collect()
        }))
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    fn new_instance(&self) -> Box<dyn JunctionTreeStrategy> {
        Box::new(Self::default())
    }
}

/// Junction tree without subsumed cliques, plus where each node's clique went.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CompactJunctionTree {
    pub tree: CliqueGraph,
    /// Node → surviving clique that absorbed the clique created at its
    /// elimination.
    pub node_to_clique: BTreeMap<NodeId, CliqueId>,
}

/// Merge every clique contained in an adjacent clique into that neighbour.
///
/// Merging `a` into a neighbour `b ⊇ a` moves `a`'s other edges onto `b`,
/// which keeps both the tree shape and the running-intersection property.
/// Cliques are scanned by ascending id, each absorbed by its smallest-id
/// qualifying neighbour.
pub fn compact_junction_tree(
    tree: &CliqueGraph,
    created: &BTreeMap<NodeId, CliqueId>,
) -> Result<CompactJunctionTree, TriangulationError> {
    let mut tree = tree.clone();
    let mut absorbed_into: BTreeMap<CliqueId, CliqueId> = BTreeMap::new();
    while let Some((a, b)) = find_subsumed(&tree) {
        let others: Vec<CliqueId> = tree.neighbours(a).filter(|&n| n != b).collect();
        tree.erase_clique(a);
        for n in others {
            tree.add_edge(n, b)?;
        }
        log::trace!("compaction: clique {a} absorbed by {b}");
        absorbed_into.insert(a, b);
    }
    let node_to_clique = created
        .iter()
        .map(|(&v, &c)| {
            let mut c = c;
            while let Some(&next) = absorbed_into.get(&c) {
                c = next;
            }
            (v, c)
        })
        .collect();
    Ok(CompactJunctionTree {
        tree,
        node_to_clique,
    })
}

fn find_subsumed(tree: &CliqueGraph) -> Option<(CliqueId, CliqueId)> {
    tree.cliques().find_map(|(a, ca)| {
        tree.neighbours(a)
            .find(|&b| tree.clique(b).is_ok_and(|cb| ca.is_subset(cb)))
            .map(|b| (a, b))
    })
}
