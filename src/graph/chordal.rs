//! Chordality utilities: perfect elimination orders, maximum cardinality
//! search, connected components.
//!
//! Determinism:
//! - All routines visit nodes in ascending `NodeId` order unless a caller
//!   supplied rank says otherwise.

use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::graph::{NodeId, UndiGraph};

/// Check that `order` is a perfect elimination order of `graph`.
///
/// `order` must list every node of `graph` exactly once. Each node's
/// neighbours that come later in `order` must form a clique; the check uses
/// the classic parent test (later neighbours minus the earliest one must be
/// adjacent to that earliest one), so it runs in `O(m log n)`.
pub fn is_perfect_elimination_order(graph: &UndiGraph, order: &[NodeId]) -> bool {
    if order.len() != graph.size() {
        return false;
    }
    let mut position: HashMap<NodeId, usize> = HashMap::with_capacity(order.len());
    for (i, &v) in order.iter().enumerate() {
        if !graph.exists_node(v) || position.insert(v, i).is_some() {
            return false;
        }
    }
    for (i, &v) in order.iter().enumerate() {
        let later: Vec<NodeId> = graph
            .neighbours_iter(v)
            .filter(|n| position[n] > i)
            .collect();
        let Some(&parent) = later.iter().min_by_key(|n| position[n]) else {
            continue;
        };
        if later
            .iter()
            .any(|&w| w != parent && !graph.exists_edge(parent, w))
        {
            return false;
        }
    }
    true
}

/// Maximum cardinality search.
///
/// Returns an elimination order (first element eliminated first). Nodes are
/// numbered from the back: at every step the unnumbered node with the most
/// numbered neighbours is picked; ties go to the highest `rank`, then to the
/// highest `NodeId`. For a chordal graph the result is a perfect elimination
/// order.
pub fn maximum_cardinality_search<F>(graph: &UndiGraph, rank: F) -> Vec<NodeId>
where
    F: Fn(NodeId) -> usize,
{
    let n = graph.size();
    let mut order = vec![0; n];
    let mut count: HashMap<NodeId, usize> = graph.nodes().map(|v| (v, 0)).collect();
    let mut queue: BTreeSet<(usize, usize, NodeId)> =
        graph.nodes().map(|v| (0, rank(v), v)).collect();
    for slot in (0..n).rev() {
        let Some((_, _, v)) = queue.pop_last() else {
            break;
        };
        order[slot] = v;
        count.remove(&v);
        for w in graph.neighbours_iter(v) {
            if let Some(c) = count.get_mut(&w) {
                let r = rank(w);
                queue.remove(&(*c, r, w));
                *c += 1;
                queue.insert((*c, r, w));
            }
        }
    }
    order
}

/// `true` if every cycle of length at least four has a chord.
pub fn is_chordal(graph: &UndiGraph) -> bool {
    let order = maximum_cardinality_search(graph, |_| 0);
    is_perfect_elimination_order(graph, &order)
}

/// Connected components, each sorted ascending, ordered by their smallest node.
pub fn connected_components(graph: &UndiGraph) -> Vec<Vec<NodeId>> {
    let mut seen: BTreeSet<NodeId> = BTreeSet::new();
    let mut out = Vec::new();
    for start in graph.nodes() {
        if !seen.insert(start) {
            continue;
        }
        let mut comp = vec![start];
        let mut q = VecDeque::from([start]);
        while let Some(u) = q.pop_front() {
            for w in graph.neighbours_iter(u) {
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

/// Subgraph of `graph` induced by `nodes`; unknown nodes are ignored.
pub fn induced_subgraph(graph: &UndiGraph, nodes: &[NodeId]) -> UndiGraph {
    let keep: BTreeSet<NodeId> = nodes
        .iter()
        .copied()
        .filter(|&v| graph.exists_node(v))
        .collect();
    let mut sub = UndiGraph::with_nodes(keep.iter().copied());
    for &v in &keep {
        for w in graph.neighbours_iter(v).filter(|w| *w > v && keep.contains(w)) {
            sub.insert_edge(crate::graph::Edge::ordered(v, w));
        }
    }
    sub
}
