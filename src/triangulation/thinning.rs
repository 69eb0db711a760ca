//! Minimality post-processing: recursive thinning of fill-in edges.
//!
//! A fill-in `{y, z}` can be dropped from a chordal graph without losing
//! chordality iff the common neighbours of `y` and `z` form a clique (the
//! edge is then not the only chord of any 4-cycle). Fill-ins are examined
//! one at a time, newest first, and the scan repeats until a full pass
//! removes nothing.
//!
//! Removing fill-ins invalidates the elimination order of the run (the
//! elimination graph is the smallest graph its order is perfect for), so a
//! new perfect order is derived with [`repair_order`] and cliques are
//! recomputed from it with [`elimination_cliques`].

use std::collections::{BTreeSet, HashMap};

use crate::graph::{Edge, NodeId, UndiGraph, is_perfect_elimination_order, maximum_cardinality_search};

/// Remove every redundant fill-in from the chordal graph `triangulated`.
///
/// `fill_ins` must be in creation order. Returns the removed edges in
/// removal order.
pub fn recursive_thinning(triangulated: &mut UndiGraph, fill_ins: &[Edge]) -> Vec<Edge> {
    let mut candidates: Vec<Edge> = fill_ins
        .iter()
        .rev()
        .copied()
        .filter(|e| triangulated.exists_edge(e.first(), e.second()))
        .collect();
    let mut removed = Vec::new();
    loop {
        let before = removed.len();
        candidates.retain(|&e| {
            if !is_removable(triangulated, e) {
                return true;
            }
            triangulated.erase_edge(e.first(), e.second());
            log::trace!("thinning: dropped fill-in {e}");
            removed.push(e);
            false
        });
        if removed.len() == before {
            break;
        }
    }
    removed
}

fn is_removable(graph: &UndiGraph, e: Edge) -> bool {
    let (Ok(ny), Ok(nz)) = (graph.neighbours(e.first()), graph.neighbours(e.second())) else {
        return false;
    };
    graph.is_clique(ny.intersection(nz))
}

/// A perfect elimination order of the chordal `graph`, as close to
/// `previous` as maximum cardinality search allows.
///
/// `previous` is returned unchanged when it is still perfect.
pub fn repair_order(graph: &UndiGraph, previous: &[NodeId]) -> Vec<NodeId> {
    if is_perfect_elimination_order(graph, previous) {
        return previous.to_vec();
    }
    let rank: HashMap<NodeId, usize> = previous.iter().enumerate().map(|(i, &v)| (v, i)).collect();
    maximum_cardinality_search(graph, |v| rank.get(&v).copied().unwrap_or(0))
}

/// `{v} ∪ {later neighbours of v}` for every `v` of `order`.
pub fn elimination_cliques(graph: &UndiGraph, order: &[NodeId]) -> Vec<BTreeSet<NodeId>> {
    let position: HashMap<NodeId, usize> = order.iter().enumerate().map(|(i, &v)| (v, i)).collect();
    order
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let mut clique: BTreeSet<NodeId> = graph
                .neighbours_iter(v)
                .filter(|w| position.get(w).is_some_and(|&p| p > i))
                .collect();
            clique.insert(v);
            clique
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::is_chordal;

    fn e(a: NodeId, b: NodeId) -> Edge {
        Edge::new(a, b).unwrap()
    }

    #[test]
    fn redundant_fill_in_is_removed() {
        // Path 0-1-2 eliminated middle-first gets fill-in 0-2 which is useless.
        let mut g = UndiGraph::from_edges(&[(0, 1), (1, 2), (0, 2)]).unwrap();
        let removed = recursive_thinning(&mut g, &[e(0, 2)]);
        assert_eq!(removed, vec![e(0, 2)]);
        assert!(!g.exists_edge(0, 2));
        assert!(is_chordal(&g));
    }

    #[test]
    fn necessary_fill_in_is_kept() {
        // The chord of a 4-cycle cannot go.
        let mut g = UndiGraph::from_edges(&[(0, 1), (1, 2), (2, 3), (3, 0), (1, 3)]).unwrap();
        assert!(recursive_thinning(&mut g, &[e(1, 3)]).is_empty());
        assert!(g.exists_edge(1, 3));
    }

    #[test]
    fn thinning_cascades() {
        // Star around 0 eliminated centre-first: every leaf pair becomes a
        // fill-in, and all of them are redundant.
        let mut g = UndiGraph::from_edges(&[(0, 1), (0, 2), (0, 3)]).unwrap();
        let fill = [e(1, 2), e(1, 3), e(2, 3)];
        for f in fill {
            g.insert_edge(f);
        }
        let removed = recursive_thinning(&mut g, &fill);
        assert_eq!(removed.len(), 3);
        assert_eq!(g.size_edges(), 3);
        assert!(is_chordal(&g));
    }

    #[test]
    fn order_is_repaired_only_when_needed() {
        let g = UndiGraph::from_edges(&[(0, 1), (1, 2)]).unwrap();
        assert_eq!(repair_order(&g, &[0, 1, 2]), vec![0, 1, 2]);
        let fixed = repair_order(&g, &[1, 0, 2]);
        assert!(is_perfect_elimination_order(&g, &fixed));
        let cliques = elimination_cliques(&g, &fixed);
        assert!(cliques.iter().all(|c| g.is_clique(c.iter())));
        assert_eq!(cliques.len(), 3);
    }
}
