#![allow(dead_code)]
use std::collections::BTreeSet;

use junction_sieve::graph::{is_perfect_elimination_order, NodeId, UndiGraph};
use junction_sieve::triangulation::{uniform_domain_sizes, DomainSizes, StaticTriangulation};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Build a graph from undirected edges.
pub fn graph_from(edges: &[(NodeId, NodeId)]) -> UndiGraph {
    UndiGraph::from_edges(edges).unwrap()
}

/// Cycle 0–1–…–(n-1)–0.
pub fn cycle(n: usize) -> UndiGraph {
    let edges: Vec<_> = (0..n).map(|i| (i, (i + 1) % n)).collect();
    graph_from(&edges)
}

/// Complete graph on `0..n`.
pub fn complete(n: usize) -> UndiGraph {
    let mut g = UndiGraph::with_nodes(0..n);
    for a in 0..n {
        for b in a + 1..n {
            g.add_edge(a, b).unwrap();
        }
    }
    g
}

/// `w × h` grid, node `(x, y)` is `y * w + x`.
pub fn grid(w: usize, h: usize) -> UndiGraph {
    let mut g = UndiGraph::with_nodes(0..w * h);
    for y in 0..h {
        for x in 0..w {
            let v = y * w + x;
            if x + 1 < w {
                g.add_edge(v, v + 1).unwrap();
            }
            if y + 1 < h {
                g.add_edge(v, v + w).unwrap();
            }
        }
    }
    g
}

/// Erdős–Rényi graph on `0..n` with a fixed seed.
pub fn random_graph(n: usize, p: f64, seed: u64) -> UndiGraph {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut g = UndiGraph::with_nodes(0..n);
    for a in 0..n {
        for b in a + 1..n {
            if rng.r#gen::<f64>() < p {
                g.add_edge(a, b).unwrap();
            }
        }
    }
    g
}

/// Random domain sizes in `2..=max` with a fixed seed.
pub fn random_domains(g: &UndiGraph, max: usize, seed: u64) -> DomainSizes {
    let mut rng = SmallRng::seed_from_u64(seed);
    g.nodes().map(|v| (v, rng.gen_range(2..=max))).collect()
}

pub fn binary(g: &UndiGraph) -> DomainSizes {
    uniform_domain_sizes(g, 2)
}

pub fn set(v: &[NodeId]) -> BTreeSet<NodeId> {
    v.iter().copied().collect()
}

/// Assert vec is a permutation of another vec (order-agnostic).
pub fn assert_permutation<T: Ord + Copy + std::fmt::Debug>(got: &[T], want: &[T]) {
    let mut a = got.to_vec();
    a.sort_unstable();
    let mut b = want.to_vec();
    b.sort_unstable();
    assert_eq!(a, b, "not a permutation\n got={:?}\nwant={:?}", got, want);
}

/// Check every structural guarantee of a finished run against its input.
pub fn assert_sound(t: &mut StaticTriangulation, original: &UndiGraph) {
    let tri = t.triangulated_graph().unwrap().clone();
    let order = t.elimination_order().unwrap().to_vec();
    let cliques = t.cliques().unwrap().to_vec();

    let nodes: Vec<NodeId> = original.nodes().collect();
    assert_permutation(&order, &nodes);
    assert_eq!(cliques.len(), order.len());
    for e in original.edges() {
        assert!(tri.exists_edge(e.first(), e.second()), "lost original edge {e}");
    }
    for (i, c) in cliques.iter().enumerate() {
        assert!(c.contains(&order[i]));
        assert!(tri.is_clique(c.iter()), "clique {i} = {c:?} is not complete");
    }
    assert!(is_perfect_elimination_order(&tri, &order));

    let components = junction_sieve::graph::connected_components(original).len();
    let jt = t.junction_tree().unwrap();
    assert_eq!(jt.size(), order.len());
    assert_eq!(jt.size_edges(), order.len() - components);
    assert!(jt.is_forest());
    assert!(jt.has_running_intersection());
}
