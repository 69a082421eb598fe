//! Shared fixtures for unit and property tests.

use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::graph::{Graph, Label, NodeId};

/// Two nodes with distinct labels joined by a single edge.
pub(crate) fn line_graph() -> Graph {
    labelled_graph(&[(0, 1)], &[(0, 1), (1, 2)])
}

/// Three mutually adjacent nodes sharing one label.
pub(crate) fn triangle_graph() -> Graph {
    labelled_graph(&[(0, 1), (1, 2), (0, 2)], &[(0, 7), (1, 7), (2, 7)])
}

/// Builds a graph from explicit edge and label lists.
pub(crate) fn labelled_graph(edges: &[(NodeId, NodeId)], labels: &[(NodeId, Label)]) -> Graph {
    let mut graph = Graph::new();
    for &(u, v) in edges {
        graph.add_edge(u, v);
    }
    for &(id, label) in labels {
        graph.set_label(id, label);
    }
    graph
}

/// Connected random graph: spanning tree plus probability-`p` extra edges,
/// labels drawn from `0..label_count`.
pub(crate) fn random_training_graph(
    seed: u64,
    nodes: usize,
    extra_edge_prob: f64,
    label_count: Label,
) -> Graph {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut graph = Graph::new();
    for node in 1..nodes {
        let parent = rng.gen_range(0..node) as NodeId;
        graph.add_edge(node as NodeId, parent);
    }
    for u in 0..nodes {
        for v in (u + 1)..nodes {
            if rng.gen_bool(extra_edge_prob) {
                graph.add_edge(u as NodeId, v as NodeId);
            }
        }
    }
    for node in 0..nodes {
        let label = rng.gen_range(0..label_count.max(1));
        graph.set_label(node as NodeId, label);
    }
    if nodes == 1 {
        graph.get_or_create_node(0);
    }
    graph
}
