//! Synthetic labelled training graphs for benchmarks and experiments.
//!
//! The main generator builds a connected graph from a random spanning tree
//! plus probability-`p` extra edges, with labels drawn uniformly. Ring and
//! clique fixtures provide degenerate shapes with known pattern counts.

use rand::{rngs::SmallRng, Rng, SeedableRng};
use thiserror::Error;

use tessella_core::{Graph, Label, NodeId};

/// Errors raised when a synthetic graph configuration is invalid.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum SyntheticError {
    /// The requested graph had no nodes.
    #[error("synthetic graphs need at least one node")]
    ZeroNodes,
    /// The extra-edge probability was outside `[0, 1]`.
    #[error("extra_edge_probability must be in [0, 1]")]
    InvalidProbability,
    /// The label alphabet was empty.
    #[error("label_count must be at least 1")]
    ZeroLabels,
}

/// Configuration for [`connected_graph`].
#[derive(Clone, Copy, Debug)]
pub struct SyntheticGraphConfig {
    /// Number of nodes to generate.
    pub nodes: usize,
    /// Probability of adding each non-tree edge.
    pub extra_edge_probability: f64,
    /// Size of the label alphabet; labels are drawn from `0..label_count`.
    pub label_count: Label,
    /// RNG seed; the same configuration reproduces the same graph.
    pub seed: u64,
}

impl SyntheticGraphConfig {
    fn validate(&self) -> Result<(), SyntheticError> {
        if self.nodes == 0 {
            return Err(SyntheticError::ZeroNodes);
        }
        if !(0.0..=1.0).contains(&self.extra_edge_probability) {
            return Err(SyntheticError::InvalidProbability);
        }
        if self.label_count < 1 {
            return Err(SyntheticError::ZeroLabels);
        }
        Ok(())
    }
}

/// Builds a connected labelled graph from the configuration.
///
/// A spanning tree guarantees connectivity; every remaining unordered node
/// pair then gains an edge with the configured probability.
///
/// # Errors
/// Returns [`SyntheticError`] when the configuration is invalid.
///
/// # Examples
/// ```
/// use tessella_benches::{connected_graph, SyntheticGraphConfig};
///
/// let graph = connected_graph(SyntheticGraphConfig {
///     nodes: 12,
///     extra_edge_probability: 0.1,
///     label_count: 3,
///     seed: 7,
/// })
/// .expect("configuration is valid");
/// assert_eq!(graph.node_count(), 12);
/// assert!(graph.edge_count() >= 11);
/// ```
pub fn connected_graph(config: SyntheticGraphConfig) -> Result<Graph, SyntheticError> {
    config.validate()?;
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let mut graph = Graph::new();
    graph.get_or_create_node(0);
    for node in 1..config.nodes {
        let parent = rng.gen_range(0..node) as NodeId;
        graph.add_edge(node as NodeId, parent);
    }
    for u in 0..config.nodes {
        for v in (u + 1)..config.nodes {
            if rng.gen_bool(config.extra_edge_probability) {
                graph.add_edge(u as NodeId, v as NodeId);
            }
        }
    }
    for node in 0..config.nodes {
        let label = rng.gen_range(0..config.label_count);
        graph.set_label(node as NodeId, label);
    }
    Ok(graph)
}

/// Ring of `nodes` nodes with labels cycling through `0..label_count`.
///
/// # Errors
/// Returns [`SyntheticError`] for an empty ring or label alphabet.
pub fn ring_graph(nodes: usize, label_count: Label) -> Result<Graph, SyntheticError> {
    if nodes == 0 {
        return Err(SyntheticError::ZeroNodes);
    }
    if label_count < 1 {
        return Err(SyntheticError::ZeroLabels);
    }
    let mut graph = Graph::new();
    graph.get_or_create_node(0);
    for node in 0..nodes {
        graph.add_edge(node as NodeId, ((node + 1) % nodes) as NodeId);
        graph.set_label(node as NodeId, (node as Label) % label_count);
    }
    Ok(graph)
}

/// Complete graph on `nodes` nodes sharing a single label.
///
/// # Errors
/// Returns [`SyntheticError::ZeroNodes`] for an empty clique.
pub fn clique_graph(nodes: usize, label: Label) -> Result<Graph, SyntheticError> {
    if nodes == 0 {
        return Err(SyntheticError::ZeroNodes);
    }
    let mut graph = Graph::new();
    graph.get_or_create_node(0);
    for u in 0..nodes {
        graph.set_label(u as NodeId, label);
        for v in (u + 1)..nodes {
            graph.add_edge(u as NodeId, v as NodeId);
        }
    }
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;
    use tessella_core::extract_patterns;

    #[test]
    fn connected_graphs_are_reproducible_and_connected() {
        let config = SyntheticGraphConfig {
            nodes: 20,
            extra_edge_probability: 0.1,
            label_count: 3,
            seed: 11,
        };
        let first = connected_graph(config).expect("configuration is valid");
        let second = connected_graph(config).expect("configuration is valid");
        assert_eq!(first.node_count(), second.node_count());
        assert_eq!(first.edge_count(), second.edge_count());
        assert!(first.edge_count() >= 19);
    }

    #[rstest]
    #[case(SyntheticGraphConfig { nodes: 0, extra_edge_probability: 0.1, label_count: 2, seed: 0 })]
    #[case(SyntheticGraphConfig { nodes: 5, extra_edge_probability: 1.5, label_count: 2, seed: 0 })]
    #[case(SyntheticGraphConfig { nodes: 5, extra_edge_probability: 0.1, label_count: 0, seed: 0 })]
    fn invalid_configurations_are_rejected(#[case] config: SyntheticGraphConfig) {
        assert!(connected_graph(config).is_err());
    }

    #[test]
    fn cliques_collapse_to_a_single_pattern() {
        let graph = clique_graph(5, 4).expect("clique is valid");
        let patterns = extract_patterns(&graph, 1).expect("radius is valid");
        assert_eq!(patterns.len(), 1);
    }

    #[test]
    fn rings_cycle_their_labels() {
        let graph = ring_graph(6, 3).expect("ring is valid");
        assert_eq!(graph.edge_count(), 6);
        assert_eq!(graph.label(4), Some(1));
    }

    #[test]
    fn single_node_ring_has_no_edges() {
        let graph = ring_graph(1, 1).expect("ring is valid");
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }
}
