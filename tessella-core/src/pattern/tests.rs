//! Tests for pattern extraction, canonical identity, and compatibility
//! tables, including the property-level invariants of both.

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use proptest::prelude::*;
use rstest::rstest;

use super::{build_compatibility, extract_patterns, PatternId};
use crate::{
    error::SynthesisError,
    graph::Graph,
    test_utils::{labelled_graph, line_graph, random_training_graph, triangle_graph},
};

#[test]
fn radius_below_one_is_rejected() {
    let graph = line_graph();
    assert!(matches!(
        extract_patterns(&graph, 0),
        Err(SynthesisError::InvalidRadius { got: 0 })
    ));
    assert!(matches!(
        build_compatibility(&graph, 0),
        Err(SynthesisError::InvalidRadius { got: 0 })
    ));
}

#[test]
fn empty_graph_yields_no_patterns() {
    let patterns = extract_patterns(&Graph::new(), 1).expect("radius is valid");
    assert!(patterns.is_empty());
}

#[test]
fn two_node_line_extracts_two_unique_patterns() {
    let patterns = extract_patterns(&line_graph(), 1).expect("radius is valid");
    assert_eq!(patterns.len(), 2);

    let a = patterns.get(PatternId::new(0)).expect("pattern 0 exists");
    let b = patterns.get(PatternId::new(1)).expect("pattern 1 exists");
    assert_eq!(a.center_label(), 1);
    assert_eq!(b.center_label(), 2);
    for pattern in [a, b] {
        assert_eq!(pattern.frequency(), 1);
        assert_eq!(pattern.center_degree(), 1);
        assert_eq!(pattern.layers().len(), 1);
        assert_eq!(pattern.layers()[0].len(), 1);
    }
}

#[test]
fn two_node_line_is_mutually_compatible_at_radius_one() {
    let table = build_compatibility(&line_graph(), 1).expect("radius is valid");
    let zero = PatternId::new(0);
    let one = PatternId::new(1);
    assert!(table.contains(1, zero, one));
    assert!(table.contains(1, one, zero));
    assert!(!table.contains(1, zero, zero));
    assert!(table.allowed(2, zero).is_none());
}

#[test]
fn triangle_collapses_to_one_self_compatible_pattern() {
    let patterns = extract_patterns(&triangle_graph(), 1).expect("radius is valid");
    assert_eq!(patterns.len(), 1);
    let pattern = patterns.get(PatternId::new(0)).expect("pattern exists");
    assert_eq!(pattern.frequency(), 3);
    assert_eq!(pattern.center_degree(), 2);

    let table = build_compatibility(&triangle_graph(), 1).expect("radius is valid");
    let row = table.allowed(1, PatternId::new(0)).expect("row exists");
    assert_eq!(row.iter().copied().collect::<Vec<_>>(), vec![PatternId::new(0)]);
}

#[test]
fn single_node_graph_extracts_one_isolated_pattern() {
    let mut graph = Graph::new();
    graph.get_or_create_node(0);
    graph.set_label(0, 5);
    let patterns = extract_patterns(&graph, 2).expect("radius is valid");
    assert_eq!(patterns.len(), 1);
    let pattern = patterns.get(PatternId::new(0)).expect("pattern exists");
    assert_eq!(pattern.frequency(), 1);
    assert_eq!(pattern.center_degree(), 0);
    assert!(pattern.layers().iter().all(|layer| layer.is_empty()));
}

#[test]
fn clique_with_identical_labels_has_one_pattern() {
    let graph = labelled_graph(
        &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)],
        &[(0, 4), (1, 4), (2, 4), (3, 4)],
    );
    let patterns = extract_patterns(&graph, 2).expect("radius is valid");
    assert_eq!(patterns.len(), 1);
    assert_eq!(patterns.get(PatternId::new(0)).expect("exists").frequency(), 4);
}

#[test]
fn radius_one_patterns_contain_only_direct_neighbours() {
    let graph = labelled_graph(&[(0, 1), (1, 2)], &[(0, 1), (1, 1), (2, 1)]);
    let patterns = extract_patterns(&graph, 1).expect("radius is valid");
    let end = patterns
        .iter()
        .find(|(_, pattern)| pattern.center_id() == 0)
        .map(|(_, pattern)| pattern)
        .expect("end-node pattern exists");
    assert_eq!(end.depths().len(), 2);
    assert!(!end.depths().contains_key(&2));
}

#[test]
fn isomorphic_graphs_share_canonical_forms_and_hashes() {
    let graph = labelled_graph(&[(0, 1), (1, 2)], &[(0, 1), (1, 2), (2, 1)]);
    let relabelled = labelled_graph(&[(10, 21), (21, 32)], &[(10, 1), (21, 2), (32, 1)]);
    let left = extract_patterns(&graph, 2).expect("radius is valid");
    let right = extract_patterns(&relabelled, 2).expect("radius is valid");
    assert_eq!(left.len(), right.len());
    for ((_, a), (_, b)) in left.iter().zip(right.iter()) {
        assert_eq!(a, b);
        let mut ha = DefaultHasher::new();
        let mut hb = DefaultHasher::new();
        a.hash(&mut ha);
        b.hash(&mut hb);
        assert_eq!(ha.finish(), hb.finish());
    }
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
fn extraction_upholds_layer_and_depth_invariants(#[case] radius: usize) {
    let graph = random_training_graph(99, 14, 0.15, 3);
    let patterns = extract_patterns(&graph, radius).expect("radius is valid");
    for (_, pattern) in patterns.iter() {
        assert_invariants(pattern, radius);
    }
}

fn assert_invariants(pattern: &super::Pattern, radius: usize) {
    let depths = pattern.depths();
    let labels = pattern.labels();
    let adjacency = pattern.adjacency();

    assert_eq!(labels.len(), depths.len());
    for node in labels.keys() {
        assert!(depths.contains_key(node));
        assert!(adjacency.contains_key(node));
    }
    for (node, &depth) in depths {
        assert!(depth <= radius);
        for neighbour in &adjacency[node] {
            let neighbour_depth = depths[neighbour];
            assert!(depth.abs_diff(neighbour_depth) <= 1);
        }
    }
    assert_eq!(depths[&pattern.center_id()], 0);
    assert_eq!(pattern.layers().len(), radius);
    for (index, layer) in pattern.layers().iter().enumerate() {
        for node in layer {
            assert_eq!(depths[node], index + 1);
        }
    }
    let layered: usize = pattern.layers().iter().map(|layer| layer.len()).sum();
    assert_eq!(layered, depths.len() - 1);
}

proptest! {
    #[test]
    fn tables_are_symmetric(seed in any::<u64>(), nodes in 2_usize..12, radius in 1_usize..3) {
        let graph = random_training_graph(seed, nodes, 0.2, 3);
        let table = build_compatibility(&graph, radius).expect("radius is valid");
        for k in 1..=radius {
            for raw in 0..table.pattern_count_at(k) {
                let a = PatternId::new(raw);
                let row = table.allowed(k, a).expect("row exists");
                for &b in row {
                    prop_assert!(table.contains(k, b, a));
                }
            }
        }
    }

    #[test]
    fn dedup_preserves_total_occurrences(seed in any::<u64>(), nodes in 1_usize..16) {
        let graph = random_training_graph(seed, nodes, 0.1, 2);
        let patterns = extract_patterns(&graph, 2).expect("radius is valid");
        let total: usize = patterns.iter().map(|(_, pattern)| pattern.frequency()).sum();
        prop_assert_eq!(total, graph.node_count());
    }
}
