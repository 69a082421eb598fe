//! Canonical-form computation via Weisfeiler–Lehman colour refinement.
//!
//! Two refinement rounds over SHA-256-derived colours, then a total node
//! ordering by `(final colour, depth, label)` and re-indexing into a token
//! string. Two rounds with this tie-breaking distinguish the ego-networks
//! the generator encounters in practice; collisions between genuinely
//! non-isomorphic patterns are a known, accepted approximation.

use std::collections::HashMap;

use sha2::{Digest, Sha256};

use crate::graph::{Label, NodeId};

const REFINEMENT_ROUNDS: usize = 2;

/// Derives the canonical form of a pattern from its structure alone.
///
/// Node ids only anchor the maps; relabelling them leaves the output
/// unchanged whenever the refinement separates the nodes' orbits.
pub(super) fn canonical_form(
    depths: &HashMap<NodeId, usize>,
    labels: &HashMap<NodeId, Label>,
    adjacency: &HashMap<NodeId, Vec<NodeId>>,
) -> String {
    let mut nodes: Vec<NodeId> = depths.keys().copied().collect();
    nodes.sort_unstable();

    let mut colours: HashMap<NodeId, u64> = nodes
        .iter()
        .map(|&node| {
            let colour = mix(&[depths[&node] as u64, widen(labels[&node])]);
            (node, colour)
        })
        .collect();

    for _ in 0..REFINEMENT_ROUNDS {
        let mut next = HashMap::with_capacity(colours.len());
        for &node in &nodes {
            let mut neighbour_colours: Vec<u64> = adjacency
                .get(&node)
                .map(Vec::as_slice)
                .unwrap_or(&[])
                .iter()
                .map(|neighbour| colours[neighbour])
                .collect();
            neighbour_colours.sort_unstable();

            let mut material = Vec::with_capacity(neighbour_colours.len() + 1);
            material.push(colours[&node]);
            material.extend(neighbour_colours);
            next.insert(node, mix(&material));
        }
        colours = next;
    }

    nodes.sort_by_key(|&node| (colours[&node], depths[&node], labels[&node]));
    let reindex: HashMap<NodeId, usize> = nodes
        .iter()
        .enumerate()
        .map(|(index, &node)| (node, index))
        .collect();

    let tokens: Vec<String> = nodes
        .iter()
        .enumerate()
        .map(|(index, &node)| {
            let mut neighbour_indices: Vec<usize> = adjacency
                .get(&node)
                .map(Vec::as_slice)
                .unwrap_or(&[])
                .iter()
                .map(|neighbour| reindex[neighbour])
                .collect();
            neighbour_indices.sort_unstable();
            let joined = neighbour_indices
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            format!(
                "({index}:c={colour},d={depth},l={label}→[{joined}])",
                colour = colours[&node],
                depth = depths[&node],
                label = labels[&node],
            )
        })
        .collect();

    tokens.join(";")
}

/// Widens a signed label into the hash input domain without collisions.
fn widen(label: Label) -> u64 {
    i64::from(label) as u64
}

/// Collapses a value sequence into a 64-bit colour via SHA-256.
fn mix(values: &[u64]) -> u64 {
    let mut hasher = Sha256::new();
    for value in values {
        hasher.update(value.to_le_bytes());
    }
    let digest = hasher.finalize();
    let mut prefix = [0_u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_pattern(ids: [NodeId; 2], labels_in: [Label; 2]) -> String {
        let depths = HashMap::from([(ids[0], 0), (ids[1], 1)]);
        let labels = HashMap::from([(ids[0], labels_in[0]), (ids[1], labels_in[1])]);
        let adjacency = HashMap::from([(ids[0], vec![ids[1]]), (ids[1], vec![ids[0]])]);
        canonical_form(&depths, &labels, &adjacency)
    }

    #[test]
    fn relabelling_node_ids_preserves_the_form() {
        assert_eq!(line_pattern([0, 1], [4, 9]), line_pattern([17, 3], [4, 9]));
    }

    #[test]
    fn permuting_labels_changes_the_form() {
        assert_ne!(line_pattern([0, 1], [4, 9]), line_pattern([0, 1], [9, 4]));
    }

    #[test]
    fn depth_differences_change_the_form() {
        let flat = line_pattern([0, 1], [4, 4]);
        let depths = HashMap::from([(0, 0), (1, 0)]);
        let labels = HashMap::from([(0, 4), (1, 4)]);
        let adjacency = HashMap::from([(0, vec![1]), (1, vec![0])]);
        assert_ne!(flat, canonical_form(&depths, &labels, &adjacency));
    }

    #[test]
    fn symmetric_leaves_reindex_identically() {
        // Star with two interchangeable leaves: swapping leaf ids must not
        // change the emitted token string.
        let form = |leaf_a: NodeId, leaf_b: NodeId| {
            let depths = HashMap::from([(9, 0), (leaf_a, 1), (leaf_b, 1)]);
            let labels = HashMap::from([(9, 1), (leaf_a, 2), (leaf_b, 2)]);
            let adjacency = HashMap::from([
                (9, vec![leaf_a, leaf_b]),
                (leaf_a, vec![9]),
                (leaf_b, vec![9]),
            ]);
            canonical_form(&depths, &labels, &adjacency)
        };
        assert_eq!(form(1, 2), form(2, 1));
    }
}
