//! Ego-network extraction and canonical-form deduplication.

use std::collections::{BTreeSet, HashMap, VecDeque};

use tracing::debug;

use crate::{
    error::{Result, SynthesisError},
    graph::{Graph, Label, NodeId},
    pattern::{Pattern, PatternId},
};

/// The deduplicated patterns of one extraction, in first-seen order.
///
/// Pattern ids index into this set; the ordering is stable for the lifetime
/// of a run and is the ordering every downstream consumer observes.
#[derive(Clone, Debug, Default)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    /// Number of unique patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns whether the set holds no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Looks up a pattern by id.
    #[must_use]
    pub fn get(&self, pid: PatternId) -> Option<&Pattern> {
        self.patterns.get(pid.get())
    }

    /// Iterates `(pid, pattern)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (PatternId, &Pattern)> {
        self.patterns
            .iter()
            .enumerate()
            .map(|(index, pattern)| (PatternId::new(index), pattern))
    }

    /// All pattern ids in order.
    #[must_use]
    pub fn ids(&self) -> Vec<PatternId> {
        (0..self.patterns.len()).map(PatternId::new).collect()
    }

    /// Occurrence frequency of a pattern; absent ids weigh 1.
    #[must_use]
    pub fn frequency(&self, pid: PatternId) -> u64 {
        self.get(pid).map_or(1, |pattern| pattern.frequency() as u64)
    }

    /// Frequencies indexed by pattern id.
    #[must_use]
    pub fn frequencies(&self) -> Vec<u64> {
        self.patterns
            .iter()
            .map(|pattern| pattern.frequency() as u64)
            .collect()
    }

    /// Centre label recorded for a pattern (0 for absent ids).
    #[must_use]
    pub fn center_label(&self, pid: PatternId) -> Label {
        self.get(pid).map_or(0, Pattern::center_label)
    }

    /// Original training-graph centre degree for a pattern (0 for absent ids).
    #[must_use]
    pub fn center_degree(&self, pid: PatternId) -> usize {
        self.get(pid).map_or(0, Pattern::center_degree)
    }
}

/// Extracts one ego-network per node and deduplicates by canonical form.
///
/// Each node contributes a BFS ego-network of the given radius; identical
/// canonical forms merge into a single pattern whose frequency counts the
/// occurrences. Ids are assigned in first-seen order. An empty graph yields
/// an empty set.
///
/// # Errors
/// Returns [`SynthesisError::InvalidRadius`] when `radius < 1`.
///
/// # Examples
/// ```
/// use tessella_core::{extract_patterns, Graph};
///
/// let mut graph = Graph::new();
/// graph.add_edge(0, 1);
/// graph.set_label(0, 1);
/// graph.set_label(1, 2);
/// let patterns = extract_patterns(&graph, 1).expect("radius is valid");
/// assert_eq!(patterns.len(), 2);
/// ```
pub fn extract_patterns(graph: &Graph, radius: usize) -> Result<PatternSet> {
    if radius < 1 {
        return Err(SynthesisError::InvalidRadius { got: radius });
    }

    let mut patterns: Vec<Pattern> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for center in graph.node_ids() {
        let pattern = build_pattern(graph, center, radius);
        match seen.get(pattern.canonical()) {
            Some(&index) => patterns[index].record_occurrence(),
            None => {
                seen.insert(pattern.canonical().to_owned(), patterns.len());
                patterns.push(pattern);
            }
        }
    }

    debug!(
        nodes = graph.node_count(),
        unique = patterns.len(),
        radius,
        "extracted ego-network patterns"
    );
    Ok(PatternSet { patterns })
}

/// Builds the single-occurrence pattern centred on one node.
fn build_pattern(graph: &Graph, center: NodeId, radius: usize) -> Pattern {
    let (order, depths) = bfs_depths(graph, center, radius);

    let mut labels = HashMap::with_capacity(order.len());
    let mut adjacency = HashMap::with_capacity(order.len());
    for &node in &order {
        labels.insert(node, graph.label(node).unwrap_or(0));
        let neighbours: Vec<NodeId> = graph
            .neighbours(node)
            .iter()
            .copied()
            .filter(|neighbour| depths.contains_key(neighbour))
            .collect();
        adjacency.insert(node, neighbours);
    }

    let mut layers: Vec<BTreeSet<NodeId>> = vec![BTreeSet::new(); radius];
    for (&node, &depth) in &depths {
        if depth >= 1 {
            layers[depth - 1].insert(node);
        }
    }

    let center_label = graph.label(center).unwrap_or(0);
    let center_degree = graph.degree(center);
    Pattern::new(
        center,
        center_label,
        radius,
        labels,
        adjacency,
        layers,
        depths,
        center_degree,
    )
}

/// BFS from the centre up to the radius, recording discovery order and depth.
fn bfs_depths(
    graph: &Graph,
    center: NodeId,
    radius: usize,
) -> (Vec<NodeId>, HashMap<NodeId, usize>) {
    let mut order = vec![center];
    let mut depths = HashMap::from([(center, 0_usize)]);
    let mut queue = VecDeque::from([center]);

    while let Some(current) = queue.pop_front() {
        let depth = depths[&current];
        if depth >= radius {
            continue;
        }
        for &neighbour in graph.neighbours(current) {
            if !depths.contains_key(&neighbour) {
                depths.insert(neighbour, depth + 1);
                order.push(neighbour);
                queue.push_back(neighbour);
            }
        }
    }
    (order, depths)
}
