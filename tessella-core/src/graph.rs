//! Undirected labelled graph used as synthesis training input.
//!
//! Nodes are created lazily by id, edges are deduplicated by unordered-pair
//! equality, and self-loops are never stored. Iteration order over nodes and
//! neighbour lists follows insertion order, which downstream extraction relies
//! on for reproducible pattern identifiers.

use std::collections::{HashMap, HashSet};

/// Identifier of a training-graph node.
pub type NodeId = u32;

/// Integer label attached to a node. Nodes without an explicit label carry 0.
pub type Label = i32;

#[derive(Clone, Debug)]
struct NodeRecord {
    id: NodeId,
    label: Label,
    neighbours: Vec<NodeId>,
}

/// An undirected graph over integer node identifiers.
///
/// # Examples
/// ```
/// use tessella_core::Graph;
///
/// let mut graph = Graph::new();
/// graph.add_edge(0, 1);
/// graph.set_label(0, 7);
/// assert_eq!(graph.neighbours(0), &[1]);
/// assert_eq!(graph.label(0), Some(7));
/// assert_eq!(graph.node_count(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Graph {
    index: HashMap<NodeId, usize>,
    nodes: Vec<NodeRecord>,
    edges: HashSet<(NodeId, NodeId)>,
}

impl Graph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures a node with the given id exists, creating it with label 0.
    pub fn get_or_create_node(&mut self, id: NodeId) {
        self.slot(id);
    }

    fn slot(&mut self, id: NodeId) -> usize {
        if let Some(&slot) = self.index.get(&id) {
            return slot;
        }
        let slot = self.nodes.len();
        self.nodes.push(NodeRecord {
            id,
            label: 0,
            neighbours: Vec::new(),
        });
        self.index.insert(id, slot);
        slot
    }

    /// Adds an undirected edge, creating either endpoint as needed.
    ///
    /// Returns `true` when a new edge was stored. Self-loops and duplicate
    /// edges (by unordered-pair equality) are never stored and return `false`.
    ///
    /// # Examples
    /// ```
    /// use tessella_core::Graph;
    ///
    /// let mut graph = Graph::new();
    /// assert!(graph.add_edge(0, 1));
    /// assert!(!graph.add_edge(1, 0));
    /// assert!(!graph.add_edge(2, 2));
    /// ```
    pub fn add_edge(&mut self, u: NodeId, v: NodeId) -> bool {
        if u == v {
            return false;
        }
        let key = (u.min(v), u.max(v));
        if !self.edges.insert(key) {
            return false;
        }
        let u_slot = self.slot(u);
        let v_slot = self.slot(v);
        self.nodes[u_slot].neighbours.push(v);
        self.nodes[v_slot].neighbours.push(u);
        true
    }

    /// Assigns or updates the label of a node, creating it if absent.
    pub fn set_label(&mut self, id: NodeId, label: Label) {
        let slot = self.slot(id);
        self.nodes[slot].label = label;
    }

    /// Returns the label of a node, or `None` when the node does not exist.
    #[must_use]
    pub fn label(&self, id: NodeId) -> Option<Label> {
        self.index.get(&id).map(|&slot| self.nodes[slot].label)
    }

    /// Returns the neighbour list of a node in edge-insertion order.
    ///
    /// Unknown nodes have no neighbours.
    #[must_use]
    pub fn neighbours(&self, id: NodeId) -> &[NodeId] {
        self.index
            .get(&id)
            .map_or(&[], |&slot| self.nodes[slot].neighbours.as_slice())
    }

    /// Returns the degree of a node (0 for unknown nodes).
    #[must_use]
    pub fn degree(&self, id: NodeId) -> usize {
        self.neighbours(id).len()
    }

    /// Iterates node ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|record| record.id)
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of stored (deduplicated) edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the degree at the given percentile of the sorted degree
    /// distribution, or `None` for an empty graph.
    ///
    /// The index is `⌈percentile · n⌉ − 1`, clamped into bounds, over degrees
    /// sorted ascending. Callers validate the percentile range.
    #[must_use]
    pub fn degree_percentile(&self, percentile: f64) -> Option<usize> {
        if self.nodes.is_empty() {
            return None;
        }
        let mut degrees: Vec<usize> = self
            .nodes
            .iter()
            .map(|record| record.neighbours.len())
            .collect();
        degrees.sort_unstable();
        let raw = (percentile * degrees.len() as f64).ceil() as isize - 1;
        let idx = raw.clamp(0, degrees.len() as isize - 1) as usize;
        Some(degrees[idx])
    }
}
