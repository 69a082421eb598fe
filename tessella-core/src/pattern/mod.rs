//! Ego-network patterns and their structural identity.
//!
//! A [`Pattern`] captures one node's ego-network up to a fixed radius:
//! labels, induced adjacency, exact depths, and per-distance layers. Identity
//! is the Weisfeiler–Lehman canonical form; two patterns compare equal
//! exactly when their canonical forms are byte-equal.

mod canonical;
mod compatibility;
mod extractor;

pub use self::{
    compatibility::{build_compatibility, CompatibilityTable},
    extractor::{extract_patterns, PatternSet},
};

use std::{
    collections::{BTreeSet, HashMap},
    fmt,
    hash::{Hash, Hasher},
};

use crate::graph::{Label, NodeId};

/// Stable identifier of a unique pattern within one extraction.
///
/// Identifiers are dense indices assigned in first-seen deduplication order,
/// which is the public ordering every downstream component observes.
///
/// # Examples
/// ```
/// use tessella_core::PatternId;
///
/// let pid = PatternId::new(3);
/// assert_eq!(pid.get(), 3);
/// ```
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PatternId(usize);

impl PatternId {
    /// Creates a pattern id from a raw index.
    #[must_use]
    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }

    /// Returns the raw index.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An immutable ego-network record with a canonical structural form.
#[derive(Clone, Debug)]
pub struct Pattern {
    center_id: NodeId,
    center_label: Label,
    radius: usize,
    labels: HashMap<NodeId, Label>,
    adjacency: HashMap<NodeId, Vec<NodeId>>,
    layers: Vec<BTreeSet<NodeId>>,
    depths: HashMap<NodeId, usize>,
    frequency: usize,
    center_degree: usize,
    canonical: String,
}

impl Pattern {
    /// Builds a pattern and computes its canonical form.
    ///
    /// The maps must satisfy the extraction invariants: `labels` and `depths`
    /// share a key set contained in `adjacency`'s, the centre has depth 0,
    /// adjacent nodes differ in depth by at most one, and `layers[k − 1]`
    /// holds exactly the nodes at depth `k`.
    #[expect(clippy::too_many_arguments, reason = "extraction owns the only call site")]
    pub(crate) fn new(
        center_id: NodeId,
        center_label: Label,
        radius: usize,
        labels: HashMap<NodeId, Label>,
        adjacency: HashMap<NodeId, Vec<NodeId>>,
        layers: Vec<BTreeSet<NodeId>>,
        depths: HashMap<NodeId, usize>,
        center_degree: usize,
    ) -> Self {
        let canonical = canonical::canonical_form(&depths, &labels, &adjacency);
        Self {
            center_id,
            center_label,
            radius,
            labels,
            adjacency,
            layers,
            depths,
            frequency: 1,
            center_degree,
            canonical,
        }
    }

    /// Records one further occurrence of this pattern during deduplication.
    pub(crate) fn record_occurrence(&mut self) {
        self.frequency += 1;
    }

    /// Id of the training-graph node this pattern was first extracted from.
    ///
    /// Identity and debugging only; it plays no role in pattern equality.
    #[must_use]
    pub fn center_id(&self) -> NodeId {
        self.center_id
    }

    /// Label at the centre node.
    #[must_use]
    pub fn center_label(&self) -> Label {
        self.center_label
    }

    /// Hop bound of the ego-network.
    #[must_use]
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Label of every node within the radius.
    #[must_use]
    pub fn labels(&self) -> &HashMap<NodeId, Label> {
        &self.labels
    }

    /// Induced adjacency restricted to the reachable set.
    #[must_use]
    pub fn adjacency(&self) -> &HashMap<NodeId, Vec<NodeId>> {
        &self.adjacency
    }

    /// Per-distance layers; index `k − 1` holds the nodes at distance `k`.
    #[must_use]
    pub fn layers(&self) -> &[BTreeSet<NodeId>] {
        &self.layers
    }

    /// Exact distance from the centre for every node in the pattern.
    #[must_use]
    pub fn depths(&self) -> &HashMap<NodeId, usize> {
        &self.depths
    }

    /// Occurrence count after deduplication (at least 1).
    #[must_use]
    pub fn frequency(&self) -> usize {
        self.frequency
    }

    /// Degree of the centre in the original training graph.
    ///
    /// May exceed the in-pattern degree when the radius truncates.
    #[must_use]
    pub fn center_degree(&self) -> usize {
        self.center_degree
    }

    /// The canonical form string; the pattern's identity.
    #[must_use]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for Pattern {}

impl Hash for Pattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

#[cfg(test)]
mod tests;
