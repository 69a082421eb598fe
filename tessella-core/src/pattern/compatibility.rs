//! Multi-radius pattern compatibility tables.
//!
//! For each radius `k` in `1..=max_radius`, the table records which pattern
//! ids were observed at distance exactly `k` from an instance of each
//! pattern. Compatibility is decided on ordered outward label-paths rather
//! than layer sets or raw adjacency, so "nodes at distance k" is never
//! conflated with "paths of length k".

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::{
    error::{Result, SynthesisError},
    graph::{Graph, Label},
    pattern::{extract_patterns, Pattern, PatternId, PatternSet},
};

/// Observed co-occurrence of patterns per hop distance.
///
/// Each radius is built from a fresh extraction at that radius and keyed by
/// that extraction's pattern ids. Rows are ordered sets so downstream
/// floating-point accumulation iterates in a fixed order.
#[derive(Clone, Debug)]
pub struct CompatibilityTable {
    max_radius: usize,
    tables: Vec<Vec<BTreeSet<PatternId>>>,
}

impl CompatibilityTable {
    /// Largest radius the table covers.
    #[must_use]
    pub fn max_radius(&self) -> usize {
        self.max_radius
    }

    /// Number of unique patterns the extraction at `radius` produced.
    #[must_use]
    pub fn pattern_count_at(&self, radius: usize) -> usize {
        self.radius_table(radius).map_or(0, Vec::len)
    }

    /// The set of pattern ids observed at `radius` hops from `pid`.
    ///
    /// Returns `None` when the radius is out of range or the id was never
    /// assigned by that radius's extraction; callers treat both as the empty
    /// set.
    #[must_use]
    pub fn allowed(&self, radius: usize, pid: PatternId) -> Option<&BTreeSet<PatternId>> {
        self.radius_table(radius)?.get(pid.get())
    }

    /// Returns whether `a` and `b` were observed `radius` hops apart.
    #[must_use]
    pub fn contains(&self, radius: usize, a: PatternId, b: PatternId) -> bool {
        self.allowed(radius, a).is_some_and(|row| row.contains(&b))
    }

    /// Resource-Allocation score over radius-1 pattern neighbourhoods.
    ///
    /// `RA(a, b) = Σ 1 / |N₁(m)|` over the common neighbours `m` of `a` and
    /// `b`, where `N₁(x)` is the radius-1 row of `x`. Common neighbours with
    /// empty rows contribute nothing.
    #[must_use]
    pub fn resource_allocation(&self, a: PatternId, b: PatternId) -> f64 {
        let (Some(row_a), Some(row_b)) = (self.allowed(1, a), self.allowed(1, b)) else {
            return 0.0;
        };
        row_a
            .intersection(row_b)
            .map(|&shared| {
                let degree = self.allowed(1, shared).map_or(0, BTreeSet::len);
                if degree > 0 {
                    1.0 / degree as f64
                } else {
                    0.0
                }
            })
            .sum()
    }

    fn radius_table(&self, radius: usize) -> Option<&Vec<BTreeSet<PatternId>>> {
        if radius < 1 {
            return None;
        }
        self.tables.get(radius - 1)
    }
}

#[cfg(test)]
impl CompatibilityTable {
    /// Builds a table from explicit rows; `tables[k - 1][pid]` is the
    /// radius-`k` row. Test support only.
    pub(crate) fn from_rows(tables: Vec<Vec<BTreeSet<PatternId>>>) -> Self {
        Self {
            max_radius: tables.len(),
            tables,
        }
    }
}

/// Builds compatibility tables for every radius in `1..=max_radius`.
///
/// Each radius runs its own extraction and pairwise outward-path comparison.
/// Patterns `i` and `j` are mutually compatible at a radius when some
/// outward label-path of `i` equals a reversed outward path of `j`; the pair
/// loop includes `i == j`, so a pattern whose paths palindrome onto
/// themselves is self-compatible. Empty rows are allowed.
///
/// # Errors
/// Returns [`SynthesisError::InvalidRadius`] when `max_radius < 1`.
///
/// # Examples
/// ```
/// use tessella_core::{build_compatibility, Graph, PatternId};
///
/// let mut graph = Graph::new();
/// graph.add_edge(0, 1);
/// graph.set_label(0, 1);
/// graph.set_label(1, 2);
/// let table = build_compatibility(&graph, 1).expect("radius is valid");
/// assert!(table.contains(1, PatternId::new(0), PatternId::new(1)));
/// ```
pub fn build_compatibility(graph: &Graph, max_radius: usize) -> Result<CompatibilityTable> {
    if max_radius < 1 {
        return Err(SynthesisError::InvalidRadius { got: max_radius });
    }

    let mut tables = Vec::with_capacity(max_radius);
    for radius in 1..=max_radius {
        let patterns = extract_patterns(graph, radius)?;
        tables.push(radius_compatibility(&patterns, radius));
    }

    debug!(max_radius, "built compatibility tables");
    Ok(CompatibilityTable { max_radius, tables })
}

/// Pairwise outward-path comparison for one radius.
fn radius_compatibility(patterns: &PatternSet, radius: usize) -> Vec<BTreeSet<PatternId>> {
    let count = patterns.len();
    let outward: Vec<Vec<Vec<Label>>> = patterns
        .iter()
        .map(|(_, pattern)| outward_paths(pattern, radius))
        .collect();
    let reversed: Vec<HashSet<Vec<Label>>> = outward
        .iter()
        .map(|paths| {
            paths
                .iter()
                .map(|path| {
                    let mut back = path.clone();
                    back.reverse();
                    back
                })
                .collect()
        })
        .collect();

    let mut rows = vec![BTreeSet::new(); count];
    for i in 0..count {
        for j in i..count {
            let matched = outward[i].iter().any(|path| reversed[j].contains(path));
            if matched {
                rows[i].insert(PatternId::new(j));
                rows[j].insert(PatternId::new(i));
            }
        }
    }
    rows
}

/// All outward label-paths of length `radius + 1` starting at the centre.
///
/// Depth-first traversal that only follows edges whose far endpoint sits at
/// exactly the next depth; any branch that cannot reach the radius produces
/// no path.
fn outward_paths(pattern: &Pattern, radius: usize) -> Vec<Vec<Label>> {
    let mut paths = Vec::new();
    let mut stack = vec![(pattern.center_id(), vec![pattern.center_label()])];

    while let Some((node, path)) = stack.pop() {
        let depth = path.len() - 1;
        if depth == radius {
            paths.push(path);
            continue;
        }
        for &neighbour in pattern
            .adjacency()
            .get(&node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
        {
            if pattern.depths().get(&neighbour) == Some(&(depth + 1)) {
                let mut extended = path.clone();
                extended.push(pattern.labels()[&neighbour]);
                stack.push((neighbour, extended));
            }
        }
    }
    paths
}
