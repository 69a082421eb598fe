//! Arena storage for cells and their adjacency.
//!
//! Cells reference each other through the arena's adjacency lists rather
//! than through pointers on the cells themselves, so the cyclic neighbour
//! structure never creates ownership cycles.

use std::fmt;

use crate::{pattern::PatternId, wfc::cell::Cell};

/// Dense identifier of a cell within one generation run.
///
/// # Examples
/// ```
/// use tessella_core::CellId;
///
/// let id = CellId::new(2);
/// assert_eq!(id.get(), 2);
/// assert_eq!(id.to_string(), "2");
/// ```
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct CellId(usize);

impl CellId {
    /// Creates a cell id from a raw index.
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

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Contiguous cell storage plus the symmetric cell adjacency map.
#[derive(Clone, Debug, Default)]
pub(crate) struct CellArena {
    cells: Vec<Cell>,
    adjacency: Vec<Vec<CellId>>,
}

impl CellArena {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh open cell with the given domain.
    pub(crate) fn alloc(&mut self, domain: impl IntoIterator<Item = PatternId>) -> CellId {
        let id = CellId::new(self.cells.len());
        self.cells.push(Cell::new(domain));
        self.adjacency.push(Vec::new());
        id
    }

    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    pub(crate) fn get(&self, id: CellId) -> &Cell {
        &self.cells[id.get()]
    }

    pub(crate) fn get_mut(&mut self, id: CellId) -> &mut Cell {
        &mut self.cells[id.get()]
    }

    /// Links two cells bidirectionally. Callers ensure the pair is new.
    pub(crate) fn link(&mut self, a: CellId, b: CellId) {
        self.adjacency[a.get()].push(b);
        self.adjacency[b.get()].push(a);
    }

    pub(crate) fn neighbours(&self, id: CellId) -> &[CellId] {
        &self.adjacency[id.get()]
    }

    pub(crate) fn degree(&self, id: CellId) -> usize {
        self.adjacency[id.get()].len()
    }

    pub(crate) fn adjacent(&self, a: CellId, b: CellId) -> bool {
        self.adjacency[a.get()].contains(&b)
    }

    /// Open edge slots a collapsed cell still needs (0 for open cells).
    pub(crate) fn stubs(&self, id: CellId) -> usize {
        self.get(id)
            .target_degree()
            .map_or(0, |target| target.saturating_sub(self.degree(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_is_bidirectional() {
        let mut arena = CellArena::new();
        let a = arena.alloc([PatternId::new(0)]);
        let b = arena.alloc([PatternId::new(0)]);
        arena.link(a, b);
        assert_eq!(arena.neighbours(a), &[b]);
        assert_eq!(arena.neighbours(b), &[a]);
        assert!(arena.adjacent(a, b));
        assert!(arena.adjacent(b, a));
    }

    #[test]
    fn stubs_count_the_degree_deficit_of_collapsed_cells() {
        let mut arena = CellArena::new();
        let a = arena.alloc([PatternId::new(0)]);
        let b = arena.alloc([PatternId::new(0)]);
        assert_eq!(arena.stubs(a), 0);
        arena
            .get_mut(a)
            .collapse_to(PatternId::new(0), 1, 3)
            .expect("pattern is in the domain");
        assert_eq!(arena.stubs(a), 3);
        arena.link(a, b);
        assert_eq!(arena.stubs(a), 2);
    }
}
