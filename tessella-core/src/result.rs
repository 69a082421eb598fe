//! Result types for synthesis runs.

use crate::wfc::Cell;

/// Output of a completed synthesis run.
///
/// Cells appear in settled order (which is also the export order); the
/// adjacency is indexed the same way and is symmetric, self-loop free, and
/// duplicate free. Frontier cells that never settled are not included.
#[derive(Clone, Debug)]
pub struct SynthesisResult {
    cells: Vec<Cell>,
    adjacency: Vec<Vec<usize>>,
    open_stubs: usize,
    fully_collapsed: bool,
    contradictions: usize,
}

impl SynthesisResult {
    pub(crate) fn new(
        cells: Vec<Cell>,
        adjacency: Vec<Vec<usize>>,
        open_stubs: usize,
        fully_collapsed: bool,
        contradictions: usize,
    ) -> Self {
        Self {
            cells,
            adjacency,
            open_stubs,
            fully_collapsed,
            contradictions,
        }
    }

    /// Settled cells in export order; every one is collapsed.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Symmetric adjacency lists indexed like [`Self::cells`].
    #[must_use]
    pub fn adjacency(&self) -> &[Vec<usize>] {
        &self.adjacency
    }

    /// Number of generated nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of undirected edges in the generated graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Edge slots that remained unfilled when the run ended.
    #[must_use]
    pub fn open_stubs(&self) -> usize {
        self.open_stubs
    }

    /// Whether every cell the run created was collapsed (none discarded).
    #[must_use]
    pub fn fully_collapsed(&self) -> bool {
        self.fully_collapsed
    }

    /// Number of contradictions the run recovered from.
    #[must_use]
    pub fn contradictions(&self) -> usize {
        self.contradictions
    }
}
