//! Constraint propagation over the cell adjacency map.
//!
//! The primary entry point walks outward from newly collapsed seeds,
//! intersecting open domains with the per-radius compatibility rows. A
//! secondary fixed-point pass tightens every open cell against all collapsed
//! cells in range, used once at cleanup start.

use std::collections::{BTreeSet, VecDeque};

use tracing::trace;

use crate::{
    error::{Result, SynthesisError},
    pattern::{CompatibilityTable, PatternId},
    wfc::{arena::CellArena, CellId},
};

/// Layer-aware breadth-first domain pruning.
pub(crate) struct ConstraintPropagator<'a> {
    table: &'a CompatibilityTable,
}

impl<'a> ConstraintPropagator<'a> {
    pub(crate) fn new(table: &'a CompatibilityTable) -> Self {
        Self { table }
    }

    /// Prunes open cells reachable from the seeds and reports forced cells.
    ///
    /// From each collapsed seed, a BFS walks the adjacency map with explicit
    /// depth tracking up to the table's maximum radius. Open cells at depth
    /// `d` are intersected with the seed pattern's radius-`d` row; collapsed
    /// cells are never pruned but still pass the walk through. After all
    /// seeds are processed, every frontier cell whose domain shrank to
    /// exactly one candidate is returned for forced collapse.
    ///
    /// # Errors
    /// Returns [`SynthesisError::Contradiction`] the moment a domain becomes
    /// empty; the caller owns recovery.
    pub(crate) fn propagate(
        &self,
        seeds: &[CellId],
        cells: &mut CellArena,
        frontier: &[CellId],
    ) -> Result<Vec<CellId>> {
        let empty = BTreeSet::new();
        for &seed in seeds {
            let Some(seed_pid) = cells.get(seed).collapsed_pid() else {
                continue;
            };
            self.prune_from(seed, seed_pid, cells, &empty)?;
        }

        let forced: Vec<CellId> = frontier
            .iter()
            .copied()
            .filter(|&id| {
                let cell = cells.get(id);
                !cell.is_collapsed() && cell.domain_len() == 1
            })
            .collect();
        trace!(seeds = seeds.len(), forced = forced.len(), "propagation wave");
        Ok(forced)
    }

    fn prune_from(
        &self,
        seed: CellId,
        seed_pid: PatternId,
        cells: &mut CellArena,
        empty: &BTreeSet<PatternId>,
    ) -> Result<()> {
        let max_radius = self.table.max_radius();
        let mut visited = vec![false; cells.len()];
        visited[seed.get()] = true;
        let mut queue = VecDeque::from([(seed, 0_usize)]);

        while let Some((current, depth)) = queue.pop_front() {
            if depth >= max_radius {
                continue;
            }
            let neighbours: Vec<CellId> = cells.neighbours(current).to_vec();
            for neighbour in neighbours {
                if visited[neighbour.get()] {
                    continue;
                }
                visited[neighbour.get()] = true;
                let next_depth = depth + 1;
                if !cells.get(neighbour).is_collapsed() {
                    let allowed = self.table.allowed(next_depth, seed_pid).unwrap_or(empty);
                    cells.get_mut(neighbour).prune(allowed).map_err(SynthesisError::from)?;
                    if cells.get(neighbour).domain_len() == 0 {
                        return Err(SynthesisError::Contradiction { cell: neighbour });
                    }
                }
                queue.push_back((neighbour, next_depth));
            }
        }
        Ok(())
    }

    /// Tightens every open cell against all collapsed cells in range, to a
    /// fixed point.
    ///
    /// Each pass partitions the arena into collapsed and open cells; every
    /// open cell with more than one candidate is intersected with the
    /// compatibility row of each collapsed cell at its observed distance.
    /// Passes repeat until no domain changes.
    ///
    /// # Errors
    /// Returns [`SynthesisError::Contradiction`] when the tightening empties
    /// a domain.
    pub(crate) fn enforce_consistency(&self, cells: &mut CellArena) -> Result<()> {
        let empty = BTreeSet::new();
        loop {
            let mut changed = false;
            for raw in 0..cells.len() {
                let id = CellId::new(raw);
                {
                    let cell = cells.get(id);
                    if cell.is_collapsed() || cell.domain_len() <= 1 {
                        continue;
                    }
                }
                for (pid, distance) in self.collapsed_in_range(id, cells) {
                    let allowed = self.table.allowed(distance, pid).unwrap_or(&empty);
                    changed |= cells.get_mut(id).prune(allowed).map_err(SynthesisError::from)?;
                    if cells.get(id).domain_len() == 0 {
                        return Err(SynthesisError::Contradiction { cell: id });
                    }
                }
            }
            if !changed {
                return Ok(());
            }
        }
    }

    /// Collapsed patterns within the table radius of `start`, with distances.
    fn collapsed_in_range(&self, start: CellId, cells: &CellArena) -> Vec<(PatternId, usize)> {
        let max_radius = self.table.max_radius();
        let mut visited = vec![false; cells.len()];
        visited[start.get()] = true;
        let mut queue = VecDeque::from([(start, 0_usize)]);
        let mut found = Vec::new();

        while let Some((current, depth)) = queue.pop_front() {
            if depth >= max_radius {
                continue;
            }
            for &neighbour in cells.neighbours(current) {
                if visited[neighbour.get()] {
                    continue;
                }
                visited[neighbour.get()] = true;
                let next_depth = depth + 1;
                if let Some(pid) = cells.get(neighbour).collapsed_pid() {
                    found.push((pid, next_depth));
                }
                queue.push_back((neighbour, next_depth));
            }
        }
        found
    }
}
