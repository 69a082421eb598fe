//! Greedy stub wiring between collapsed cells.
//!
//! Candidate pairs must be direct neighbours in the radius-1 compatibility
//! table and survive a multi-hop validation from both endpoints; survivors
//! are ranked by Resource-Allocation score and wired greedily while both
//! endpoints still have open stubs.

use std::collections::{HashMap, VecDeque};

use tracing::debug;

use crate::{
    pattern::{CompatibilityTable, PatternId},
    wfc::{arena::CellArena, CellId},
};

/// Compatibility-validated greedy edge completion.
pub(crate) struct StubConnector<'a> {
    table: &'a CompatibilityTable,
}

impl<'a> StubConnector<'a> {
    pub(crate) fn new(table: &'a CompatibilityTable) -> Self {
        Self { table }
    }

    /// Fills open stubs among the settled cells and returns the edge count.
    ///
    /// Pairs are generated `i < j` over the settled list restricted to cells
    /// with positive stubs, gated on radius-1 compatibility and multi-hop
    /// path validation from both endpoints, scored by Resource Allocation,
    /// and accepted greedily in descending score order (ties keep generation
    /// order).
    pub(crate) fn connect(&self, settled: &[CellId], cells: &mut CellArena) -> usize {
        let mut order: Vec<CellId> = Vec::new();
        let mut stubs: HashMap<CellId, usize> = HashMap::new();
        for &id in settled {
            let open = cells.stubs(id);
            if open > 0 {
                order.push(id);
                stubs.insert(id, open);
            }
        }
        if order.len() < 2 {
            return 0;
        }

        let mut candidates: Vec<(CellId, CellId, f64)> = Vec::new();
        for i in 0..order.len() {
            for j in (i + 1)..order.len() {
                let (u, v) = (order[i], order[j]);
                if cells.adjacent(u, v) {
                    continue;
                }
                let (Some(pid_u), Some(pid_v)) =
                    (cells.get(u).collapsed_pid(), cells.get(v).collapsed_pid())
                else {
                    continue;
                };
                if !self.table.contains(1, pid_u, pid_v) {
                    continue;
                }
                if !self.validates_paths(u, pid_v, cells) || !self.validates_paths(v, pid_u, cells)
                {
                    continue;
                }
                candidates.push((u, v, self.table.resource_allocation(pid_u, pid_v)));
            }
        }

        candidates.sort_by(|a, b| b.2.total_cmp(&a.2));
        let mut added = 0;
        for (u, v, _) in candidates {
            let open_u = stubs.get(&u).copied().unwrap_or(0);
            let open_v = stubs.get(&v).copied().unwrap_or(0);
            if open_u > 0 && open_v > 0 && !cells.adjacent(u, v) {
                cells.link(u, v);
                stubs.insert(u, open_u - 1);
                stubs.insert(v, open_v - 1);
                added += 1;
            }
        }
        if added > 0 {
            debug!(added, "wired stub pairs");
        }
        added
    }

    /// Validates that wiring `start` to a cell of pattern `target` keeps all
    /// implied longer-range placements consistent with training.
    ///
    /// A level-wise BFS from `start` walks only through collapsed cells up to
    /// depth `max_radius − 1`; a collapsed cell first reached at depth `d`
    /// must be compatible with `target` at radius `d + 1`.
    fn validates_paths(&self, start: CellId, target: PatternId, cells: &CellArena) -> bool {
        let max_radius = self.table.max_radius();
        if max_radius < 2 {
            return true;
        }
        let mut visited = vec![false; cells.len()];
        visited[start.get()] = true;
        let mut queue = VecDeque::from([start]);
        let mut depth = 0;

        while !queue.is_empty() && depth < max_radius - 1 {
            depth += 1;
            for _ in 0..queue.len() {
                let Some(current) = queue.pop_front() else {
                    break;
                };
                for &neighbour in cells.neighbours(current) {
                    if visited[neighbour.get()] {
                        continue;
                    }
                    visited[neighbour.get()] = true;
                    let Some(pid) = cells.get(neighbour).collapsed_pid() else {
                        continue;
                    };
                    if !self.table.contains(depth + 1, pid, target) {
                        return false;
                    }
                    queue.push_back(neighbour);
                }
            }
        }
        true
    }
}
