//! The generation engine: growth, cleanup, and final collapse phases.
//!
//! Single-threaded and single-pass: contradictions end the phase that raised
//! them and the run continues with the next phase. All randomness flows
//! through one seeded RNG used only for weighted collapse sampling.

use rand::{rngs::SmallRng, SeedableRng};
use tracing::{debug, info, warn};

use crate::{
    error::{Result, SynthesisError},
    pattern::{CompatibilityTable, PatternId, PatternSet},
    result::SynthesisResult,
    wfc::{
        arena::CellArena, connect::StubConnector, entropy::EntropyIndex, expand::expand,
        propagator::ConstraintPropagator, CellId,
    },
};

/// Tunables resolved by the synthesizer before the run starts.
#[derive(Clone, Copy, Debug)]
pub(crate) struct EngineParams {
    pub(crate) target_size: usize,
    pub(crate) lower_cap: f64,
    pub(crate) upper_cap: f64,
    pub(crate) expansion_cap: usize,
    pub(crate) rng_seed: u64,
}

/// Mutable state of one generation run.
pub(crate) struct Engine<'a> {
    patterns: &'a PatternSet,
    table: &'a CompatibilityTable,
    params: EngineParams,
    hard_upper: usize,
    all_pids: Vec<PatternId>,
    cells: CellArena,
    frontier: Vec<CellId>,
    settled: Vec<CellId>,
    entropy: EntropyIndex,
    rng: SmallRng,
    contradictions: usize,
    discarded: usize,
}

impl<'a> Engine<'a> {
    pub(crate) fn new(
        patterns: &'a PatternSet,
        table: &'a CompatibilityTable,
        params: EngineParams,
    ) -> Self {
        let all_pids = patterns.ids();
        let entropy = EntropyIndex::new(patterns.frequencies());
        let mut cells = CellArena::new();
        let seed = cells.alloc(all_pids.iter().copied());
        Self {
            patterns,
            table,
            params,
            hard_upper: (params.target_size as f64 * params.upper_cap).ceil() as usize,
            all_pids,
            cells,
            frontier: vec![seed],
            settled: Vec::new(),
            entropy,
            rng: SmallRng::seed_from_u64(params.rng_seed),
            contradictions: 0,
            discarded: 0,
        }
    }

    /// Executes all phases and assembles the result.
    pub(crate) fn run(mut self) -> Result<SynthesisResult> {
        self.growth()?;
        self.cleanup()?;
        self.final_phase()?;

        let open_stubs = self.open_stubs();
        let fully_collapsed = self.discarded == 0;
        info!(
            settled = self.settled.len(),
            open_stubs_remaining = open_stubs,
            fully_collapsed,
            contradictions = self.contradictions,
            "generation finished"
        );
        Ok(self.into_result(open_stubs, fully_collapsed))
    }

    /// Growth phase: entropy collapse, budgeted expansion, propagation, and
    /// global wiring until the lower cap is reached or the frontier drains.
    fn growth(&mut self) -> Result<()> {
        debug!(
            target_size = self.params.target_size,
            expansion_cap = self.params.expansion_cap,
            "growth phase started"
        );
        while !self.frontier.is_empty()
            && (self.settled.len() as f64) < self.params.lower_cap * self.params.target_size as f64
        {
            let Some(select) = self.entropy.pick_lowest(&self.frontier, &self.cells) else {
                break;
            };
            self.collapse_cell(select)?;

            let remaining = self.params.expansion_cap.saturating_sub(self.frontier.len());
            if remaining > 0 {
                expand(
                    &[select],
                    remaining,
                    &mut self.cells,
                    &mut self.frontier,
                    &self.all_pids,
                );
            }

            if !self.cascade(vec![select], self.params.expansion_cap)? {
                return Ok(());
            }
            StubConnector::new(self.table).connect(&self.settled, &mut self.cells);
            let settled = self.settled.clone();
            if !self.cascade(settled, self.params.expansion_cap)? {
                return Ok(());
            }
        }
        Ok(())
    }

    /// Cleanup phase: close stubs and drain the frontier under a linearly
    /// decaying expansion allowance, stopping at the hard size cap.
    fn cleanup(&mut self) -> Result<()> {
        debug!(settled = self.settled.len(), "cleanup phase started");

        // One global tightening pass before wiring, then drain any cells the
        // tightening forced down to singletons.
        match ConstraintPropagator::new(self.table).enforce_consistency(&mut self.cells) {
            Ok(()) => {
                if !self.cascade(Vec::new(), 0)? {
                    return Ok(());
                }
            }
            Err(SynthesisError::Contradiction { cell }) => {
                self.note_contradiction(cell);
                return Ok(());
            }
            Err(other) => return Err(other),
        }

        loop {
            let progress = self.settled.len() as f64 / self.params.target_size as f64;
            let open_stubs = self.open_stubs();
            let linear_budget =
                (linear_decay(progress, self.params.upper_cap) * self.params.expansion_cap as f64)
                    .ceil() as usize;
            let allowance = linear_budget.min(open_stubs.saturating_sub(self.frontier.len()));

            if (open_stubs == 0 && self.frontier.is_empty())
                || self.settled.len() >= self.hard_upper
            {
                break;
            }

            if self.frontier.is_empty() && open_stubs > 0 && allowance > 0 {
                self.attach_stub_fillers(allowance);
                continue;
            }

            let added = StubConnector::new(self.table).connect(&self.settled, &mut self.cells);
            if added > 0 {
                let settled = self.settled.clone();
                if !self.cascade(settled, allowance)? {
                    return Ok(());
                }
                continue;
            }

            if !self.frontier.is_empty() {
                if let Some(select) = self.pick_collapsible() {
                    self.collapse_cell(select)?;
                    StubConnector::new(self.table).connect(&self.settled, &mut self.cells);
                    if allowance > 0 {
                        expand(
                            &[select],
                            allowance,
                            &mut self.cells,
                            &mut self.frontier,
                            &self.all_pids,
                        );
                    }
                    if !self.cascade(vec![select], allowance)? {
                        return Ok(());
                    }
                    continue;
                }
            }

            break;
        }
        Ok(())
    }

    /// Final phase: collapse every remaining frontier cell without expansion,
    /// then make one last wiring attempt among the settled cells.
    fn final_phase(&mut self) -> Result<()> {
        debug!(frontier = self.frontier.len(), "final phase started");
        while !self.frontier.is_empty() {
            if self.settled.len() >= self.hard_upper {
                self.discarded += self.frontier.len();
                warn!(
                    discarded = self.frontier.len(),
                    "hard size cap reached; dropping remaining frontier cells"
                );
                self.frontier.clear();
                break;
            }
            let Some(select) = self.pick_collapsible() else {
                self.discarded += self.frontier.len();
                warn!(
                    discarded = self.frontier.len(),
                    "dropping frontier cells with emptied domains"
                );
                self.frontier.clear();
                break;
            };
            self.collapse_cell(select)?;
            StubConnector::new(self.table).connect(&self.settled, &mut self.cells);
            // A contradiction here only ends the cascade; collapsing continues.
            self.cascade(vec![select], 0)?;
        }
        StubConnector::new(self.table).connect(&self.settled, &mut self.cells);
        Ok(())
    }

    /// Propagation with forced-collapse waves.
    ///
    /// Each wave of forced cells is collapsed immediately and seeds the next
    /// wave; wave `i` may expand by `⌈√|forced_i|⌉ · base_cap − |frontier|`.
    /// Returns `Ok(false)` after recording a contradiction, which ends the
    /// calling phase.
    fn cascade(&mut self, seeds: Vec<CellId>, base_cap: usize) -> Result<bool> {
        let mut wave = seeds;
        loop {
            let forced = match ConstraintPropagator::new(self.table).propagate(
                &wave,
                &mut self.cells,
                &self.frontier,
            ) {
                Ok(forced) => forced,
                Err(SynthesisError::Contradiction { cell }) => {
                    self.note_contradiction(cell);
                    return Ok(false);
                }
                Err(other) => return Err(other),
            };
            if forced.is_empty() {
                return Ok(true);
            }
            // The hard size cap bounds forced collapses too: once settled
            // reaches it, the rest of the wave is dropped instead of
            // collapsed, keeping the settled-size bound a post-condition.
            let mut collapsed = Vec::with_capacity(forced.len());
            for &cell in &forced {
                if self.settled.len() >= self.hard_upper {
                    break;
                }
                self.collapse_cell(cell)?;
                collapsed.push(cell);
            }
            let overflow = &forced[collapsed.len()..];
            if !overflow.is_empty() {
                self.discarded += overflow.len();
                warn!(
                    discarded = overflow.len(),
                    "hard size cap reached; dropping forced cells"
                );
                for &cell in overflow {
                    self.remove_from_frontier(cell);
                }
            }
            let scaled = (collapsed.len() as f64).sqrt().ceil() as usize * base_cap;
            let budget = scaled.saturating_sub(self.frontier.len());
            // No new cells once the hard size cap is reached; the wave then
            // only drains existing frontier cells.
            if budget > 0 && self.settled.len() < self.hard_upper {
                expand(
                    &collapsed,
                    budget,
                    &mut self.cells,
                    &mut self.frontier,
                    &self.all_pids,
                );
            }
            wave = collapsed;
        }
    }

    /// Collapses a frontier cell via weighted sampling and settles it.
    fn collapse_cell(&mut self, id: CellId) -> Result<()> {
        let pid = {
            let cell = self.cells.get(id);
            self.entropy.sample(cell.domain(), &mut self.rng)
        };
        let Some(pid) = pid else {
            // An empty domain here means a caller bypassed pick_collapsible.
            return Err(SynthesisError::Contradiction { cell: id });
        };
        let label = self.patterns.center_label(pid);
        let degree = self.patterns.center_degree(pid);
        self.cells
            .get_mut(id)
            .collapse_to(pid, label, degree)
            .map_err(SynthesisError::from)?;
        self.remove_from_frontier(id);
        self.settled.push(id);
        Ok(())
    }

    fn remove_from_frontier(&mut self, id: CellId) {
        if let Some(position) = self.frontier.iter().position(|&entry| entry == id) {
            self.frontier.remove(position);
        }
    }

    /// Lowest positive entropy first, then any trivially collapsible forced
    /// cell. `None` when the frontier holds only emptied domains.
    fn pick_collapsible(&self) -> Option<CellId> {
        self.entropy
            .pick_lowest(&self.frontier, &self.cells)
            .or_else(|| {
                self.frontier.iter().copied().find(|&id| {
                    let cell = self.cells.get(id);
                    !cell.is_collapsed() && cell.domain_len() >= 1
                })
            })
    }

    /// Attaches new open cells to settled cells with remaining stubs until
    /// the budget is exhausted.
    fn attach_stub_fillers(&mut self, budget: usize) {
        let mut remaining = budget;
        let settled = self.settled.clone();
        'outer: for cell in settled {
            let needed = self.cells.stubs(cell);
            for _ in 0..needed {
                if remaining == 0 {
                    break 'outer;
                }
                let child = self.cells.alloc(self.all_pids.iter().copied());
                self.frontier.push(child);
                self.cells.link(cell, child);
                remaining -= 1;
            }
        }
    }

    fn open_stubs(&self) -> usize {
        self.settled.iter().map(|&id| self.cells.stubs(id)).sum()
    }

    fn note_contradiction(&mut self, cell: CellId) {
        self.contradictions += 1;
        warn!(%cell, "contradiction during propagation; ending phase");
    }

    /// Compacts the settled cells into the result, dropping anything that
    /// never settled (including discarded frontier leftovers).
    fn into_result(self, open_stubs: usize, fully_collapsed: bool) -> SynthesisResult {
        let mut index = vec![usize::MAX; self.cells.len()];
        for (position, &id) in self.settled.iter().enumerate() {
            index[id.get()] = position;
        }
        let mut cells = Vec::with_capacity(self.settled.len());
        let mut adjacency = Vec::with_capacity(self.settled.len());
        for &id in &self.settled {
            cells.push(self.cells.get(id).clone());
            let neighbours: Vec<usize> = self
                .cells
                .neighbours(id)
                .iter()
                .map(|neighbour| index[neighbour.get()])
                .filter(|&slot| slot != usize::MAX)
                .collect();
            adjacency.push(neighbours);
        }
        SynthesisResult::new(
            cells,
            adjacency,
            open_stubs,
            fully_collapsed,
            self.contradictions,
        )
    }
}

/// Linear expansion decay: full budget up to the target size, none at or
/// beyond the upper cap, interpolated in between.
fn linear_decay(progress: f64, upper_cap: f64) -> f64 {
    if progress <= 1.0 {
        return 1.0;
    }
    if progress >= upper_cap {
        return 0.0;
    }
    (upper_cap - progress) / (upper_cap - 1.0)
}

#[cfg(test)]
mod tests {
    use super::linear_decay;

    use rstest::rstest;

    #[rstest]
    #[case(0.4, 1.0)]
    #[case(1.0, 1.0)]
    #[case(1.05, 0.5)]
    #[case(1.1, 0.0)]
    #[case(2.0, 0.0)]
    fn decay_interpolates_between_target_and_cap(#[case] progress: f64, #[case] expected: f64) {
        assert!((linear_decay(progress, 1.1) - expected).abs() < 1e-9);
    }

    #[test]
    fn decay_handles_a_unit_upper_cap_without_dividing_by_zero() {
        assert_eq!(linear_decay(0.9, 1.0), 1.0);
        assert_eq!(linear_decay(1.0, 1.0), 1.0);
        assert_eq!(linear_decay(1.0001, 1.0), 0.0);
    }
}
