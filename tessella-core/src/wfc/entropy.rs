//! Entropy-driven collapse selection and weighted pattern sampling.

use std::collections::BTreeSet;

use rand::{rngs::SmallRng, Rng};

use crate::{
    pattern::PatternId,
    wfc::{arena::CellArena, CellId},
};

/// Selects the next cell to collapse and samples patterns by frequency.
///
/// Entropies are recomputed on demand from the current domains, so no cache
/// invalidation is needed when propagation shrinks a domain.
#[derive(Clone, Debug)]
pub(crate) struct EntropyIndex {
    frequencies: Vec<u64>,
}

impl EntropyIndex {
    /// Builds an index over training frequencies, indexed by pattern id.
    pub(crate) fn new(frequencies: Vec<u64>) -> Self {
        Self { frequencies }
    }

    fn weight(&self, pid: PatternId) -> u64 {
        self.frequencies.get(pid.get()).copied().unwrap_or(1)
    }

    /// Shannon entropy (base 2) of a domain under the frequency weights.
    ///
    /// Domains of size 0 or 1, and zero total weight, have entropy 0.
    pub(crate) fn entropy(&self, domain: &BTreeSet<PatternId>) -> f64 {
        if domain.len() <= 1 {
            return 0.0;
        }
        let total: u64 = domain.iter().map(|&pid| self.weight(pid)).sum();
        if total == 0 {
            return 0.0;
        }
        let total = total as f64;
        domain
            .iter()
            .map(|&pid| {
                let p = self.weight(pid) as f64 / total;
                if p > 0.0 { -p * p.log2() } else { 0.0 }
            })
            .sum()
    }

    /// Returns the frontier cell with the smallest positive entropy.
    ///
    /// Ties keep the earliest frontier entry; cells with zero entropy
    /// (singleton or empty domains) are never returned.
    pub(crate) fn pick_lowest(&self, frontier: &[CellId], cells: &CellArena) -> Option<CellId> {
        let mut best: Option<(CellId, f64)> = None;
        for &id in frontier {
            let cell = cells.get(id);
            if cell.is_collapsed() {
                continue;
            }
            let entropy = self.entropy(cell.domain());
            if entropy > 0.0 && best.map_or(true, |(_, lowest)| entropy < lowest) {
                best = Some((id, entropy));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Draws a pattern from the domain, weighted by training frequency.
    ///
    /// Draws a uniform integer from `[0, W)` over the cumulative frequency
    /// sums; deterministic under a seeded RNG. Returns `None` for an empty
    /// domain.
    pub(crate) fn sample(
        &self,
        domain: &BTreeSet<PatternId>,
        rng: &mut SmallRng,
    ) -> Option<PatternId> {
        let total: u64 = domain.iter().map(|&pid| self.weight(pid)).sum();
        if total == 0 {
            return None;
        }
        let draw = rng.gen_range(0..total);
        let mut acc = 0_u64;
        for &pid in domain {
            acc += self.weight(pid);
            if acc > draw {
                return Some(pid);
            }
        }
        domain.iter().next_back().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;
    use rstest::rstest;

    fn domain(raw: &[usize]) -> BTreeSet<PatternId> {
        raw.iter().copied().map(PatternId::new).collect()
    }

    #[test]
    fn entropy_matches_the_closed_form_for_known_frequencies() {
        let index = EntropyIndex::new(vec![3, 2, 1]);
        let h = index.entropy(&domain(&[0, 1, 2]));
        let expected = -(0.5_f64 * 0.5_f64.log2()
            + (1.0 / 3.0) * (1.0_f64 / 3.0).log2()
            + (1.0 / 6.0) * (1.0_f64 / 6.0).log2());
        assert!((h - expected).abs() < 1e-12);
    }

    #[rstest]
    #[case(&[] as &[usize])]
    #[case(&[0])]
    fn degenerate_domains_have_zero_entropy(#[case] raw: &[usize]) {
        let index = EntropyIndex::new(vec![3, 2, 1]);
        assert_eq!(index.entropy(&domain(raw)), 0.0);
    }

    #[test]
    fn unknown_pattern_ids_default_to_weight_one() {
        let index = EntropyIndex::new(vec![2]);
        // Weights 2 and 1: entropy of the {2/3, 1/3} distribution.
        let h = index.entropy(&domain(&[0, 9]));
        let expected =
            -((2.0 / 3.0) * (2.0_f64 / 3.0).log2() + (1.0 / 3.0) * (1.0_f64 / 3.0).log2());
        assert!((h - expected).abs() < 1e-12);
    }

    #[test]
    fn pick_lowest_prefers_smaller_entropy_and_earlier_insertion() {
        let index = EntropyIndex::new(vec![8, 1, 1, 1]);
        let mut cells = CellArena::new();
        // Skewed weights (8 vs 1) give a lower entropy than uniform ones.
        let skewed = cells.alloc(domain(&[0, 1]));
        let uniform = cells.alloc(domain(&[1, 2]));
        let skewed_twin = cells.alloc(domain(&[0, 3]));
        let frontier = vec![uniform, skewed, skewed_twin];
        assert_eq!(index.pick_lowest(&frontier, &cells), Some(skewed));
    }

    #[test]
    fn pick_lowest_skips_zero_entropy_cells() {
        let index = EntropyIndex::new(vec![1, 1]);
        let mut cells = CellArena::new();
        let forced = cells.alloc(domain(&[0]));
        let frontier = vec![forced];
        assert_eq!(index.pick_lowest(&frontier, &cells), None);
    }

    #[test]
    fn sampling_is_deterministic_under_a_fixed_seed() {
        let index = EntropyIndex::new(vec![3, 2, 1]);
        let d = domain(&[0, 1, 2]);
        let draws: Vec<_> = {
            let mut rng = SmallRng::seed_from_u64(42);
            (0..16).map(|_| index.sample(&d, &mut rng)).collect()
        };
        let again: Vec<_> = {
            let mut rng = SmallRng::seed_from_u64(42);
            (0..16).map(|_| index.sample(&d, &mut rng)).collect()
        };
        assert_eq!(draws, again);
        assert!(draws.iter().all(Option::is_some));
    }

    #[test]
    fn sampling_an_empty_domain_returns_none() {
        let index = EntropyIndex::new(vec![1]);
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(index.sample(&BTreeSet::new(), &mut rng), None);
    }
}
