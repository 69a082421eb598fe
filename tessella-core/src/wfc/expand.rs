//! Proportional frontier expansion around collapsed cells.
//!
//! New open cells are allocated to parents in proportion to their original
//! centre degrees, capped per parent at `⌈degree / 2⌉`, with leftover budget
//! distributed by largest fractional remainder.

use crate::{
    pattern::PatternId,
    wfc::{arena::CellArena, CellId},
};

/// Creates up to `budget` open child cells around the parents.
///
/// Children start with the full pattern domain, join the frontier, and are
/// linked bidirectionally to their parent. Returns the number of cells
/// created. Parents with no expansion demand (zero recorded degree) and a
/// zero budget both no-op.
pub(crate) fn expand(
    parents: &[CellId],
    budget: usize,
    cells: &mut CellArena,
    frontier: &mut Vec<CellId>,
    all_pids: &[PatternId],
) -> usize {
    let degrees: Vec<usize> = parents
        .iter()
        .map(|&parent| cells.get(parent).target_degree().unwrap_or(0))
        .collect();
    let demand: usize = degrees.iter().sum();
    if demand == 0 || budget == 0 {
        return 0;
    }

    // Proportional base shares, floored with a minimum of 1 and capped at
    // ⌈degree / 2⌉ per parent.
    let mut alloc = Vec::with_capacity(parents.len());
    let mut remainders = Vec::with_capacity(parents.len());
    for (index, &degree) in degrees.iter().enumerate() {
        let share = budget as f64 * degree as f64 / demand as f64;
        let base = (share.floor() as usize).max(1);
        let cap = degree.div_ceil(2);
        alloc.push(base.min(cap));
        remainders.push((index, share - base as f64));
    }

    // Largest-remainder surplus distribution, one slot per parent, stable in
    // parent order for equal remainders.
    let used: usize = alloc.iter().sum();
    let mut surplus = budget.saturating_sub(used);
    if surplus > 0 {
        remainders.sort_by(|a, b| b.1.total_cmp(&a.1));
        for &(index, _) in &remainders {
            if surplus == 0 {
                break;
            }
            let cap = degrees[index].div_ceil(2);
            if alloc[index] < cap {
                alloc[index] += 1;
                surplus -= 1;
            }
        }
    }

    let mut created = 0;
    for (index, &parent) in parents.iter().enumerate() {
        for _ in 0..alloc[index] {
            let child = cells.alloc(all_pids.iter().copied());
            frontier.push(child);
            cells.link(parent, child);
            created += 1;
        }
    }
    created
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pids(count: usize) -> Vec<PatternId> {
        (0..count).map(PatternId::new).collect()
    }

    fn collapsed_parent(cells: &mut CellArena, degree: usize) -> CellId {
        let id = cells.alloc([PatternId::new(0)]);
        cells
            .get_mut(id)
            .collapse_to(PatternId::new(0), 0, degree)
            .expect("pattern is in the domain");
        id
    }

    #[test]
    fn children_join_the_frontier_linked_to_their_parent() {
        let mut cells = CellArena::new();
        let parent = collapsed_parent(&mut cells, 4);
        let mut frontier = Vec::new();
        let created = expand(&[parent], 2, &mut cells, &mut frontier, &pids(3));
        assert_eq!(created, 2);
        assert_eq!(frontier.len(), 2);
        for &child in &frontier {
            assert!(cells.adjacent(parent, child));
            assert_eq!(cells.get(child).domain_len(), 3);
            assert!(!cells.get(child).is_collapsed());
        }
    }

    #[test]
    fn allocation_is_proportional_to_degree_with_caps() {
        let mut cells = CellArena::new();
        let heavy = collapsed_parent(&mut cells, 6);
        let light = collapsed_parent(&mut cells, 2);
        let mut frontier = Vec::new();
        // Budget 4, demand 8: heavy's share is 3.0, light's 1.0; both within
        // their ⌈degree/2⌉ caps of 3 and 1.
        let created = expand(&[heavy, light], 4, &mut cells, &mut frontier, &pids(1));
        assert_eq!(created, 4);
        assert_eq!(cells.degree(heavy), 3);
        assert_eq!(cells.degree(light), 1);
    }

    #[test]
    fn caps_bound_each_parent_even_under_a_large_budget() {
        let mut cells = CellArena::new();
        let parent = collapsed_parent(&mut cells, 5);
        let mut frontier = Vec::new();
        let created = expand(&[parent], 100, &mut cells, &mut frontier, &pids(1));
        assert_eq!(created, 3);
    }

    #[test]
    fn surplus_goes_to_the_largest_remainder_first() {
        let mut cells = CellArena::new();
        let a = collapsed_parent(&mut cells, 5);
        let b = collapsed_parent(&mut cells, 3);
        let mut frontier = Vec::new();
        // Budget 5, demand 8: shares 3.125 and 1.875 floor to 3 and 1 within
        // caps 3 and 2, leaving one surplus slot for b (remainder 0.875).
        let created = expand(&[a, b], 5, &mut cells, &mut frontier, &pids(1));
        assert_eq!(created, 5);
        assert_eq!(cells.degree(a), 3);
        assert_eq!(cells.degree(b), 2);
    }

    #[test]
    fn zero_budget_and_zero_demand_are_no_ops() {
        let mut cells = CellArena::new();
        let parent = collapsed_parent(&mut cells, 4);
        let idle = collapsed_parent(&mut cells, 0);
        let mut frontier = Vec::new();
        assert_eq!(expand(&[parent], 0, &mut cells, &mut frontier, &pids(1)), 0);
        assert_eq!(expand(&[idle], 8, &mut cells, &mut frontier, &pids(1)), 0);
        assert!(frontier.is_empty());
    }
}
