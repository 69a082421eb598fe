//! Pattern-domain cells with a prune/collapse lifecycle.

use std::collections::BTreeSet;

use crate::{
    error::CellError,
    graph::Label,
    pattern::PatternId,
};

/// An output-graph vertex under construction.
///
/// A cell starts *open* with a domain of candidate pattern ids, is pruned by
/// constraint propagation (possibly many times), and is collapsed exactly
/// once; afterwards it is frozen. A domain emptied by pruning is the
/// contradiction signal the propagator surfaces.
///
/// # Examples
/// ```
/// use tessella_core::{Cell, PatternId};
///
/// let mut cell = Cell::new([PatternId::new(0), PatternId::new(1)]);
/// assert_eq!(cell.domain_len(), 2);
/// cell.collapse_to(PatternId::new(1), 4, 3).expect("pattern is in the domain");
/// assert!(cell.is_collapsed());
/// assert_eq!(cell.center_label(), Some(4));
/// assert_eq!(cell.target_degree(), Some(3));
/// ```
#[derive(Clone, Debug)]
pub struct Cell {
    domain: BTreeSet<PatternId>,
    collapsed: Option<PatternId>,
    center_label: Option<Label>,
    target_degree: Option<usize>,
}

impl Cell {
    /// Creates an open cell with the given candidate patterns.
    #[must_use]
    pub fn new(domain: impl IntoIterator<Item = PatternId>) -> Self {
        Self {
            domain: domain.into_iter().collect(),
            collapsed: None,
            center_label: None,
            target_degree: None,
        }
    }

    /// Current candidate pattern ids, in id order.
    #[must_use]
    pub fn domain(&self) -> &BTreeSet<PatternId> {
        &self.domain
    }

    /// Number of candidates remaining.
    #[must_use]
    pub fn domain_len(&self) -> usize {
        self.domain.len()
    }

    /// Returns whether the cell has been collapsed.
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.collapsed.is_some()
    }

    /// The pattern this cell collapsed to, if any.
    #[must_use]
    pub fn collapsed_pid(&self) -> Option<PatternId> {
        self.collapsed
    }

    /// Centre label assigned at collapse, if any.
    #[must_use]
    pub fn center_label(&self) -> Option<Label> {
        self.center_label
    }

    /// Target degree assigned at collapse, if any.
    #[must_use]
    pub fn target_degree(&self) -> Option<usize> {
        self.target_degree
    }

    /// Retains only the candidates present in `allowed`.
    ///
    /// Returns whether the domain shrank. An empty result is not an error at
    /// this level; the caller decides whether it is a contradiction.
    ///
    /// # Errors
    /// Returns [`CellError::AlreadyCollapsed`] when the cell is frozen.
    pub fn prune(&mut self, allowed: &BTreeSet<PatternId>) -> Result<bool, CellError> {
        if self.is_collapsed() {
            return Err(CellError::AlreadyCollapsed);
        }
        let before = self.domain.len();
        self.domain.retain(|pid| allowed.contains(pid));
        Ok(self.domain.len() < before)
    }

    /// Collapses the cell to a single pattern, freezing it.
    ///
    /// Records the centre label and target degree the caller resolved from
    /// the pattern table; the domain becomes the singleton `{pid}`.
    ///
    /// # Errors
    /// Returns [`CellError::AlreadyCollapsed`] on a second collapse and
    /// [`CellError::NotInDomain`] when `pid` is not a current candidate.
    pub fn collapse_to(
        &mut self,
        pid: PatternId,
        center_label: Label,
        target_degree: usize,
    ) -> Result<(), CellError> {
        if self.is_collapsed() {
            return Err(CellError::AlreadyCollapsed);
        }
        if !self.domain.contains(&pid) {
            return Err(CellError::NotInDomain { pid });
        }
        self.domain.clear();
        self.domain.insert(pid);
        self.collapsed = Some(pid);
        self.center_label = Some(center_label);
        self.target_degree = Some(target_degree);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pids(raw: &[usize]) -> Vec<PatternId> {
        raw.iter().copied().map(PatternId::new).collect()
    }

    #[test]
    fn prune_is_idempotent() {
        let mut cell = Cell::new(pids(&[0, 1, 2]));
        let keep: BTreeSet<_> = pids(&[1, 2]).into_iter().collect();
        assert!(cell.prune(&keep).expect("cell is open"));
        assert!(!cell.prune(&keep).expect("cell is open"));
        assert_eq!(cell.domain_len(), 2);
    }

    #[test]
    fn prune_can_empty_the_domain_without_erroring() {
        let mut cell = Cell::new(pids(&[0]));
        let keep = BTreeSet::new();
        assert!(cell.prune(&keep).expect("cell is open"));
        assert_eq!(cell.domain_len(), 0);
    }

    #[test]
    fn collapse_is_terminal() {
        let mut cell = Cell::new(pids(&[0, 1]));
        cell.collapse_to(PatternId::new(0), 9, 2).expect("first collapse succeeds");
        assert_eq!(
            cell.collapse_to(PatternId::new(0), 9, 2),
            Err(CellError::AlreadyCollapsed)
        );
        assert_eq!(
            cell.prune(&BTreeSet::new()),
            Err(CellError::AlreadyCollapsed)
        );
        assert_eq!(cell.domain().iter().copied().collect::<Vec<_>>(), pids(&[0]));
    }

    #[test]
    fn collapse_requires_a_domain_member() {
        let mut cell = Cell::new(pids(&[0, 1]));
        assert_eq!(
            cell.collapse_to(PatternId::new(5), 0, 0),
            Err(CellError::NotInDomain { pid: PatternId::new(5) })
        );
        assert!(!cell.is_collapsed());
    }
}
