//! Option ordering with elimination.
//!
//! The authored option order never changes. Elimination only flips membership
//! in an eliminated set; the visible order is derived from the backing order
//! by filtering, and recomputed whenever the filter changes. Anything keyed by
//! [`OptionId`] (recorded heights, selection) stays valid across elimination.

use crate::model::OptionId;
use std::collections::HashSet;

/// Stable backing order plus a derived visible ordering.
///
/// # Invariants
/// - `visible` is strictly increasing (authored order preserved)
/// - `visible` contains exactly the backing indices not eliminated
#[derive(Debug, Clone)]
pub struct OptionOrder {
    backing: Box<[OptionId]>,
    eliminated: HashSet<OptionId>,
    visible: Vec<usize>,
}

impl OptionOrder {
    /// Create from the authored order. Nothing is eliminated.
    pub fn new(options: impl IntoIterator<Item = OptionId>) -> Self {
        let backing: Box<[OptionId]> = options.into_iter().collect();
        let visible = (0..backing.len()).collect();
        Self {
            backing,
            eliminated: HashSet::new(),
            visible,
        }
    }

    /// All options in authored order, eliminated ones included.
    pub fn all(&self) -> &[OptionId] {
        &self.backing
    }

    /// True if the option exists in the backing order.
    pub fn contains(&self, id: &OptionId) -> bool {
        self.backing.contains(id)
    }

    /// Number of visible options.
    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Visible options in display order.
    pub fn visible(&self) -> impl Iterator<Item = &OptionId> + '_ {
        self.visible.iter().map(move |&i| &self.backing[i])
    }

    /// Option at a visible position.
    pub fn visible_at(&self, position: usize) -> Option<&OptionId> {
        self.visible.get(position).map(|&i| &self.backing[i])
    }

    /// Visible position of an option, `None` if eliminated or unknown.
    pub fn visible_position(&self, id: &OptionId) -> Option<usize> {
        self.visible.iter().position(|&i| &self.backing[i] == id)
    }

    /// True if the option is eliminated.
    pub fn is_eliminated(&self, id: &OptionId) -> bool {
        self.eliminated.contains(id)
    }

    /// Eliminated options in authored order.
    pub fn eliminated(&self) -> impl Iterator<Item = &OptionId> + '_ {
        self.backing.iter().filter(move |id| self.eliminated.contains(*id))
    }

    /// Remove an option from the visible order. Returns true if it changed.
    pub fn eliminate(&mut self, id: &OptionId) -> bool {
        if !self.contains(id) || !self.eliminated.insert(id.clone()) {
            return false;
        }
        self.recompute();
        true
    }

    /// Put an eliminated option back. Returns true if it changed.
    pub fn restore(&mut self, id: &OptionId) -> bool {
        if !self.eliminated.remove(id) {
            return false;
        }
        self.recompute();
        true
    }

    /// Flip elimination. Returns the new eliminated state.
    pub fn toggle(&mut self, id: &OptionId) -> bool {
        if self.is_eliminated(id) {
            self.restore(id);
            false
        } else {
            self.eliminate(id)
        }
    }

    fn recompute(&mut self) {
        self.visible = self
            .backing
            .iter()
            .enumerate()
            .filter(|(_, id)| !self.eliminated.contains(*id))
            .map(|(i, _)| i)
            .collect();
    }
}
