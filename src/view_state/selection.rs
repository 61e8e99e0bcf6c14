//! Answer choice state: selection and marking.
//!
//! Selecting and marking are mutually exclusive. At most one option is chosen
//! at a time, either as the selected answer or as a marked (flagged for
//! review) option. Both actions toggle.

use crate::model::OptionId;

/// The user's current choice among the options.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChoiceState {
    /// Nothing chosen.
    #[default]
    None,
    /// Option selected as the answer.
    Selected(OptionId),
    /// Option marked for review.
    Marked(OptionId),
}

/// Glyph an option row shows for the current choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceGlyph {
    /// Empty circle: not chosen.
    Circle,
    /// Checkmark: selected.
    Checkmark,
    /// Question mark: marked for review.
    QuestionMark,
}

/// Options whose visuals must be refreshed after a choice change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChoiceChange {
    /// Every option whose selected/marked visual changed.
    pub touched: Vec<OptionId>,
}

impl ChoiceState {
    /// Selected option, if any.
    pub fn selected(&self) -> Option<&OptionId> {
        match self {
            ChoiceState::Selected(id) => Some(id),
            _ => None,
        }
    }

    /// Marked option, if any.
    pub fn marked(&self) -> Option<&OptionId> {
        match self {
            ChoiceState::Marked(id) => Some(id),
            _ => None,
        }
    }

    /// The toolbar's primary action is enabled only while a selection exists.
    pub fn primary_action_enabled(&self) -> bool {
        matches!(self, ChoiceState::Selected(_))
    }

    /// Select an option; selecting the selected option deselects it.
    ///
    /// Any marked option is unmarked.
    pub fn select(&mut self, id: &OptionId) -> ChoiceChange {
        let next = match &*self {
            ChoiceState::Selected(current) if current == id => ChoiceState::None,
            _ => ChoiceState::Selected(id.clone()),
        };
        self.transition(next)
    }

    /// Mark an option; marking the marked option unmarks it.
    ///
    /// Any selected option is deselected.
    pub fn mark(&mut self, id: &OptionId) -> ChoiceChange {
        let next = match &*self {
            ChoiceState::Marked(current) if current == id => ChoiceState::None,
            _ => ChoiceState::Marked(id.clone()),
        };
        self.transition(next)
    }

    /// Drop the choice if it refers to `id` (the option left the visible set).
    pub fn clear_for(&mut self, id: &OptionId) -> ChoiceChange {
        let refers = match &*self {
            ChoiceState::Selected(current) | ChoiceState::Marked(current) => current == id,
            ChoiceState::None => false,
        };
        if refers {
            self.transition(ChoiceState::None)
        } else {
            ChoiceChange::default()
        }
    }

    fn transition(&mut self, next: ChoiceState) -> ChoiceChange {
        let mut touched = Vec::new();
        for id in [self.chosen(), next.chosen()].into_iter().flatten() {
            if !touched.contains(id) {
                touched.push(id.clone());
            }
        }
        *self = next;
        ChoiceChange { touched }
    }

    /// Glyph for the row showing `id`.
    pub fn glyph_for(&self, id: &OptionId) -> ChoiceGlyph {
        match self {
            ChoiceState::Selected(current) if current == id => ChoiceGlyph::Checkmark,
            ChoiceState::Marked(current) if current == id => ChoiceGlyph::QuestionMark,
            _ => ChoiceGlyph::Circle,
        }
    }

    /// Option chosen either way, if any.
    pub fn chosen(&self) -> Option<&OptionId> {
        match self {
            ChoiceState::Selected(id) | ChoiceState::Marked(id) => Some(id),
            ChoiceState::None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> OptionId {
        OptionId::new(s).unwrap()
    }

    #[test]
    fn select_sets_selection() {
        let mut state = ChoiceState::default();
        let change = state.select(&id("a"));

        assert_eq!(state, ChoiceState::Selected(id("a")));
        assert!(state.primary_action_enabled());
        assert_eq!(change.touched, vec![id("a")]);
    }

    #[test]
    fn reselect_toggles_off() {
        let mut state = ChoiceState::default();
        state.select(&id("a"));
        state.select(&id("a"));

        assert_eq!(state, ChoiceState::None);
        assert!(!state.primary_action_enabled());
    }

    #[test]
    fn select_other_moves_selection() {
        let mut state = ChoiceState::default();
        state.select(&id("a"));
        let change = state.select(&id("b"));

        assert_eq!(state.selected(), Some(&id("b")));
        assert_eq!(change.touched, vec![id("a"), id("b")]);
    }

    #[test]
    fn select_unmarks_marked_option() {
        let mut state = ChoiceState::default();
        state.mark(&id("a"));
        state.select(&id("b"));

        assert_eq!(state.marked(), None);
        assert_eq!(state.selected(), Some(&id("b")));
    }

    #[test]
    fn select_marked_option_converts_mark_to_selection() {
        let mut state = ChoiceState::default();
        state.mark(&id("a"));
        let change = state.select(&id("a"));

        assert_eq!(state, ChoiceState::Selected(id("a")));
        assert_eq!(change.touched, vec![id("a")]);
    }

    #[test]
    fn mark_deselects_selection() {
        let mut state = ChoiceState::default();
        state.select(&id("a"));
        state.mark(&id("b"));

        assert_eq!(state, ChoiceState::Marked(id("b")));
        assert!(!state.primary_action_enabled());
    }

    #[test]
    fn remark_toggles_off() {
        let mut state = ChoiceState::default();
        state.mark(&id("a"));
        state.mark(&id("a"));
        assert_eq!(state, ChoiceState::None);
    }

    #[test]
    fn glyph_follows_choice() {
        let mut state = ChoiceState::default();
        assert_eq!(state.glyph_for(&id("a")), ChoiceGlyph::Circle);

        state.select(&id("a"));
        assert_eq!(state.glyph_for(&id("a")), ChoiceGlyph::Checkmark);
        assert_eq!(state.glyph_for(&id("b")), ChoiceGlyph::Circle);

        state.mark(&id("b"));
        assert_eq!(state.glyph_for(&id("a")), ChoiceGlyph::Circle);
        assert_eq!(state.glyph_for(&id("b")), ChoiceGlyph::QuestionMark);
    }

    #[test]
    fn clear_for_only_affects_matching_option() {
        let mut state = ChoiceState::default();
        state.select(&id("a"));

        assert!(state.clear_for(&id("b")).touched.is_empty());
        assert_eq!(state.selected(), Some(&id("a")));

        assert_eq!(state.clear_for(&id("a")).touched, vec![id("a")]);
        assert_eq!(state, ChoiceState::None);
    }
}
