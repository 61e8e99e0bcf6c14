//! List presentation layer boundary.
//!
//! The list layer asks for row heights synchronously during layout and is
//! told, row by row, when something it laid out has changed. It is never asked
//! to reload all data: targeted updates keep selection visuals and scroll
//! position intact.

use super::types::VisibleIndex;

/// Targeted update notifications for the list presentation layer.
pub trait ListLayer {
    /// Heights of these visible rows changed; recompute their layout.
    fn row_heights_changed(&mut self, rows: &[VisibleIndex]);

    /// Rows left the visible set (indices before removal).
    fn rows_removed(&mut self, rows: &[VisibleIndex]);

    /// Rows entered the visible set (indices after insertion).
    fn rows_inserted(&mut self, rows: &[VisibleIndex]);

    /// Selection, mark or loading visuals of these rows changed.
    fn row_states_changed(&mut self, rows: &[VisibleIndex]);
}

/// One notification received by a [`RecordingListLayer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListUpdate {
    /// See [`ListLayer::row_heights_changed`].
    Heights(Vec<VisibleIndex>),
    /// See [`ListLayer::rows_removed`].
    Removed(Vec<VisibleIndex>),
    /// See [`ListLayer::rows_inserted`].
    Inserted(Vec<VisibleIndex>),
    /// See [`ListLayer::row_states_changed`].
    States(Vec<VisibleIndex>),
}

/// List layer that records every notification. Used by the command-line
/// driver to count layout passes and by tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingListLayer {
    updates: Vec<ListUpdate>,
}

impl RecordingListLayer {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All updates in arrival order.
    pub fn updates(&self) -> &[ListUpdate] {
        &self.updates
    }

    /// Number of targeted height recomputations requested.
    pub fn height_pass_count(&self) -> usize {
        self.updates
            .iter()
            .filter(|u| matches!(u, ListUpdate::Heights(_)))
            .count()
    }

    /// Forget recorded updates.
    pub fn clear(&mut self) {
        self.updates.clear();
    }
}

impl ListLayer for RecordingListLayer {
    fn row_heights_changed(&mut self, rows: &[VisibleIndex]) {
        self.updates.push(ListUpdate::Heights(rows.to_vec()));
    }

    fn rows_removed(&mut self, rows: &[VisibleIndex]) {
        self.updates.push(ListUpdate::Removed(rows.to_vec()));
    }

    fn rows_inserted(&mut self, rows: &[VisibleIndex]) {
        self.updates.push(ListUpdate::Inserted(rows.to_vec()));
    }

    fn row_states_changed(&mut self, rows: &[VisibleIndex]) {
        self.updates.push(ListUpdate::States(rows.to_vec()));
    }
}

impl<L: ListLayer + ?Sized> ListLayer for &mut L {
    fn row_heights_changed(&mut self, rows: &[VisibleIndex]) {
        (**self).row_heights_changed(rows)
    }

    fn rows_removed(&mut self, rows: &[VisibleIndex]) {
        (**self).rows_removed(rows)
    }

    fn rows_inserted(&mut self, rows: &[VisibleIndex]) {
        (**self).rows_inserted(rows)
    }

    fn row_states_changed(&mut self, rows: &[VisibleIndex]) {
        (**self).row_states_changed(rows)
    }
}
