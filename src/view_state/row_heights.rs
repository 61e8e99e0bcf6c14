//! List height coordinator.
//!
//! Answers the list layer's synchronous height queries from the row height
//! table and pushes targeted reflows when a measurement lands later.
//!
//! # Invariants
//! - Heights are recorded per [`RowKey`], never per visible index, so
//!   eliminating or restoring options leaves every recorded height valid.
//! - `index` mirrors the displayed height of every visible row in display
//!   order (question first).

use super::height_index::HeightIndex;
use super::list_layer::ListLayer;
use super::option_order::OptionOrder;
use super::types::{RenderHeight, VisibleIndex};
use crate::model::{OptionId, RowKey};
use std::collections::HashMap;
use tracing::debug;

/// Per-screen row height table plus visible-row bookkeeping.
#[derive(Debug, Clone)]
pub struct ListHeightCoordinator {
    heights: HashMap<RowKey, RenderHeight>,
    estimate: RenderHeight,
    padding: RenderHeight,
    order: OptionOrder,
    index: HeightIndex,
}

impl ListHeightCoordinator {
    /// Create a coordinator.
    ///
    /// `estimate` is returned for rows with no recorded height; `padding` is
    /// the fixed presentation offset added to recorded content heights.
    pub fn new(order: OptionOrder, estimate: RenderHeight, padding: RenderHeight) -> Self {
        let mut coordinator = Self {
            heights: HashMap::new(),
            estimate,
            padding,
            order,
            index: HeightIndex::default(),
        };
        coordinator.rebuild_index();
        coordinator
    }

    /// Displayed height of a row: recorded height plus padding, or the
    /// estimate if nothing has been recorded.
    pub fn height_for_row(&self, row: &RowKey) -> RenderHeight {
        match self.heights.get(row) {
            Some(h) => h.padded(self.padding),
            None => self.estimate,
        }
    }

    /// Displayed height of the row at a visible position.
    pub fn height_at(&self, position: VisibleIndex) -> Option<RenderHeight> {
        self.row_at(position).map(|row| self.height_for_row(&row))
    }

    /// Recorded content height of a row, without padding.
    pub fn recorded(&self, row: &RowKey) -> Option<RenderHeight> {
        self.heights.get(row).copied()
    }

    /// Record a resolved height and reflow the row if it is visible.
    ///
    /// Returns the visible position that was reflowed. Recording the height
    /// already on file reflows nothing.
    pub fn on_height_resolved(
        &mut self,
        row: RowKey,
        height: RenderHeight,
        list: &mut dyn ListLayer,
    ) -> Option<VisibleIndex> {
        if self.heights.get(&row) == Some(&height) {
            return None;
        }
        self.heights.insert(row.clone(), height);

        let position = self.position_of(&row)?;
        self.index
            .set(position.get(), self.height_for_row(&row).whole_points());
        debug!(%row, position = position.get(), %height, "reflowing row");
        list.row_heights_changed(&[position]);
        Some(position)
    }

    /// The option ordering.
    pub fn order(&self) -> &OptionOrder {
        &self.order
    }

    /// Number of visible rows, question included.
    pub fn visible_len(&self) -> usize {
        1 + self.order.visible_len()
    }

    /// Visible rows in display order.
    pub fn visible_rows(&self) -> Vec<RowKey> {
        std::iter::once(RowKey::Question)
            .chain(self.order.visible().cloned().map(RowKey::Option))
            .collect()
    }

    /// Row shown at a visible position.
    pub fn row_at(&self, position: VisibleIndex) -> Option<RowKey> {
        match position.get() {
            0 => Some(RowKey::Question),
            n => self.order.visible_at(n - 1).cloned().map(RowKey::Option),
        }
    }

    /// Visible position of a row, `None` if eliminated or unknown.
    pub fn position_of(&self, row: &RowKey) -> Option<VisibleIndex> {
        match row {
            RowKey::Question => Some(VisibleIndex::new(0)),
            RowKey::Option(id) => self
                .order
                .visible_position(id)
                .map(|p| VisibleIndex::new(p + 1)),
        }
    }

    /// Remove an option from the visible rows.
    ///
    /// Returns the position it occupied, `None` if nothing changed.
    pub fn eliminate(&mut self, id: &OptionId, list: &mut dyn ListLayer) -> Option<VisibleIndex> {
        let position = self.position_of(&RowKey::Option(id.clone()))?;
        if !self.order.eliminate(id) {
            return None;
        }
        self.rebuild_index();
        list.rows_removed(&[position]);
        Some(position)
    }

    /// Return an eliminated option to the visible rows.
    ///
    /// Returns its new position, `None` if nothing changed.
    pub fn restore(&mut self, id: &OptionId, list: &mut dyn ListLayer) -> Option<VisibleIndex> {
        if !self.order.restore(id) {
            return None;
        }
        self.rebuild_index();
        let position = self.position_of(&RowKey::Option(id.clone()))?;
        list.rows_inserted(&[position]);
        Some(position)
    }

    /// Total displayed height of all visible rows, in whole points.
    pub fn content_height(&self) -> usize {
        self.index.total()
    }

    /// Top offset of a visible row, in whole points.
    pub fn offset_of(&self, position: VisibleIndex) -> Option<usize> {
        (position.get() < self.index.len()).then(|| self.index.offset_of(position.get()))
    }

    /// Row at a vertical offset into the list content.
    pub fn row_at_offset(&self, y: usize) -> Option<RowKey> {
        self.index
            .row_at_offset(y)
            .and_then(|p| self.row_at(VisibleIndex::new(p)))
    }

    fn rebuild_index(&mut self) {
        let heights: Vec<usize> = self
            .visible_rows()
            .iter()
            .map(|row| self.height_for_row(row).whole_points())
            .collect();
        self.index.rebuild(heights);
    }
}
