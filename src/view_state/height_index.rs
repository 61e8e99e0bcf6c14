//! HeightIndex - O(log n) row offsets over visible rows via Fenwick tree
//!
//! Holds the displayed height of every visible row, in whole layout points,
//! so the list can answer "where does row i start" and "which row is at
//! offset y" without summing every row above it.
//!
//! # Complexity
//!
//! - `set`: O(log n)
//! - `prefix_sum`: O(log n)
//! - `row_at_offset`: O(log² n)
//! - `rebuild`: O(n log n)

/// Fenwick tree of visible row heights.
#[derive(Debug, Clone, Default)]
pub struct HeightIndex {
    /// Fenwick tree backing storage (1-indexed internally, 0-indexed API)
    tree: Vec<isize>,
}

impl HeightIndex {
    /// Build an index from row heights in display order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use quizpane::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights([60, 44, 44]);
    /// assert_eq!(index.len(), 3);
    /// assert_eq!(index.total(), 148);
    /// ```
    pub fn from_heights(heights: impl IntoIterator<Item = usize>) -> Self {
        let mut index = Self::default();
        index.rebuild(heights);
        index
    }

    /// Replace all rows.
    pub fn rebuild(&mut self, heights: impl IntoIterator<Item = usize>) {
        let heights: Vec<usize> = heights.into_iter().collect();
        self.tree.clear();
        self.tree.resize(heights.len(), 0);
        for (i, h) in heights.into_iter().enumerate() {
            fenwick::array::update(&mut self.tree, i, h as isize);
        }
    }

    /// Sets the height of one row.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use quizpane::view_state::height_index::HeightIndex;
    /// let mut index = HeightIndex::from_heights([44, 44]);
    /// index.set(1, 58);
    /// assert_eq!(index.total(), 102);
    /// ```
    pub fn set(&mut self, index: usize, height: usize) {
        let delta = height as isize - self.height_at(index) as isize;
        if delta != 0 {
            fenwick::array::update(&mut self.tree, index, delta);
        }
    }

    /// Height of one row.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn height_at(&self, index: usize) -> usize {
        if index == 0 {
            self.prefix_sum(0)
        } else {
            self.prefix_sum(index) - self.prefix_sum(index - 1)
        }
    }

    /// Cumulative height of rows `0..=index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn prefix_sum(&self, index: usize) -> usize {
        assert!(
            index < self.len(),
            "index {} out of bounds (len: {})",
            index,
            self.len()
        );
        fenwick::array::prefix_sum(&self.tree, index).max(0) as usize
    }

    /// Offset of the top edge of a row.
    pub fn offset_of(&self, index: usize) -> usize {
        if index == 0 {
            0
        } else {
            self.prefix_sum(index - 1)
        }
    }

    /// Row containing vertical offset `y`, `None` past the end.
    ///
    /// Row i covers `[offset_of(i), offset_of(i) + height_at(i))`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use quizpane::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights([10, 20, 15]);
    /// assert_eq!(index.row_at_offset(0), Some(0));
    /// assert_eq!(index.row_at_offset(10), Some(1));
    /// assert_eq!(index.row_at_offset(44), Some(2));
    /// assert_eq!(index.row_at_offset(45), None);
    /// ```
    pub fn row_at_offset(&self, y: usize) -> Option<usize> {
        let mut left = 0;
        let mut right = self.len();

        while left < right {
            let mid = left + (right - left) / 2;
            if self.prefix_sum(mid) > y {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        (left < self.len()).then_some(left)
    }

    /// Total height of all rows.
    pub fn total(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.prefix_sum(self.len() - 1)
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// True if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}
