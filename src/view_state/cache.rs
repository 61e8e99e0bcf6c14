//! Render size cache: measured content height per rendered markup.
//!
//! Keyed by markup, not by question/option identity, so two options whose
//! content renders identically share one measurement.
//!
//! There is no eviction. Entries live until [`RenderSizeCache::flush`], which
//! the owning screen calls when it is dismissed. Within one viewing session a
//! row is therefore never measured twice.

use super::types::RenderHeight;
use crate::render::RenderedMarkup;
use std::collections::HashMap;

/// Memoized `markup -> height` mapping.
///
/// Accessed only from the screen's cooperative context; no internal locking.
#[derive(Debug, Clone, Default)]
pub struct RenderSizeCache {
    heights: HashMap<RenderedMarkup, RenderHeight>,
}

impl RenderSizeCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a height for markup, overwriting any previous value.
    pub fn set(&mut self, height: RenderHeight, markup: RenderedMarkup) {
        self.heights.insert(markup, height);
    }

    /// Look up the height measured for markup.
    pub fn get(&self, markup: &RenderedMarkup) -> Option<RenderHeight> {
        self.heights.get(markup).copied()
    }

    /// Drop every entry.
    pub fn flush(&mut self) {
        self.heights.clear();
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }
}
