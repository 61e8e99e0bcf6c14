//! Core view-state newtypes

use std::fmt;

/// A measured or estimated row height in layout points.
///
/// Always finite, >= 0 and at most [`RenderHeight::MAX`]. Content heights
/// come from the rendering surface as arbitrary JSON numbers, so
/// construction is validated. The upper bound keeps whole-point sums over
/// every row well inside the height index's integer range.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct RenderHeight(f64);

/// Error returned when a height is negative, NaN, infinite or above
/// [`RenderHeight::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("RenderHeight must be between 0 and 1000000 points (got {0})")]
pub struct InvalidRenderHeight(pub f64);

impl RenderHeight {
    /// Zero height.
    pub const ZERO: Self = Self(0.0);

    /// Largest accepted height: one million points.
    pub const MAX: Self = Self(1_000_000.0);

    /// Smart constructor that validates the height.
    pub fn new(points: f64) -> Result<Self, InvalidRenderHeight> {
        if (0.0..=Self::MAX.0).contains(&points) {
            Ok(Self(points))
        } else {
            Err(InvalidRenderHeight(points))
        }
    }

    /// Get the raw value in points.
    pub fn get(&self) -> f64 {
        self.0
    }

    /// Add a non-negative padding, saturating at [`RenderHeight::MAX`].
    pub fn padded(&self, padding: RenderHeight) -> Self {
        Self((self.0 + padding.0).min(Self::MAX.0))
    }

    /// Height rounded up to whole points, as used by the height index.
    pub fn whole_points(&self) -> usize {
        self.0.ceil() as usize
    }
}

impl fmt::Display for RenderHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}pt", self.0)
    }
}

impl TryFrom<f64> for RenderHeight {
    type Error = InvalidRenderHeight;

    fn try_from(points: f64) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

/// Position of a row in the currently visible list. 0 is the question row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct VisibleIndex(usize);

impl VisibleIndex {
    /// Create a new VisibleIndex from a raw 0-based value.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw 0-based index value.
    pub fn get(&self) -> usize {
        self.0
    }
}

impl From<usize> for VisibleIndex {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_height_accepts_zero_and_positive() {
        assert_eq!(RenderHeight::new(0.0).unwrap(), RenderHeight::ZERO);
        assert_eq!(RenderHeight::new(42.5).unwrap().get(), 42.5);
    }

    #[test]
    fn render_height_rejects_negative_and_non_finite() {
        assert_eq!(RenderHeight::new(-1.0), Err(InvalidRenderHeight(-1.0)));
        assert!(RenderHeight::new(f64::NAN).is_err());
        assert!(RenderHeight::new(f64::INFINITY).is_err());
    }

    #[test]
    fn render_height_rejects_heights_above_max() {
        assert_eq!(RenderHeight::new(1_000_000.0), Ok(RenderHeight::MAX));
        assert_eq!(RenderHeight::new(1_000_000.5), Err(InvalidRenderHeight(1_000_000.5)));
        assert!(RenderHeight::new(1e20).is_err());
        assert!(RenderHeight::new(f64::MAX).is_err());
    }

    #[test]
    fn render_height_padded_adds_points() {
        let h = RenderHeight::new(42.0).unwrap();
        let pad = RenderHeight::new(16.0).unwrap();
        assert_eq!(h.padded(pad).get(), 58.0);
        assert_eq!(RenderHeight::MAX.padded(pad), RenderHeight::MAX);
    }

    #[test]
    fn whole_points_rounds_up() {
        assert_eq!(RenderHeight::new(41.2).unwrap().whole_points(), 42);
        assert_eq!(RenderHeight::new(42.0).unwrap().whole_points(), 42);
        assert_eq!(RenderHeight::ZERO.whole_points(), 0);
    }

    #[test]
    fn display_formats_points() {
        assert_eq!(RenderHeight::new(42.0).unwrap().to_string(), "42.0pt");
    }
}
