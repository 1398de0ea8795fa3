//! Axis-aligned bounds in world coordinates.
//!
//! Unlike `geo::Rect`, a [`Bounds`] does not normalize its corners:
//! `left` may exceed `right` and `bottom` may exceed `top`, representing an
//! inverted axis (for example a Y axis that increases downward). All
//! derived quantities are inversion-aware.

use geo::Rect;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle whose axes may be inverted.
///
/// # Examples
///
/// ```
/// use tilebin::Bounds;
///
/// // A screen-style extent with Y increasing downward.
/// let bounds = Bounds::new(0.0, 4096.0, 4096.0, 0.0);
/// assert!(bounds.bottom > bounds.top);
/// assert_eq!(bounds.min_y(), 0.0);
/// assert_eq!(bounds.range_y(), 4096.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl Bounds {
    /// Create bounds from the four edge coordinates, preserving axis order.
    pub fn new(left: f64, right: f64, bottom: f64, top: f64) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
        }
    }

    /// Numerically smallest x edge.
    pub fn min_x(&self) -> f64 {
        self.left.min(self.right)
    }

    /// Numerically largest x edge.
    pub fn max_x(&self) -> f64 {
        self.left.max(self.right)
    }

    /// Numerically smallest y edge.
    pub fn min_y(&self) -> f64 {
        self.bottom.min(self.top)
    }

    /// Numerically largest y edge.
    pub fn max_y(&self) -> f64 {
        self.bottom.max(self.top)
    }

    /// Non-negative width, regardless of axis inversion.
    pub fn range_x(&self) -> f64 {
        (self.right - self.left).abs()
    }

    /// Non-negative height, regardless of axis inversion.
    pub fn range_y(&self) -> f64 {
        (self.top - self.bottom).abs()
    }

    /// Whether the x axis is inverted (`left > right`).
    pub fn x_inverted(&self) -> bool {
        self.left > self.right
    }

    /// Whether the y axis is inverted (`bottom > top`).
    pub fn y_inverted(&self) -> bool {
        self.bottom > self.top
    }

    /// Whether all four edges are finite.
    pub fn is_finite(&self) -> bool {
        self.left.is_finite()
            && self.right.is_finite()
            && self.bottom.is_finite()
            && self.top.is_finite()
    }

    /// Convert to a normalized `geo::Rect`, losing axis-inversion
    /// information. Useful for intersecting with `geo` types.
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            geo::coord! { x: self.min_x(), y: self.min_y() },
            geo::coord! { x: self.max_x(), y: self.max_y() },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges_ignore_inversion() {
        let normal = Bounds::new(-1.0, 1.0, -1.0, 1.0);
        let flipped = Bounds::new(1.0, -1.0, 1.0, -1.0);

        assert_eq!(normal.range_x(), 2.0);
        assert_eq!(flipped.range_x(), 2.0);
        assert_eq!(normal.range_y(), 2.0);
        assert_eq!(flipped.range_y(), 2.0);

        assert_eq!(flipped.min_x(), -1.0);
        assert_eq!(flipped.max_x(), 1.0);
    }

    #[test]
    fn test_inversion_flags() {
        let bounds = Bounds::new(0.0, 256.0, 256.0, 0.0);
        assert!(!bounds.x_inverted());
        assert!(bounds.y_inverted());
    }

    #[test]
    fn test_to_rect_normalizes() {
        let bounds = Bounds::new(1.0, -1.0, 1.0, -1.0);
        let rect = bounds.to_rect();
        assert_eq!(rect.min().x, -1.0);
        assert_eq!(rect.max().y, 1.0);
    }
}
