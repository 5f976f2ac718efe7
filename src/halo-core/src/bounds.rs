//! Inclusive integer rectangles.

use serde::{Deserialize, Serialize};

use crate::key::SpatialKey;

/// An inclusive rectangle `[col_min, col_max] x [row_min, row_max]`.
///
/// Used both for the set of spatial keys that belong to a layer and for the
/// interior of a buffered tile in that tile's own pixel frame. A rectangle with
/// `col_max == col_min - 1` (or the row equivalent) has zero extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridBounds {
    pub col_min: i32,
    pub row_min: i32,
    pub col_max: i32,
    pub row_max: i32,
}

impl GridBounds {
    pub const fn new(col_min: i32, row_min: i32, col_max: i32, row_max: i32) -> Self {
        Self {
            col_min,
            row_min,
            col_max,
            row_max,
        }
    }

    /// Bounds covering the whole representable key range.
    pub const fn unbounded() -> Self {
        Self::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX)
    }

    /// Number of columns covered; zero for inverted bounds.
    pub fn width(&self) -> usize {
        (i64::from(self.col_max) - i64::from(self.col_min) + 1).max(0) as usize
    }

    /// Number of rows covered; zero for inverted bounds.
    pub fn height(&self) -> usize {
        (i64::from(self.row_max) - i64::from(self.row_min) + 1).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub const fn contains(&self, col: i32, row: i32) -> bool {
        col >= self.col_min && col <= self.col_max && row >= self.row_min && row <= self.row_max
    }

    pub const fn contains_key(&self, key: SpatialKey) -> bool {
        self.contains(key.col, key.row)
    }

    /// Overlap of two rectangles, if any.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let bounds = Self::new(
            self.col_min.max(other.col_min),
            self.row_min.max(other.row_min),
            self.col_max.min(other.col_max),
            self.row_max.min(other.row_max),
        );
        (!bounds.is_empty()).then_some(bounds)
    }
}

impl Default for GridBounds {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl std::fmt::Display for GridBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GridBounds({}, {}, {}, {})",
            self.col_min, self.row_min, self.col_max, self.row_max
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        let bounds = GridBounds::new(1, 1, 4, 4);
        assert_eq!(bounds.width(), 4);
        assert_eq!(bounds.height(), 4);
        assert!(!bounds.is_empty());
    }

    #[test]
    fn test_zero_extent() {
        let bounds = GridBounds::new(0, 0, -1, 3);
        assert_eq!(bounds.width(), 0);
        assert_eq!(bounds.height(), 4);
        assert!(bounds.is_empty());
    }

    #[test]
    fn test_unbounded_contains_extremes() {
        let bounds = GridBounds::unbounded();
        assert!(bounds.contains(i32::MIN, i32::MAX));
        assert!(bounds.contains(0, 0));
        assert_eq!(bounds.width(), 1usize << 32);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let bounds = GridBounds::new(0, 0, 1, 1);
        assert!(bounds.contains_key(SpatialKey::new(1, 1)));
        assert!(!bounds.contains_key(SpatialKey::new(2, 1)));
        assert!(!bounds.contains_key(SpatialKey::new(0, -1)));
    }

    #[test]
    fn test_intersection() {
        let a = GridBounds::new(0, 0, 5, 5);
        let b = GridBounds::new(3, 4, 9, 9);
        assert_eq!(a.intersection(&b), Some(GridBounds::new(3, 4, 5, 5)));
        assert_eq!(a.intersection(&GridBounds::new(6, 6, 7, 7)), None);
    }
}
