//! Per-side border thicknesses.

use common_error::{HaloError, HaloResult};
use serde::{Deserialize, Serialize};

/// How many columns/rows of neighbor context a tile requires on each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BorderSizes {
    pub left: usize,
    pub right: usize,
    pub top: usize,
    pub bottom: usize,
}

impl BorderSizes {
    pub const fn new(left: usize, right: usize, top: usize, bottom: usize) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// The same thickness on all four sides.
    pub const fn uniform(size: usize) -> Self {
        Self::new(size, size, size, size)
    }

    /// Validate signed caller input. Negative values are rejected.
    pub fn try_new(left: i64, right: i64, top: i64, bottom: i64) -> HaloResult<Self> {
        Ok(Self::new(
            side("left", left)?,
            side("right", right)?,
            side("top", top)?,
            side("bottom", bottom)?,
        ))
    }

    /// Validate a signed uniform border size.
    pub fn try_uniform(size: i64) -> HaloResult<Self> {
        Self::try_new(size, size, size, size)
    }

    /// Width of a canvas holding a tile of `cols` columns plus these borders;
    /// `None` on overflow.
    pub const fn total_cols(&self, cols: usize) -> Option<usize> {
        match self.left.checked_add(cols) {
            Some(n) => n.checked_add(self.right),
            None => None,
        }
    }

    /// Height of a canvas holding a tile of `rows` rows plus these borders;
    /// `None` on overflow.
    pub const fn total_rows(&self, rows: usize) -> Option<usize> {
        match self.top.checked_add(rows) {
            Some(n) => n.checked_add(self.bottom),
            None => None,
        }
    }

    pub const fn is_zero(&self) -> bool {
        self.left == 0 && self.right == 0 && self.top == 0 && self.bottom == 0
    }

    /// Side-wise maximum.
    #[must_use]
    pub fn max(&self, other: &Self) -> Self {
        Self::new(
            self.left.max(other.left),
            self.right.max(other.right),
            self.top.max(other.top),
            self.bottom.max(other.bottom),
        )
    }
}

fn side(name: &str, value: i64) -> HaloResult<usize> {
    usize::try_from(value).map_err(|_| {
        HaloError::invalid_argument(format!(
            "border size {name} must be non-negative, got {value}"
        ))
    })
}

impl std::fmt::Display for BorderSizes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BorderSizes(left={}, right={}, top={}, bottom={})",
            self.left, self.right, self.top, self.bottom
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform() {
        let sizes = BorderSizes::uniform(2);
        assert_eq!(sizes, BorderSizes::new(2, 2, 2, 2));
        assert_eq!(sizes.total_cols(4), Some(8));
        assert_eq!(sizes.total_rows(3), Some(7));
    }

    #[test]
    fn test_asymmetric_totals() {
        let sizes = BorderSizes::new(1, 3, 0, 2);
        assert_eq!(sizes.total_cols(10), Some(14));
        assert_eq!(sizes.total_rows(10), Some(12));
    }

    #[test]
    fn test_totals_overflow() {
        let sizes = BorderSizes::new(usize::MAX, 0, 0, usize::MAX);
        assert_eq!(sizes.total_cols(1), None);
        assert_eq!(sizes.total_rows(0), Some(usize::MAX));
        assert_eq!(sizes.total_rows(1), None);
        assert_eq!(BorderSizes::new(0, usize::MAX, 0, 0).total_cols(0), Some(usize::MAX));
    }

    #[test]
    fn test_try_new_rejects_negative() {
        let err = BorderSizes::try_new(1, -1, 0, 0).unwrap_err();
        assert!(matches!(err, HaloError::InvalidArgument(_)));
        assert!(err.to_string().contains("right"));

        assert!(BorderSizes::try_uniform(-3).is_err());
        assert_eq!(BorderSizes::try_uniform(0).unwrap(), BorderSizes::default());
    }

    #[test]
    fn test_max_and_zero() {
        let a = BorderSizes::new(1, 0, 4, 0);
        let b = BorderSizes::new(0, 2, 1, 0);
        assert_eq!(a.max(&b), BorderSizes::new(1, 2, 4, 0));
        assert!(BorderSizes::default().is_zero());
        assert!(!a.is_zero());
    }
}
