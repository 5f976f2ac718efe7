//! The 9 positions a slice can occupy around a tile.
//!
//! A `Direction` always names where the *source* of a slice sits relative to
//! the tile receiving it: a slice labelled `Right` comes from the neighbor to
//! the right and is placed on the right edge of the receiver's canvas.
//! Columns grow to the right and rows grow downward.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    Center,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Direction {
    pub const ALL: [Self; 9] = [
        Self::Center,
        Self::Top,
        Self::Bottom,
        Self::Left,
        Self::Right,
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    /// Every direction except `Center`.
    pub const NEIGHBORS: [Self; 8] = [
        Self::Top,
        Self::Bottom,
        Self::Left,
        Self::Right,
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    /// Grid offset (dcol, drow) of the source from the receiving tile.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Center => (0, 0),
            Self::Top => (0, -1),
            Self::Bottom => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::TopLeft => (-1, -1),
            Self::TopRight => (1, -1),
            Self::BottomLeft => (-1, 1),
            Self::BottomRight => (1, 1),
        }
    }

    /// Inverse of [`Direction::offset`].
    pub const fn from_offset(dcol: i32, drow: i32) -> Option<Self> {
        match (dcol, drow) {
            (0, 0) => Some(Self::Center),
            (0, -1) => Some(Self::Top),
            (0, 1) => Some(Self::Bottom),
            (-1, 0) => Some(Self::Left),
            (1, 0) => Some(Self::Right),
            (-1, -1) => Some(Self::TopLeft),
            (1, -1) => Some(Self::TopRight),
            (-1, 1) => Some(Self::BottomLeft),
            (1, 1) => Some(Self::BottomRight),
            _ => None,
        }
    }

    /// The mirrored direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Center => Self::Center,
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::TopLeft => Self::BottomRight,
            Self::TopRight => Self::BottomLeft,
            Self::BottomLeft => Self::TopRight,
            Self::BottomRight => Self::TopLeft,
        }
    }

    pub const fn is_corner(self) -> bool {
        matches!(
            self,
            Self::TopLeft | Self::TopRight | Self::BottomLeft | Self::BottomRight
        )
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_roundtrip() {
        for dir in Direction::ALL {
            let (dc, dr) = dir.offset();
            assert_eq!(Direction::from_offset(dc, dr), Some(dir));
        }
        assert_eq!(Direction::from_offset(2, 0), None);
    }

    #[test]
    fn test_opposite_negates_offset() {
        for dir in Direction::ALL {
            let (dc, dr) = dir.offset();
            assert_eq!(dir.opposite().offset(), (-dc, -dr));
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }

    #[test]
    fn test_rows_grow_downward() {
        assert_eq!(Direction::Bottom.offset(), (0, 1));
        assert_eq!(Direction::TopRight.offset(), (1, -1));
    }

    #[test]
    fn test_neighbors_excludes_center() {
        assert!(!Direction::NEIGHBORS.contains(&Direction::Center));
        assert_eq!(Direction::NEIGHBORS.iter().filter(|d| d.is_corner()).count(), 4);
    }

    #[test]
    fn test_index_is_dense() {
        let mut seen = [false; 9];
        for dir in Direction::ALL {
            seen[dir.index()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
