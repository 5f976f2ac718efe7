//! Tile keys and their spatial component.

use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// A key with an extractable, replaceable (col, row) component.
///
/// Any other dimensions a key carries (time, band, ...) take part in equality
/// and hashing but are preserved unchanged by `with_spatial_key`.
pub trait SpatialComponent: Clone + Eq + Hash + Debug + Send + Sync + 'static {
    /// The (col, row) part of this key.
    fn spatial_key(&self) -> SpatialKey;

    /// A copy of this key with its (col, row) part replaced.
    #[must_use]
    fn with_spatial_key(&self, spatial: SpatialKey) -> Self;
}

/// Grid position of a tile. Rows grow downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpatialKey {
    pub col: i32,
    pub row: i32,
}

impl SpatialKey {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// The key offset by (`dc`, `dr`), or `None` past the edge of the integer range.
    pub fn neighbor(self, dc: i32, dr: i32) -> Option<Self> {
        Some(Self {
            col: self.col.checked_add(dc)?,
            row: self.row.checked_add(dr)?,
        })
    }
}

impl SpatialComponent for SpatialKey {
    fn spatial_key(&self) -> SpatialKey {
        *self
    }

    fn with_spatial_key(&self, spatial: SpatialKey) -> Self {
        spatial
    }
}

impl From<(i32, i32)> for SpatialKey {
    fn from((col, row): (i32, i32)) -> Self {
        Self::new(col, row)
    }
}

impl std::fmt::Display for SpatialKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Grid position plus a time instant (epoch milliseconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpaceTimeKey {
    pub col: i32,
    pub row: i32,
    pub instant: i64,
}

impl SpaceTimeKey {
    pub const fn new(col: i32, row: i32, instant: i64) -> Self {
        Self { col, row, instant }
    }
}

impl SpatialComponent for SpaceTimeKey {
    fn spatial_key(&self) -> SpatialKey {
        SpatialKey::new(self.col, self.row)
    }

    fn with_spatial_key(&self, spatial: SpatialKey) -> Self {
        Self {
            col: spatial.col,
            row: spatial.row,
            instant: self.instant,
        }
    }
}

impl std::fmt::Display for SpaceTimeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {} @ {})", self.col, self.row, self.instant)
    }
}
