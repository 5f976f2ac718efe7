//! Tiles carrying a halo of neighbor cells.

use common_error::HaloResult;

use crate::border::BorderSizes;
use crate::bounds::GridBounds;
use crate::tile::Tile;

/// A stitched tile plus the rectangle, in its own frame, holding the original tile.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferedTile<T> {
    pub tile: T,
    pub interior: GridBounds,
}

impl<T: Tile> BufferedTile<T> {
    pub const fn new(tile: T, interior: GridBounds) -> Self {
        Self { tile, interior }
    }

    /// Crop back to the unbuffered tile.
    pub fn interior_tile(&self) -> HaloResult<T> {
        self.tile.crop(&self.interior)
    }

    /// Thickness of the halo on each side.
    pub fn border_sizes(&self) -> BorderSizes {
        let right = self.tile.cols() as i64 - 1 - i64::from(self.interior.col_max);
        let bottom = self.tile.rows() as i64 - 1 - i64::from(self.interior.row_max);
        BorderSizes::new(
            self.interior.col_min.max(0) as usize,
            right.max(0) as usize,
            self.interior.row_min.max(0) as usize,
            bottom.max(0) as usize,
        )
    }
}
