//! Testing utilities for layers of tiles.
//!
//! [`LayerFixture`] builds grids of `ArrayTile<i32>` whose cell values encode
//! the owning key and the cell position, so a test can tell exactly which
//! neighbor (and which cell of it) ended up in a halo.

use std::collections::BTreeMap;

use crate::key::SpatialKey;
use crate::tile::{ArrayTile, CellType};

/// Largest key index and tile dimension the value encoding supports.
pub const FIXTURE_LIMIT: i32 = 32;

/// Test fixture builder for tile layers with uniformly sized tiles.
#[derive(Debug, Clone)]
pub struct LayerFixture {
    tile_cols: usize,
    tile_rows: usize,
    tiles: BTreeMap<SpatialKey, ArrayTile<i32>>,
}

impl LayerFixture {
    /// Create an empty layer of `tile_cols` x `tile_rows` tiles.
    pub fn new(tile_cols: usize, tile_rows: usize) -> Self {
        assert!(
            tile_cols as i32 <= FIXTURE_LIMIT && tile_rows as i32 <= FIXTURE_LIMIT,
            "fixture tiles are limited to {FIXTURE_LIMIT}x{FIXTURE_LIMIT}"
        );
        Self {
            tile_cols,
            tile_rows,
            tiles: BTreeMap::new(),
        }
    }

    /// A full `layout_cols` x `layout_rows` grid with keys starting at (0, 0).
    pub fn grid(layout_cols: i32, layout_rows: i32, tile_cols: usize, tile_rows: usize) -> Self {
        let mut fixture = Self::new(tile_cols, tile_rows);
        for row in 0..layout_rows {
            for col in 0..layout_cols {
                fixture = fixture.with_tile(SpatialKey::new(col, row));
            }
        }
        fixture
    }

    /// Add the tile for `key`.
    pub fn with_tile(mut self, key: SpatialKey) -> Self {
        assert!(
            (0..FIXTURE_LIMIT).contains(&key.col) && (0..FIXTURE_LIMIT).contains(&key.row),
            "fixture keys must lie in 0..{FIXTURE_LIMIT}"
        );
        let tile = ArrayTile::from_fn(self.tile_cols, self.tile_rows, |c, r| {
            Self::cell_value(key, c, r)
        });
        self.tiles.insert(key, tile);
        self
    }

    /// Drop the tile for `key`.
    pub fn without_tile(mut self, key: SpatialKey) -> Self {
        self.tiles.remove(&key);
        self
    }

    /// The value stored at (`col`, `row`) of the tile for `key`.
    pub fn cell_value(key: SpatialKey, col: usize, row: usize) -> i32 {
        ((key.row * FIXTURE_LIMIT + key.col) * FIXTURE_LIMIT + row as i32) * FIXTURE_LIMIT
            + col as i32
    }

    /// The value at a layer-wide pixel position, if a tile covers it.
    pub fn value_at(&self, x: i64, y: i64) -> Option<i32> {
        let (tc, tr) = (self.tile_cols as i64, self.tile_rows as i64);
        let key = SpatialKey::new(
            i32::try_from(x.div_euclid(tc)).ok()?,
            i32::try_from(y.div_euclid(tr)).ok()?,
        );
        self.tiles.contains_key(&key).then(|| {
            Self::cell_value(key, x.rem_euclid(tc) as usize, y.rem_euclid(tr) as usize)
        })
    }

    /// Like [`LayerFixture::value_at`], but NODATA where no tile exists.
    pub fn value_or_nodata(&self, x: i64, y: i64) -> i32 {
        self.value_at(x, y).unwrap_or(i32::NODATA)
    }

    pub fn tile(&self, key: SpatialKey) -> Option<&ArrayTile<i32>> {
        self.tiles.get(&key)
    }

    pub fn keys(&self) -> impl Iterator<Item = SpatialKey> + '_ {
        self.tiles.keys().copied()
    }

    /// All (key, tile) pairs in key order.
    pub fn records(&self) -> Vec<(SpatialKey, ArrayTile<i32>)> {
        self.tiles
            .iter()
            .map(|(key, tile)| (*key, tile.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tile_cols(&self) -> usize {
        self.tile_cols
    }

    pub fn tile_rows(&self) -> usize {
        self.tile_rows
    }
}
