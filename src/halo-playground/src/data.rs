//! Sample layers for playground runs.

use halo_core::{ArrayTile, BorderSizes, SpatialKey};

/// A `layout_cols` x `layout_rows` layer of `tile_cols` x `tile_rows` tiles.
///
/// Each cell holds its layer-wide pixel index (`y * width + x`), so a value
/// seen in a halo tells where in the layer it came from.
pub fn synthetic_layer(
    layout_cols: i32,
    layout_rows: i32,
    tile_cols: usize,
    tile_rows: usize,
) -> Vec<(SpatialKey, ArrayTile<i32>)> {
    let width = layout_cols.max(0) as usize * tile_cols;
    let mut records = Vec::with_capacity((layout_cols.max(0) * layout_rows.max(0)) as usize);
    for row in 0..layout_rows {
        for col in 0..layout_cols {
            let x0 = col as usize * tile_cols;
            let y0 = row as usize * tile_rows;
            let tile = ArrayTile::from_fn(tile_cols, tile_rows, |c, r| {
                ((y0 + r) * width + x0 + c) as i32
            });
            records.push((SpatialKey::new(col, row), tile));
        }
    }
    records
}

/// Border sizes growing with the key: `base + (col + row) % 2` on every side,
/// capped at `max`.
pub fn stepped_borders(
    keys: impl IntoIterator<Item = SpatialKey>,
    base: usize,
    max: usize,
) -> Vec<(SpatialKey, BorderSizes)> {
    keys.into_iter()
        .map(|key| {
            let step = (key.col + key.row).rem_euclid(2) as usize;
            (key, BorderSizes::uniform((base + step).min(max)))
        })
        .collect()
}
