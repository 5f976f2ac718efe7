//! Slice extraction: the scatter side of the halo exchange.
//!
//! A tile contributes to each admitted neighbor the strip of itself adjacent
//! to their shared edge or corner. The strip's thickness is what the
//! *receiver* asks for, never what the source itself uses.

use common_error::{HaloError, HaloResult};
use halo_core::{BorderSizes, Direction, GridBounds, SpatialComponent, SpatialKey, Tile};

/// Source-local crop rectangle for the slice a tile sends a neighbor.
///
/// `direction` is where the source sits relative to the receiver, and
/// `border` is the receiver's requested thickness. A thickness of zero gives
/// a zero-extent rectangle; a thickness above the tile's extent gives a
/// rectangle the crop will reject.
pub fn crop_bounds(
    direction: Direction,
    cols: usize,
    rows: usize,
    border: &BorderSizes,
) -> GridBounds {
    let c = saturating_i32(cols);
    let r = saturating_i32(rows);
    let left = saturating_i32(border.left);
    let right = saturating_i32(border.right);
    let top = saturating_i32(border.top);
    let bottom = saturating_i32(border.bottom);

    match direction {
        Direction::Center => GridBounds::new(0, 0, c - 1, r - 1),
        // Source is to the right: its leftmost columns.
        Direction::Right => GridBounds::new(0, 0, right - 1, r - 1),
        Direction::Left => GridBounds::new(c - left, 0, c - 1, r - 1),
        // Source is below: its topmost rows.
        Direction::Bottom => GridBounds::new(0, 0, c - 1, bottom - 1),
        Direction::Top => GridBounds::new(0, r - top, c - 1, r - 1),
        Direction::BottomRight => GridBounds::new(0, 0, right - 1, bottom - 1),
        Direction::BottomLeft => GridBounds::new(c - left, 0, c - 1, bottom - 1),
        Direction::TopRight => GridBounds::new(0, r - top, right - 1, r - 1),
        Direction::TopLeft => GridBounds::new(c - left, r - top, c - 1, r - 1),
    }
}

fn saturating_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// Emit `tile` as its own `Center` plus one slice per admitted neighbor.
///
/// `included` decides which spatial keys belong to the layer; it is applied
/// to the tile's own key too, so an excluded tile contributes nothing.
/// `required_border` returns the border sizes a neighbor requests. Empty
/// slices are not emitted. Returns at most 9 `(target key, (direction, slice))`
/// records.
pub fn collect_with_neighbors<K, T, I, B>(
    key: &K,
    tile: T,
    included: I,
    required_border: B,
) -> HaloResult<Vec<(K, (Direction, T))>>
where
    K: SpatialComponent,
    T: Tile,
    I: Fn(SpatialKey) -> bool,
    B: Fn(SpatialKey) -> BorderSizes,
{
    let origin = key.spatial_key();
    if !included(origin) {
        return Ok(Vec::new());
    }
    let mut out = Vec::with_capacity(Direction::ALL.len());

    for direction in Direction::NEIGHBORS {
        // The receiver lies opposite to where this tile sits relative to it.
        let (dc, dr) = direction.opposite().offset();
        let Some(target) = origin.neighbor(dc, dr) else {
            continue;
        };
        if !included(target) {
            continue;
        }
        let border = required_border(target);
        let bounds = crop_bounds(direction, tile.cols(), tile.rows(), &border);
        let slice = tile.crop(&bounds).map_err(|e| match e {
            HaloError::BoundsError(msg) => HaloError::bounds(format!(
                "{direction} slice of {key:?} for {target} with {border}: {msg}"
            )),
            other => other,
        })?;
        if slice.is_empty() {
            continue;
        }
        out.push((key.with_spatial_key(target), (direction, slice)));
    }

    out.push((key.clone(), (Direction::Center, tile)));
    Ok(out)
}
