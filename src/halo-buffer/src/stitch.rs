//! Compositing a key's slices into its buffered tile.

use common_error::{HaloError, HaloResult};
use halo_core::{BorderSizes, BufferedTile, Direction, GridBounds, Stitch, Tile};

use crate::exchange::NeighborSlices;

/// Canvas offset (col, row) of the top-left cell of the slice in `direction`.
///
/// `center_cols` and `center_rows` are the receiving tile's dimensions and
/// `border` its own requested thickness.
pub const fn placement_offset(
    direction: Direction,
    center_cols: usize,
    center_rows: usize,
    border: &BorderSizes,
) -> (usize, usize) {
    let left = border.left;
    let top = border.top;
    let right_col = left + center_cols;
    let bottom_row = top + center_rows;

    match direction {
        Direction::Center => (left, top),
        Direction::Left => (0, top),
        Direction::Right => (right_col, top),
        Direction::Top => (left, 0),
        Direction::Bottom => (left, bottom_row),
        Direction::TopLeft => (0, 0),
        Direction::TopRight => (right_col, 0),
        Direction::BottomLeft => (0, bottom_row),
        Direction::BottomRight => (right_col, bottom_row),
    }
}

/// Stitch `slices` around their center tile.
///
/// Returns `Ok(None)` when no center arrived: such a key is either outside
/// the layer or has no tile of its own, and yields no output. Missing
/// neighbors leave NODATA in their part of the border.
pub fn stitch_slices<T>(
    slices: &NeighborSlices<T>,
    border: &BorderSizes,
) -> HaloResult<Option<BufferedTile<T>>>
where
    T: Tile + Stitch,
{
    let Some(center) = slices.center() else {
        return Ok(None);
    };
    let cols = center.cols();
    let rows = center.rows();
    // Interior bounds are i32, so the canvas must be addressable as one.
    let fits = |n: &usize| i32::try_from(*n).is_ok();
    let (Some(canvas_cols), Some(canvas_rows)) = (
        border.total_cols(cols).filter(fits),
        border.total_rows(rows).filter(fits),
    ) else {
        return Err(HaloError::bounds(format!(
            "border {border} around a {cols}x{rows} tile exceeds the largest canvas"
        )));
    };

    let pieces: Vec<(&T, (usize, usize))> = slices
        .iter()
        .map(|(direction, slice)| (slice, placement_offset(direction, cols, rows, border)))
        .collect();
    let tile = T::stitch(canvas_cols, canvas_rows, &pieces)?;

    let interior = GridBounds::new(
        border.left as i32,
        border.top as i32,
        (canvas_cols - border.right) as i32 - 1,
        (canvas_rows - border.bottom) as i32 - 1,
    );
    Ok(Some(BufferedTile::new(tile, interior)))
}
