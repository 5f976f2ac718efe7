//! Tiles: dense 2D cell grids with crop and stitch.
//!
//! The halo exchange only needs three things from a tile type: its
//! dimensions, an exact rectangular crop that yields a materialized tile, and
//! a way to composite several tiles onto a larger canvas. [`Tile`] and
//! [`Stitch`] capture those; [`ArrayTile`] is the dense row-major
//! implementation used throughout the workspace.

use std::fmt::Debug;

use common_error::{bounds_err, HaloError, HaloResult};

use crate::bounds::GridBounds;

/// A read-only 2D grid of cells.
pub trait Tile: Clone + Debug + Send + Sync + 'static {
    fn cols(&self) -> usize;

    fn rows(&self) -> usize;

    /// Copy out the inclusive, tile-local rectangle `bounds`.
    ///
    /// The result owns its cells; it never borrows from `self`. A rectangle of
    /// zero width or height yields an empty tile. Any part of `bounds` outside
    /// the tile is a `BoundsError`; nothing is clamped.
    fn crop(&self, bounds: &GridBounds) -> HaloResult<Self>;

    fn is_empty(&self) -> bool {
        self.cols() == 0 || self.rows() == 0
    }
}

/// Composite tiles onto a canvas.
pub trait Stitch: Sized {
    /// Build a `cols` x `rows` canvas with each piece copied so its top-left
    /// cell lands at the paired (col, row) offset.
    ///
    /// Cells no piece covers hold the tile type's NODATA value. Empty pieces
    /// are skipped. A piece extending past the canvas is a `BoundsError`.
    fn stitch(cols: usize, rows: usize, pieces: &[(&Self, (usize, usize))]) -> HaloResult<Self>;
}

/// Cell types with a designated NODATA value.
pub trait CellType: Copy + PartialEq + Debug + Send + Sync + 'static {
    const NODATA: Self;

    fn is_nodata(self) -> bool {
        self == Self::NODATA
    }
}

impl CellType for u8 {
    const NODATA: Self = 0;
}

impl CellType for i16 {
    const NODATA: Self = i16::MIN;
}

impl CellType for i32 {
    const NODATA: Self = i32::MIN;
}

impl CellType for i64 {
    const NODATA: Self = i64::MIN;
}

impl CellType for f32 {
    const NODATA: Self = f32::NAN;

    fn is_nodata(self) -> bool {
        self.is_nan()
    }
}

impl CellType for f64 {
    const NODATA: Self = f64::NAN;

    fn is_nodata(self) -> bool {
        self.is_nan()
    }
}

/// Dense row-major tile.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayTile<C: CellType> {
    cols: usize,
    rows: usize,
    cells: Vec<C>,
}

impl<C: CellType> ArrayTile<C> {
    /// Wrap row-major `cells`; the length must equal `cols * rows`.
    pub fn new(cols: usize, rows: usize, cells: Vec<C>) -> HaloResult<Self> {
        if cells.len() != cols * rows {
            return Err(HaloError::invalid_argument(format!(
                "{cols}x{rows} tile needs {} cells, got {}",
                cols * rows,
                cells.len()
            )));
        }
        Ok(Self { cols, rows, cells })
    }

    pub fn filled(cols: usize, rows: usize, value: C) -> Self {
        Self {
            cols,
            rows,
            cells: vec![value; cols * rows],
        }
    }

    /// A tile of NODATA cells.
    pub fn empty(cols: usize, rows: usize) -> Self {
        Self::filled(cols, rows, C::NODATA)
    }

    pub fn from_fn(cols: usize, rows: usize, mut f: impl FnMut(usize, usize) -> C) -> Self {
        let mut cells = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(f(col, row));
            }
        }
        Self { cols, rows, cells }
    }

    pub fn get(&self, col: usize, row: usize) -> Option<C> {
        (col < self.cols && row < self.rows).then(|| self.cells[row * self.cols + col])
    }

    pub fn cells(&self) -> &[C] {
        &self.cells
    }

    pub fn row(&self, row: usize) -> Option<&[C]> {
        (row < self.rows).then(|| &self.cells[row * self.cols..(row + 1) * self.cols])
    }

    pub fn nodata_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_nodata()).count()
    }
}

impl<C: CellType> Tile for ArrayTile<C> {
    fn cols(&self) -> usize {
        self.cols
    }

    fn rows(&self) -> usize {
        self.rows
    }

    fn crop(&self, bounds: &GridBounds) -> HaloResult<Self> {
        let (col_start, width) = crop_span("column", bounds.col_min, bounds.col_max, self.cols)?;
        let (row_start, height) = crop_span("row", bounds.row_min, bounds.row_max, self.rows)?;

        let mut cells = Vec::with_capacity(width * height);
        for row in row_start..row_start + height {
            let start = row * self.cols + col_start;
            cells.extend_from_slice(&self.cells[start..start + width]);
        }
        Ok(Self {
            cols: width,
            rows: height,
            cells,
        })
    }
}

/// Validate an inclusive `[min, max]` span against `len`; returns (start, extent).
fn crop_span(axis: &str, min: i32, max: i32, len: usize) -> HaloResult<(usize, usize)> {
    let (min, max) = (i64::from(min), i64::from(max));
    let len_i = len as i64;
    if min < 0 || max >= len_i || max < min - 1 {
        bounds_err!("{axis} range [{min}, {max}] outside tile of {len} {axis}s");
    }
    Ok((min as usize, (max - min + 1) as usize))
}

impl<C: CellType> Stitch for ArrayTile<C> {
    fn stitch(cols: usize, rows: usize, pieces: &[(&Self, (usize, usize))]) -> HaloResult<Self> {
        let mut canvas = Self::empty(cols, rows);
        for (piece, (col, row)) in pieces {
            if piece.is_empty() {
                continue;
            }
            if col + piece.cols > cols || row + piece.rows > rows {
                bounds_err!(
                    "{}x{} piece at ({col}, {row}) overflows {cols}x{rows} canvas",
                    piece.cols,
                    piece.rows
                );
            }
            for r in 0..piece.rows {
                let dst = (row + r) * cols + col;
                let src = r * piece.cols;
                canvas.cells[dst..dst + piece.cols]
                    .copy_from_slice(&piece.cells[src..src + piece.cols]);
            }
        }
        Ok(canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn numbered(cols: usize, rows: usize) -> ArrayTile<i32> {
        ArrayTile::from_fn(cols, rows, |c, r| (r * 10 + c) as i32)
    }

    #[test]
    fn test_new_checks_length() {
        assert!(ArrayTile::new(2, 2, vec![1i32, 2, 3]).is_err());
        let tile = ArrayTile::new(2, 1, vec![1i32, 2]).unwrap();
        assert_eq!(tile.get(1, 0), Some(2));
        assert_eq!(tile.get(2, 0), None);
    }

    #[test]
    fn test_crop_interior() {
        let tile = numbered(4, 4);
        let cropped = tile.crop(&GridBounds::new(1, 2, 2, 3)).unwrap();
        assert_eq!(cropped.cols(), 2);
        assert_eq!(cropped.rows(), 2);
        assert_eq!(cropped.cells(), &[21, 22, 31, 32]);
    }

    #[test]
    fn test_crop_zero_extent() {
        let tile = numbered(4, 4);
        let cropped = tile.crop(&GridBounds::new(0, 0, -1, 3)).unwrap();
        assert!(cropped.is_empty());
        assert_eq!(cropped.rows(), 4);

        let cropped = tile.crop(&GridBounds::new(4, 0, 3, 3)).unwrap();
        assert_eq!(cropped.cols(), 0);
    }

    #[test]
    fn test_crop_out_of_bounds_is_error() {
        let tile = numbered(4, 4);
        for bounds in [
            GridBounds::new(-1, 0, 1, 1),
            GridBounds::new(0, 0, 4, 1),
            GridBounds::new(0, 2, 1, 0),
            GridBounds::new(0, 0, 1, 4),
        ] {
            let err = tile.crop(&bounds).unwrap_err();
            assert!(matches!(err, HaloError::BoundsError(_)), "{bounds}");
        }
    }

    #[test]
    fn test_stitch_places_pieces() {
        let a = ArrayTile::filled(2, 1, 7i32);
        let b = ArrayTile::filled(1, 2, 9i32);
        let canvas = ArrayTile::stitch(3, 3, &[(&a, (0, 0)), (&b, (2, 1))]).unwrap();

        assert_eq!(canvas.row(0).unwrap(), &[7, 7, i32::NODATA]);
        assert_eq!(canvas.row(1).unwrap(), &[i32::NODATA, i32::NODATA, 9]);
        assert_eq!(canvas.get(2, 2), Some(9));
        assert_eq!(canvas.nodata_count(), 4);
    }

    #[test]
    fn test_stitch_skips_empty_and_rejects_overflow() {
        let empty = ArrayTile::<i32>::empty(0, 3);
        let canvas = ArrayTile::stitch(2, 2, &[(&empty, (5, 5))]).unwrap();
        assert_eq!(canvas.nodata_count(), 4);

        let big = ArrayTile::filled(2, 2, 1i32);
        let err = ArrayTile::stitch(2, 2, &[(&big, (1, 0))]).unwrap_err();
        assert!(matches!(err, HaloError::BoundsError(_)));
    }

    #[test]
    fn test_float_nodata() {
        let tile = ArrayTile::<f64>::empty(2, 2);
        assert_eq!(tile.nodata_count(), 4);
        assert!(!1.5f64.is_nodata());
    }

    proptest! {
        #[test]
        fn prop_crop_then_stitch_restores(
            cols in 1usize..12,
            rows in 1usize..12,
            split_col in 0usize..12,
            split_row in 0usize..12,
        ) {
            let split_col = split_col.min(cols);
            let split_row = split_row.min(rows);
            let tile = numbered(cols, rows);
            let (c, r, sc, sr) = (cols as i32, rows as i32, split_col as i32, split_row as i32);

            let quads = [
                (GridBounds::new(0, 0, sc - 1, sr - 1), (0, 0)),
                (GridBounds::new(sc, 0, c - 1, sr - 1), (split_col, 0)),
                (GridBounds::new(0, sr, sc - 1, r - 1), (0, split_row)),
                (GridBounds::new(sc, sr, c - 1, r - 1), (split_col, split_row)),
            ];
            let pieces: Vec<_> = quads
                .iter()
                .map(|(b, at)| (tile.crop(b).unwrap(), *at))
                .collect();
            let refs: Vec<_> = pieces.iter().map(|(t, at)| (t, *at)).collect();

            let restored = ArrayTile::stitch(cols, rows, &refs).unwrap();
            prop_assert_eq!(restored, tile);
        }
    }
}
