//! Formatting helpers for buffered tiles.

use std::fmt::Write;

use halo_core::{ArrayTile, BufferedTile, CellType, GridBounds, Tile};

/// Render a tile as a text grid.
///
/// NODATA cells print as `.`; cells inside `interior`, when given, are
/// bracketed so the original tile stands out from its halo.
pub fn format_tile(tile: &ArrayTile<i32>, interior: Option<&GridBounds>) -> String {
    let width = tile
        .cells()
        .iter()
        .filter(|v| !v.is_nodata())
        .map(|v| v.to_string().len())
        .max()
        .unwrap_or(1);

    let mut output = String::new();
    for row in 0..tile.rows() {
        for col in 0..tile.cols() {
            let value = tile.get(col, row).unwrap_or(i32::NODATA);
            let text = if value.is_nodata() {
                ".".to_string()
            } else {
                value.to_string()
            };
            let inside = interior.is_some_and(|b| b.contains(col as i32, row as i32));
            if inside {
                let _ = write!(output, "[{text:>width$}]");
            } else {
                let _ = write!(output, " {text:>width$} ");
            }
        }
        output.push('\n');
    }
    output
}

/// One-line description of a buffered tile.
pub fn summarize(buffered: &BufferedTile<ArrayTile<i32>>) -> String {
    format!(
        "{}x{} canvas, interior {}, border {}, {} NODATA cells",
        buffered.tile.cols(),
        buffered.tile.rows(),
        buffered.interior,
        buffered.border_sizes(),
        buffered.tile.nodata_count()
    )
}

/// Print a divider line.
pub fn print_divider() {
    println!("{}", "-".repeat(60));
}

/// Print a section header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", "=".repeat(60));
    println!("  {title}");
    println!("{}", "=".repeat(60));
}
