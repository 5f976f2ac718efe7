//! Halo exchange over key-partitioned tile layers.
//!
//! For every tile in a layer this crate produces a [`BufferedTile`]: the
//! original tile surrounded by a border copied from its up to 8 grid
//! neighbors, plus the interior bounds locating the original inside it.
//!
//! # Pipeline
//!
//! ```text
//!  tiles ──▶ extract (scatter) ──▶ gather (group by key) ──▶ stitch ──▶ buffered tiles
//!              ▲                                              ▲
//!              └──── neighbor border sizes (per-key modes) ───┘
//! ```
//!
//! - [`extract`]: each tile emits itself as `Center` plus one edge or corner
//!   slice per admitted neighbor, sized by the *receiving* neighbor's border.
//! - [`exchange`]: slices are grouped by target key into [`NeighborSlices`],
//!   reusing the input's partitioning when it has one.
//! - [`stitch`]: each key's slices are composited onto one canvas.
//! - [`propagate`]: when border sizes vary per key, every key first learns
//!   what its neighbors require of it.
//! - [`buffer`]: the [`BufferTiles`] entry points tying it together.
//!
//! [`BufferedTile`]: halo_core::BufferedTile

#![allow(clippy::cast_possible_truncation)] // Tile dimensions fit in i32 by construction
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::return_self_not_must_use)]

pub mod borders;
pub mod buffer;
pub mod exchange;
pub mod extract;
pub mod propagate;
pub mod stitch;

pub use borders::BorderSource;
pub use buffer::{buffer_tiles_local, BufferTiles};
pub use exchange::{gather_slices, NeighborSlices};
pub use extract::{collect_with_neighbors, crop_bounds};
pub use propagate::{propagate_border_sizes, NeighborBorders};
pub use stitch::{placement_offset, stitch_slices};
