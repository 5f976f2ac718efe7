//! Core data model for Halo.
//!
//! This crate provides the types the halo exchange is built on:
//! - `SpatialKey` / `SpaceTimeKey` and the `SpatialComponent` trait for keys
//! - `GridBounds` for layer extents and buffered-tile interiors
//! - `BorderSizes` for per-side neighbor context
//! - `Direction` for the 9 slice positions around a tile
//! - `Tile` / `Stitch` and the dense `ArrayTile` implementation
//! - `BufferedTile`, the output of a halo exchange

#![allow(clippy::cast_possible_truncation)] // Tile dimensions fit in i32 by construction
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod border;
pub mod bounds;
pub mod buffered;
pub mod direction;
pub mod key;
pub mod testing;
pub mod tile;

// Re-export commonly used types
pub use border::BorderSizes;
pub use bounds::GridBounds;
pub use buffered::BufferedTile;
pub use direction::Direction;
pub use key::{SpaceTimeKey, SpatialComponent, SpatialKey};
pub use tile::{ArrayTile, CellType, Stitch, Tile};
