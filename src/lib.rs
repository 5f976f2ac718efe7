//! Halo - neighbor exchange for key-partitioned raster tile layers
//!
//! Halo buffers every tile of a partitioned layer with edge and corner
//! slices from its up to 8 grid neighbors, so each tile can run focal
//! operations without reaching across partitions.

#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

// Re-export core crates
pub use common_config as config;
pub use common_error as error;
pub use halo_buffer as buffer;
pub use halo_collection as collection;
pub use halo_core as core;

/// Halo version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
