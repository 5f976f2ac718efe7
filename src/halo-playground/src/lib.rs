//! Halo Playground - Experiments and Examples
//!
//! This crate provides executable apps for experimenting with halo
//! exchange over synthetic tile layers.
//!
//! # Available Binaries
//!
//! - **`buffer-demo`**: Buffer a synthetic layer and print the stitched tiles
//!
//! # Usage
//!
//! ```bash
//! cargo run --package halo-playground --bin buffer-demo -- --help
//! ```

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod data;
pub mod utils;

pub use data::{stepped_borders, synthetic_layer};
pub use utils::{format_tile, print_divider, print_header, summarize};
