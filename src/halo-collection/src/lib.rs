//! Partitioned keyed collections for Halo.
//!
//! This crate is the in-process stand-in for a distributed key-value
//! collection. It provides exactly the primitives the halo exchange is built
//! on, each optionally partition-aware:
//!
//! ```text
//!  Stage 0 (per partition)      Exchange          Stage 1 (per partition)
//!  ┌────────────────────┐    ┌────────────┐     ┌──────────────────────┐
//!  │ flat_map_to_keyed  │───▶│  Shuffle   │────▶│ group_by_key / join  │
//!  │ (scatter)          │    │ (by spec)  │     │ (gather)             │
//!  └────────────────────┘    └────────────┘     └──────────────────────┘
//! ```
//!
//! # Key Components
//!
//! - [`PartitioningSpec`]: how keys map to partitions (`Single`, `Hash`, or `Unknown`)
//! - [`PartitionedCollection`]: records split into partitions, processed with rayon
//! - [`ExchangeStats`]: records moved by a shuffle
//!
//! A shuffle is skipped whenever the input is already partitioned by the
//! requested spec.

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::return_self_not_must_use)]

pub mod collection;
pub mod exchange;
pub mod partitioning;

pub use collection::PartitionedCollection;
pub use exchange::ExchangeStats;
pub use partitioning::{choose_partitioning, PartitioningSpec};
