//! Partitioning specifications for keyed collections.
//!
//! A spec is either a known function from key to partition (`Single`, `Hash`)
//! or `Unknown`, meaning records were placed without a reproducible rule.
//! Only known specs can be reused to avoid a shuffle.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use common_error::{HaloError, HaloResult};
use serde::{Deserialize, Serialize};

/// Detailed specification for how records are partitioned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartitioningSpec {
    /// Single partition (all records together).
    #[default]
    Single,

    /// Hash partitioning by key.
    Hash {
        /// Number of partitions.
        num_partitions: usize,
    },

    /// Records are spread over partitions by no known rule.
    Unknown {
        /// Number of partitions.
        num_partitions: usize,
    },
}

impl PartitioningSpec {
    /// Create a single-partition spec.
    pub const fn single() -> Self {
        Self::Single
    }

    /// Create a hash partitioning spec.
    pub fn hash(num_partitions: usize) -> HaloResult<Self> {
        if num_partitions == 0 {
            return Err(HaloError::invalid_argument(
                "hash partitioning needs at least one partition",
            ));
        }
        Ok(Self::Hash { num_partitions })
    }

    /// Create an unknown partitioning over `num_partitions` partitions.
    pub fn unknown(num_partitions: usize) -> Self {
        Self::Unknown {
            num_partitions: num_partitions.max(1),
        }
    }

    /// Get the number of partitions.
    pub fn num_partitions(&self) -> usize {
        match self {
            Self::Single => 1,
            Self::Hash { num_partitions } | Self::Unknown { num_partitions } => *num_partitions,
        }
    }

    /// Whether records can be routed by this spec.
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown { .. })
    }

    /// Check if data partitioned by `self` can be used directly for an
    /// operation that requires `required`, without a shuffle.
    pub fn satisfies(&self, required: &Self) -> bool {
        match (self, required) {
            (Self::Single, Self::Single) => true,
            (Self::Hash { num_partitions: n1 }, Self::Hash { num_partitions: n2 }) => n1 == n2,
            // Unknown placement never matches anything, not even itself
            _ => false,
        }
    }

    /// Calculate which partition a key belongs to; `None` for unknown specs.
    pub fn partition_for_key<K: Hash>(&self, key: &K) -> Option<usize> {
        match self {
            Self::Single => Some(0),
            Self::Hash { num_partitions } => {
                let mut hasher = DefaultHasher::new();
                key.hash(&mut hasher);
                Some((hasher.finish() % *num_partitions as u64) as usize)
            }
            Self::Unknown { .. } => None,
        }
    }
}

impl std::fmt::Display for PartitioningSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single => write!(f, "Single"),
            Self::Hash { num_partitions } => write!(f, "Hash({num_partitions})"),
            Self::Unknown { num_partitions } => write!(f, "Unknown({num_partitions})"),
        }
    }
}

/// Reuse `existing` when it is a known partitioning, otherwise hash into
/// `default_partitions`.
pub fn choose_partitioning(
    existing: &PartitioningSpec,
    default_partitions: usize,
) -> HaloResult<PartitioningSpec> {
    if existing.is_known() {
        Ok(existing.clone())
    } else {
        PartitioningSpec::hash(default_partitions)
    }
}
