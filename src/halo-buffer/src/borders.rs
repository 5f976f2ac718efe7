//! Where border sizes come from.

use std::fmt;
use std::sync::Arc;

use halo_collection::PartitionedCollection;
use halo_core::BorderSizes;

/// Per-key border size function.
pub type BorderFn<K> = Arc<dyn Fn(&K) -> BorderSizes + Send + Sync>;

/// The three ways a caller can say how much halo each tile needs.
pub enum BorderSource<K> {
    /// The same thickness on every side of every tile.
    Uniform(BorderSizes),
    /// Computed from each tile's key.
    ByKey(BorderFn<K>),
    /// An explicit size for each key, as its own keyed collection.
    PerKey(PartitionedCollection<K, BorderSizes>),
}

impl<K> BorderSource<K> {
    pub fn by_key<F>(f: F) -> Self
    where
        F: Fn(&K) -> BorderSizes + Send + Sync + 'static,
    {
        Self::ByKey(Arc::new(f))
    }

    pub const fn mode(&self) -> &'static str {
        match self {
            Self::Uniform(_) => "uniform",
            Self::ByKey(_) => "by-key",
            Self::PerKey(_) => "per-key",
        }
    }
}

impl<K> From<BorderSizes> for BorderSource<K> {
    fn from(sizes: BorderSizes) -> Self {
        Self::Uniform(sizes)
    }
}

impl<K> From<PartitionedCollection<K, BorderSizes>> for BorderSource<K> {
    fn from(borders: PartitionedCollection<K, BorderSizes>) -> Self {
        Self::PerKey(borders)
    }
}

impl<K> fmt::Debug for BorderSource<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform(sizes) => f.debug_tuple("Uniform").field(sizes).finish(),
            Self::ByKey(_) => f.write_str("ByKey(..)"),
            Self::PerKey(borders) => f
                .debug_struct("PerKey")
                .field("partitioning", borders.partitioning())
                .field("len", &borders.len())
                .finish(),
        }
    }
}
