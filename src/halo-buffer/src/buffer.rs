//! Entry points: buffer every tile of a layer with its neighbors' cells.

use common_config::{DuplicatePolicy, HaloConfig};
use common_error::{HaloError, HaloResult};
use halo_collection::{choose_partitioning, PartitionedCollection, PartitioningSpec};
use halo_core::{BorderSizes, BufferedTile, GridBounds, SpatialComponent, SpatialKey, Stitch, Tile};
use log::{debug, trace};

use crate::borders::BorderSource;
use crate::exchange::{gather_slices, NeighborSlices};
use crate::extract::collect_with_neighbors;
use crate::propagate::propagate_border_sizes;
use crate::stitch::stitch_slices;

/// Halo exchange over a key-partitioned tile collection.
///
/// ```text
/// let buffered = BufferTiles::default().uniform(tiles, 1, Some(layer_bounds))?;
/// ```
///
/// Keys outside `layer_bounds` (when given) neither send nor receive slices
/// and produce no output. Tiles are assumed to share dimensions with their
/// neighbors along each shared edge; a requested thickness larger than the
/// adjacent tile is a `BoundsError`.
#[derive(Debug, Clone, Default)]
pub struct BufferTiles {
    config: HaloConfig,
}

impl BufferTiles {
    /// Create an executor, rejecting an invalid configuration up front.
    pub fn new(config: HaloConfig) -> HaloResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &HaloConfig {
        &self.config
    }

    fn policy(&self) -> DuplicatePolicy {
        self.config.exchange.duplicate_policy
    }

    fn collect_stats(&self) -> bool {
        self.config.runtime.collect_stats
    }

    fn target_partitioning<K, V>(
        &self,
        tiles: &PartitionedCollection<K, V>,
    ) -> HaloResult<PartitioningSpec> {
        choose_partitioning(tiles.partitioning(), self.config.exchange.default_partitions)
    }

    /// Same thickness on every side of every tile.
    ///
    /// A negative `border_size` is an `InvalidArgument` raised before any
    /// slicing happens.
    pub fn uniform<K, T>(
        &self,
        tiles: PartitionedCollection<K, T>,
        border_size: i64,
        layer_bounds: Option<GridBounds>,
    ) -> HaloResult<PartitionedCollection<K, BufferedTile<T>>>
    where
        K: SpatialComponent,
        T: Tile + Stitch,
    {
        let sizes = BorderSizes::try_uniform(border_size)?;
        self.buffer(tiles, BorderSource::Uniform(sizes), layer_bounds)
    }

    /// Border sizes computed per key by `f`.
    pub fn with_border_fn<K, T, F>(
        &self,
        tiles: PartitionedCollection<K, T>,
        f: F,
        layer_bounds: Option<GridBounds>,
    ) -> HaloResult<PartitionedCollection<K, BufferedTile<T>>>
    where
        K: SpatialComponent,
        T: Tile + Stitch,
        F: Fn(&K) -> BorderSizes + Send + Sync + 'static,
    {
        self.buffer(tiles, BorderSource::by_key(f), layer_bounds)
    }

    /// Border sizes given per key as a separate collection.
    ///
    /// Tiles without an entry in `borders` neither send nor produce output;
    /// entries without a tile only shape what their neighbors send.
    pub fn per_key<K, T>(
        &self,
        tiles: PartitionedCollection<K, T>,
        borders: PartitionedCollection<K, BorderSizes>,
        layer_bounds: Option<GridBounds>,
    ) -> HaloResult<PartitionedCollection<K, BufferedTile<T>>>
    where
        K: SpatialComponent,
        T: Tile + Stitch,
    {
        self.buffer(tiles, BorderSource::PerKey(borders), layer_bounds)
    }

    /// Buffer `tiles` with border sizes from `source`.
    pub fn buffer<K, T>(
        &self,
        tiles: PartitionedCollection<K, T>,
        source: BorderSource<K>,
        layer_bounds: Option<GridBounds>,
    ) -> HaloResult<PartitionedCollection<K, BufferedTile<T>>>
    where
        K: SpatialComponent,
        T: Tile + Stitch,
    {
        let spec = self.target_partitioning(&tiles)?;
        let bounds = layer_bounds.unwrap_or_default();
        debug!(
            "buffering {} tiles ({} border sizes) under {spec}, layer bounds {bounds}",
            tiles.len(),
            source.mode()
        );

        self.run(move || match source {
            BorderSource::Uniform(sizes) => self.buffer_uniform(tiles, sizes, bounds, &spec),
            BorderSource::ByKey(f) => {
                // Materialize once so each key's sizes are computed a single time.
                let records = tiles.iter().map(|(k, _)| (k.clone(), f(k))).collect();
                let borders = PartitionedCollection::from_records(records, spec.clone())?;
                self.buffer_per_key(tiles, borders, bounds, &spec)
            }
            BorderSource::PerKey(borders) => self.buffer_per_key(tiles, borders, bounds, &spec),
        })
    }

    /// Extract and gather without stitching: each key's raw [`NeighborSlices`].
    ///
    /// Keys that received only neighbor slices (no tile of their own, but
    /// inside the layer bounds) are kept, with no center slice.
    pub fn with_neighbors<K, T>(
        &self,
        tiles: PartitionedCollection<K, T>,
        border_size: i64,
        layer_bounds: Option<GridBounds>,
    ) -> HaloResult<PartitionedCollection<K, NeighborSlices<T>>>
    where
        K: SpatialComponent,
        T: Tile,
    {
        let sizes = BorderSizes::try_uniform(border_size)?;
        let spec = self.target_partitioning(&tiles)?;
        let bounds = layer_bounds.unwrap_or_default();
        self.run(move || self.exchange_uniform(tiles, sizes, bounds, &spec))
    }

    fn exchange_uniform<K, T>(
        &self,
        tiles: PartitionedCollection<K, T>,
        sizes: BorderSizes,
        bounds: GridBounds,
        spec: &PartitioningSpec,
    ) -> HaloResult<PartitionedCollection<K, NeighborSlices<T>>>
    where
        K: SpatialComponent,
        T: Tile,
    {
        let included = |key: SpatialKey| bounds.contains_key(key);
        let contributions = tiles.try_flat_map_to_keyed(|key, tile| {
            collect_with_neighbors(&key, tile, included, |_| sizes)
        })?;
        gather_slices(contributions, spec, self.policy(), self.collect_stats())
    }

    fn buffer_uniform<K, T>(
        &self,
        tiles: PartitionedCollection<K, T>,
        sizes: BorderSizes,
        bounds: GridBounds,
        spec: &PartitioningSpec,
    ) -> HaloResult<PartitionedCollection<K, BufferedTile<T>>>
    where
        K: SpatialComponent,
        T: Tile + Stitch,
    {
        let gathered = self.exchange_uniform(tiles, sizes, bounds, spec)?;
        gathered.try_filter_map_values(|key, slices| {
            trace!("stitching {key:?} from {:?}", slices.directions());
            stitch_slices(&slices, &sizes)
        })
    }

    fn buffer_per_key<K, T>(
        &self,
        tiles: PartitionedCollection<K, T>,
        borders: PartitionedCollection<K, BorderSizes>,
        bounds: GridBounds,
        spec: &PartitioningSpec,
    ) -> HaloResult<PartitionedCollection<K, BufferedTile<T>>>
    where
        K: SpatialComponent,
        T: Tile + Stitch,
    {
        let policy = self.policy();
        let borders = dedupe_borders(borders, spec, policy)?;

        // First pass over `borders`: what each key's neighbors ask of it.
        let neighbor_borders = propagate_border_sizes(&borders, spec, policy)?;
        let contributions = tiles.join(neighbor_borders, spec)?.try_flat_map_to_keyed(
            |key, (tile, requests)| {
                collect_with_neighbors(
                    &key,
                    tile,
                    |target| bounds.contains_key(target) && requests.contains_key(&target),
                    |target| requests.get(&target).copied().unwrap_or_default(),
                )
            },
        )?;
        let gathered = gather_slices(contributions, spec, policy, self.collect_stats())?;

        // Second pass consumes `borders`: each key's own canvas size.
        gathered
            .join(borders, spec)?
            .try_filter_map_values(|key, (slices, sizes)| {
                trace!("stitching {key:?} with {sizes} from {:?}", slices.directions());
                stitch_slices(&slices, &sizes)
            })
    }

    /// Run `f` on the configured thread pool, or the global one.
    fn run<R, F>(&self, f: F) -> HaloResult<R>
    where
        R: Send,
        F: FnOnce() -> HaloResult<R> + Send,
    {
        match self.config.runtime.parallelism {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("halo-worker-{i}"))
                    .build()
                    .map_err(|e| HaloError::execution(format!("thread pool: {e}")))?;
                pool.install(f)
            }
            None => f(),
        }
    }
}

/// Reduce `borders` to one entry per key under `policy`, partitioned by `spec`.
fn dedupe_borders<K>(
    borders: PartitionedCollection<K, BorderSizes>,
    spec: &PartitioningSpec,
    policy: DuplicatePolicy,
) -> HaloResult<PartitionedCollection<K, BorderSizes>>
where
    K: SpatialComponent,
{
    borders.group_by_key(spec)?.try_map_values(|key, sizes| {
        if sizes.len() > 1 && policy == DuplicatePolicy::Reject {
            return Err(HaloError::duplicate(format!(
                "{key:?} has {} border size entries",
                sizes.len()
            )));
        }
        sizes
            .into_iter()
            .next()
            .ok_or_else(|| HaloError::internal(format!("{key:?} grouped with no border sizes")))
    })
}

/// Buffer tiles held in a single in-memory partition.
///
/// Same semantics as [`BufferTiles::uniform`] with the default configuration;
/// output order follows first arrival of each key.
pub fn buffer_tiles_local<K, T>(
    records: Vec<(K, T)>,
    border_size: i64,
    layer_bounds: Option<GridBounds>,
) -> HaloResult<Vec<(K, BufferedTile<T>)>>
where
    K: SpatialComponent,
    T: Tile + Stitch,
{
    let tiles = PartitionedCollection::from_records(records, PartitioningSpec::single())?;
    let buffered = BufferTiles::default().uniform(tiles, border_size, layer_bounds)?;
    Ok(buffered.into_records())
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_core::testing::LayerFixture;
    use halo_core::ArrayTile;

    type Layer = PartitionedCollection<SpatialKey, ArrayTile<i32>>;

    fn layer(layout: i32, size: usize, partitions: usize) -> Layer {
        let fixture = LayerFixture::grid(layout, layout, size, size);
        let spec = PartitioningSpec::unknown(partitions);
        PartitionedCollection::from_records(fixture.records(), spec).unwrap()
    }

    #[test]
    fn test_negative_border_rejected() {
        let err = BufferTiles::default().uniform(layer(2, 4, 1), -1, None).unwrap_err();
        assert!(matches!(err, HaloError::InvalidArgument(_)));
        let err = BufferTiles::default().with_neighbors(layer(2, 4, 1), -3, None).unwrap_err();
        assert!(matches!(err, HaloError::InvalidArgument(_)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = HaloConfig::default().with_default_partitions(0);
        assert!(BufferTiles::new(config).is_err());
    }

    #[test]
    fn test_every_tile_buffered() {
        let out = BufferTiles::default().uniform(layer(3, 4, 2), 1, None).unwrap();
        assert_eq!(out.len(), 9);
        assert_eq!(out.num_partitions(), 8);
        for (_, buffered) in out.iter() {
            assert_eq!((buffered.tile.cols(), buffered.tile.rows()), (6, 6));
        }
    }

    #[test]
    fn test_known_partitioning_reused() {
        let fixture = LayerFixture::grid(2, 2, 3, 3);
        let spec = PartitioningSpec::hash(3).unwrap();
        let tiles = PartitionedCollection::from_records(fixture.records(), spec.clone()).unwrap();
        let out = BufferTiles::default().uniform(tiles, 1, None).unwrap();
        assert_eq!(out.partitioning(), &spec);
    }

    #[test]
    fn test_dedicated_pool() {
        let config = HaloConfig::default().with_parallelism(2);
        let out = BufferTiles::new(config).unwrap().uniform(layer(2, 2, 2), 1, None).unwrap();
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn test_with_neighbors_keeps_tileless_keys() {
        let bounds = GridBounds::new(-1, -1, 2, 2);
        let slices = BufferTiles::default()
            .with_neighbors(layer(2, 4, 1), 1, Some(bounds))
            .unwrap()
            .into_map();
        // 4x4 key window inside bounds, all touched by the 2x2 layer.
        assert_eq!(slices.len(), 16);
        assert_eq!(slices[&SpatialKey::new(0, 0)].len(), 4);
        assert!(slices[&SpatialKey::new(-1, -1)].center().is_none());
        assert_eq!(
            slices[&SpatialKey::new(-1, -1)].directions(),
            vec![halo_core::Direction::BottomRight]
        );
    }

    #[test]
    fn test_per_key_dedupes_borders() {
        let fixture = LayerFixture::grid(1, 1, 4, 4);
        let key = SpatialKey::new(0, 0);
        let tiles =
            PartitionedCollection::from_records(fixture.records(), PartitioningSpec::single())
                .unwrap();
        let borders = PartitionedCollection::from_partitions(vec![vec![
            (key, BorderSizes::uniform(1)),
            (key, BorderSizes::uniform(2)),
        ]]);

        let err = BufferTiles::default()
            .per_key(tiles.clone(), borders.clone(), None)
            .unwrap_err();
        assert!(matches!(err, HaloError::DuplicateContribution(_)));

        let config = HaloConfig::default().with_duplicate_policy(DuplicatePolicy::FirstWins);
        let out = BufferTiles::new(config).unwrap().per_key(tiles, borders, None).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out.get(&key).unwrap().border_sizes(), BorderSizes::uniform(1));
    }

    #[test]
    fn test_local() {
        let fixture = LayerFixture::grid(2, 1, 2, 2);
        let out = buffer_tiles_local(fixture.records(), 1, None).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].1.tile.cols(), 4);
    }
}
