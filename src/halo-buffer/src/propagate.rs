//! Teaching each key what its neighbors require of it.
//!
//! With per-key border sizes, a tile cannot slice for a neighbor until it
//! knows that neighbor's request. Each key's sizes are sent to itself and its
//! 8 neighbors, and every key ends up with a map of the requests around it.

use std::collections::HashMap;

use common_config::DuplicatePolicy;
use common_error::{HaloError, HaloResult};
use halo_collection::{PartitionedCollection, PartitioningSpec};
use halo_core::{BorderSizes, Direction, SpatialComponent, SpatialKey};

/// Border sizes requested by the keys around (and including) one key.
pub type NeighborBorders = HashMap<SpatialKey, BorderSizes>;

/// Build each key's [`NeighborBorders`] from the per-key requests.
///
/// `borders` is only borrowed; it is needed again after the exchange to size
/// each key's own canvas. Keys with no tile of their own still receive a map
/// when a neighbor has one, and simply produce nothing later.
pub fn propagate_border_sizes<K>(
    borders: &PartitionedCollection<K, BorderSizes>,
    spec: &PartitioningSpec,
    policy: DuplicatePolicy,
) -> HaloResult<PartitionedCollection<K, NeighborBorders>>
where
    K: SpatialComponent,
{
    let scattered = borders.flat_map_to_keyed_ref(|key, sizes| {
        let key = key.clone();
        let sizes = *sizes;
        let origin = key.spatial_key();
        Direction::ALL.into_iter().filter_map(move |direction| {
            let (dc, dr) = direction.offset();
            origin
                .neighbor(dc, dr)
                .map(|target| (key.with_spatial_key(target), (origin, sizes)))
        })
    });

    scattered
        .group_by_key(spec)?
        .try_map_values(|key, requests| collect_requests(key, requests, policy))
}

fn collect_requests<K: SpatialComponent>(
    key: &K,
    requests: Vec<(SpatialKey, BorderSizes)>,
    policy: DuplicatePolicy,
) -> HaloResult<NeighborBorders> {
    let mut map = NeighborBorders::with_capacity(requests.len());
    for (requester, sizes) in requests {
        if map.contains_key(&requester) {
            if policy == DuplicatePolicy::Reject {
                return Err(HaloError::duplicate(format!(
                    "{key:?} received border sizes from {requester} more than once"
                )));
            }
            continue;
        }
        map.insert(requester, sizes);
    }
    Ok(map)
}
