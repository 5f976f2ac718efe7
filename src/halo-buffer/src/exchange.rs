//! Gathering slices per target key.

use std::fmt::Debug;
use std::hash::Hash;

use common_config::DuplicatePolicy;
use common_error::{HaloError, HaloResult};
use halo_collection::{PartitionedCollection, PartitioningSpec};
use halo_core::Direction;
use log::debug;

/// Everything one key received: at most one slice per [`Direction`].
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborSlices<T> {
    slots: [Option<T>; 9],
}

impl<T> Default for NeighborSlices<T> {
    fn default() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }
}

impl<T> NeighborSlices<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble the contributions for `key`, resolving repeated directions
    /// with `policy`.
    pub fn from_contributions<K: Debug>(
        key: &K,
        contributions: impl IntoIterator<Item = (Direction, T)>,
        policy: DuplicatePolicy,
    ) -> HaloResult<Self> {
        let mut slices = Self::new();
        for (direction, slice) in contributions {
            let slot = &mut slices.slots[direction.index()];
            match (slot.is_some(), policy) {
                (false, _) => *slot = Some(slice),
                (true, DuplicatePolicy::FirstWins) => {}
                (true, DuplicatePolicy::Reject) => {
                    return Err(HaloError::duplicate(format!(
                        "{key:?} received more than one {direction} slice"
                    )));
                }
            }
        }
        Ok(slices)
    }

    pub fn get(&self, direction: Direction) -> Option<&T> {
        self.slots[direction.index()].as_ref()
    }

    pub fn center(&self) -> Option<&T> {
        self.get(Direction::Center)
    }

    pub fn contains(&self, direction: Direction) -> bool {
        self.slots[direction.index()].is_some()
    }

    /// Present slices in [`Direction::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, &T)> {
        Direction::ALL
            .into_iter()
            .filter_map(|d| self.slots[d.index()].as_ref().map(|t| (d, t)))
    }

    pub fn directions(&self) -> Vec<Direction> {
        self.iter().map(|(d, _)| d).collect()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shuffle contributions to their target keys and bundle them per key.
///
/// Every slice for a key lands in the same partition under `spec`; an
/// input already partitioned by `spec` is not moved.
pub fn gather_slices<K, T>(
    contributions: PartitionedCollection<K, (Direction, T)>,
    spec: &PartitioningSpec,
    policy: DuplicatePolicy,
    collect_stats: bool,
) -> HaloResult<PartitionedCollection<K, NeighborSlices<T>>>
where
    K: Hash + Eq + Debug + Send,
    T: Send,
{
    let (grouped, stats) = contributions.group_by_key_with_stats(spec)?;
    if collect_stats {
        debug!("gathered slices into {spec}: {stats}");
    }
    grouped.try_map_values(|key, list| NeighborSlices::from_contributions(key, list, policy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_core::SpatialKey;

    #[test]
    fn test_from_contributions() {
        let slices = NeighborSlices::from_contributions(
            &SpatialKey::new(0, 0),
            vec![(Direction::Right, 'r'), (Direction::Center, 'c')],
            DuplicatePolicy::Reject,
        )
        .unwrap();
        assert_eq!(slices.len(), 2);
        assert_eq!(slices.center(), Some(&'c'));
        assert_eq!(slices.get(Direction::Left), None);
        assert_eq!(slices.directions(), vec![Direction::Center, Direction::Right]);
    }

    #[test]
    fn test_duplicate_rejected() {
        let err = NeighborSlices::from_contributions(
            &SpatialKey::new(3, 4),
            vec![(Direction::Top, 1), (Direction::Top, 2)],
            DuplicatePolicy::Reject,
        )
        .unwrap_err();
        assert!(matches!(err, HaloError::DuplicateContribution(_)));
        assert!(err.to_string().contains("Top"));
    }

    #[test]
    fn test_duplicate_first_wins() {
        let slices = NeighborSlices::from_contributions(
            &SpatialKey::new(3, 4),
            vec![(Direction::Top, 1), (Direction::Top, 2)],
            DuplicatePolicy::FirstWins,
        )
        .unwrap();
        assert_eq!(slices.get(Direction::Top), Some(&1));
        assert_eq!(slices.len(), 1);
    }

    #[test]
    fn test_gather_groups_by_key() {
        let a = SpatialKey::new(0, 0);
        let b = SpatialKey::new(1, 0);
        let contributions = PartitionedCollection::from_partitions(vec![
            vec![(a, (Direction::Center, 10)), (b, (Direction::Left, 11))],
            vec![(b, (Direction::Center, 20)), (a, (Direction::Right, 21))],
        ]);
        let spec = PartitioningSpec::hash(3).unwrap();
        let gathered = gather_slices(contributions, &spec, DuplicatePolicy::Reject, true).unwrap();
        assert_eq!(gathered.partitioning(), &spec);

        let map = gathered.into_map();
        assert_eq!(map[&a].directions(), vec![Direction::Center, Direction::Right]);
        assert_eq!(map[&b].get(Direction::Left), Some(&11));
        assert_eq!(map[&b].center(), Some(&20));
    }
}
