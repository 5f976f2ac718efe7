//! Integration tests for `PartitionedCollection` scatter/gather.

use std::collections::BTreeMap;

use halo_collection::{choose_partitioning, PartitionedCollection, PartitioningSpec};
use proptest::prelude::*;

/// Reference grouping computed without partitions.
fn expected_groups(records: &[(u8, u16)]) -> BTreeMap<u8, Vec<u16>> {
    let mut groups: BTreeMap<u8, Vec<u16>> = BTreeMap::new();
    for (k, v) in records {
        groups.entry(*k).or_default().push(*v);
    }
    for values in groups.values_mut() {
        values.sort_unstable();
    }
    groups
}

#[test]
fn test_scatter_then_gather_neighbors() {
    // Each record sends its value to itself and both 1D neighbors.
    let spec = PartitioningSpec::hash(3).unwrap();
    let coll = PartitionedCollection::from_records((0..10).map(|k| (k, k)).collect(), spec.clone())
        .unwrap();

    let grouped = coll
        .flat_map_to_keyed(|k, v| [(k - 1, v), (k, v), (k + 1, v)])
        .group_by_key(&spec)
        .unwrap()
        .into_map();

    let mut five = grouped[&5].clone();
    five.sort_unstable();
    assert_eq!(five, vec![4, 5, 6]);
    assert_eq!(grouped[&-1], vec![0]);
    assert_eq!(grouped.len(), 12);
}

#[test]
fn test_partitioner_reused_across_stages() {
    let existing = PartitioningSpec::hash(5).unwrap();
    let chosen = choose_partitioning(&existing, 8).unwrap();
    let coll = PartitionedCollection::from_records((0..40).map(|k| (k, ())).collect(), existing)
        .unwrap();

    let (_, stats) = coll.partition_by_with_stats(&chosen).unwrap();
    assert!(!stats.shuffled);
}

proptest! {
    #[test]
    fn prop_group_by_key_matches_reference(
        records in prop::collection::vec((any::<u8>(), any::<u16>()), 0..200),
        source_partitions in 1usize..6,
        target_partitions in 1usize..6,
    ) {
        let expected = expected_groups(&records);
        let coll = PartitionedCollection::from_records(
            records,
            PartitioningSpec::unknown(source_partitions),
        ).unwrap();

        let grouped = coll
            .group_by_key(&PartitioningSpec::hash(target_partitions).unwrap())
            .unwrap();
        prop_assert_eq!(grouped.len(), expected.len());

        let mut actual: BTreeMap<u8, Vec<u16>> = grouped.into_records().into_iter().collect();
        for values in actual.values_mut() {
            values.sort_unstable();
        }
        prop_assert_eq!(actual, expected);
    }
}
