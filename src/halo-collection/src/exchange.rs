//! Record redistribution between partitions.
//!
//! A shuffle is the only synchronization barrier in a pipeline: every source
//! partition is routed (in parallel) before any target partition is built.

use std::hash::Hash;

use common_error::{HaloError, HaloResult};
use rayon::prelude::*;

use crate::partitioning::PartitioningSpec;

/// Records moved by one exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExchangeStats {
    /// Records sent, per source partition.
    pub records_sent: Vec<u64>,
    /// Records received, per target partition.
    pub records_received: Vec<u64>,
    /// Whether records actually moved (false when co-partitioning was reused).
    pub shuffled: bool,
}

impl ExchangeStats {
    /// Create new stats for the given partition counts.
    pub fn new(source_partitions: usize, target_partitions: usize) -> Self {
        Self {
            records_sent: vec![0; source_partitions],
            records_received: vec![0; target_partitions],
            shuffled: true,
        }
    }

    /// Stats for an exchange that was skipped because the input already
    /// matched the requested partitioning.
    pub fn reused(partition_sizes: impl IntoIterator<Item = usize>) -> Self {
        let received: Vec<u64> = partition_sizes.into_iter().map(|n| n as u64).collect();
        Self {
            records_sent: vec![0; received.len()],
            records_received: received,
            shuffled: false,
        }
    }

    /// Record records sent from a partition.
    pub fn record_sent(&mut self, partition: usize, records: usize) {
        if let Some(slot) = self.records_sent.get_mut(partition) {
            *slot += records as u64;
        }
    }

    /// Record records received by a partition.
    pub fn record_received(&mut self, partition: usize, records: usize) {
        if let Some(slot) = self.records_received.get_mut(partition) {
            *slot += records as u64;
        }
    }

    /// Get total records sent.
    pub fn total_sent(&self) -> u64 {
        self.records_sent.iter().sum()
    }

    /// Get total records received.
    pub fn total_received(&self) -> u64 {
        self.records_received.iter().sum()
    }

    /// Largest target partition, a measure of skew.
    pub fn max_received(&self) -> u64 {
        self.records_received.iter().copied().max().unwrap_or(0)
    }
}

impl std::fmt::Display for ExchangeStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "shuffled={}, sent={}, received={}, partitions={}, max_partition={}",
            self.shuffled,
            self.total_sent(),
            self.total_received(),
            self.records_received.len(),
            self.max_received()
        )
    }
}

/// Route every record to the partition `spec` assigns its key.
pub(crate) fn shuffle<K, V>(
    partitions: Vec<Vec<(K, V)>>,
    spec: &PartitioningSpec,
) -> HaloResult<(Vec<Vec<(K, V)>>, ExchangeStats)>
where
    K: Hash + Send,
    V: Send,
{
    if !spec.is_known() {
        return Err(HaloError::invalid_argument(format!(
            "cannot shuffle into {spec} partitioning"
        )));
    }
    let target_count = spec.num_partitions();
    let mut stats = ExchangeStats::new(partitions.len(), target_count);
    for (i, part) in partitions.iter().enumerate() {
        stats.record_sent(i, part.len());
    }

    let routed: Vec<Vec<Vec<(K, V)>>> = partitions
        .into_par_iter()
        .map(|part| -> HaloResult<Vec<Vec<(K, V)>>> {
            let mut buckets: Vec<Vec<(K, V)>> = (0..target_count).map(|_| Vec::new()).collect();
            for (key, value) in part {
                let target = spec
                    .partition_for_key(&key)
                    .ok_or_else(|| HaloError::internal("known spec failed to route a key"))?;
                buckets[target].push((key, value));
            }
            Ok(buckets)
        })
        .collect::<HaloResult<_>>()?;

    // Concatenate in source order so arrival order is deterministic.
    let mut targets: Vec<Vec<(K, V)>> = (0..target_count).map(|_| Vec::new()).collect();
    for buckets in routed {
        for (target, bucket) in buckets.into_iter().enumerate() {
            targets[target].extend(bucket);
        }
    }
    for (i, part) in targets.iter().enumerate() {
        stats.record_received(i, part.len());
    }

    Ok((targets, stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_stats() {
        let mut stats = ExchangeStats::new(2, 4);
        stats.record_sent(0, 100);
        stats.record_sent(1, 200);
        stats.record_sent(9, 1);
        stats.record_received(3, 300);

        assert_eq!(stats.total_sent(), 300);
        assert_eq!(stats.total_received(), 300);
        assert_eq!(stats.max_received(), 300);
        assert!(stats.shuffled);
    }

    #[test]
    fn test_reused_stats() {
        let stats = ExchangeStats::reused([3, 4]);
        assert!(!stats.shuffled);
        assert_eq!(stats.total_sent(), 0);
        assert_eq!(stats.total_received(), 7);
    }

    #[test]
    fn test_shuffle_routes_by_spec() {
        let spec = PartitioningSpec::hash(3).unwrap();
        let input = vec![
            (0..10).map(|k| (k, k * 2)).collect::<Vec<_>>(),
            (10..20).map(|k| (k, k * 2)).collect(),
        ];

        let (output, stats) = shuffle(input, &spec).unwrap();
        assert_eq!(output.len(), 3);
        assert_eq!(stats.total_sent(), 20);
        assert_eq!(stats.total_received(), 20);
        for (i, part) in output.iter().enumerate() {
            for (key, value) in part {
                assert_eq!(spec.partition_for_key(key), Some(i));
                assert_eq!(*value, key * 2);
            }
        }
    }

    #[test]
    fn test_shuffle_into_unknown_fails() {
        let input = vec![vec![(1, 1)]];
        assert!(shuffle(input, &PartitioningSpec::unknown(2)).is_err());
    }

    #[test]
    fn test_display() {
        let stats = ExchangeStats::new(1, 2);
        assert!(stats.to_string().contains("partitions=2"));
    }
}
