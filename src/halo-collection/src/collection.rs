//! Keyed collections split into partitions.
//!
//! Per-partition work runs on the rayon pool that is current when an
//! operation is called. Narrow operations (`map_values`, `filter`) keep the
//! partitioning; `flat_map_to_keyed` may change keys and so forgets it; wide
//! operations (`partition_by`, `group_by_key`, `join`) shuffle into a
//! requested spec unless the input already satisfies it.

use std::collections::HashMap;
use std::hash::Hash;

use common_error::{HaloError, HaloResult};
use indexmap::IndexMap;
use log::debug;
use rayon::prelude::*;

use crate::exchange::{shuffle, ExchangeStats};
use crate::partitioning::PartitioningSpec;

/// A keyed collection of `(K, V)` records split into partitions.
#[derive(Debug, Clone)]
pub struct PartitionedCollection<K, V> {
    partitions: Vec<Vec<(K, V)>>,
    partitioning: PartitioningSpec,
}

impl<K, V> PartitionedCollection<K, V> {
    /// Wrap pre-split partitions whose placement follows no known rule.
    pub fn from_partitions(partitions: Vec<Vec<(K, V)>>) -> Self {
        let partitioning = PartitioningSpec::unknown(partitions.len());
        let mut partitions = partitions;
        if partitions.is_empty() {
            partitions.push(Vec::new());
        }
        Self {
            partitions,
            partitioning,
        }
    }

    /// Get the partitioning specification.
    pub fn partitioning(&self) -> &PartitioningSpec {
        &self.partitioning
    }

    pub fn num_partitions(&self) -> usize {
        self.partitions.len()
    }

    pub fn partitions(&self) -> &[Vec<(K, V)>] {
        &self.partitions
    }

    /// Total records across partitions.
    pub fn len(&self) -> usize {
        self.partitions.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.iter().all(Vec::is_empty)
    }

    /// Iterate records partition by partition.
    pub fn iter(&self) -> impl Iterator<Item = &(K, V)> {
        self.partitions.iter().flatten()
    }

    pub fn into_records(self) -> Vec<(K, V)> {
        self.partitions.into_iter().flatten().collect()
    }

    /// All records ordered by key, independent of partition placement.
    pub fn collect_sorted(self) -> Vec<(K, V)>
    where
        K: Ord,
    {
        let mut records = self.into_records();
        records.sort_by(|a, b| a.0.cmp(&b.0));
        records
    }
}

impl<K, V> PartitionedCollection<K, V>
where
    K: Hash + Eq + Send,
    V: Send,
{
    /// Distribute `records` according to `spec`.
    ///
    /// Known specs route each record by key; an unknown spec deals records
    /// round-robin, which is how externally loaded data usually arrives.
    pub fn from_records(records: Vec<(K, V)>, spec: PartitioningSpec) -> HaloResult<Self> {
        if spec.is_known() {
            let (partitions, _) = shuffle(vec![records], &spec)?;
            return Ok(Self {
                partitions,
                partitioning: spec,
            });
        }
        let n = spec.num_partitions();
        let mut partitions: Vec<Vec<(K, V)>> = (0..n).map(|_| Vec::new()).collect();
        for (i, record) in records.into_iter().enumerate() {
            partitions[i % n].push(record);
        }
        Ok(Self {
            partitions,
            partitioning: spec,
        })
    }

    /// Look up the first value stored under `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        let candidates: &[Vec<(K, V)>] = match self.partitioning.partition_for_key(key) {
            Some(p) => &self.partitions[p..=p],
            None => &self.partitions,
        };
        candidates
            .iter()
            .flatten()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Collect into a map. Later duplicates overwrite earlier ones.
    pub fn into_map(self) -> HashMap<K, V> {
        self.partitions.into_iter().flatten().collect()
    }

    /// Transform values, keeping keys and partitioning.
    pub fn map_values<W, F>(self, f: F) -> PartitionedCollection<K, W>
    where
        W: Send,
        F: Fn(&K, V) -> W + Send + Sync,
    {
        let partitions: Vec<Vec<(K, W)>> = self
            .partitions
            .into_par_iter()
            .map(|part| {
                part.into_iter()
                    .map(|(k, v)| {
                        let w = f(&k, v);
                        (k, w)
                    })
                    .collect()
            })
            .collect();
        PartitionedCollection {
            partitions,
            partitioning: self.partitioning,
        }
    }

    /// Fallible [`PartitionedCollection::map_values`]; the first error wins.
    pub fn try_map_values<W, F>(self, f: F) -> HaloResult<PartitionedCollection<K, W>>
    where
        W: Send,
        F: Fn(&K, V) -> HaloResult<W> + Send + Sync,
    {
        let partitions = self
            .partitions
            .into_par_iter()
            .map(|part| {
                part.into_iter()
                    .map(|(k, v)| {
                        let w = f(&k, v)?;
                        Ok((k, w))
                    })
                    .collect::<HaloResult<Vec<_>>>()
            })
            .collect::<HaloResult<Vec<_>>>()?;
        Ok(PartitionedCollection {
            partitions,
            partitioning: self.partitioning,
        })
    }

    /// Fallible map that may drop records by returning `None`.
    pub fn try_filter_map_values<W, F>(self, f: F) -> HaloResult<PartitionedCollection<K, W>>
    where
        W: Send,
        F: Fn(&K, V) -> HaloResult<Option<W>> + Send + Sync,
    {
        let partitions = self
            .partitions
            .into_par_iter()
            .map(|part| -> HaloResult<Vec<(K, W)>> {
                let mut out = Vec::with_capacity(part.len());
                for (k, v) in part {
                    if let Some(w) = f(&k, v)? {
                        out.push((k, w));
                    }
                }
                Ok(out)
            })
            .collect::<HaloResult<Vec<_>>>()?;
        Ok(PartitionedCollection {
            partitions,
            partitioning: self.partitioning,
        })
    }

    /// Keep records matching `predicate`.
    pub fn filter<F>(self, predicate: F) -> Self
    where
        F: Fn(&K, &V) -> bool + Send + Sync,
    {
        let partitions: Vec<Vec<(K, V)>> = self
            .partitions
            .into_par_iter()
            .map(|part| part.into_iter().filter(|(k, v)| predicate(k, v)).collect())
            .collect();
        Self {
            partitions,
            partitioning: self.partitioning,
        }
    }

    /// Scatter: emit any number of re-keyed records per input record.
    ///
    /// Output records stay in the partition that produced them, so the
    /// result's partitioning is unknown.
    pub fn flat_map_to_keyed<K2, V2, I, F>(self, f: F) -> PartitionedCollection<K2, V2>
    where
        K2: Send,
        V2: Send,
        I: IntoIterator<Item = (K2, V2)>,
        F: Fn(K, V) -> I + Send + Sync,
    {
        let n = self.partitions.len();
        let partitions: Vec<Vec<(K2, V2)>> = self
            .partitions
            .into_par_iter()
            .map(|part| part.into_iter().flat_map(|(k, v)| f(k, v)).collect())
            .collect();
        PartitionedCollection {
            partitions,
            partitioning: PartitioningSpec::unknown(n),
        }
    }

    /// Fallible [`PartitionedCollection::flat_map_to_keyed`].
    pub fn try_flat_map_to_keyed<K2, V2, I, F>(
        self,
        f: F,
    ) -> HaloResult<PartitionedCollection<K2, V2>>
    where
        K2: Send,
        V2: Send,
        I: IntoIterator<Item = (K2, V2)>,
        F: Fn(K, V) -> HaloResult<I> + Send + Sync,
    {
        let n = self.partitions.len();
        let partitions = self
            .partitions
            .into_par_iter()
            .map(|part| -> HaloResult<Vec<(K2, V2)>> {
                let mut out = Vec::new();
                for (k, v) in part {
                    out.extend(f(k, v)?);
                }
                Ok(out)
            })
            .collect::<HaloResult<Vec<_>>>()?;
        Ok(PartitionedCollection {
            partitions,
            partitioning: PartitioningSpec::unknown(n),
        })
    }

    /// Redistribute into `spec`, reporting what moved.
    pub fn partition_by_with_stats(
        self,
        spec: &PartitioningSpec,
    ) -> HaloResult<(Self, ExchangeStats)> {
        if self.partitioning.satisfies(spec) {
            let stats = ExchangeStats::reused(self.partitions.iter().map(Vec::len));
            debug!("exchange into {spec} skipped (co-partitioned): {stats}");
            return Ok((self, stats));
        }
        let (partitions, stats) = shuffle(self.partitions, spec)?;
        debug!("exchange {} -> {spec}: {stats}", self.partitioning);
        Ok((
            Self {
                partitions,
                partitioning: spec.clone(),
            },
            stats,
        ))
    }

    /// Redistribute into `spec`.
    pub fn partition_by(self, spec: &PartitioningSpec) -> HaloResult<Self> {
        Ok(self.partition_by_with_stats(spec)?.0)
    }

    /// Gather: collect all values per key into one record.
    ///
    /// Values keep their arrival order: source partition order, then record
    /// order within each source partition.
    pub fn group_by_key_with_stats(
        self,
        spec: &PartitioningSpec,
    ) -> HaloResult<(PartitionedCollection<K, Vec<V>>, ExchangeStats)> {
        let (partitioned, stats) = self.partition_by_with_stats(spec)?;
        let partitions: Vec<Vec<(K, Vec<V>)>> = partitioned
            .partitions
            .into_par_iter()
            .map(group_partition)
            .collect();
        Ok((
            PartitionedCollection {
                partitions,
                partitioning: partitioned.partitioning,
            },
            stats,
        ))
    }

    /// Gather without statistics.
    pub fn group_by_key(
        self,
        spec: &PartitioningSpec,
    ) -> HaloResult<PartitionedCollection<K, Vec<V>>> {
        Ok(self.group_by_key_with_stats(spec)?.0)
    }

    /// Inner join on key, co-locating both sides under `spec`.
    ///
    /// A side already partitioned by `spec` is not shuffled.
    pub fn join<W>(
        self,
        other: PartitionedCollection<K, W>,
        spec: &PartitioningSpec,
    ) -> HaloResult<PartitionedCollection<K, (V, W)>>
    where
        K: Clone,
        V: Clone,
        W: Clone + Send + Sync,
    {
        if !spec.is_known() {
            return Err(HaloError::invalid_argument(format!(
                "cannot join under {spec} partitioning"
            )));
        }
        let left = self.partition_by(spec)?;
        let right = other.partition_by(spec)?;
        let partitions: Vec<Vec<(K, (V, W))>> = left
            .partitions
            .into_par_iter()
            .zip(right.partitions.into_par_iter())
            .map(|(l, r)| join_partition(l, r))
            .collect();
        Ok(PartitionedCollection {
            partitions,
            partitioning: spec.clone(),
        })
    }
}

impl<K, V> PartitionedCollection<K, V>
where
    K: Hash + Eq + Send + Sync,
    V: Send + Sync,
{
    /// Scatter from a borrowed collection, leaving it intact for later passes.
    pub fn flat_map_to_keyed_ref<K2, V2, I, F>(&self, f: F) -> PartitionedCollection<K2, V2>
    where
        K2: Send,
        V2: Send,
        I: IntoIterator<Item = (K2, V2)>,
        F: Fn(&K, &V) -> I + Send + Sync,
    {
        let partitions: Vec<Vec<(K2, V2)>> = self
            .partitions
            .par_iter()
            .map(|part| part.iter().flat_map(|(k, v)| f(k, v)).collect())
            .collect();
        PartitionedCollection {
            partitions,
            partitioning: PartitioningSpec::unknown(self.partitions.len()),
        }
    }
}

fn group_partition<K: Hash + Eq, V>(records: Vec<(K, V)>) -> Vec<(K, Vec<V>)> {
    let mut groups: IndexMap<K, Vec<V>> = IndexMap::new();
    for (k, v) in records {
        groups.entry(k).or_default().push(v);
    }
    groups.into_iter().collect()
}

fn join_partition<K, V, W>(left: Vec<(K, V)>, right: Vec<(K, W)>) -> Vec<(K, (V, W))>
where
    K: Hash + Eq + Clone,
    V: Clone,
    W: Clone,
{
    let mut by_key: HashMap<K, Vec<W>> = HashMap::with_capacity(right.len());
    for (k, w) in right {
        by_key.entry(k).or_default().push(w);
    }
    let mut out = Vec::with_capacity(left.len());
    for (k, v) in left {
        let Some(matches) = by_key.get(&k) else {
            continue;
        };
        if let Some((last, rest)) = matches.split_last() {
            for w in rest {
                out.push((k.clone(), (v.clone(), w.clone())));
            }
            out.push((k, (v, last.clone())));
        }
    }
    out
}
