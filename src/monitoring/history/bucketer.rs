//! Left-join of snapshots onto fixed buckets

use super::range::TimeRange;
use crate::storage::snapshots::Snapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One bucket, `[bucket_start, bucket_end)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryBucket {
    pub bucket_start: DateTime<Utc>,
    pub bucket_end: DateTime<Utc>,
    /// Mean of the non-null samples per `category.key`; null when the bucket had none
    pub aggregates: BTreeMap<String, Option<f64>>,
}

/// Ordered, gap-free bucket series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketSeries {
    pub range: TimeRange,
    /// Bucket width in seconds
    pub interval: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub buckets: Vec<HistoryBucket>,
}

#[derive(Default, Clone, Copy)]
struct Accumulator {
    sum: f64,
    count: u32,
}

impl Accumulator {
    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / f64::from(self.count))
    }
}

/// Build the series for `range` ending at `now`
///
/// `declared_keys` are always present in every bucket; keys only found in
/// snapshots are added alongside them. Snapshots outside `[now - span, now]`
/// are ignored, and one taken exactly at `now` lands in the last bucket.
pub fn build_series(
    range: TimeRange,
    now: DateTime<Utc>,
    declared_keys: &[String],
    snapshots: &[Snapshot],
) -> BucketSeries {
    let interval = range.interval();
    let count = range.bucket_count();
    let start = now - range.span();

    let mut keys: BTreeSet<String> = declared_keys.iter().cloned().collect();
    let mut sums: Vec<BTreeMap<String, Accumulator>> = vec![BTreeMap::new(); count];

    let interval_ms = interval.num_milliseconds();
    for snapshot in snapshots {
        if snapshot.taken_at < start || snapshot.taken_at > now {
            continue;
        }
        let offset_ms = (snapshot.taken_at - start).num_milliseconds();
        let index = ((offset_ms / interval_ms) as usize).min(count - 1);

        for metric in snapshot.metrics.metrics() {
            let key = metric.qualified_key();
            if let Some(value) = metric.value {
                let acc = sums[index].entry(key.clone()).or_default();
                acc.sum += value;
                acc.count += 1;
            }
            keys.insert(key);
        }
    }

    let buckets = sums
        .into_iter()
        .enumerate()
        .map(|(i, bucket)| {
            let bucket_start = start + interval * i as i32;
            HistoryBucket {
                bucket_start,
                bucket_end: bucket_start + interval,
                aggregates: keys
                    .iter()
                    .map(|key| (key.clone(), bucket.get(key).and_then(Accumulator::mean)))
                    .collect(),
            }
        })
        .collect();

    BucketSeries {
        range,
        interval: interval.num_seconds(),
        start,
        end: now,
        buckets,
    }
}
