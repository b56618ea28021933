//! Snapshot history bucketing
//!
//! A range token maps to a fixed span split into equal buckets. Bucket
//! boundaries depend only on the range and the reference time, never on which
//! snapshots happen to exist.

mod bucketer;
mod range;

pub use bucketer::{BucketSeries, HistoryBucket, build_series};
pub use range::{BUCKET_COUNT, TimeRange};
