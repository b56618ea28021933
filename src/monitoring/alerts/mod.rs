//! Threshold alerting
//!
//! Thresholds live in an immutable [`ThresholdTable`]. The [`AlertEvaluator`]
//! holds the current table behind an `ArcSwap` so a reload replaces the whole
//! table at once and readers never observe a partial update.

mod evaluator;
mod table;
mod types;

pub use evaluator::{AlertEvaluator, evaluate};
pub use table::ThresholdTable;
pub use types::{Alert, AlertSeverity, AlertThreshold, ComparisonOperator};
