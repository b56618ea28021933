/// Metric snapshot entity module
pub mod metric_snapshot;

pub use metric_snapshot::Entity as MetricSnapshot;
