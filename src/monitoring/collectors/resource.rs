//! Host resource collector

use super::{CollectContext, Collector, CollectorOutput, HostProbe};
use crate::monitoring::helpers::safe_percent;
use crate::monitoring::types::{Category, CollectorError, MetricSpec, MetricUnit};
use async_trait::async_trait;
use std::sync::Arc;

static SPECS: [MetricSpec; 7] = [
    MetricSpec::new("cpu", MetricUnit::Percent),
    MetricSpec::new("memory", MetricUnit::Percent),
    MetricSpec::new("memory_used", MetricUnit::Bytes),
    MetricSpec::new("memory_total", MetricUnit::Bytes),
    MetricSpec::new("disk", MetricUnit::Percent),
    MetricSpec::new("load_avg_1m", MetricUnit::Ratio),
    MetricSpec::new("uptime_seconds", MetricUnit::Count),
];

/// CPU, memory, disk and load of the host running the service
pub struct ResourceCollector {
    probe: Arc<dyn HostProbe>,
}

impl ResourceCollector {
    pub fn new(probe: Arc<dyn HostProbe>) -> Self {
        Self { probe }
    }
}

#[async_trait]
impl Collector for ResourceCollector {
    fn category(&self) -> Category {
        Category::Resource
    }

    fn metric_specs(&self) -> &'static [MetricSpec] {
        &SPECS
    }

    async fn sample(&self, _ctx: &CollectContext) -> Result<CollectorOutput, CollectorError> {
        let probe = Arc::clone(&self.probe);
        let sample = tokio::task::spawn_blocking(move || probe.sample())
            .await
            .map_err(|e| CollectorError::Probe {
                message: e.to_string(),
            })??;

        let mut output = CollectorOutput::new();
        output
            .set("cpu", sample.cpu_percent)
            .set("memory", safe_percent(sample.memory_used, sample.memory_total))
            .set("memory_used", sample.memory_used)
            .set("memory_total", sample.memory_total)
            .set("disk", safe_percent(sample.disk_used, sample.disk_total))
            .set("load_avg_1m", sample.load_avg_1m)
            .set("uptime_seconds", sample.uptime_seconds);
        Ok(output)
    }
}
