//! Fixed host readings

use admin_monitor::monitoring::CollectorError;
use admin_monitor::monitoring::collectors::{HostProbe, HostSample};

#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    sample: HostSample,
}

impl StaticProbe {
    /// Every reading zero, including totals
    pub fn zeros() -> Self {
        Self {
            sample: HostSample {
                cpu_percent: Some(0.0),
                memory_used: Some(0.0),
                memory_total: Some(0.0),
                disk_used: Some(0.0),
                disk_total: Some(0.0),
                load_avg_1m: Some(0.0),
                uptime_seconds: Some(0.0),
            },
        }
    }

    /// Memory at `percent` of a 16 GiB host
    pub fn memory_percent(percent: f64) -> Self {
        let total = 16.0 * 1024.0 * 1024.0 * 1024.0;
        Self {
            sample: HostSample {
                cpu_percent: Some(12.5),
                memory_used: Some(total * percent / 100.0),
                memory_total: Some(total),
                disk_used: Some(40.0),
                disk_total: Some(100.0),
                load_avg_1m: Some(0.75),
                uptime_seconds: Some(86_400.0),
            },
        }
    }
}

impl HostProbe for StaticProbe {
    fn sample(&self) -> Result<HostSample, CollectorError> {
        Ok(self.sample.clone())
    }
}
