//! Host resource probing

use crate::monitoring::types::CollectorError;
use std::sync::Arc;

/// One reading of host resources; absent fields were not available on this platform
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostSample {
    pub cpu_percent: Option<f64>,
    pub memory_used: Option<f64>,
    pub memory_total: Option<f64>,
    pub disk_used: Option<f64>,
    pub disk_total: Option<f64>,
    pub load_avg_1m: Option<f64>,
    pub uptime_seconds: Option<f64>,
}

/// Blocking source of host readings, called from a blocking task
pub trait HostProbe: Send + Sync {
    fn sample(&self) -> Result<HostSample, CollectorError>;
}

/// Probe used when host sampling is compiled out
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableProbe;

impl HostProbe for UnavailableProbe {
    fn sample(&self) -> Result<HostSample, CollectorError> {
        Err(CollectorError::Probe {
            message: "host metrics are not available in this build".to_string(),
        })
    }
}

#[cfg(feature = "metrics")]
mod sysinfo_probe {
    use super::*;
    use once_cell::sync::Lazy;
    use parking_lot::Mutex;
    use sysinfo::{Disks, System};

    static SYSTEM: Lazy<Mutex<System>> = Lazy::new(|| Mutex::new(System::new_all()));

    static DISKS: Lazy<Mutex<Disks>> = Lazy::new(|| Mutex::new(Disks::new_with_refreshed_list()));

    fn busy() -> CollectorError {
        CollectorError::Probe {
            message: "host sampler is still busy with an earlier reading".to_string(),
        }
    }

    /// Probe reading the local host through `sysinfo`
    ///
    /// A reading that overlaps one still in progress fails immediately.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct SysinfoProbe;

    impl HostProbe for SysinfoProbe {
        fn sample(&self) -> Result<HostSample, CollectorError> {
            let (cpu_percent, memory_used, memory_total) = {
                let mut sys = SYSTEM.try_lock().ok_or_else(busy)?;
                sys.refresh_cpu_usage();
                sys.refresh_memory();
                (
                    f64::from(sys.global_cpu_usage()),
                    sys.used_memory() as f64,
                    sys.total_memory() as f64,
                )
            };

            let (disk_used, disk_total) = {
                let mut disks = DISKS.try_lock().ok_or_else(busy)?;
                disks.refresh_list();
                disks.iter().fold((0.0, 0.0), |(used, total), d| {
                    let size = d.total_space() as f64;
                    (used + (size - d.available_space() as f64), total + size)
                })
            };

            let load = System::load_average();

            Ok(HostSample {
                cpu_percent: Some(cpu_percent),
                memory_used: Some(memory_used),
                memory_total: Some(memory_total),
                disk_used: Some(disk_used),
                disk_total: Some(disk_total),
                load_avg_1m: Some(load.one),
                uptime_seconds: Some(System::uptime() as f64),
            })
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_overlapping_reading_fails_fast() {
            let held = SYSTEM.lock();
            let result = SysinfoProbe.sample();
            drop(held);
            assert!(matches!(result, Err(CollectorError::Probe { message }) if message.contains("busy")));

            let disks = DISKS.lock();
            let result = SysinfoProbe.sample();
            drop(disks);
            assert!(matches!(result, Err(CollectorError::Probe { .. })));

            let sample = SysinfoProbe.sample().unwrap();
            assert!(sample.memory_total.is_some());
        }
    }
}

#[cfg(feature = "metrics")]
pub use sysinfo_probe::SysinfoProbe;

/// Probe for this build: `sysinfo` when the `metrics` feature is on
pub fn default_probe() -> Arc<dyn HostProbe> {
    #[cfg(feature = "metrics")]
    {
        Arc::new(SysinfoProbe)
    }
    #[cfg(not(feature = "metrics"))]
    {
        Arc::new(UnavailableProbe)
    }
}
