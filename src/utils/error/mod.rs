//! Error handling for the monitor
//!
//! Collector failures never surface here; they are recorded as `CollectorError`
//! entries on a degraded category. This module covers everything that can
//! legitimately fail a call: configuration, persistence and transport.

mod helpers;
mod response;
mod types;

pub use types::{MonitorError, Result};
