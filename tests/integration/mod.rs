//! Integration tests for admin-monitor

pub mod facade_tests;
pub mod http_tests;
pub mod scheduler_tests;
pub mod snapshot_store_tests;
