//! Common test utilities for admin-monitor

pub mod database;
pub mod executor;
pub mod fixtures;
pub mod probe;

pub use database::TestDatabase;
pub use executor::FakeExecutor;
pub use fixtures::{metric_set, test_state};
pub use probe::StaticProbe;
