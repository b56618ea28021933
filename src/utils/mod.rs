//! Utility modules for the monitor

pub mod error;
