//! Configuration validation
//!
//! Every configuration section implements [`Validate`]; `Config::validate`
//! wraps the messages into `MonitorError::Config`.

mod config_validators;
mod trait_def;

#[cfg(test)]
mod tests;

pub use config_validators::is_sql_identifier;
pub use trait_def::Validate;
