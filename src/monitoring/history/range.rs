//! Range tokens accepted by the history endpoint

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Buckets per series, whatever the range
pub const BUCKET_COUNT: usize = 12;

/// Symbolic history range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[default]
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "6h")]
    SixHours,
    #[serde(rename = "24h")]
    OneDay,
    #[serde(rename = "7d")]
    SevenDays,
    #[serde(rename = "30d")]
    ThirtyDays,
}

impl TimeRange {
    pub const ALL: [TimeRange; 5] = [
        TimeRange::OneHour,
        TimeRange::SixHours,
        TimeRange::OneDay,
        TimeRange::SevenDays,
        TimeRange::ThirtyDays,
    ];

    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.token() == token)
    }

    /// Parse `token`, falling back to the shortest range when it is not recognized
    pub fn resolve(token: &str) -> Self {
        Self::parse(token).unwrap_or_else(|| {
            warn!(
                token = token,
                "Unknown history range, falling back to {}",
                TimeRange::OneHour
            );
            TimeRange::OneHour
        })
    }

    pub fn token(&self) -> &'static str {
        match self {
            TimeRange::OneHour => "1h",
            TimeRange::SixHours => "6h",
            TimeRange::OneDay => "24h",
            TimeRange::SevenDays => "7d",
            TimeRange::ThirtyDays => "30d",
        }
    }

    /// Every accepted token, shortest range first
    pub fn tokens() -> Vec<&'static str> {
        Self::ALL.iter().map(TimeRange::token).collect()
    }

    pub fn span(&self) -> Duration {
        match self {
            TimeRange::OneHour => Duration::hours(1),
            TimeRange::SixHours => Duration::hours(6),
            TimeRange::OneDay => Duration::hours(24),
            TimeRange::SevenDays => Duration::days(7),
            TimeRange::ThirtyDays => Duration::days(30),
        }
    }

    /// Width of one bucket
    pub fn interval(&self) -> Duration {
        match self {
            TimeRange::OneHour => Duration::minutes(5),
            TimeRange::SixHours => Duration::minutes(30),
            TimeRange::OneDay => Duration::hours(2),
            TimeRange::SevenDays => Duration::hours(14),
            TimeRange::ThirtyDays => Duration::hours(60),
        }
    }

    pub fn bucket_count(&self) -> usize {
        BUCKET_COUNT
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!(
                "unknown time range '{}', expected one of {}",
                s,
                Self::tokens().join(", ")
            )
        })
    }
}
