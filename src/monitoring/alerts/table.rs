//! Validated, immutable threshold table

use super::types::AlertThreshold;
use crate::monitoring::types::Category;
use crate::utils::error::{MonitorError, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

/// Validated set of threshold rules
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThresholdTable {
    thresholds: Vec<AlertThreshold>,
}

/// Threshold file layout; either a bare list or a `thresholds:` document
#[derive(Deserialize)]
#[serde(untagged)]
enum ThresholdFile {
    Wrapped { thresholds: Vec<AlertThreshold> },
    List(Vec<AlertThreshold>),
}

impl ThresholdTable {
    /// Validate and freeze a list of thresholds
    pub fn new(thresholds: Vec<AlertThreshold>) -> Result<Self> {
        for (index, threshold) in thresholds.iter().enumerate() {
            if threshold.metric_key.trim().is_empty() {
                return Err(MonitorError::config(format!(
                    "threshold #{} has an empty metric key",
                    index
                )));
            }
            if !threshold.value.is_finite() {
                return Err(MonitorError::config(format!(
                    "threshold #{} on '{}' has a non-finite value",
                    index, threshold.metric_key
                )));
            }
            if let Some((prefix, _)) = threshold.metric_key.split_once('.') {
                if Category::from_name(prefix).is_none() {
                    return Err(MonitorError::config(format!(
                        "threshold #{} on '{}' names unknown category '{}'",
                        index, threshold.metric_key, prefix
                    )));
                }
            }
            if thresholds[..index].contains(threshold) {
                warn!(
                    "threshold #{} duplicates an earlier rule on '{}'; both will be evaluated",
                    index, threshold.metric_key
                );
            }
        }

        Ok(Self { thresholds })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: ThresholdFile = serde_yaml::from_str(content)
            .map_err(|e| MonitorError::config(format!("Failed to parse thresholds: {}", e)))?;
        let thresholds = match file {
            ThresholdFile::Wrapped { thresholds } | ThresholdFile::List(thresholds) => thresholds,
        };
        Self::new(thresholds)
    }

    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            MonitorError::config(format!(
                "Failed to read threshold file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn thresholds(&self) -> &[AlertThreshold] {
        &self.thresholds
    }

    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }
}
