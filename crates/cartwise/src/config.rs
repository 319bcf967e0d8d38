//! Query configuration: the thresholds and choices a dashboard user sets.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CartwiseError, Result};
use crate::model::{MonthFilter, TypeFilter};

/// Metric recommendations are ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Confidence,
    Lift,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Confidence => f.write_str("confidence"),
            SortKey::Lift => f.write_str("lift"),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "confidence" | "conf" => Ok(SortKey::Confidence),
            "lift" => Ok(SortKey::Lift),
            _ => Err(format!("Unknown sort key: {}. Use confidence or lift.", s)),
        }
    }
}

/// How a ranked list is grouped for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    #[default]
    None,
    Type,
    Month,
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupBy::None => f.write_str("none"),
            GroupBy::Type => f.write_str("type"),
            GroupBy::Month => f.write_str("month"),
        }
    }
}

impl FromStr for GroupBy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "" => Ok(GroupBy::None),
            "type" => Ok(GroupBy::Type),
            "month" => Ok(GroupBy::Month),
            _ => Err(format!("Unknown grouping: {}. Use none, type or month.", s)),
        }
    }
}

/// Filter and ranking options for one recommendation query.
///
/// Defaults match the dashboard's initial sidebar state. Thresholds are
/// inclusive lower bounds; blank `sku_contains`/`keyword` disable those
/// filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    pub month: MonthFilter,
    pub rule_type: TypeFilter,
    pub min_confidence: f64,
    pub min_lift: f64,
    pub min_support: f64,
    pub min_consequent_frequency: usize,
    pub sku_contains: String,
    pub keyword: String,
    /// Match the selected item on either side of a rule.
    pub bidirectional: bool,
    pub top_n: usize,
    pub sort_by: SortKey,
    pub group_by: GroupBy,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            month: MonthFilter::Any,
            rule_type: TypeFilter::All,
            min_confidence: 0.4,
            min_lift: 1.2,
            min_support: 0.01,
            min_consequent_frequency: 5,
            sku_contains: String::new(),
            keyword: String::new(),
            bidirectional: false,
            top_n: 10,
            sort_by: SortKey::Confidence,
            group_by: GroupBy::None,
        }
    }
}

impl RecommendationConfig {
    /// A config with every threshold open; only `top_n` limits results.
    pub fn permissive() -> Self {
        Self {
            min_confidence: 0.0,
            min_lift: 0.0,
            min_support: 0.0,
            min_consequent_frequency: 0,
            ..Self::default()
        }
    }

    /// Check that thresholds are inside their domains.
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(CartwiseError::Config("top_n must be at least 1".to_string()));
        }
        for (name, value, max) in [
            ("min_confidence", self.min_confidence, Some(1.0)),
            ("min_support", self.min_support, Some(1.0)),
            ("min_lift", self.min_lift, None),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CartwiseError::Config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
            if let Some(max) = max {
                if value > max {
                    return Err(CartwiseError::Config(format!(
                        "{} must not exceed {}, got {}",
                        name, max, value
                    )));
                }
            }
        }
        Ok(())
    }

    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| CartwiseError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: RecommendationConfig = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| {
                CartwiseError::Config(format!(
                    "Failed to parse config '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Save the config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| CartwiseError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let file = File::create(path).map_err(|e| CartwiseError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}
