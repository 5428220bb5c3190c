//! Report preferences for tanklog.
//!
//! Loads preferences from TOML files with per-report-kind overrides on top
//! of a default set. The engine itself never reads configuration; hosts
//! resolve a [`tanklog_reports::ReportOptions`] here and pass it in.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use tanklog_reports::{Granularity, ReportKind, ReportOptions};

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub reports: ReportsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reports: ReportsConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from default locations.
    ///
    /// Searches in order:
    /// 1. `./tanklog.toml`
    /// 2. `~/.config/tanklog/config.toml`
    ///
    /// Returns default config if no file found.
    pub fn load_default() -> Self {
        if let Ok(config) = Self::load("tanklog.toml") {
            return config;
        }

        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("tanklog").join("config.toml");
            if let Ok(config) = Self::load(&config_path) {
                return config;
            }
        }

        Self::default()
    }

    /// Save configuration to a file path.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the default config file path.
    pub fn default_path() -> PathBuf {
        PathBuf::from("tanklog.toml")
    }

    /// Resolve the engine options for one report kind.
    /// Falls back to the defaults if the kind is not configured.
    pub fn options_for(&self, kind: ReportKind) -> ReportOptions {
        let prefs = self
            .reports
            .kinds
            .get(kind_key(kind))
            .map(|overrides| self.reports.default.merge(overrides))
            .unwrap_or_else(|| self.reports.default.clone());
        prefs.to_options()
    }
}

/// Configuration key for a report kind.
fn kind_key(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::FuelConsumption => "fuel-consumption",
        ReportKind::FuelPrice => "fuel-price",
        ReportKind::Costs => "costs",
        ReportKind::Mileage => "mileage",
    }
}

/// Report preferences section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    /// Default preferences for all report kinds.
    pub default: ReportPrefs,
    /// Per-kind overrides, keyed by report kind.
    #[serde(default)]
    pub kinds: HashMap<String, ReportPrefsOverride>,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        let mut kinds = HashMap::new();
        // Cost totals read best per month with the accumulating month cut
        // out of the fitted line.
        kinds.insert(
            "costs".to_string(),
            ReportPrefsOverride {
                granularity: Some(GranularityPref::Monthly),
                ..Default::default()
            },
        );

        Self {
            default: ReportPrefs::default(),
            kinds,
        }
    }
}

/// Preferences for one report build (full set).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportPrefs {
    /// Derive the long-run regression line.
    pub overall_trend: bool,
    /// Derive the short-run moving average.
    pub moving_average: bool,
    /// Fit cost regressions without the still-accumulating bucket.
    pub exclude_open_period: bool,
    pub granularity: GranularityPref,
}

impl Default for ReportPrefs {
    fn default() -> Self {
        Self {
            overall_trend: false,
            moving_average: false,
            exclude_open_period: true,
            granularity: GranularityPref::PerCycle,
        }
    }
}

impl ReportPrefs {
    /// Merge with an override, using override values where present.
    pub fn merge(&self, overrides: &ReportPrefsOverride) -> Self {
        Self {
            overall_trend: overrides.overall_trend.unwrap_or(self.overall_trend),
            moving_average: overrides.moving_average.unwrap_or(self.moving_average),
            exclude_open_period: overrides
                .exclude_open_period
                .unwrap_or(self.exclude_open_period),
            granularity: overrides.granularity.unwrap_or(self.granularity),
        }
    }

    /// Convert to the engine's option set.
    pub fn to_options(&self) -> ReportOptions {
        ReportOptions {
            overall_trend: self.overall_trend,
            moving_average: self.moving_average,
            exclude_open_period: self.exclude_open_period,
            granularity: self.granularity.to_granularity(),
        }
    }
}

/// Per-kind override (all fields optional for partial overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportPrefsOverride {
    pub overall_trend: Option<bool>,
    pub moving_average: Option<bool>,
    pub exclude_open_period: Option<bool>,
    pub granularity: Option<GranularityPref>,
}

/// Serialized form of the aggregation granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GranularityPref {
    PerCycle,
    Monthly,
    Yearly,
}

impl GranularityPref {
    fn to_granularity(self) -> Granularity {
        match self {
            GranularityPref::PerCycle => Granularity::PerCycle,
            GranularityPref::Monthly => Granularity::Monthly,
            GranularityPref::Yearly => Granularity::Yearly,
        }
    }
}
