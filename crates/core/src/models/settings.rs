use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::errors::CoreError;

use super::holding;

pub const DEFAULT_TITLE: &str = "DryPowder Portfolio Tracker";
pub const DEFAULT_INPUT_PATH: &str = "DryPowder_Portfolio_Latest.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "Updated_Portfolio.csv";
pub const DEFAULT_CASH_SYMBOL: &str = "SPAXX**";
pub const DEFAULT_BENCHMARK_SYMBOL: &str = "SPY";

/// Dashboard configuration.
///
/// Every field has a default, so an empty TOML file (or no file at all) gives
/// the stock setup: `DryPowder_Portfolio_Latest.csv` in, `Updated_Portfolio.csv`
/// out, SPY since 2024-01-01 as the benchmark, `SPAXX**` treated as cash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Page title shown above the dashboard.
    pub title: String,

    /// Holdings CSV to read.
    pub input_path: PathBuf,

    /// CSV written on save. Always overwritten.
    pub output_path: PathBuf,

    /// Symbol of the cash-equivalent row, excluded from all processing.
    pub cash_symbol: String,

    pub benchmark: BenchmarkSettings,

    /// Optional API keys for providers that require them.
    /// Keys: provider name (e.g., "alphavantage").
    pub api_keys: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkSettings {
    /// Ticker of the benchmark index fund.
    pub symbol: String,

    /// First day of the fetched history window. The window ends today.
    pub start_date: NaiveDate,

    /// Local `Date,Close` CSV used as an offline history source.
    pub history_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            cash_symbol: DEFAULT_CASH_SYMBOL.to_string(),
            benchmark: BenchmarkSettings::default(),
            api_keys: HashMap::new(),
        }
    }
}

impl Default for BenchmarkSettings {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_BENCHMARK_SYMBOL.to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            history_path: None,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, CoreError> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a TOML file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("Cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.benchmark.symbol.trim().is_empty() {
            return Err(CoreError::Config("benchmark symbol must not be empty".into()));
        }
        if self.input_path.as_os_str().is_empty() {
            return Err(CoreError::Config("input_path must not be empty".into()));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(CoreError::Config("output_path must not be empty".into()));
        }
        Ok(())
    }

    /// Name of the derived benchmark-return column, e.g. `SPY Return`.
    pub fn benchmark_return_column(&self) -> String {
        holding::benchmark_return_column(&self.benchmark.symbol)
    }

    /// Name of the derived alpha column, e.g. `Alpha vs SPY`.
    pub fn alpha_column(&self) -> String {
        holding::alpha_column(&self.benchmark.symbol)
    }

    pub fn api_key(&self, provider: &str) -> Option<&str> {
        self.api_keys
            .get(provider)
            .map(String::as_str)
            .filter(|k| !k.trim().is_empty())
    }
}
