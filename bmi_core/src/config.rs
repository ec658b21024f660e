//! Configuration file support for the BMI tracker.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/bmi-tracker/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "bmi-tracker";

/// Chart sizes the terminal renderer accepts, in character cells
pub const CHART_WIDTH_RANGE: RangeInclusive<usize> = 20..=240;
pub const CHART_HEIGHT_RANGE: RangeInclusive<usize> = 5..=80;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub chart: ChartConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_database_file")]
    pub database_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            database_file: default_database_file(),
        }
    }
}

impl DataConfig {
    /// Full path of the history database
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }
}

/// CSV export configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportConfig {
    /// File name used when no output path is given, relative to the data dir
    #[serde(default = "default_export_file")]
    pub default_file: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_file: default_export_file(),
        }
    }
}

/// Terminal trend chart size, in character cells
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_chart_width")]
    pub width: usize,

    #[serde(default = "default_chart_height")]
    pub height: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_chart_width(),
            height: default_chart_height(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn default_database_file() -> String {
    "bmi_history.db".into()
}

fn default_export_file() -> String {
    "bmi_history.csv".into()
}

fn default_chart_width() -> usize {
    60
}

fn default_chart_height() -> usize {
    12
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    /// Reject settings the rest of the program cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.data.database_file.trim().is_empty() {
            return Err(Error::Config("data.database_file cannot be empty".into()));
        }
        if self.export.default_file.trim().is_empty() {
            return Err(Error::Config("export.default_file cannot be empty".into()));
        }
        if !CHART_WIDTH_RANGE.contains(&self.chart.width)
            || !CHART_HEIGHT_RANGE.contains(&self.chart.height)
        {
            return Err(Error::Config(format!(
                "chart must be {}-{} wide and {}-{} tall, got {}x{}",
                CHART_WIDTH_RANGE.start(),
                CHART_WIDTH_RANGE.end(),
                CHART_HEIGHT_RANGE.start(),
                CHART_HEIGHT_RANGE.end(),
                self.chart.width,
                self.chart.height
            )));
        }
        Ok(())
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
