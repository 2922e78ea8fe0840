//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/snackscan/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/snackscan/` (~/.config/snackscan/)
//! - Data: `$XDG_DATA_HOME/snackscan/` (~/.local/share/snackscan/)
//! - State/Logs: `$XDG_STATE_HOME/snackscan/` (~/.local/state/snackscan/)

use crate::error::{Error, Result};
use crate::types::{QualityState, StructuredRecord};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Values used when a model reply is missing fields or is unparseable
    #[serde(default)]
    pub normalizer: FallbackDefaults,

    /// Food Wrap configuration
    #[serde(default)]
    pub wrap: WrapConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The single fallback policy for the normalizer.
///
/// Used both to fill keys absent from a recovered JSON object and to
/// synthesize a whole record when no object can be recovered. The built-in
/// values describe a neutral "average quality" item.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FallbackDefaults {
    pub subject_name: String,
    pub quality_score: u8,
    pub quality_state: QualityState,
    pub descriptive_notes: String,
    pub recommend: bool,
    pub usage_guidance: String,
    pub shelf_life_days: u32,
    pub energy_value: u32,
    pub nutrition_notes: String,
    pub benefit_notes: String,
    pub recommendation_text: String,
    pub storage_guidance: String,
}

impl Default for FallbackDefaults {
    fn default() -> Self {
        Self {
            subject_name: "Food Item".to_string(),
            quality_score: 7,
            quality_state: QualityState::Good,
            descriptive_notes: "Standard quality assessment".to_string(),
            recommend: true,
            usage_guidance: "Eat now".to_string(),
            shelf_life_days: 3,
            energy_value: 100,
            nutrition_notes: "Nutritional analysis complete".to_string(),
            benefit_notes: "Good source of nutrients".to_string(),
            recommendation_text: "Analysis provided".to_string(),
            storage_guidance: "Store in cool, dry place".to_string(),
        }
    }
}

impl FallbackDefaults {
    /// Build a record made entirely of default values.
    pub fn to_record(&self) -> StructuredRecord {
        StructuredRecord {
            subject_name: self.subject_name.clone(),
            quality_score: self.quality_score,
            quality_state: self.quality_state.clone(),
            descriptive_notes: self.descriptive_notes.clone(),
            recommend: self.recommend,
            usage_guidance: self.usage_guidance.clone(),
            shelf_life_days: self.shelf_life_days,
            energy_value: self.energy_value,
            nutrition_notes: self.nutrition_notes.clone(),
            benefit_notes: self.benefit_notes.clone(),
            recommendation_text: self.recommendation_text.clone(),
            storage_guidance: self.storage_guidance.clone(),
            bonus_text: None,
            raw_fallback: None,
        }
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.subject_name.trim().is_empty() {
            return Err(Error::Config(
                "normalizer.subject_name must not be empty".to_string(),
            ));
        }
        if self.quality_score > 10 {
            return Err(Error::Config(
                "normalizer.quality_score must be between 0 and 10".to_string(),
            ));
        }
        Ok(())
    }
}

/// Food Wrap configuration
#[derive(Debug, Deserialize, Clone)]
pub struct WrapConfig {
    /// Number of subjects listed in the frequency table
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Lookback window in days when none is given
    #[serde(default = "default_wrap_days")]
    pub default_days: u32,

    /// Keyword lists used to categorize subject names
    #[serde(default)]
    pub categories: CategoryKeywords,
}

impl Default for WrapConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            default_days: default_wrap_days(),
            categories: CategoryKeywords::default(),
        }
    }
}

impl WrapConfig {
    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(Error::Config("wrap.top_n must be at least 1".to_string()));
        }
        if self.default_days == 0 {
            return Err(Error::Config(
                "wrap.default_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_top_n() -> usize {
    10
}

fn default_wrap_days() -> u32 {
    30
}

/// Keyword lists for subject categorization.
///
/// Matching is a case-insensitive substring test. A name matching a fruit
/// keyword is a fruit even if it also matches a vegetable keyword.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CategoryKeywords {
    #[serde(default = "default_fruit_keywords")]
    pub fruit: Vec<String>,

    #[serde(default = "default_vegetable_keywords")]
    pub vegetable: Vec<String>,
}

impl Default for CategoryKeywords {
    fn default() -> Self {
        Self {
            fruit: default_fruit_keywords(),
            vegetable: default_vegetable_keywords(),
        }
    }
}

fn default_fruit_keywords() -> Vec<String> {
    [
        "apple",
        "banana",
        "orange",
        "grape",
        "berry",
        "peach",
        "pear",
        "mango",
        "kiwi",
        "melon",
        "cherry",
        "plum",
        "pineapple",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_vegetable_keywords() -> Vec<String> {
    [
        "carrot", "broccoli", "tomato", "cucumber", "lettuce", "spinach", "onion", "garlic",
        "potato", "pepper", "corn",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.normalizer.validate()?;
        config.wrap.validate()?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/snackscan/config.toml` (~/.config/snackscan/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("snackscan").join("config.toml")
    }

    /// Returns the data directory path (for SQLite database)
    ///
    /// `$XDG_DATA_HOME/snackscan/` (~/.local/share/snackscan/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("snackscan")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/snackscan/` (~/.local/state/snackscan/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("snackscan")
    }

    /// Returns the database file path
    ///
    /// `$XDG_DATA_HOME/snackscan/scans.db` (~/.local/share/snackscan/scans.db)
    pub fn database_path() -> PathBuf {
        Self::data_dir().join("scans.db")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/snackscan/snackscan.log` (~/.local/state/snackscan/snackscan.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("snackscan.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.normalizer.quality_score, 7);
        assert_eq!(config.normalizer.quality_state, QualityState::Good);
        assert!(config.normalizer.recommend);
        assert_eq!(config.wrap.top_n, 10);
        assert_eq!(config.wrap.default_days, 30);
        assert!(config.wrap.categories.fruit.contains(&"banana".to_string()));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[normalizer]
subject_name = "Unknown snack"
quality_score = 5
quality_state = "Unknown"

[wrap]
top_n = 3

[wrap.categories]
fruit = ["durian"]

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.normalizer.subject_name, "Unknown snack");
        assert_eq!(config.normalizer.quality_score, 5);
        assert_eq!(config.normalizer.quality_state, QualityState::Unknown);
        // Unspecified normalizer keys keep the neutral defaults
        assert_eq!(config.normalizer.energy_value, 100);
        assert_eq!(config.wrap.top_n, 3);
        assert_eq!(config.wrap.default_days, 30);
        assert_eq!(config.wrap.categories.fruit, vec!["durian".to_string()]);
        assert!(config.wrap.categories.vegetable.contains(&"carrot".to_string()));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_validation() {
        assert!(FallbackDefaults::default().validate().is_ok());
        assert!(WrapConfig::default().validate().is_ok());

        let defaults = FallbackDefaults {
            quality_score: 11,
            ..Default::default()
        };
        assert!(defaults.validate().is_err());

        let defaults = FallbackDefaults {
            subject_name: "  ".to_string(),
            ..Default::default()
        };
        assert!(defaults.validate().is_err());

        let wrap = WrapConfig {
            top_n: 0,
            ..Default::default()
        };
        assert!(wrap.validate().is_err());
    }

    #[test]
    fn test_load_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[wrap]\ndefault_days = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("default_days"));
    }

    #[test]
    fn test_fallback_record_has_no_optional_fields() {
        let record = FallbackDefaults::default().to_record();
        assert_eq!(record.subject_name, "Food Item");
        assert!(record.bonus_text.is_none());
        assert!(record.raw_fallback.is_none());
    }
}
