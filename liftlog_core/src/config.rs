//! Configuration file support for liftlog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/liftlog/config.toml`.

use crate::catalog::ProgramKind;
use crate::week::WeekMode;
use crate::{CalculationPolicy, Error, Result};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub program: ProgramSettings,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Which program runs and how weeks and weights are derived
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgramSettings {
    #[serde(default)]
    pub kind: ProgramKind,

    /// Overrides the program's own weight policy when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<CalculationPolicy>,

    #[serde(default)]
    pub week_mode: WeekMode,

    #[serde(default = "default_week_cap")]
    pub week_cap: u32,

    #[serde(default = "default_week_starts_on")]
    pub week_starts_on: Weekday,
}

impl Default for ProgramSettings {
    fn default() -> Self {
        Self {
            kind: ProgramKind::default(),
            policy: None,
            week_mode: WeekMode::default(),
            week_cap: default_week_cap(),
            week_starts_on: default_week_starts_on(),
        }
    }
}

impl ProgramSettings {
    /// Effective weight policy
    pub fn policy(&self) -> CalculationPolicy {
        self.policy.unwrap_or_else(|| self.kind.default_policy())
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| home_dir().join(".local/share"));
    base.join("liftlog")
}

fn default_week_cap() -> u32 {
    16
}

fn default_week_starts_on() -> Weekday {
    Weekday::Sun
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
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
        if config.program.week_cap == 0 {
            return Err(Error::Config("week_cap must be at least 1".into()));
        }
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| home_dir().join(".config"));
        base.join("liftlog").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.program.kind, ProgramKind::Linear);
        assert_eq!(config.program.week_mode, WeekMode::Date);
        assert_eq!(config.program.week_cap, 16);
        assert_eq!(config.program.week_starts_on, Weekday::Sun);
        assert_eq!(config.program.policy(), CalculationPolicy::Linear);
        assert!(config.data.data_dir.ends_with("liftlog"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.program.kind = ProgramKind::Periodized;
        config.program.week_starts_on = Weekday::Mon;

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.program.kind, ProgramKind::Periodized);
        assert_eq!(parsed.program.week_starts_on, Weekday::Mon);
        assert_eq!(parsed.data.data_dir, config.data.data_dir);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[program]
kind = "periodized"
week_mode = "completion"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.program.kind, ProgramKind::Periodized);
        assert_eq!(config.program.week_mode, WeekMode::Completion);
        assert_eq!(config.program.week_cap, 16); // default
        assert_eq!(config.program.policy(), CalculationPolicy::TrainingMax);
    }

    #[test]
    fn test_policy_override() {
        let toml_str = r#"
[program]
kind = "periodized"
policy = "linear_deload"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.program.policy(), CalculationPolicy::LinearDeload);
    }

    #[test]
    fn test_load_from_and_save_to() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.data.data_dir = temp_dir.path().join("data");
        config.program.week_cap = 12;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.data.data_dir, temp_dir.path().join("data"));
        assert_eq!(loaded.program.week_cap, 12);
    }

    #[test]
    fn test_zero_week_cap_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[program]\nweek_cap = 0\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }
}
