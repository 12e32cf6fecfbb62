//! Configuration file support for the cycle tools.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/cycle/config.toml`.

use crate::{CycleConfig, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    /// Raw cycle settings; normalized by [`crate::resolve_config`] before use
    #[serde(default)]
    pub cycle: CycleConfig,

    #[serde(default)]
    pub fertile_window: FertileWindowConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Cycle record sources, relative to `data_dir`, merged on every read
    #[serde(default = "default_cycle_sources")]
    pub cycle_sources: Vec<PathBuf>,

    #[serde(default = "default_symptoms_file")]
    pub symptoms_file: PathBuf,

    #[serde(default = "default_pregnancy_file")]
    pub pregnancy_file: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            cycle_sources: default_cycle_sources(),
            symptoms_file: default_symptoms_file(),
            pregnancy_file: default_pregnancy_file(),
        }
    }
}

impl DataConfig {
    /// Absolute cycle source paths under the given data directory
    pub fn cycle_paths(&self, data_dir: &Path) -> Vec<PathBuf> {
        self.cycle_sources.iter().map(|p| data_dir.join(p)).collect()
    }
}

/// Days around ovulation counted as fertile
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FertileWindowConfig {
    #[serde(default = "default_days_before")]
    pub days_before: i64,

    #[serde(default = "default_days_after")]
    pub days_after: i64,
}

impl Default for FertileWindowConfig {
    fn default() -> Self {
        Self {
            days_before: default_days_before(),
            days_after: default_days_after(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("cycle")
}

fn default_cycle_sources() -> Vec<PathBuf> {
    vec!["cycles.jsonl".into(), "cycles_pending.jsonl".into()]
}

fn default_symptoms_file() -> PathBuf {
    "symptoms.jsonl".into()
}

fn default_pregnancy_file() -> PathBuf {
    "pregnancy.json".into()
}

fn default_days_before() -> i64 {
    5
}

fn default_days_after() -> i64 {
    1
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
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("cycle").join("config.toml")
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
        assert_eq!(config.cycle, CycleConfig::default());
        assert_eq!(config.fertile_window.days_before, 5);
        assert_eq!(config.fertile_window.days_after, 1);
        assert_eq!(config.data.cycle_sources.len(), 2);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[cycle]
cycle_avg_length = 31

[fertile_window]
days_before = 4
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.cycle.cycle_avg_length, Some(31));
        assert_eq!(config.cycle.period_avg_length, None);
        assert_eq!(config.fertile_window.days_before, 4);
        assert_eq!(config.fertile_window.days_after, 1); // default
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.cycle.period_avg_length = Some(6);
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.cycle.period_avg_length, Some(6));
        assert_eq!(loaded.data.cycle_sources, config.data.cycle_sources);
    }

    #[test]
    fn test_cycle_paths_are_joined() {
        let data = DataConfig::default();
        let paths = data.cycle_paths(Path::new("/tmp/cycle"));
        assert_eq!(paths[0], PathBuf::from("/tmp/cycle/cycles.jsonl"));
    }
}
