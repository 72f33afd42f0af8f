//! Configuration file support for Coach.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/coach/config.toml`.

use crate::foods::DEFAULT_SEARCH_LIMIT;
use crate::{Error, FoodItem, FoodTable, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub foods: FoodsConfig,

    #[serde(default)]
    pub search: SearchConfig,
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

/// Adjustments to the built-in food table
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct FoodsConfig {
    /// Extra foods, replacing built-ins with the same id
    #[serde(default)]
    pub custom: Vec<FoodItem>,

    /// Built-in food ids to leave out
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Food search configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: default_search_limit(),
        }
    }
}

fn home_dir_fallback() -> PathBuf {
    dirs::home_dir().unwrap_or_default()
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| home_dir_fallback().join(".local/share"));
    base.join("coach")
}

fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
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
        let base = dirs::config_dir().unwrap_or_else(|| home_dir_fallback().join(".config"));
        base.join("coach").join("config.toml")
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

    /// Built-in food table minus excluded ids, plus the custom foods
    ///
    /// Fails if any custom food is invalid. A custom food is kept even
    /// when its id is also excluded.
    pub fn food_table(&self) -> Result<FoodTable> {
        let custom = FoodTable::from_items(self.foods.custom.iter().cloned());
        let errors = custom.validate();
        if !errors.is_empty() {
            return Err(Error::Config(format!(
                "Invalid custom foods: {}",
                errors.join("; ")
            )));
        }

        let table = crate::get_default_food_table()
            .without(&self.foods.exclude)
            .with_items(self.foods.custom.iter().cloned());
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.foods.custom.is_empty());
        assert_eq!(config.search.limit, 50);
        assert!(config.data.data_dir.ends_with("coach"));
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested/config.toml");

        let mut config = Config::default();
        config.search.limit = 7;
        config.save_to(&path).unwrap();

        let parsed = Config::load_from(&path).unwrap();
        assert_eq!(parsed.search.limit, 7);
        assert_eq!(parsed.data.data_dir, config.data.data_dir);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[search]
limit = 12
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.search.limit, 12);
        assert!(config.foods.custom.is_empty()); // default
        assert!(config.foods.exclude.is_empty()); // default
    }

    #[test]
    fn test_custom_foods_extend_table() {
        let toml_str = r#"
[[foods.custom]]
id = "tofu"
name = "Firm Tofu"
category = "protein"
portion = "100 g"
calories = 145.0
protein = 15.0
carbs = 3.0
fat = 9.0
tags = ["plant protein"]
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        let table = config.food_table().unwrap();

        assert_eq!(table.len(), crate::get_default_food_table().len() + 1);
        assert_eq!(table.search("tofu", 10).len(), 1);
    }

    #[test]
    fn test_excluded_foods_removed_from_table() {
        let toml_str = r#"
[foods]
exclude = ["berries", "salmon"]
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        let table = config.food_table().unwrap();

        assert_eq!(table.len(), crate::get_default_food_table().len() - 2);
        assert!(table.get("berries").is_none());

        let missing = crate::meals::missing_food_references(&table);
        assert!(missing.contains(&(crate::Goal::LoseWeight, "berries")));
        assert!(missing.contains(&(crate::Goal::BuildMuscle, "salmon")));
    }

    #[test]
    fn test_default_paths_under_coach_dir() {
        assert!(Config::default_config_path().ends_with("coach/config.toml"));
        assert!(default_data_dir().ends_with("coach"));
    }

    #[test]
    fn test_invalid_custom_food_rejected() {
        let toml_str = r#"
[[foods.custom]]
id = "mystery"
name = "Mystery Bar"
category = "supplement"
portion = "1 bar"
calories = -20.0
protein = 1.0
carbs = 1.0
fat = 1.0
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        let err = config.food_table().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
