//! Configuration loading and management.
//!
//! Configuration is loaded from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Command-line arguments
//! 2. `.sql-converter.toml` in current directory
//! 3. `~/.config/sql-select-converter/config.toml`
//! 4. Default values
//!
//! # Configuration File Format
//!
//! ```toml
//! [warnings]
//! suppressed = ["structural-ambiguity", "regex-predicate-version"]
//! ```

use std::{env, fs, path::PathBuf};

use serde::Deserialize;

use crate::{
    convert::WarningCategory,
    error::{AppResult, config_error}
};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub warnings: WarningsConfig
}

/// Warning output configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct WarningsConfig {
    /// Warning categories excluded from output (kebab-case names)
    #[serde(default)]
    pub suppressed: Vec<String>
}

impl Config {
    /// Load configuration from file
    ///
    /// Priority (highest to lowest):
    /// 1. Config file in current directory (.sql-converter.toml)
    /// 2. Config file in home directory (~/.config/sql-select-converter/config.toml)
    /// 3. Default values
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(home) = env::var_os("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("sql-select-converter")
                .join("config.toml");

            if home_config.exists() {
                config = Self::from_file(&home_config)?;
            }
        }

        let local_config = PathBuf::from(".sql-converter.toml");
        if local_config.exists() {
            config = Self::from_file(&local_config)?;
        }

        Ok(config)
    }

    fn from_file(path: &PathBuf) -> AppResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| config_error(format!("Failed to read config file: {}", e)))?;
        toml::from_str(&content).map_err(|e| config_error(format!("Invalid config file: {}", e)))
    }

    /// Whether warnings of this category should be dropped from output.
    pub fn is_suppressed(&self, category: WarningCategory) -> bool {
        self.warnings
            .suppressed
            .iter()
            .any(|name| name.eq_ignore_ascii_case(category.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_suppresses_nothing() {
        let config = Config::default();
        assert!(!config.is_suppressed(WarningCategory::StructuralAmbiguity));
    }

    #[test]
    fn test_suppression_is_case_insensitive() {
        let config: Config = toml::from_str(
            r#"
            [warnings]
            suppressed = ["Structural-Ambiguity"]
            "#
        )
        .unwrap();
        assert!(config.is_suppressed(WarningCategory::StructuralAmbiguity));
        assert!(!config.is_suppressed(WarningCategory::RowLimitWithOrdering));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result: Result<Config, _> = toml::from_str("warnings = 3");
        assert!(result.is_err());
    }
}
