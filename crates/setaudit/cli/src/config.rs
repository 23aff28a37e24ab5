//! Configuration for the setaudit CLI

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetauditConfig {
    /// Ledger configuration
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Ledger file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Ledger CSV path
    #[serde(default = "default_ledger_path")]
    pub path: PathBuf,

    /// Refuse to continue when an existing ledger cannot be read
    #[serde(default)]
    pub strict_load: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: default_ledger_path(),
            strict_load: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from("setaudit-ledger.csv")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl SetauditConfig {
    /// Load configuration from defaults, an optional file and the environment.
    ///
    /// Environment keys use the `SETAUDIT_` prefix and `__` between sections,
    /// e.g. `SETAUDIT_LEDGER__STRICT_LOAD=true`.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&SetauditConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("SETAUDIT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = SetauditConfig::default();
        assert_eq!(config.ledger.path, PathBuf::from("setaudit-ledger.csv"));
        assert!(!config.ledger.strict_load);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("setaudit.toml");
        fs::write(
            &path,
            "[ledger]\npath = \"audit/sets.csv\"\nstrict_load = true\n",
        )
        .unwrap();

        let config = SetauditConfig::load(path.to_str()).unwrap();
        assert_eq!(config.ledger.path, PathBuf::from("audit/sets.csv"));
        assert!(config.ledger.strict_load);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");
        let config = SetauditConfig::load(path.to_str()).unwrap();
        assert_eq!(config.ledger.path, PathBuf::from("setaudit-ledger.csv"));
    }
}
