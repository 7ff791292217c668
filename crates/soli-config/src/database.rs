//! Database configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_path() -> String {
    "./soliloan.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to the local libSQL database file. `:memory:` is accepted for
    /// throwaway instances. Migrations run on every open; they are
    /// idempotent.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

impl DatabaseConfig {
    /// The database path, or an error when it was explicitly blanked out.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` when the path is empty.
    pub fn require_path(&self) -> Result<&str, ConfigError> {
        if self.path.is_empty() {
            return Err(ConfigError::NotConfigured {
                section: "database".to_string(),
            });
        }
        Ok(&self.path)
    }

    /// Whether the configured path is the in-memory sentinel.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = DatabaseConfig::default();
        assert_eq!(config.path, "./soliloan.db");
        assert!(!config.is_in_memory());
        assert!(config.require_path().is_ok());
    }

    #[test]
    fn empty_path_is_not_configured() {
        let config = DatabaseConfig {
            path: String::new(),
        };
        assert!(matches!(
            config.require_path(),
            Err(ConfigError::NotConfigured { .. })
        ));
    }

    #[test]
    fn memory_sentinel_is_detected() {
        let config = DatabaseConfig {
            path: ":memory:".to_string(),
        };
        assert!(config.is_in_memory());
    }
}
