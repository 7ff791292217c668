//! # soli-config
//!
//! Layered configuration loading for Soliloan using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SOLILOAN_*` prefix, `__` as separator)
//! 2. Project-level `.soliloan/config.toml`
//! 3. User-level `~/.config/soliloan/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `SOLILOAN_DATABASE__PATH` -> `database.path`,
//! `SOLILOAN_SERVER__PORT` -> `server.port`, etc. The `__` (double
//! underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use soli_config::SoliConfig;
//!
//! // Load from all sources (dotenvy + TOML + env):
//! let config = SoliConfig::load_with_dotenv().expect("config");
//!
//! // Or without dotenvy (env vars must already be set):
//! let config = SoliConfig::load().expect("config");
//!
//! println!("binding {}", config.server.bind_addr());
//! ```

mod database;
mod error;
mod files;
mod general;
mod server;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use files::FilesConfig;
pub use general::GeneralConfig;
pub use server::ServerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SoliConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl SoliConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`SoliConfig::load_with_dotenv`] if you
    /// need `.env` file loading.
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables (`SOLILOAN_*` prefix)
    /// 2. `.soliloan/config.toml` (project-local)
    /// 3. `~/.config/soliloan/config.toml` (user-global)
    /// 4. Default values
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` when a source fails to parse or merge.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Calls `dotenvy` to load the `.env` file from the workspace root before
    /// building the figment. This is the typical entry point for the server
    /// binary and tests.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` when a source fails to parse or merge.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Load configuration with an explicit TOML file layered on top of the
    /// regular sources. The file outranks every other source, including
    /// environment variables; the server binary uses this for its
    /// `--config` flag.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` when a source fails to parse or merge.
    pub fn load_with_file(path: &Path) -> Result<Self, ConfigError> {
        Self::figment()
            .merge(Toml::file(path))
            .extract()
            .map_err(ConfigError::from)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".soliloan/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment = figment.merge(Env::prefixed("SOLILOAN_").split("__"));

        figment
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("soliloan").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or current dir looking
    /// for a `.env` file. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // Walk up at most 3 levels (crate -> crates/ -> workspace root)
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        // Fallback: try current directory
        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_loads() {
        let config = SoliConfig::default();
        assert_eq!(config.database.path, "./soliloan.db");
        assert_eq!(config.server.port, 8322);
        assert_eq!(config.files.thumbnail_command, "convert");
        assert_eq!(config.general.default_limit, 50);
    }

    #[test]
    fn env_overrides_toml_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_dir(".soliloan")?;
            jail.create_file(
                ".soliloan/config.toml",
                r#"
                    [server]
                    port = 9000

                    [database]
                    path = "from-toml.db"
                "#,
            )?;
            jail.set_env("SOLILOAN_SERVER__PORT", "9001");

            let config: SoliConfig = SoliConfig::figment().extract()?;
            // env beats TOML
            assert_eq!(config.server.port, 9001);
            // TOML beats defaults
            assert_eq!(config.database.path, "from-toml.db");
            // untouched sections keep defaults
            assert_eq!(config.files.storage_dir, "./uploads");
            Ok(())
        });
    }

    #[test]
    fn nested_env_separator_maps_sections() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SOLILOAN_FILES__THUMBNAIL_MAX_DIM", "512");
            let config: SoliConfig = SoliConfig::figment().extract()?;
            assert_eq!(config.files.thumbnail_max_dim, 512);
            Ok(())
        });
    }

    #[test]
    fn explicit_file_outranks_env() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SOLILOAN_SERVER__PORT", "9001");
            jail.create_file(
                "override.toml",
                r#"
                    [server]
                    port = 9002
                "#,
            )?;

            let config = SoliConfig::load_with_file(Path::new("override.toml"))
                .map_err(|e| figment::Error::from(e.to_string()))?;
            assert_eq!(config.server.port, 9002);
            Ok(())
        });
    }
}
