//! # sideload-config
//!
//! Layered configuration loading for sideload using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SIDELOAD_*` prefix, `__` as separator)
//! 2. An explicit file passed with `--config`
//! 3. Project-level `./sideload.toml`
//! 4. User-level `~/.config/sideload/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `SIDELOAD_SERVER__URL` -> `server.url`,
//! `SIDELOAD_FOREIGN_KEYS__SUFFIX` -> `foreign_keys.suffix`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use sideload_config::SideloadConfig;
//!
//! let config = SideloadConfig::load_with_dotenv(None).expect("config");
//! if config.server.is_configured() {
//!     println!("uploading to {}", config.server.url);
//! }
//! ```

mod canonical;
mod error;
mod foreign_keys;
mod replicate;
mod server;
mod table;

pub use canonical::CanonicalConfig;
pub use error::ConfigError;
pub use foreign_keys::ForeignKeysConfig;
pub use replicate::{ReplicateAnchor, ReplicateConfig};
pub use server::ServerConfig;
pub use table::TableConfig;

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SideloadConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub foreign_keys: ForeignKeysConfig,
    #[serde(default)]
    pub canonical: CanonicalConfig,
    #[serde(default)]
    pub replicate: ReplicateConfig,
}

impl SideloadConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source cannot be parsed or the merged
    /// values fail validation.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(explicit).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_dotenv(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load(explicit)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer extra providers.
    #[must_use]
    pub fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from("sideload.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed("SIDELOAD_").split("__"))
    }

    /// Require the `[server]` section to be usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] when URL or email is missing.
    pub fn require_server(&self) -> Result<&ServerConfig, ConfigError> {
        if self.server.is_configured() {
            Ok(&self.server)
        } else {
            Err(ConfigError::NotConfigured {
                section: String::from("server"),
            })
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.table.path_column.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: String::from("table.path_column"),
                reason: String::from("must not be empty"),
            });
        }

        if self.foreign_keys.suffix.contains('.') {
            return Err(ConfigError::InvalidValue {
                field: String::from("foreign_keys.suffix"),
                reason: String::from("must not contain '.'"),
            });
        }

        if let Some((numerator, _)) = self
            .canonical
            .dta_by_ratio_numerator
            .iter()
            .find(|(_, dta)| dta.is_empty() || dta.contains(['/', '\\']))
        {
            return Err(ConfigError::InvalidValue {
                field: format!("canonical.dta_by_ratio_numerator.{numerator}"),
                reason: String::from("must be a non-empty folder name"),
            });
        }

        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("sideload").join("config.toml"))
    }
}
