//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! vaultkit has two configuration scopes:
//! - **Global**: User-level settings (default vault, schema, log filter)
//! - **Vault**: Per-vault overrides stored inside the vault
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Vault config file
//! 4. CLI flags (passed in as overrides)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$VAULTKIT_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/vaultkit/config.toml`
//! 3. `~/.vaultkit/config.toml`
//!
//! # Vault Config Locations
//!
//! Searched in order:
//! 1. `<vault>/.vaultkit/config.toml` (canonical)
//! 2. `<vault>/.vaultkit.toml` (compatibility, warns)
//!
//! # Example
//!
//! ```no_run
//! use vaultkit::core::config::{Config, Overrides};
//!
//! let result = Config::load(&Overrides::default()).unwrap();
//! let config = result.config;
//!
//! let root = config.vault_root().unwrap();
//! println!("Vault: {}", root);
//! println!("Schema: {:?}", config.schema_path());
//! ```

pub mod schema;

pub use schema::{GlobalConfig, VaultConfig};

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::core::paths::VaultPaths;
use crate::core::types::VaultRoot;

/// Environment variable naming an explicit global config file.
pub const CONFIG_ENV: &str = "VAULTKIT_CONFIG";

/// Default `tracing` filter when neither `RUST_LOG` nor config sets one.
pub const DEFAULT_LOG_FILTER: &str = "vaultkit=warn";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("no vault root configured; pass --vault or set vault_root in the global config")]
    MissingVaultRoot,
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Values supplied on the command line. They win over every file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--vault`
    pub vault_root: Option<PathBuf>,
    /// `--schema`
    pub schema: Option<PathBuf>,
}

/// Merged configuration from all sources.
///
/// Accessor methods apply precedence automatically.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Vault configuration (if a vault root is known and has one)
    pub vault: Option<VaultConfig>,
    /// CLI overrides
    pub overrides: Overrides,
    /// Path to the global config file (if loaded)
    global_path: Option<PathBuf>,
    /// Path to the vault config file (if loaded)
    vault_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed or
    /// contain invalid values. Missing config files are not an error.
    pub fn load(overrides: &Overrides) -> Result<ConfigLoadResult, ConfigError> {
        let (global, global_path) = Self::load_global()?;
        Self::assemble(global, global_path, overrides)
    }

    /// Load configuration using an explicit global config file.
    ///
    /// A missing file means defaults.
    pub fn load_with_global_file(
        global_file: &Path,
        overrides: &Overrides,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let (global, global_path) = if global_file.exists() {
            (
                Self::read_config::<GlobalConfig>(global_file)?,
                Some(global_file.to_path_buf()),
            )
        } else {
            (GlobalConfig::default(), None)
        };
        Self::assemble(global, global_path, overrides)
    }

    fn assemble(
        global: GlobalConfig,
        global_path: Option<PathBuf>,
        overrides: &Overrides,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();
        global.validate()?;

        let root = overrides
            .vault_root
            .clone()
            .or_else(|| global.vault_root.clone());

        let (vault, vault_path) = match &root {
            Some(root) => Self::load_vault(root, &mut warnings)?,
            None => (None, None),
        };

        if let Some(ref v) = vault {
            v.validate()?;
        }

        if let Some(root) = &root {
            if !root.as_os_str().is_empty() && !root.is_dir() {
                warnings.push(ConfigWarning {
                    message: "vault root does not exist; hierarchy is inferred from paths only"
                        .to_string(),
                    path: root.clone(),
                });
            }
        }

        Ok(ConfigLoadResult {
            config: Config {
                global,
                vault,
                overrides: overrides.clone(),
                global_path,
                vault_path,
            },
            warnings,
        })
    }

    /// Load global configuration from standard locations.
    fn load_global() -> Result<(GlobalConfig, Option<PathBuf>), ConfigError> {
        // 1. Check $VAULTKIT_CONFIG
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                let config = Self::read_config(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // 2. Check $XDG_CONFIG_HOME/vaultkit/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("vaultkit/config.toml");
            if path.exists() {
                let config = Self::read_config(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // 3. Check ~/.vaultkit/config.toml
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".vaultkit/config.toml");
            if path.exists() {
                let config = Self::read_config(&path)?;
                return Ok((config, Some(path)));
            }
        }

        Ok((GlobalConfig::default(), None))
    }

    /// Load vault configuration from standard locations.
    fn load_vault(
        root: &Path,
        warnings: &mut Vec<ConfigWarning>,
    ) -> Result<(Option<VaultConfig>, Option<PathBuf>), ConfigError> {
        let canonical = VaultPaths::new(root.to_path_buf()).config_path();
        if canonical.exists() {
            let config = Self::read_config(&canonical)?;
            return Ok((Some(config), Some(canonical)));
        }

        let compat = root.join(".vaultkit.toml");
        if compat.exists() {
            warnings.push(ConfigWarning {
                message: format!(
                    "Using deprecated config location. Please move to '{}'",
                    canonical.display()
                ),
                path: compat.clone(),
            });
            let config = Self::read_config(&compat)?;
            return Ok((Some(config), Some(compat)));
        }

        Ok((None, None))
    }

    /// Read and parse a TOML config file.
    fn read_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Get the vault root.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingVaultRoot` if neither the CLI nor the
    /// global config names one, or the configured value is empty.
    pub fn vault_root(&self) -> Result<VaultRoot, ConfigError> {
        let raw = self
            .overrides
            .vault_root
            .as_ref()
            .or(self.global.vault_root.as_ref())
            .ok_or(ConfigError::MissingVaultRoot)?;
        VaultRoot::new(raw.clone()).map_err(|_| ConfigError::MissingVaultRoot)
    }

    /// Get the template schema file.
    ///
    /// CLI flag, then vault config (relative to the vault root), then
    /// global config, then `<vault>/.vaultkit/schema.yaml` if it exists.
    pub fn schema_path(&self) -> Option<PathBuf> {
        if let Some(schema) = &self.overrides.schema {
            return Some(schema.clone());
        }

        let root = self.vault_root().ok();

        if let Some(schema) = self.vault.as_ref().and_then(|v| v.schema.as_ref()) {
            return Some(match &root {
                Some(root) if schema.is_relative() => root.as_path().join(schema),
                _ => schema.clone(),
            });
        }

        if let Some(schema) = &self.global.schema {
            return Some(schema.clone());
        }

        root.map(|r| VaultPaths::new(r.as_path().to_path_buf()).default_schema_path())
            .filter(|p| p.exists())
    }

    /// Get the log filter directive.
    ///
    /// Defaults to `vaultkit=warn`.
    pub fn log_filter(&self) -> &str {
        self.global
            .log_filter
            .as_deref()
            .unwrap_or(DEFAULT_LOG_FILTER)
    }

    /// Tags the vault adds to the schema's reserved tags.
    pub fn extra_reserved_tags(&self) -> &[String] {
        self.vault
            .as_ref()
            .and_then(|v| v.extra_reserved_tags.as_deref())
            .unwrap_or(&[])
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded vault config file.
    pub fn vault_config_loaded_from(&self) -> Option<&Path> {
        self.vault_path.as_deref()
    }
}
