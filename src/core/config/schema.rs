//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$VAULTKIT_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/vaultkit/config.toml`
//! 3. `~/.vaultkit/config.toml`
//!
//! # Vault Config
//!
//! Located at `<vault>/.vaultkit/config.toml` (canonical).
//!
//! # Validation
//!
//! Config values are validated after parsing so that an empty vault root or
//! a blank tag is reported at load time rather than deep in a batch run.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// vault_root = "/home/me/Courses"
/// schema = "/home/me/.vaultkit/schema.yaml"
/// log_filter = "vaultkit=info"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Default vault root
    pub vault_root: Option<PathBuf>,

    /// Default template schema file
    pub schema: Option<PathBuf>,

    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub log_filter: Option<String>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(root) = &self.vault_root {
            if root.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "vault_root cannot be empty".to_string(),
                ));
            }
        }

        if let Some(schema) = &self.schema {
            if schema.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "schema cannot be empty".to_string(),
                ));
            }
        }

        if let Some(filter) = &self.log_filter {
            if filter.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "log_filter cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Vault configuration.
///
/// Relative `schema` paths are resolved against the vault root.
///
/// # Example
///
/// ```toml
/// schema = ".vaultkit/schema.yaml"
/// extra_reserved_tags = ["mba"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct VaultConfig {
    /// Template schema file for this vault
    pub schema: Option<PathBuf>,

    /// Tags injected into every note in addition to the schema's reserved tags
    pub extra_reserved_tags: Option<Vec<String>>,
}

impl VaultConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(schema) = &self.schema {
            if schema.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "schema cannot be empty".to_string(),
                ));
            }
        }

        if let Some(tags) = &self.extra_reserved_tags {
            if tags.iter().any(|t| t.trim().is_empty()) {
                return Err(ConfigError::InvalidValue(
                    "extra_reserved_tags cannot contain blank tags".to_string(),
                ));
            }
        }

        Ok(())
    }
}
