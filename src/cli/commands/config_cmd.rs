//! config command - Show effective configuration values

use std::path::Path;

use anyhow::{bail, Result};

use crate::cli::Context;
use crate::core::config::Config;
use crate::ui::output;

/// Keys understood by `config get`.
pub const CONFIG_KEYS: &[&str] = &[
    "vault_root",
    "schema",
    "log_filter",
    "extra_reserved_tags",
    "global_config",
    "vault_config",
];

fn display_path(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string()).unwrap_or_default()
}

/// Effective value for a key, empty when unset.
fn value_of(config: &Config, key: &str) -> Result<String> {
    let value = match key {
        "vault_root" => config
            .vault_root()
            .map(|r| r.to_string())
            .unwrap_or_default(),
        "schema" => display_path(config.schema_path().as_deref()),
        "log_filter" => config.log_filter().to_string(),
        "extra_reserved_tags" => config.extra_reserved_tags().join(", "),
        "global_config" => display_path(config.global_config_loaded_from()),
        "vault_config" => display_path(config.vault_config_loaded_from()),
        _ => bail!(
            "Unknown configuration key: {} (known keys: {})",
            key,
            CONFIG_KEYS.join(", ")
        ),
    };
    Ok(value)
}

/// Get a configuration value.
pub fn get(ctx: &Context, key: &str) -> Result<()> {
    let value = value_of(&ctx.config, key)?;

    if ctx.json {
        let mut entry = serde_json::Map::new();
        entry.insert(key.to_string(), value.into());
        return output::print_json(&entry);
    }

    if !value.is_empty() {
        println!("{}", value);
    }
    Ok(())
}

/// List all configuration values.
pub fn list(ctx: &Context) -> Result<()> {
    let mut entries = serde_json::Map::new();
    for key in CONFIG_KEYS {
        entries.insert(key.to_string(), value_of(&ctx.config, key)?.into());
    }

    if ctx.json {
        return output::print_json(&entries);
    }

    for (key, value) in &entries {
        let value = value.as_str().unwrap_or_default();
        if value.is_empty() {
            println!("{} = (not set)", key);
        } else {
            println!("{} = {}", key, value);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Overrides;
    use std::path::PathBuf;

    #[test]
    fn values_from_overrides() {
        let overrides = Overrides {
            vault_root: Some(PathBuf::from("/vault")),
            schema: Some(PathBuf::from("/schemas/course.yaml")),
        };
        let config = Config::load_with_global_file(Path::new("/no/such/config.toml"), &overrides)
            .unwrap()
            .config;
        assert_eq!(value_of(&config, "vault_root").unwrap(), "/vault");
        assert_eq!(value_of(&config, "schema").unwrap(), "/schemas/course.yaml");
        assert_eq!(value_of(&config, "log_filter").unwrap(), "vaultkit=warn");
        assert_eq!(value_of(&config, "vault_config").unwrap(), "");
    }

    #[test]
    fn unknown_key() {
        assert!(value_of(&Config::default(), "trunk").is_err());
    }
}
