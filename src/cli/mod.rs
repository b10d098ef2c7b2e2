//! cli
//!
//! Command-line interface layer for vaultkit.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and install logging
//! - Delegate to command handlers
//! - Does NOT write notes
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap, builds a
//! [`Context`], and dispatches to handlers that call into
//! [`crate::engine`] and [`crate::hierarchy`].

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use anyhow::{Context as _, Result};
use tracing_subscriber::EnvFilter;

use crate::core::config::{Config, Overrides, DEFAULT_LOG_FILTER};
use crate::engine::Pipeline;
use crate::ui::output::{self, Verbosity};

/// Filter used when `--debug` is passed.
pub const DEBUG_LOG_FILTER: &str = "vaultkit=debug";

/// Settings shared by every command handler.
#[derive(Debug)]
pub struct Context {
    /// Loaded configuration.
    pub config: Config,
    /// Output verbosity.
    pub verbosity: Verbosity,
    /// Whether to print JSON.
    pub json: bool,
}

impl Context {
    /// Build the pipeline for the configured vault.
    pub fn pipeline(&self) -> Result<Pipeline> {
        Pipeline::from_config(&self.config).context("failed to set up the vault pipeline")
    }
}

/// Install the `tracing` subscriber, writing to stderr.
///
/// `RUST_LOG` wins over `filter`; `--debug` wins over both.
pub fn init_logging(filter: &str, debug: bool) {
    let env_filter = if debug {
        EnvFilter::new(DEBUG_LOG_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter))
    };

    // A subscriber may already be installed (tests); keep the existing one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let overrides = Overrides {
        vault_root: cli.vault.clone(),
        schema: cli.schema.clone(),
    };
    let loaded = Config::load(&overrides);

    let filter = match &loaded {
        Ok(result) => result.config.log_filter().to_string(),
        Err(_) => DEFAULT_LOG_FILTER.to_string(),
    };
    init_logging(&filter, cli.debug);

    let loaded = loaded.context("failed to load configuration")?;
    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);
    for warning in &loaded.warnings {
        output::warn(
            format!("{} ({})", warning.message, warning.path.display()),
            verbosity,
        );
    }

    let ctx = Context {
        config: loaded.config,
        verbosity,
        json: cli.json,
    };

    commands::dispatch(cli.command, &ctx)
}
