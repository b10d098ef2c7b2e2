//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Builds what it needs from the [`Context`] (resolver or pipeline)
//! 2. Calls into the library
//! 3. Formats and displays output (text or `--json`)
//!
//! Handlers never write notes.

mod completion;
mod config_cmd;
mod hierarchy;
mod merge;
mod scan;
mod templates;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use config_cmd::{get as config_get, list as config_list};
pub use hierarchy::{classify, hierarchy, level};
pub use merge::{merge, validate};
pub use scan::scan;
pub use templates::templates;

use crate::cli::args::{Command, ConfigAction};
use crate::cli::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Hierarchy { path } => hierarchy(ctx, &path),
        Command::Level {
            path,
            base,
            base_level,
        } => level(ctx, &path, base.as_deref(), base_level),
        Command::Classify { path } => classify(ctx, &path),
        Command::Merge {
            path,
            template_type,
            from,
        } => merge(ctx, &path, template_type.as_deref(), from.as_deref()),
        Command::Validate {
            path,
            template_type,
        } => validate(ctx, &path, template_type.as_deref()),
        Command::Scan { dir } => scan(ctx, dir.as_deref()),
        Command::Templates => templates(ctx),
        Command::Config { action } => match action {
            ConfigAction::Get { key } => config_get(ctx, &key),
            ConfigAction::List => config_list(ctx),
        },
        Command::Completion { shell } => completion(shell),
    }
}
