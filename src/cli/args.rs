//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--vault <dir>`: Vault root (also `VAULTKIT_VAULT`)
//! - `--schema <file>`: Template schema file
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//! - `--json`: Machine-readable output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// vaultkit - Hierarchy inference and front-matter merging for course vaults
#[derive(Parser, Debug)]
#[command(name = "vaultkit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Vault root directory
    #[arg(long, global = true, env = "VAULTKIT_VAULT", value_name = "DIR")]
    pub vault: Option<PathBuf>,

    /// Template schema file (YAML)
    #[arg(long, global = true, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the hierarchy inferred for a path
    #[command(
        name = "hierarchy",
        long_about = "Show the program, course, class and module inferred for a path.\n\n\
            The path does not have to exist. Paths outside the vault produce an \
            empty hierarchy. For content files (videos, readings, ...) the module \
            is reduced to its numeric prefix when it has one.",
        after_help = "\
EXAMPLES:
    # A class folder
    vaultkit --vault ~/Vault hierarchy ~/Vault/MBA/Finance/Accounting

    # A content file; module '05_ledgers' is reported as '05'
    vaultkit hierarchy ~/Vault/MBA/Finance/Accounting/05_ledgers/video.mp4"
    )]
    Hierarchy {
        /// Path to analyze
        path: PathBuf,
    },

    /// Show the hierarchy level and template type for a folder
    #[command(
        name = "level",
        long_about = "Show the hierarchy level of a folder and its template type.\n\n\
            Level 0 is the vault itself, 1 a program, 2 a course, 3 a class, \
            4 a module and 5 a lesson. Paths outside the vault report -1.\n\n\
            A path starting with '/' that is not under the vault or a system \
            directory is treated as relative to the vault.",
        after_help = "\
EXAMPLES:
    # Absolute path
    vaultkit level ~/Vault/MBA/Finance          # 2 (course)

    # Vault-relative path
    vaultkit level /MBA/Finance/Accounting      # 3 (class)

    # Processing from a sub-folder known to be at level 1
    vaultkit level ~/Vault/MBA/Finance --base ~/Vault/MBA --base-level 1"
    )]
    Level {
        /// Folder path (absolute, vault-relative, or relative)
        path: String,

        /// Compute the level relative to this base folder
        #[arg(long, value_name = "DIR")]
        base: Option<PathBuf>,

        /// Level of the base folder
        #[arg(long, default_value_t = 0, requires = "base", allow_negative_numbers = true)]
        base_level: i32,
    },

    /// Classify a path as content or structural
    #[command(
        name = "classify",
        long_about = "Classify a path as content (videos, readings, slides, ...) or \
            structural (indexes, templates, overviews).\n\n\
            Reports the rule that decided and the numeric module prefix of the \
            file's folder.",
        after_help = "\
EXAMPLES:
    vaultkit classify MBA/Finance/Week1/lecture.md     # content
    vaultkit classify MBA/Finance/index.md             # structural"
    )]
    Classify {
        /// Path to classify
        path: PathBuf,
    },

    /// Print a note's front-matter merged with its hierarchy
    #[command(
        name = "merge",
        long_about = "Merge the inferred hierarchy, reserved tags and universal fields \
            into a note's front-matter and print the result.\n\n\
            The note is never modified. Existing non-empty values are kept; \
            levels deeper than the template allows are dropped.",
        after_help = "\
EXAMPLES:
    # Merge an existing note
    vaultkit merge ~/Vault/MBA/Finance/overview.md

    # Force a template type
    vaultkit merge ~/Vault/MBA/Finance/overview.md --template-type course-index

    # Plan front-matter for a new note, starting from another note's
    vaultkit merge ~/Vault/MBA/Finance/new.md --from ~/Vault/MBA/Finance/overview.md"
    )]
    Merge {
        /// Note path (may not exist yet)
        path: PathBuf,

        /// Template type to apply (default: recorded or inferred from the folder)
        #[arg(long, value_name = "TYPE")]
        template_type: Option<String>,

        /// Read the starting front-matter from this file instead
        #[arg(long, value_name = "FILE")]
        from: Option<PathBuf>,
    },

    /// Check a note's required fields after merging
    #[command(
        name = "validate",
        long_about = "Merge a note's front-matter and list required fields that are \
            still missing or blank.\n\n\
            Exits non-zero if any required field is missing.",
        after_help = "\
EXAMPLES:
    vaultkit validate ~/Vault/MBA/Finance/overview.md
    vaultkit validate note.md --template-type course-index"
    )]
    Validate {
        /// Note path
        path: PathBuf,

        /// Template type to validate against
        #[arg(long, value_name = "TYPE")]
        template_type: Option<String>,
    },

    /// Report hierarchy and classification for every file in a folder
    #[command(
        name = "scan",
        long_about = "Walk a folder (default: the vault root) and report, for every \
            file, its level, hierarchy, classification, template type and \
            missing required fields.\n\n\
            Hidden entries such as .obsidian are skipped. Files are processed \
            in parallel; nothing is written.",
        after_help = "\
EXAMPLES:
    vaultkit scan
    vaultkit scan ~/Vault/MBA/Finance --json"
    )]
    Scan {
        /// Folder to scan (default: vault root)
        dir: Option<PathBuf>,
    },

    /// List template types, universal fields and reserved tags
    #[command(name = "templates")]
    Templates,

    /// Show configuration values
    #[command(
        name = "config",
        long_about = "Show the effective configuration.\n\n\
            Global configuration is read from $VAULTKIT_CONFIG, \
            $XDG_CONFIG_HOME/vaultkit/config.toml or ~/.vaultkit/config.toml. \
            Vault configuration is read from <vault>/.vaultkit/config.toml."
    )]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    # Bash
    vaultkit completion bash > ~/.local/share/bash-completion/completions/vaultkit

    # Zsh
    vaultkit completion zsh > ~/.zfunc/_vaultkit

    # Fish
    vaultkit completion fish > ~/.config/fish/completions/vaultkit.fish

    # PowerShell
    vaultkit completion power-shell >> $PROFILE"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
    /// List all configuration values
    List,
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
