//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! All command output goes through this module so that `--quiet` and
//! `--json` behave the same everywhere.

pub mod output;
