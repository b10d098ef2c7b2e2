//! vaultkit - Hierarchy inference and front-matter merging for course vaults
//!
//! vaultkit places educational content (videos, readings, slides) inside a
//! `program / course / class / module / lesson` vault by inferring each
//! file's position from its path, and merges schema-defined template fields
//! into each note's front-matter.
//!
//! # Architecture
//!
//! The codebase is layered, leaf-first:
//!
//! - [`core`] - Vault root, paths, metadata values, front-matter, config
//! - [`hierarchy`] - Path hierarchy resolution and content classification
//! - [`template`] - Template schema, inheritance and field resolvers
//! - [`merge`] - Non-destructive metadata merging
//! - [`engine`] - Per-file pipeline and parallel vault scan
//! - [`cli`] - Command-line interface layer
//! - [`ui`] - Output formatting
//!
//! # Correctness Invariants
//!
//! 1. Hierarchy inference never fails; paths outside the vault yield a
//!    sentinel (`-1`) or an empty result
//! 2. Merging never overwrites an existing non-empty value
//! 3. Merging is idempotent
//! 4. The template schema is immutable once loaded
//! 5. Notes are never written

pub mod cli;
pub mod core;
pub mod engine;
pub mod hierarchy;
pub mod merge;
pub mod template;
pub mod ui;
