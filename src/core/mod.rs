//! core
//!
//! Core domain types and infrastructure for vaultkit.
//!
//! # Modules
//!
//! - [`types`] - Strong types: VaultRoot, TemplateKind, HierarchyField
//! - [`paths`] - Path normalization, anchoring and vault-relative segments
//! - [`metadata`] - Front-matter values, maps and the YAML codec
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are strict: unknown keys are rejected
//! - Path analysis is lexical; the filesystem is only probed, never required

pub mod config;
pub mod metadata;
pub mod paths;
pub mod types;
