//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`VaultRoot`] - Validated, normalized vault root directory
//! - [`TemplateKind`] - Hierarchy level names (main, program, ... lesson)
//! - [`HierarchyField`] - The four front-matter fields derived from a path
//!
//! # Validation
//!
//! These types enforce validity at construction time. A vault root can
//! never be empty, so every hierarchy calculation has a fixed anchor.
//!
//! # Examples
//!
//! ```
//! use vaultkit::core::types::{TemplateKind, VaultRoot};
//!
//! let root = VaultRoot::new("/vault").unwrap();
//! assert_eq!(root.name(), "vault");
//!
//! assert_eq!(TemplateKind::from_level(2), TemplateKind::Course);
//! assert!(VaultRoot::new("").is_err());
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::paths;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid vault root: {0}")]
    InvalidVaultRoot(String),
}

/// The directory treated as hierarchy depth 0.
///
/// The stored path is absolute and lexically normalized (no `.` or `..`
/// components, forward and back slashes unified). The directory does not
/// have to exist; all hierarchy calculations fall back to string analysis.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VaultRoot(PathBuf);

impl VaultRoot {
    /// Create a new vault root.
    ///
    /// Relative paths are resolved against the current directory.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidVaultRoot` if the path is empty.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, TypeError> {
        let path = path.into();
        let raw = path.to_string_lossy();
        if raw.trim().is_empty() {
            return Err(TypeError::InvalidVaultRoot(
                "vault root cannot be empty".into(),
            ));
        }

        let unified = PathBuf::from(paths::normalize_separators(&raw));
        let absolute = if paths::looks_absolute(&unified.to_string_lossy()) {
            unified
        } else {
            match std::env::current_dir() {
                Ok(cwd) => cwd.join(unified),
                Err(_) => unified,
            }
        };

        Ok(Self(paths::lexical_normalize(&absolute)))
    }

    /// Get the root as a path.
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// The root folder's own name, used as the program fallback.
    pub fn name(&self) -> String {
        self.0
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Whether the root exists on disk.
    pub fn exists(&self) -> bool {
        self.0.is_dir()
    }
}

impl AsRef<Path> for VaultRoot {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for VaultRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Template kind derived from a hierarchy level.
///
/// | Level | Kind |
/// |-------|------|
/// | 0 | `main` |
/// | 1 | `program` |
/// | 2 | `course` |
/// | 3 | `class` |
/// | 4 | `module` |
/// | 5 | `lesson` |
/// | other | `unknown` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Main,
    Program,
    Course,
    Class,
    Module,
    Lesson,
    Unknown,
}

impl TemplateKind {
    /// Map a hierarchy level to its template kind.
    pub fn from_level(level: i32) -> Self {
        match level {
            0 => TemplateKind::Main,
            1 => TemplateKind::Program,
            2 => TemplateKind::Course,
            3 => TemplateKind::Class,
            4 => TemplateKind::Module,
            5 => TemplateKind::Lesson,
            _ => TemplateKind::Unknown,
        }
    }

    /// The canonical template type name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::Main => "main",
            TemplateKind::Program => "program",
            TemplateKind::Course => "course",
            TemplateKind::Class => "class",
            TemplateKind::Module => "module",
            TemplateKind::Lesson => "lesson",
            TemplateKind::Unknown => "unknown",
        }
    }

    /// Substring used to find a registered template for this kind.
    ///
    /// `Unknown` has no substring; callers fall back to the first
    /// registered template.
    pub fn search_key(&self) -> Option<&'static str> {
        match self {
            TemplateKind::Unknown => None,
            other => Some(other.as_str()),
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The front-matter fields derived from a path, in chain order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HierarchyField {
    Program,
    Course,
    Class,
    Module,
}

impl HierarchyField {
    /// All fields, shallowest first.
    pub const ALL: [HierarchyField; 4] = [
        HierarchyField::Program,
        HierarchyField::Course,
        HierarchyField::Class,
        HierarchyField::Module,
    ];

    /// The front-matter key for this field.
    pub fn key(&self) -> &'static str {
        match self {
            HierarchyField::Program => "program",
            HierarchyField::Course => "course",
            HierarchyField::Class => "class",
            HierarchyField::Module => "module",
        }
    }

    /// One-based level of this field (program = 1).
    pub fn level(&self) -> i32 {
        match self {
            HierarchyField::Program => 1,
            HierarchyField::Course => 2,
            HierarchyField::Class => 3,
            HierarchyField::Module => 4,
        }
    }
}

impl fmt::Display for HierarchyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod vault_root {
        use super::*;

        #[test]
        fn empty_rejected() {
            assert!(VaultRoot::new("").is_err());
            assert!(VaultRoot::new("   ").is_err());
        }

        #[test]
        fn absolute_kept() {
            let root = VaultRoot::new("/vault").unwrap();
            assert_eq!(root.as_path(), Path::new("/vault"));
        }

        #[test]
        fn normalizes_dots_and_trailing_slash() {
            let root = VaultRoot::new("/data/./vault/sub/../").unwrap();
            assert_eq!(root.as_path(), Path::new("/data/vault"));
        }

        #[test]
        fn relative_resolved_against_cwd() {
            let root = VaultRoot::new("my-vault").unwrap();
            assert!(root.as_path().is_absolute());
            assert_eq!(root.name(), "my-vault");
        }

        #[test]
        fn name_is_basename() {
            let root = VaultRoot::new("/home/me/Courses").unwrap();
            assert_eq!(root.name(), "Courses");
        }
    }

    mod template_kind {
        use super::*;

        #[test]
        fn level_table() {
            let names: Vec<&str> = (0..=6)
                .map(|l| TemplateKind::from_level(l).as_str())
                .collect();
            assert_eq!(
                names,
                vec!["main", "program", "course", "class", "module", "lesson", "unknown"]
            );
        }

        #[test]
        fn negative_is_unknown() {
            assert_eq!(TemplateKind::from_level(-1), TemplateKind::Unknown);
        }

        #[test]
        fn unknown_has_no_search_key() {
            assert_eq!(TemplateKind::Unknown.search_key(), None);
            assert_eq!(TemplateKind::Class.search_key(), Some("class"));
        }
    }

    #[test]
    fn hierarchy_fields_in_chain_order() {
        let levels: Vec<i32> = HierarchyField::ALL.iter().map(|f| f.level()).collect();
        assert_eq!(levels, vec![1, 2, 3, 4]);
        assert_eq!(HierarchyField::Class.key(), "class");
    }
}
