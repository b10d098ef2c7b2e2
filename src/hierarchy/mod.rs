//! hierarchy
//!
//! Hierarchy inference from vault paths.
//!
//! # Modules
//!
//! - [`classifier`] - Content vs structural classification, module prefixes
//!
//! # Hierarchy Model
//!
//! A vault is organized as `program / course / class / module / lesson`.
//! A file's position is inferred purely from its path below the vault root:
//!
//! ```text
//! <vault>/MBA/Finance/Accounting/05_ledgers/video.mp4
//!         |   |       |          |
//!         |   |       |          module (reduced to "05" for content)
//!         |   |       class
//!         |   course
//!         program
//! ```
//!
//! Paths do not have to exist. Missing paths are analyzed as strings, and
//! paths outside the vault yield an empty [`HierarchyInfo`] (or `-1` from
//! [`calculate_hierarchy_level`]) rather than an error.
//!
//! # Example
//!
//! ```
//! use vaultkit::core::types::VaultRoot;
//! use vaultkit::hierarchy::{calculate_hierarchy_level, PathHierarchyResolver};
//! use std::path::Path;
//!
//! let resolver = PathHierarchyResolver::new(VaultRoot::new("/vault").unwrap());
//! let info = resolver.find_hierarchy_info(Path::new("/vault/MBA/Finance/Accounting"));
//! assert_eq!(info.program, "MBA");
//! assert_eq!(info.class, "Accounting");
//! assert_eq!(info.module, None);
//!
//! assert_eq!(calculate_hierarchy_level("/vault/MBA/Finance", Path::new("/vault")), 2);
//! assert_eq!(calculate_hierarchy_level("/outside/path", Path::new("/vault")), -1);
//! ```

pub mod classifier;

pub use classifier::{
    extract_numeric_module_prefix, is_likely_content_file, Classification, ContentClassifier,
};

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::config::{Config, ConfigError};
use crate::core::paths::{self, is_meaningful};
use crate::core::types::{HierarchyField, TemplateKind, VaultRoot};

/// Sentinel level for paths that are not inside the vault.
pub const OUTSIDE_VAULT: i32 = -1;

/// Folder name under a course that holds shared resources.
const RESOURCES_FOLDER: &str = "Resources";

/// Filename fragments that keep a course-level file as a class boundary.
const COURSE_FILE_KEEP_MARKERS: &[&str] = &["template", "resource"];

/// Named hierarchy segments for one path.
///
/// Levels are contiguous: `course` is never set without `program`, and
/// `module` is only present at depth 4 or deeper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HierarchyInfo {
    /// Level 1 folder name.
    pub program: String,
    /// Level 2 folder name.
    pub course: String,
    /// Level 3 folder name.
    pub class: String,
    /// Level 4 folder name (numeric prefix only, for content files).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    /// Number of meaningful segments considered.
    pub depth: usize,
}

impl HierarchyInfo {
    /// Build hierarchy info from meaningful segments.
    pub fn from_segments(segments: &[String]) -> Self {
        let at = |i: usize| segments.get(i).cloned().unwrap_or_default();
        Self {
            program: at(0),
            course: at(1),
            class: at(2),
            module: segments.get(3).cloned(),
            depth: segments.len(),
        }
    }

    /// The non-empty value for a field, if any.
    pub fn get(&self, field: HierarchyField) -> Option<&str> {
        let value = match field {
            HierarchyField::Program => self.program.as_str(),
            HierarchyField::Course => self.course.as_str(),
            HierarchyField::Class => self.class.as_str(),
            HierarchyField::Module => self.module.as_deref().unwrap_or(""),
        };
        (!value.trim().is_empty()).then_some(value)
    }

    /// Whether no level is set.
    pub fn is_empty(&self) -> bool {
        HierarchyField::ALL.iter().all(|f| self.get(*f).is_none())
    }
}

/// Resolves hierarchy positions for paths under one vault root.
#[derive(Debug, Clone)]
pub struct PathHierarchyResolver {
    vault_root: VaultRoot,
    classifier: ContentClassifier,
}

impl PathHierarchyResolver {
    /// Create a resolver anchored at `vault_root`.
    pub fn new(vault_root: VaultRoot) -> Self {
        Self {
            vault_root,
            classifier: ContentClassifier::new(),
        }
    }

    /// Create a resolver from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingVaultRoot` if no vault root is configured.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(config.vault_root()?))
    }

    /// The vault root this resolver is anchored at.
    pub fn vault_root(&self) -> &VaultRoot {
        &self.vault_root
    }

    /// The classifier used to refine module values.
    pub fn classifier(&self) -> &ContentClassifier {
        &self.classifier
    }

    /// Infer hierarchy info for a path below this resolver's vault root.
    pub fn find_hierarchy_info(&self, path: &Path) -> HierarchyInfo {
        find_hierarchy_info_with(path, &self.vault_root, &self.classifier)
    }

    /// Hierarchy level of `folder_path` relative to `vault_path`, or to this
    /// resolver's vault root when `vault_path` is `None`.
    pub fn calculate_hierarchy_level(&self, folder_path: &str, vault_path: Option<&Path>) -> i32 {
        calculate_hierarchy_level(folder_path, vault_path.unwrap_or(self.vault_root.as_path()))
    }

    /// Resolve a raw path string the way the level calculation does.
    pub fn resolve(&self, path: &str) -> PathBuf {
        paths::resolve_against_vault(path, self.vault_root.as_path())
    }
}

/// Infer hierarchy info for `path` below `vault_root`.
///
/// Never fails: missing paths are analyzed as strings and paths outside the
/// vault yield an empty result.
pub fn find_hierarchy_info(path: &Path, vault_root: &VaultRoot) -> HierarchyInfo {
    find_hierarchy_info_with(path, vault_root, &ContentClassifier::new())
}

fn find_hierarchy_info_with(
    path: &Path,
    vault_root: &VaultRoot,
    classifier: &ContentClassifier,
) -> HierarchyInfo {
    let resolved = paths::resolve_against_vault(&path.to_string_lossy(), vault_root.as_path());
    if !resolved.exists() {
        debug!(path = %resolved.display(), "path does not exist; using string analysis");
    }

    let Some(relative) = paths::relative_components(&resolved, vault_root.as_path()) else {
        warn!(
            path = %resolved.display(),
            vault = %vault_root,
            "path is outside the vault"
        );
        return HierarchyInfo::default();
    };

    let mut segments: Vec<String> = relative.into_iter().filter(|s| is_meaningful(s)).collect();

    if paths::looks_like_file(&resolved) && is_course_level_file(&segments) {
        debug!(path = %resolved.display(), "dropping course-level filename from segments");
        segments.pop();
    }

    let mut info = HierarchyInfo::from_segments(&segments);

    if let Some(module) = info.module.take() {
        let refined = if classifier.is_likely_content_file(&resolved) {
            extract_numeric_module_prefix(&module)
        } else {
            module
        };
        info.module = Some(refined);
    }

    if info.program.is_empty() && info.depth > 0 {
        info.program = vault_root.name();
    }

    debug!(
        path = %resolved.display(),
        depth = info.depth,
        program = %info.program,
        course = %info.course,
        class = %info.class,
        module = info.module.as_deref().unwrap_or(""),
        "resolved hierarchy"
    );
    info
}

/// A file sitting directly in a course folder is not a class boundary,
/// unless it is a template/resource or lives under `Resources`.
fn is_course_level_file(segments: &[String]) -> bool {
    if segments.len() != 3 {
        return false;
    }
    let file_name = segments[2].to_lowercase();
    let parent = &segments[1];
    !COURSE_FILE_KEEP_MARKERS
        .iter()
        .any(|marker| file_name.contains(marker))
        && !parent.eq_ignore_ascii_case(RESOURCES_FOLDER)
}

/// Hierarchy level of `folder_path` relative to `vault_path`.
///
/// Returns `0` for the vault itself, [`OUTSIDE_VAULT`] (`-1`) for paths that
/// are not inside it, and otherwise the number of meaningful segments
/// between them. Leading-slash paths are anchored per
/// [`paths::ANCHOR_RULES`].
///
/// On case-sensitive filesystems a path that only matches the vault's
/// contents case-insensitively is treated as outside.
pub fn calculate_hierarchy_level(folder_path: &str, vault_path: &Path) -> i32 {
    let vault = paths::lexical_normalize(&PathBuf::from(paths::normalize_separators(
        &vault_path.to_string_lossy(),
    )));
    let (anchor, rule) = paths::classify_anchor(folder_path, &vault.to_string_lossy());
    let resolved = paths::resolve_against_vault(folder_path, &vault);
    debug!(
        folder = folder_path,
        resolved = %resolved.display(),
        ?anchor,
        rule,
        "anchored path"
    );

    let Some(relative) = paths::relative_components(&resolved, &vault) else {
        debug!(folder = folder_path, vault = %vault.display(), "path is outside the vault");
        return OUTSIDE_VAULT;
    };

    let segments: Vec<String> = relative.into_iter().filter(|s| is_meaningful(s)).collect();
    if segments.is_empty() {
        return 0;
    }

    if vault.is_dir()
        && !resolved.exists()
        && paths::is_case_sensitive_fs(&vault)
        && paths::has_case_mismatch(&vault, &segments)
    {
        debug!(folder = folder_path, "case mismatch on case-sensitive filesystem");
        return OUTSIDE_VAULT;
    }

    segments.len() as i32
}

/// Hierarchy level of `folder_path` when processing starts at `base_path`,
/// which itself sits at `base_level`.
///
/// A folder that is not inside `base_path` keeps `base_level` (with a
/// warning).
pub fn calculate_hierarchy_level_with_offset(
    folder_path: &Path,
    base_path: &Path,
    base_level: i32,
) -> i32 {
    match paths::relative_components(folder_path, base_path) {
        None => {
            warn!(
                folder = %folder_path.display(),
                base = %base_path.display(),
                "folder is not inside the base path; using base level"
            );
            base_level
        }
        Some(relative) => {
            let depth = relative.iter().filter(|s| is_meaningful(s)).count() as i32;
            base_level + depth
        }
    }
}

/// Template type name for a hierarchy level.
///
/// `0 → main, 1 → program, 2 → course, 3 → class, 4 → module,
/// 5 → lesson`, anything else `unknown`.
pub fn template_type_for_level(level: i32) -> &'static str {
    TemplateKind::from_level(level).as_str()
}
