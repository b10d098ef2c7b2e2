//! core::paths
//!
//! Path normalization, vault-relative segment extraction, and routing for
//! vaultkit's own storage inside a vault.
//!
//! # Architecture
//!
//! Hierarchy inference is pure string analysis over paths that may not
//! exist on disk. Everything that turns a raw path into comparable
//! segments goes through this module so the resolver, the classifier and
//! the CLI agree on what a "segment" is:
//!
//! - separators are unified to `/`
//! - `.` and `..` are collapsed lexically (never via `canonicalize`)
//! - empty and dot-prefixed segments are not meaningful
//! - the vault root prefix is compared case-insensitively
//!
//! # Storage Layout
//!
//! vaultkit data inside a vault lives under `<vault>/.vaultkit/`:
//! - `config.toml` - Vault configuration
//! - `schema.yaml` - Default template schema location
//!
//! # Example
//!
//! ```
//! use vaultkit::core::paths::{meaningful_segments, VaultPaths};
//! use std::path::{Path, PathBuf};
//!
//! assert_eq!(
//!     meaningful_segments("MBA//.obsidian/Finance/"),
//!     vec!["MBA".to_string(), "Finance".to_string()]
//! );
//!
//! let paths = VaultPaths::new(PathBuf::from("/vault"));
//! assert_eq!(paths.config_path(), Path::new("/vault/.vaultkit/config.toml"));
//! ```

use std::fs;
use std::path::{Component, Path, PathBuf};

/// Centralized routing for vaultkit storage inside a vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultPaths {
    /// The vault root directory.
    pub root: PathBuf,
}

impl VaultPaths {
    /// Create routing for the given vault root.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// `<vault>/.vaultkit`
    pub fn vaultkit_dir(&self) -> PathBuf {
        self.root.join(".vaultkit")
    }

    /// `<vault>/.vaultkit/config.toml`
    pub fn config_path(&self) -> PathBuf {
        self.vaultkit_dir().join("config.toml")
    }

    /// `<vault>/.vaultkit/schema.yaml`
    pub fn default_schema_path(&self) -> PathBuf {
        self.vaultkit_dir().join("schema.yaml")
    }
}

// =========================================================================
// String-level helpers
// =========================================================================

/// Replace backslashes with forward slashes.
pub fn normalize_separators(raw: &str) -> String {
    raw.replace('\\', "/")
}

/// Whether a separator-normalized path string is absolute on any platform
/// we care about (leading slash or a drive letter).
pub fn looks_absolute(path: &str) -> bool {
    path.starts_with('/') || has_drive_letter(path)
}

/// Whether the path starts with a Windows drive letter such as `C:`.
pub fn has_drive_letter(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Split a path string into meaningful segments.
///
/// Empty segments and segments starting with `.` (hidden folders, `.` and
/// `..`) are dropped.
pub fn meaningful_segments(path: &str) -> Vec<String> {
    normalize_separators(path)
        .split('/')
        .filter(|s| is_meaningful(s))
        .map(str::to_string)
        .collect()
}

/// Whether a single segment counts toward the hierarchy.
pub fn is_meaningful(segment: &str) -> bool {
    !segment.is_empty() && !segment.starts_with('.')
}

/// Collapse `.` and `..` components without touching the filesystem.
///
/// A `..` that would climb above the root is dropped for absolute paths
/// and kept for relative ones.
pub fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Strip `root` from `path`, comparing components case-insensitively.
///
/// Returns the remaining components (unfiltered), or `None` when `path`
/// is not `root` or a descendant of it. Both paths are normalized first.
pub fn relative_components(path: &Path, root: &Path) -> Option<Vec<String>> {
    let path = lexical_normalize(&PathBuf::from(normalize_separators(
        &path.to_string_lossy(),
    )));
    let root = lexical_normalize(&PathBuf::from(normalize_separators(
        &root.to_string_lossy(),
    )));

    let path_parts: Vec<String> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let root_parts: Vec<String> = root
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    if path_parts.len() < root_parts.len() {
        return None;
    }

    let prefix_matches = root_parts
        .iter()
        .zip(path_parts.iter())
        .all(|(r, p)| r.to_lowercase() == p.to_lowercase());
    if !prefix_matches {
        return None;
    }

    Some(path_parts[root_parts.len()..].to_vec())
}

// =========================================================================
// Anchoring: absolute-outside vs vault-relative
// =========================================================================

/// How a raw path string is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathAnchor {
    /// An absolute filesystem path, compared against the vault as-is.
    Absolute,
    /// A path relative to the vault root, even if it starts with `/`.
    VaultRelative,
}

/// One row of the anchoring table.
#[derive(Debug, Clone, Copy)]
pub struct AnchorRule {
    /// Rule name, reported in debug logs.
    pub name: &'static str,
    /// Predicate over (normalized path, normalized vault path).
    pub matches: fn(&str, &str) -> bool,
    /// Outcome when the predicate matches.
    pub anchor: PathAnchor,
}

/// First segments that mark a leading-slash path as a real system path.
pub const SYSTEM_ROOTS: &[&str] = &[
    "tmp",
    "etc",
    "usr",
    "var",
    "bin",
    "sbin",
    "opt",
    "home",
    "root",
    "mnt",
    "media",
    "srv",
    "proc",
    "dev",
    "private",
    "users",
    "volumes",
    "system",
    "library",
    "applications",
];

/// Substrings of a first segment that mark a multi-segment path as
/// pointing somewhere else entirely.
pub const OUTSIDE_INDICATORS: &[&str] = &["outside", "different"];

fn starts_with_vault(path: &str, vault: &str) -> bool {
    if vault.is_empty() {
        return false;
    }
    let path = path.to_lowercase();
    let vault = vault.trim_end_matches('/').to_lowercase();
    path == vault || path.starts_with(&format!("{}/", vault))
}

fn drive_letter(path: &str, _vault: &str) -> bool {
    has_drive_letter(path)
}

fn unc_prefix(path: &str, _vault: &str) -> bool {
    path.starts_with("//")
}

fn first_segment(path: &str) -> Option<String> {
    path.split('/')
        .find(|s| !s.is_empty())
        .map(|s| s.to_lowercase())
}

fn system_root(path: &str, _vault: &str) -> bool {
    path.starts_with('/')
        && first_segment(path).is_some_and(|seg| SYSTEM_ROOTS.contains(&seg.as_str()))
}

fn outside_indicator(path: &str, _vault: &str) -> bool {
    if !path.starts_with('/') {
        return false;
    }
    let segments = meaningful_segments(path);
    segments.len() >= 2
        && first_segment(path)
            .is_some_and(|seg| OUTSIDE_INDICATORS.iter().any(|ind| seg.contains(ind)))
}

fn leading_slash(path: &str, _vault: &str) -> bool {
    path.starts_with('/')
}

fn any_path(_path: &str, _vault: &str) -> bool {
    true
}

/// The anchoring table, evaluated top to bottom; the first match wins.
///
/// | Rule | Input shape | Anchor |
/// |------|-------------|--------|
/// | `vault-prefix` | starts with the vault path | absolute |
/// | `drive-letter` | `X:` prefix | absolute |
/// | `unc` | `//server` prefix | absolute |
/// | `system-root` | `/tmp`, `/etc`, `/usr`, `/home`, ... | absolute |
/// | `outside-indicator` | `/outside.../x`, `/different.../x` | absolute |
/// | `leading-slash` | any other `/...` | vault-relative |
/// | `relative` | anything else | vault-relative |
pub const ANCHOR_RULES: &[AnchorRule] = &[
    AnchorRule {
        name: "vault-prefix",
        matches: starts_with_vault,
        anchor: PathAnchor::Absolute,
    },
    AnchorRule {
        name: "drive-letter",
        matches: drive_letter,
        anchor: PathAnchor::Absolute,
    },
    AnchorRule {
        name: "unc",
        matches: unc_prefix,
        anchor: PathAnchor::Absolute,
    },
    AnchorRule {
        name: "system-root",
        matches: system_root,
        anchor: PathAnchor::Absolute,
    },
    AnchorRule {
        name: "outside-indicator",
        matches: outside_indicator,
        anchor: PathAnchor::Absolute,
    },
    AnchorRule {
        name: "leading-slash",
        matches: leading_slash,
        anchor: PathAnchor::VaultRelative,
    },
    AnchorRule {
        name: "relative",
        matches: any_path,
        anchor: PathAnchor::VaultRelative,
    },
];

/// Decide how a raw path is anchored relative to the vault.
///
/// Returns the anchor and the name of the rule that decided it.
pub fn classify_anchor(path: &str, vault: &str) -> (PathAnchor, &'static str) {
    let path = normalize_separators(path);
    let vault = normalize_separators(vault);
    for rule in ANCHOR_RULES {
        if (rule.matches)(&path, &vault) {
            return (rule.anchor, rule.name);
        }
    }
    (PathAnchor::VaultRelative, "relative")
}

/// Resolve a raw path string against the vault according to its anchor.
pub fn resolve_against_vault(path: &str, vault: &Path) -> PathBuf {
    let normalized = normalize_separators(path);
    let (anchor, _) = classify_anchor(&normalized, &vault.to_string_lossy());
    match anchor {
        PathAnchor::Absolute => lexical_normalize(Path::new(&normalized)),
        PathAnchor::VaultRelative => {
            lexical_normalize(&vault.join(normalized.trim_start_matches('/')))
        }
    }
}

// =========================================================================
// Filesystem probes
// =========================================================================

/// Whether the path names a file.
///
/// Existing paths are checked on disk. Missing paths are treated as files
/// when their last segment has a non-empty stem and an extension.
pub fn looks_like_file(path: &Path) -> bool {
    if path.exists() {
        return path.is_file();
    }
    let name = match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => return false,
    };
    if name.starts_with('.') {
        return false;
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) => !stem.is_empty() && !ext.is_empty(),
        None => false,
    }
}

/// Probe whether the filesystem holding `dir` distinguishes case.
///
/// Flips the case of the directory's own name and checks whether the
/// flipped path resolves. Names without cased letters fall back to the
/// platform default.
pub fn is_case_sensitive_fs(dir: &Path) -> bool {
    let platform_default = !cfg!(any(target_os = "windows", target_os = "macos"));

    let (Some(parent), Some(name)) = (dir.parent(), dir.file_name()) else {
        return platform_default;
    };
    let name = name.to_string_lossy();
    let flipped: String = name
        .chars()
        .map(|c| {
            if c.is_uppercase() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                c.to_uppercase().next().unwrap_or(c)
            }
        })
        .collect();

    if flipped == name || !dir.exists() {
        return platform_default;
    }
    !parent.join(flipped).exists()
}

/// Whether `relative` (below `root`) is missing on disk only because of a
/// case mismatch in one of its components.
pub fn has_case_mismatch(root: &Path, relative: &[String]) -> bool {
    let mut current = root.to_path_buf();
    for component in relative {
        let candidate = current.join(component);
        if candidate.exists() {
            current = candidate;
            continue;
        }

        let Ok(entries) = fs::read_dir(&current) else {
            return false;
        };
        let wanted = component.to_lowercase();
        return entries
            .flatten()
            .any(|entry| entry.file_name().to_string_lossy().to_lowercase() == wanted);
    }
    false
}
