//! engine::scan
//!
//! Vault scanning.
//!
//! # Architecture
//!
//! Scanning runs in two phases:
//!
//! 1. **Walk** (sequential): collect files below the scan root, skipping
//!    hidden entries such as `.obsidian` or `.git`
//! 2. **Report** (parallel): run the pipeline on each file with `rayon`
//!
//! Each file gets its own `MetadataMap`; the only shared state is the
//! pipeline itself, which is read-only.
//!
//! # Invariants
//!
//! - Scan is read-only; notes are parsed but never rewritten
//! - A failure on one file is recorded in its report and does not abort
//!   the scan
//! - Reports are ordered by path

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use super::{read_note, Pipeline, PipelineError};
use crate::core::metadata::MetadataMap;
use crate::core::paths::{self, is_meaningful};
use crate::hierarchy::{Classification, HierarchyInfo};

/// Extensions read as notes (their front-matter is parsed).
pub const NOTE_EXTENSIONS: &[&str] = &["md", "markdown"];

/// What the pipeline inferred for one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Path relative to the scan root, `/`-separated.
    pub relative: String,
    /// Hierarchy level of the file.
    pub level: i32,
    /// Inferred hierarchy.
    pub hierarchy: HierarchyInfo,
    /// Content classification.
    pub classification: Classification,
    /// Template type the merge used (empty if processing failed).
    pub template_type: String,
    /// Required fields missing after the merge.
    pub missing_required: Vec<String>,
    /// Read, parse or processing error, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    /// Whether the file merged cleanly with every required field present.
    pub fn is_valid(&self) -> bool {
        self.error.is_none() && self.missing_required.is_empty()
    }
}

/// Result of scanning a directory.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    /// The scanned directory.
    pub root: PathBuf,
    /// One report per file, ordered by path.
    pub files: Vec<FileReport>,
    /// Entries the walk could not read.
    pub walk_errors: Vec<String>,
}

impl ScanReport {
    /// Number of files classified as content.
    pub fn content_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.classification.is_content)
            .count()
    }

    /// Number of files with errors or missing required fields.
    pub fn invalid_count(&self) -> usize {
        self.files.iter().filter(|f| !f.is_valid()).count()
    }
}

fn is_visible(entry: &DirEntry) -> bool {
    entry.depth() == 0 || is_meaningful(&entry.file_name().to_string_lossy())
}

fn is_note(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .map_or(false, |e| NOTE_EXTENSIONS.contains(&e.as_str()))
}

impl Pipeline {
    /// Scan `dir` and report on every visible file below it.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::NotADirectory` if `dir` is not a directory.
    /// Per-file failures are recorded in the reports instead.
    pub fn scan(&self, dir: &Path) -> Result<ScanReport, PipelineError> {
        if !dir.is_dir() {
            return Err(PipelineError::NotADirectory(dir.to_path_buf()));
        }

        let mut candidates = Vec::new();
        let mut walk_errors = Vec::new();

        let walker = WalkDir::new(dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(is_visible);

        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_file() => {
                    candidates.push(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    walk_errors.push(e.to_string());
                }
            }
        }

        debug!(
            root = %dir.display(),
            files = candidates.len(),
            "walk complete"
        );

        let files: Vec<FileReport> = candidates
            .par_iter()
            .map(|path| self.report_file(dir, path))
            .collect();

        Ok(ScanReport {
            root: dir.to_path_buf(),
            files,
            walk_errors,
        })
    }

    /// Run the pipeline on one file for a scan report.
    pub fn report_file(&self, root: &Path, path: &Path) -> FileReport {
        let relative = paths::relative_components(path, root)
            .map(|parts| parts.join("/"))
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        let level = self
            .resolver()
            .calculate_hierarchy_level(&path.to_string_lossy(), None);

        let mut metadata = MetadataMap::new();
        let mut error = None;
        if is_note(path) {
            match read_note(path) {
                Ok(note) => metadata = note.metadata,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "could not read note");
                    error = Some(e.to_string());
                }
            }
        }

        match self.process(path, &mut metadata, None) {
            Ok(outcome) => FileReport {
                path: path.to_path_buf(),
                relative,
                level,
                hierarchy: outcome.hierarchy,
                classification: outcome.classification,
                template_type: outcome.template_type,
                missing_required: outcome.missing_required,
                error,
            },
            Err(e) => FileReport {
                path: path.to_path_buf(),
                relative,
                level,
                hierarchy: HierarchyInfo::default(),
                classification: self.resolver().classifier().classify(path),
                template_type: String::new(),
                missing_required: Vec::new(),
                error: Some(e.to_string()),
            },
        }
    }
}
