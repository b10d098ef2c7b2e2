//! engine
//!
//! Per-file pipeline: Resolve -> Classify -> Pick template -> Merge -> Validate.
//!
//! # Architecture
//!
//! A [`Pipeline`] owns a [`PathHierarchyResolver`] and a frozen
//! [`TemplateSchemaStore`]. For each file it:
//!
//! 1. **Resolve**: infer [`HierarchyInfo`] from the path
//! 2. **Classify**: decide content vs structural
//! 3. **Pick template**: use the recorded template type, or map the level
//!    of the file's folder to one
//! 4. **Merge**: run the [`MetadataMerger`] on a copy of the metadata
//! 5. **Validate**: list required fields still missing
//!
//! # Invariants
//!
//! - The pipeline never writes files
//! - The caller's map is replaced only after a fully successful merge
//! - A panic inside the heuristics is contained to the file being processed
//!
//! # Modules
//!
//! - [`scan`] - Parallel vault walk producing per-file reports

pub mod scan;

pub use scan::{FileReport, ScanReport};

use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::config::{Config, ConfigError};
use crate::core::metadata::{
    parse_note, recorded_template_type, FrontmatterError, MetadataMap, Note,
};
use crate::hierarchy::{Classification, HierarchyInfo, PathHierarchyResolver};
use crate::merge::MetadataMerger;
use crate::template::{SchemaDocument, SchemaError, StoreBuilder, TemplateSchemaStore};

/// Errors from pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration could not be used.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The template schema could not be loaded.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A note could not be read.
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A note's front-matter could not be parsed.
    #[error("invalid front-matter in '{path}': {source}")]
    Frontmatter {
        path: PathBuf,
        source: FrontmatterError,
    },

    /// The scan root is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The heuristics failed unexpectedly for one file.
    #[error("processing '{path}' failed: {message}")]
    Internal { path: PathBuf, message: String },
}

/// Result of running the pipeline on one file.
#[derive(Debug, Clone, Serialize)]
pub struct MergeOutcome {
    /// The processed path.
    pub path: PathBuf,
    /// Template type the merge used.
    pub template_type: String,
    /// Hierarchy inferred from the path.
    pub hierarchy: HierarchyInfo,
    /// Content classification of the path.
    pub classification: Classification,
    /// Required fields still missing after the merge.
    pub missing_required: Vec<String>,
}

/// The hierarchy and merge pipeline for one vault.
#[derive(Debug)]
pub struct Pipeline {
    resolver: PathHierarchyResolver,
    store: TemplateSchemaStore,
}

impl Pipeline {
    /// Create a pipeline from its parts.
    pub fn new(resolver: PathHierarchyResolver, store: TemplateSchemaStore) -> Self {
        Self { resolver, store }
    }

    /// Build a pipeline from configuration.
    ///
    /// Loads the configured schema (if any) and appends the vault's extra
    /// reserved tags. Without a schema the store is empty.
    ///
    /// # Errors
    ///
    /// - `ConfigError::MissingVaultRoot` if no vault root is configured
    /// - `SchemaError` if the schema file is unreadable or invalid
    pub fn from_config(config: &Config) -> Result<Self, PipelineError> {
        let resolver = PathHierarchyResolver::from_config(config)?;

        let document = match config.schema_path() {
            Some(path) => {
                debug!(schema = %path.display(), "loading template schema");
                SchemaDocument::load(&path)?
            }
            None => {
                debug!("no template schema configured");
                SchemaDocument::default()
            }
        };

        let store = StoreBuilder::new(document)
            .extra_reserved_tags(config.extra_reserved_tags().iter().cloned())
            .build()?;

        Ok(Self::new(resolver, store))
    }

    /// The hierarchy resolver.
    pub fn resolver(&self) -> &PathHierarchyResolver {
        &self.resolver
    }

    /// The schema store.
    pub fn store(&self) -> &TemplateSchemaStore {
        &self.store
    }

    /// A merger over this pipeline's store.
    pub fn merger(&self) -> MetadataMerger<'_> {
        MetadataMerger::new(&self.store)
    }

    /// Template type for a file.
    ///
    /// The type recorded in the metadata wins. Otherwise the level of the
    /// file's folder (or of the path itself, for directories) is mapped to
    /// a registered template.
    pub fn determine_template_type(&self, path: &Path, metadata: &MetadataMap) -> String {
        if let Some(recorded) = recorded_template_type(metadata) {
            return recorded.to_string();
        }

        let folder = if path.is_dir() {
            path
        } else {
            path.parent().unwrap_or(path)
        };
        let level = self
            .resolver
            .calculate_hierarchy_level(&folder.to_string_lossy(), None);
        self.merger().map_hierarchy_level_to_template_type(level, true)
    }

    /// Merge hierarchy and template fields into `metadata`.
    ///
    /// Work happens on a copy; `metadata` is replaced only on success.
    /// A panic inside the heuristics is caught, logged, and reported as
    /// `PipelineError::Internal` with `metadata` untouched.
    pub fn process(
        &self,
        path: &Path,
        metadata: &mut MetadataMap,
        template_type: Option<&str>,
    ) -> Result<MergeOutcome, PipelineError> {
        let input = metadata.clone();
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            self.merge_copy(path, input, template_type)
        }));

        match result {
            Ok((merged, outcome)) => {
                *metadata = merged;
                Ok(outcome)
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(path = %path.display(), %message, "metadata merge failed; leaving metadata unchanged");
                Err(PipelineError::Internal {
                    path: path.to_path_buf(),
                    message,
                })
            }
        }
    }

    fn merge_copy(
        &self,
        path: &Path,
        mut metadata: MetadataMap,
        template_type: Option<&str>,
    ) -> (MetadataMap, MergeOutcome) {
        let hierarchy = self.resolver.find_hierarchy_info(path);
        let classification = self.resolver.classifier().classify(path);
        let template_type = template_type
            .map(str::to_string)
            .unwrap_or_else(|| self.determine_template_type(path, &metadata));

        self.merger()
            .update_metadata_for_file(&mut metadata, path, &hierarchy, Some(&template_type));
        let missing_required = self.store.missing_required_fields(&template_type, &metadata);

        debug!(
            path = %path.display(),
            template_type = %template_type,
            missing = missing_required.len(),
            "merged metadata"
        );

        let outcome = MergeOutcome {
            path: path.to_path_buf(),
            template_type,
            hierarchy,
            classification,
            missing_required,
        };
        (metadata, outcome)
    }

    /// Read a note, merge its front-matter, and return both.
    ///
    /// Files without front-matter start from an empty map. The note on
    /// disk is never modified.
    pub fn process_note(
        &self,
        path: &Path,
        template_type: Option<&str>,
    ) -> Result<(Note, MergeOutcome), PipelineError> {
        let mut note = read_note(path)?;
        let outcome = self.process(path, &mut note.metadata, template_type)?;
        Ok((note, outcome))
    }
}

/// Read and parse a note from disk.
pub fn read_note(path: &Path) -> Result<Note, PipelineError> {
    let content = fs::read_to_string(path).map_err(|source| PipelineError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_note(&content).map_err(|source| PipelineError::Frontmatter {
        path: path.to_path_buf(),
        source,
    })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::VaultRoot;
    use crate::template::ResolverContext;
    use crate::core::metadata::MetadataValue;
    use tempfile::TempDir;

    const SCHEMA: &str = r#"
universal_fields: [template-type]
reserved_tags: [course-notes]
fields:
  template-type: { resolver: template_type }
template_types:
  program-index:
    fields:
      program: { required: true }
  course-index:
    extends: program-index
    fields:
      course: { required: true }
  class-index:
    extends: course-index
  video-reference:
    fields:
      title: { required: true, resolver: file_title }
"#;

    fn pipeline() -> Pipeline {
        Pipeline::new(
            PathHierarchyResolver::new(VaultRoot::new("/vault").unwrap()),
            TemplateSchemaStore::from_yaml_str(SCHEMA).unwrap(),
        )
    }

    mod template_choice {
        use super::*;

        #[test]
        fn recorded_type_wins() {
            let meta: MetadataMap = [("template-type", "video-reference")].into_iter().collect();
            assert_eq!(
                pipeline().determine_template_type(Path::new("/vault/MBA/Finance/x.md"), &meta),
                "video-reference"
            );
        }

        #[test]
        fn folder_level_mapped() {
            let p = pipeline();
            let meta = MetadataMap::new();
            assert_eq!(
                p.determine_template_type(Path::new("/vault/MBA/Finance/x.md"), &meta),
                "course-index"
            );
            assert_eq!(
                p.determine_template_type(Path::new("/vault/MBA/Finance/Accounting/x.md"), &meta),
                "class-index"
            );
        }
    }

    mod process {
        use super::*;

        #[test]
        fn merges_and_validates() {
            let p = pipeline();
            let mut meta = MetadataMap::new();
            let outcome = p
                .process(Path::new("/vault/MBA/Finance/Accounting/index.md"), &mut meta, None)
                .unwrap();

            assert_eq!(outcome.template_type, "class-index");
            assert_eq!(meta.get_text("program"), Some("MBA"));
            assert_eq!(meta.get_text("course"), Some("Finance"));
            assert_eq!(meta.get_text("template-type"), Some("class-index"));
            assert!(outcome.missing_required.is_empty());
            assert!(!outcome.classification.is_content);
        }

        #[test]
        fn reports_missing_required() {
            let p = pipeline();
            let mut meta = MetadataMap::new();
            let outcome = p
                .process(Path::new("/outside/x.md"), &mut meta, Some("course-index"))
                .unwrap();
            assert_eq!(outcome.missing_required, vec!["program", "course"]);
        }

        #[test]
        fn resolver_fills_title() {
            let p = pipeline();
            let mut meta = MetadataMap::new();
            let outcome = p
                .process(
                    Path::new("/vault/MBA/Finance/Accounting/05_ledgers/intro_video.md"),
                    &mut meta,
                    Some("video-reference"),
                )
                .unwrap();
            assert!(outcome.classification.is_content);
            assert_eq!(outcome.hierarchy.module.as_deref(), Some("05"));
            // title has a resolver but is not universal; it stays required
            assert_eq!(outcome.missing_required, vec!["title"]);
        }

        fn explode(_ctx: &ResolverContext<'_>) -> Option<MetadataValue> {
            panic!("resolver exploded")
        }

        #[test]
        fn panic_leaves_metadata_untouched() {
            let doc = SchemaDocument::from_yaml_str(
                "universal_fields: [boom]\nfields:\n  boom: { resolver: explode }\n",
            )
            .unwrap();
            let store = StoreBuilder::new(doc).resolver("explode", explode).build().unwrap();
            let p = Pipeline::new(
                PathHierarchyResolver::new(VaultRoot::new("/vault").unwrap()),
                store,
            );

            let mut meta: MetadataMap = [("status", "draft")].into_iter().collect();
            let before = meta.clone();
            let err = p
                .process(Path::new("/vault/MBA/x.md"), &mut meta, Some("program-index"))
                .unwrap_err();
            assert!(matches!(err, PipelineError::Internal { .. }));
            assert!(err.to_string().contains("resolver exploded"));
            assert_eq!(meta, before);
        }
    }

    mod notes {
        use super::*;

        #[test]
        fn process_note_reads_frontmatter() {
            let temp = TempDir::new().unwrap();
            let dir = temp.path().join("MBA/Finance");
            fs::create_dir_all(&dir).unwrap();
            let note_path = dir.join("overview.md");
            fs::write(&note_path, "---\nprogram: Executive MBA\n---\n# Body\n").unwrap();

            let p = Pipeline::new(
                PathHierarchyResolver::new(VaultRoot::new(temp.path()).unwrap()),
                TemplateSchemaStore::from_yaml_str(SCHEMA).unwrap(),
            );
            let (note, outcome) = p.process_note(&note_path, None).unwrap();

            assert_eq!(outcome.template_type, "course-index");
            assert_eq!(note.metadata.get_text("program"), Some("Executive MBA"));
            assert_eq!(note.metadata.get_text("course"), Some("Finance"));
            assert_eq!(note.body, "# Body\n");
        }

        #[test]
        fn missing_note_is_read_error() {
            let err = pipeline()
                .process_note(Path::new("/definitely/missing.md"), None)
                .unwrap_err();
            assert!(matches!(err, PipelineError::Read { .. }));
        }
    }

    #[test]
    fn from_config_without_vault() {
        let config = Config::default();
        assert!(matches!(
            Pipeline::from_config(&config),
            Err(PipelineError::Config(ConfigError::MissingVaultRoot))
        ));
    }
}
