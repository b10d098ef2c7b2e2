//! End-to-end scenarios for hierarchy inference and metadata merging.
//!
//! These tests drive the public library API the way a caller would:
//! build a resolver and a schema store, infer hierarchy for a path, and
//! merge it into a note's metadata.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use vaultkit::core::config::{Config, Overrides};
use vaultkit::core::metadata::{parse_note, MetadataMap, MetadataValue};
use vaultkit::core::types::VaultRoot;
use vaultkit::engine::Pipeline;
use vaultkit::hierarchy::{
    calculate_hierarchy_level, extract_numeric_module_prefix, is_likely_content_file,
    template_type_for_level, PathHierarchyResolver,
};
use vaultkit::merge::MetadataMerger;
use vaultkit::template::TemplateSchemaStore;

const SCHEMA: &str = r#"
universal_fields: [template-type, date-created]
reserved_tags: [course-notes]
fields:
  template-type: { resolver: template_type }
  date-created: { resolver: current_date }
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
    fields:
      class: { required: true }
  video-reference:
    extends: class-index
"#;

fn resolver() -> PathHierarchyResolver {
    PathHierarchyResolver::new(VaultRoot::new("/vault").unwrap())
}

fn store() -> TemplateSchemaStore {
    TemplateSchemaStore::from_yaml_str(SCHEMA).unwrap()
}

fn strings(items: &[&str]) -> MetadataValue {
    MetadataValue::List(items.iter().map(|s| s.to_string()).collect())
}

// =============================================================================
// Hierarchy
// =============================================================================

#[test]
fn content_file_in_week_folder() {
    let path = Path::new("/vault/MBA/Finance/Accounting/Week1/video.mp4");
    assert!(is_likely_content_file(path));

    let info = resolver().find_hierarchy_info(path);
    assert_eq!(info.program, "MBA");
    assert_eq!(info.course, "Finance");
    assert_eq!(info.class, "Accounting");
    assert_eq!(info.module.as_deref(), Some("Week1"));
}

#[test]
fn content_file_in_numbered_module() {
    let info = resolver()
        .find_hierarchy_info(Path::new("/vault/MBA/Finance/Accounting/03_ledgers/video.mp4"));
    assert_eq!(info.module.as_deref(), Some("03"));
}

#[test]
fn levels_for_documented_paths() {
    assert_eq!(calculate_hierarchy_level("/vault/MBA/Finance", Path::new("/vault")), 2);
    assert_eq!(calculate_hierarchy_level("/outside/path", Path::new("/vault")), -1);
}

#[test]
fn level_table() {
    let names: Vec<&str> = (0..=6).map(template_type_for_level).collect();
    assert_eq!(
        names,
        ["main", "program", "course", "class", "module", "lesson", "unknown"]
    );
}

#[test]
fn module_prefixes() {
    assert_eq!(extract_numeric_module_prefix("05_operations-resilience"), "05");
    assert_eq!(extract_numeric_module_prefix("introduction"), "introduction");
}

// =============================================================================
// Merging
// =============================================================================

#[test]
fn merge_for_course_note() {
    let store = store();
    let merger = MetadataMerger::new(&store);
    let path = Path::new("/vault/MBA/Finance/Accounting/Week1/plan.md");
    let info = resolver().find_hierarchy_info(path);

    let mut meta: MetadataMap = [("class", "Stale"), ("tags", "Course-Notes, finance")]
        .into_iter()
        .collect();
    merger.update_metadata_for_file(&mut meta, path, &info, Some("course-index"));

    assert_eq!(meta.get_text("program"), Some("MBA"));
    assert_eq!(meta.get_text("course"), Some("Finance"));
    assert!(!meta.contains_key("class"));
    assert!(!meta.contains_key("module"));
    assert_eq!(meta.get("tags"), Some(&strings(&["Course-Notes", "finance"])));
    assert_eq!(meta.get_text("template-type"), Some("course-index"));
    assert_eq!(meta.get_text("date-created").map(str::len), Some(10));
    assert!(store.validate_template("course-index", &meta));
}

#[test]
fn merge_keeps_existing_values_and_is_idempotent() {
    let store = store();
    let merger = MetadataMerger::new(&store);
    let path = Path::new("/vault/MBA/Finance/Accounting/05_ledgers/lecture.md");
    let info = resolver().find_hierarchy_info(path);

    let mut meta: MetadataMap = [("program", "Executive MBA")].into_iter().collect();
    merger.update_metadata_for_file(&mut meta, path, &info, Some("video-reference"));
    let once = meta.clone();
    merger.update_metadata_for_file(&mut meta, path, &info, Some("video-reference"));

    assert_eq!(meta, once);
    assert_eq!(meta.get_text("program"), Some("Executive MBA"));
    assert_eq!(meta.get_text("module"), Some("05"));
}

#[test]
fn missing_course_breaks_chain() {
    let store = store();
    let merger = MetadataMerger::new(&store);
    let mut info = resolver().find_hierarchy_info(Path::new("/vault/MBA/Finance/Accounting/Week1"));
    info.course.clear();

    let mut meta = MetadataMap::new();
    merger.update_metadata_with_hierarchy(&mut meta, &info, Some("module-index"));
    assert_eq!(meta.get_text("program"), Some("MBA"));
    assert!(!meta.contains_key("course"));
    assert!(!meta.contains_key("class"));
    assert!(!meta.contains_key("module"));
}

// =============================================================================
// Configured vault on disk
// =============================================================================

#[test]
fn pipeline_from_vault_config() {
    let temp = TempDir::new().unwrap();
    let vault = temp.path().join("Vault");
    fs::create_dir_all(vault.join(".vaultkit")).unwrap();
    fs::create_dir_all(vault.join("MBA/Finance/Accounting")).unwrap();
    fs::write(vault.join(".vaultkit/schema.yaml"), SCHEMA).unwrap();
    fs::write(
        vault.join(".vaultkit/config.toml"),
        "extra_reserved_tags = [\"mba\"]\n",
    )
    .unwrap();
    let note = vault.join("MBA/Finance/Accounting/index.md");
    fs::write(&note, "---\ntags: [draft]\n---\nBody\n").unwrap();

    let overrides = Overrides {
        vault_root: Some(vault.clone()),
        schema: None,
    };
    let config = Config::load_with_global_file(&temp.path().join("none.toml"), &overrides)
        .unwrap()
        .config;
    let pipeline = Pipeline::from_config(&config).unwrap();
    assert_eq!(pipeline.store().reserved_tags(), ["course-notes", "mba"]);

    let (merged, outcome) = pipeline.process_note(&note, None).unwrap();
    assert_eq!(outcome.template_type, "class-index");
    assert!(outcome.missing_required.is_empty());
    assert_eq!(
        merged.metadata.get("tags"),
        Some(&strings(&["draft", "course-notes", "mba"]))
    );

    // The note on disk is untouched.
    let on_disk = parse_note(&fs::read_to_string(&note).unwrap()).unwrap();
    assert_eq!(on_disk.metadata.get("tags"), Some(&strings(&["draft"])));
}
