//! merge
//!
//! Merges inferred hierarchy and template fields into a note's metadata.
//!
//! # Merge Steps
//!
//! [`MetadataMerger::update_metadata_with_hierarchy`] runs, in order:
//!
//! 1. **Truncation** - levels deeper than the template's maximum are removed
//!    (a content file's `module` is kept).
//! 2. **Chain-break** - once a level is missing from the hierarchy, it and
//!    every deeper level are removed.
//! 3. **Fill** - present levels are written only where the note has no
//!    value yet. Existing non-empty values are never overwritten.
//! 4. **Reserved tags** - the schema's reserved tags are unioned into
//!    `tags`, case-insensitively, first-seen order.
//! 5. **Universal fields** - absent universal fields are resolved through
//!    the schema store, or set to `""`.
//!
//! The merge is idempotent: running it twice with the same inputs gives the
//! same map.
//!
//! # Example
//!
//! ```
//! use vaultkit::core::metadata::MetadataMap;
//! use vaultkit::hierarchy::HierarchyInfo;
//! use vaultkit::merge::MetadataMerger;
//! use vaultkit::template::TemplateSchemaStore;
//!
//! let store = TemplateSchemaStore::from_yaml_str("reserved_tags: [course-notes]").unwrap();
//! let merger = MetadataMerger::new(&store);
//!
//! let info = HierarchyInfo::from_segments(&[
//!     "MBA".to_string(),
//!     "Finance".to_string(),
//!     "Accounting".to_string(),
//! ]);
//! let mut meta = MetadataMap::new();
//! merger.update_metadata_with_hierarchy(&mut meta, &info, Some("course-index"));
//!
//! assert_eq!(meta.get_text("program"), Some("MBA"));
//! assert_eq!(meta.get_text("course"), Some("Finance"));
//! assert!(!meta.contains_key("class"));
//! ```

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, warn};

use crate::core::metadata::{recorded_template_type, MetadataMap, MetadataValue, TAGS_KEY};
use crate::core::types::{HierarchyField, TemplateKind};
use crate::hierarchy::HierarchyInfo;
use crate::template::{ResolverContext, TemplateSchemaStore};

/// Template-type fragments that mark a note as describing content.
pub const CONTENT_TEMPLATE_KEYWORDS: &[&str] =
    &["video", "reading", "instruction", "resource", "content"];

/// Deepest hierarchy level a template type may carry.
///
/// Prefix checks run in order, so `course-note` maps to 2.
///
/// | Template type | Max level |
/// |---------------|-----------|
/// | none, empty, `main*` | 1 |
/// | `program*` | 1 |
/// | `course*` | 2 |
/// | `class*` | 3 |
/// | `module*`, `lesson*`, `*-note`, anything else | 4 |
pub fn max_level_for_template_type(template_type: Option<&str>) -> i32 {
    let name = template_type.unwrap_or("").trim().to_lowercase();
    if name.is_empty() || name.starts_with("main") || name.starts_with("program") {
        1
    } else if name.starts_with("course") {
        2
    } else if name.starts_with("class") {
        3
    } else {
        4
    }
}

/// Whether the metadata describes a content file.
///
/// True when the recorded template type contains a content keyword, or the
/// `module` value is a one- or two-digit number (string or YAML integer).
pub fn is_content_metadata(metadata: &MetadataMap) -> bool {
    let by_template = recorded_template_type(metadata)
        .map(str::to_lowercase)
        .map(|t| CONTENT_TEMPLATE_KEYWORDS.iter().any(|k| t.contains(k)))
        .unwrap_or(false);

    let by_module = metadata
        .get(HierarchyField::Module.key())
        .and_then(MetadataValue::scalar_text)
        .map(|m| {
            let m = m.trim();
            (1..=2).contains(&m.len()) && m.chars().all(|c| c.is_ascii_digit())
        })
        .unwrap_or(false);

    by_template || by_module
}

/// Case-insensitive union of `existing` and `reserved`, first-seen order.
pub fn union_tags<'a, I>(existing: Vec<String>, reserved: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut seen = HashSet::new();
    existing
        .into_iter()
        .chain(reserved.into_iter().cloned())
        .filter(|tag| seen.insert(tag.to_lowercase()))
        .collect()
}

/// Applies hierarchy and schema rules to metadata maps.
///
/// Borrows the schema store; one merger can be shared across threads.
#[derive(Debug, Clone, Copy)]
pub struct MetadataMerger<'a> {
    store: &'a TemplateSchemaStore,
}

impl<'a> MetadataMerger<'a> {
    /// Create a merger over a schema store.
    pub fn new(store: &'a TemplateSchemaStore) -> Self {
        Self { store }
    }

    /// The schema store consulted for tags and universal fields.
    pub fn store(&self) -> &'a TemplateSchemaStore {
        self.store
    }

    /// Merge hierarchy info into `metadata` in place.
    ///
    /// Universal fields are resolved without a resolver context, so only
    /// schema defaults apply. Use [`update_metadata_for_file`] to feed
    /// resolvers the file path.
    ///
    /// [`update_metadata_for_file`]: MetadataMerger::update_metadata_for_file
    pub fn update_metadata_with_hierarchy<'m>(
        &self,
        metadata: &'m mut MetadataMap,
        hierarchy: &HierarchyInfo,
        template_type: Option<&str>,
    ) -> &'m mut MetadataMap {
        self.merge(metadata, hierarchy, template_type, None)
    }

    /// Merge hierarchy info into the metadata of the note at `path`.
    ///
    /// Same as [`update_metadata_with_hierarchy`], but universal-field
    /// resolvers receive the path, hierarchy and template type.
    ///
    /// [`update_metadata_with_hierarchy`]: MetadataMerger::update_metadata_with_hierarchy
    pub fn update_metadata_for_file<'m>(
        &self,
        metadata: &'m mut MetadataMap,
        path: &Path,
        hierarchy: &HierarchyInfo,
        template_type: Option<&str>,
    ) -> &'m mut MetadataMap {
        let mut ctx = ResolverContext::for_path(path).with_hierarchy(hierarchy);
        if let Some(t) = template_type {
            ctx = ctx.with_template_type(t);
        }
        self.merge(metadata, hierarchy, template_type, Some(&ctx))
    }

    fn merge<'m>(
        &self,
        metadata: &'m mut MetadataMap,
        hierarchy: &HierarchyInfo,
        template_type: Option<&str>,
        ctx: Option<&ResolverContext<'_>>,
    ) -> &'m mut MetadataMap {
        self.apply_hierarchy(metadata, hierarchy, template_type);
        self.inject_reserved_tags(metadata);
        self.fill_universal_fields(metadata, template_type, ctx);
        metadata
    }

    // =========================================================================
    // Steps
    // =========================================================================

    fn apply_hierarchy(
        &self,
        metadata: &mut MetadataMap,
        hierarchy: &HierarchyInfo,
        template_type: Option<&str>,
    ) {
        let max_level = max_level_for_template_type(template_type);
        let is_content = is_content_metadata(metadata);
        let mut chain_broken = false;

        for field in HierarchyField::ALL {
            let key = field.key();

            if field.level() > max_level {
                if field == HierarchyField::Module && is_content {
                    debug!(key, "keeping module on content note past max level");
                    continue;
                }
                metadata.remove(key);
            } else if chain_broken {
                metadata.remove(key);
            } else if let Some(value) = hierarchy.get(field) {
                if metadata.is_missing_or_empty(key) {
                    metadata.insert(key, value);
                }
            } else {
                if metadata.remove(key).is_some() {
                    debug!(key, "hierarchy chain broken; removing level");
                }
                chain_broken = true;
            }
        }
    }

    fn inject_reserved_tags(&self, metadata: &mut MetadataMap) {
        let existing = metadata
            .get(TAGS_KEY)
            .map(MetadataValue::to_string_list)
            .unwrap_or_default();
        let tags = union_tags(existing, self.store.reserved_tags());

        if tags.is_empty() && !metadata.contains_key(TAGS_KEY) {
            return;
        }
        metadata.insert(TAGS_KEY, tags);
    }

    fn fill_universal_fields(
        &self,
        metadata: &mut MetadataMap,
        template_type: Option<&str>,
        ctx: Option<&ResolverContext<'_>>,
    ) {
        let template = template_type.unwrap_or("");
        for name in self.store.universal_fields() {
            if metadata.contains_key(name) {
                continue;
            }
            let value = self
                .store
                .resolve_field_value(template, name, ctx)
                .unwrap_or_else(|| MetadataValue::Text(String::new()));
            metadata.insert(name.as_str(), value);
        }
    }

    // =========================================================================
    // Template mapping
    // =========================================================================

    /// Template type for a hierarchy level.
    ///
    /// Without `validate` this is the plain level table. With `validate`, a
    /// name that is not a registered template falls back to the first
    /// registered name containing the level's keyword, then to the first
    /// registered template, then to `"unknown"`.
    pub fn map_hierarchy_level_to_template_type(&self, level: i32, validate: bool) -> String {
        let kind = TemplateKind::from_level(level);
        let name = kind.as_str();

        if !validate || self.store.has_template(name) {
            return name.to_string();
        }

        let by_keyword = kind.search_key().and_then(|key| {
            self.store
                .template_names()
                .find(|candidate| candidate.to_lowercase().contains(key))
        });

        let chosen = by_keyword
            .or_else(|| self.store.template_names().next())
            .unwrap_or(TemplateKind::Unknown.as_str());

        warn!(
            level,
            requested = name,
            chosen,
            "template type not registered; using fallback"
        );
        chosen.to_string()
    }
}
