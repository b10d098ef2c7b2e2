//! template::store
//!
//! The immutable template schema store.
//!
//! # Lifecycle
//!
//! A store is built once (from a [`SchemaDocument`] plus a
//! [`ResolverRegistry`]) and is read-only afterwards. There is no global
//! cache: every component that needs the schema receives a reference to
//! the store explicitly. The store is `Send + Sync`, so a single instance
//! can serve a parallel vault scan.
//!
//! # Field Lookup
//!
//! A field spec is looked up along the template's inheritance chain
//! (the template itself first, then its parent, and so on), then in the
//! document's shared `fields` table.
//!
//! # Example
//!
//! ```
//! use vaultkit::core::metadata::{MetadataMap, MetadataValue};
//! use vaultkit::template::TemplateSchemaStore;
//!
//! let store = TemplateSchemaStore::from_yaml_str(r#"
//! template_types:
//!   course-index:
//!     fields:
//!       course: { required: true }
//!       status: { default: active }
//! "#).unwrap();
//!
//! assert_eq!(
//!     store.resolve_field_value("course-index", "status", None),
//!     Some(MetadataValue::Text("active".into()))
//! );
//!
//! let mut meta = MetadataMap::new();
//! assert!(!store.validate_template("course-index", &meta));
//! meta.insert("course", "Finance");
//! assert!(store.validate_template("course-index", &meta));
//! ```

use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexMap;
use tracing::{debug, warn};

use super::resolvers::{FieldResolver, ResolverContext, ResolverRegistry};
use super::schema::{FieldSpec, SchemaDocument, SchemaError, TemplateSchema};
use crate::core::metadata::{MetadataMap, MetadataValue};

/// Builds a [`TemplateSchemaStore`].
///
/// Custom resolvers and extra reserved tags can only be added here; the
/// built store is frozen.
#[derive(Debug)]
pub struct StoreBuilder {
    document: SchemaDocument,
    resolvers: ResolverRegistry,
    extra_reserved_tags: Vec<String>,
}

impl StoreBuilder {
    /// Start from a parsed document with the built-in resolvers.
    pub fn new(document: SchemaDocument) -> Self {
        Self {
            document,
            resolvers: ResolverRegistry::with_builtins(),
            extra_reserved_tags: Vec::new(),
        }
    }

    /// Register an additional resolver.
    pub fn resolver(mut self, key: impl Into<String>, resolver: impl FieldResolver + 'static) -> Self {
        self.resolvers.register(key, resolver);
        self
    }

    /// Append reserved tags (e.g. from vault configuration).
    pub fn extra_reserved_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_reserved_tags
            .extend(tags.into_iter().map(Into::into));
        self
    }

    /// Validate the document and freeze the store.
    ///
    /// # Errors
    ///
    /// - `SchemaError::InvalidValue` for blank names or tags
    /// - `SchemaError::UnknownParent` if `extends` names a missing template
    /// - `SchemaError::InheritanceCycle` if templates extend each other
    /// - `SchemaError::UnknownResolver` if a field names an unregistered resolver
    pub fn build(self) -> Result<TemplateSchemaStore, SchemaError> {
        let StoreBuilder {
            document,
            resolvers,
            extra_reserved_tags,
        } = self;

        document.validate()?;
        check_inheritance(&document.template_types)?;
        check_resolvers(&document, &resolvers)?;

        let mut seen = HashSet::new();
        let universal_fields: Vec<String> = document
            .universal_fields
            .into_iter()
            .filter(|f| seen.insert(f.clone()))
            .collect();

        let mut seen = HashSet::new();
        let reserved_tags: Vec<String> = document
            .reserved_tags
            .into_iter()
            .chain(extra_reserved_tags)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty() && seen.insert(t.to_lowercase()))
            .collect();

        debug!(
            templates = document.template_types.len(),
            universal_fields = universal_fields.len(),
            reserved_tags = reserved_tags.len(),
            "template schema loaded"
        );

        Ok(TemplateSchemaStore {
            template_types: document.template_types,
            shared_fields: document.fields,
            universal_fields,
            reserved_tags,
            resolvers,
        })
    }
}

fn check_inheritance(templates: &IndexMap<String, TemplateSchema>) -> Result<(), SchemaError> {
    for (name, template) in templates {
        let mut chain = vec![name.clone()];
        let mut current = template;
        while let Some(parent) = &current.extends {
            if chain.contains(parent) {
                chain.push(parent.clone());
                return Err(SchemaError::InheritanceCycle(chain));
            }
            current = templates
                .get(parent)
                .ok_or_else(|| SchemaError::UnknownParent {
                    template: chain.last().cloned().unwrap_or_default(),
                    parent: parent.clone(),
                })?;
            chain.push(parent.clone());
        }
    }
    Ok(())
}

fn check_resolvers(document: &SchemaDocument, resolvers: &ResolverRegistry) -> Result<(), SchemaError> {
    let shared = document.fields.iter();
    let per_template = document
        .template_types
        .values()
        .flat_map(|t| t.fields.iter());

    for (field, spec) in shared.chain(per_template) {
        if let Some(key) = &spec.resolver {
            if !resolvers.contains(key) {
                return Err(SchemaError::UnknownResolver {
                    field: field.clone(),
                    resolver: key.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Read-only template schema.
#[derive(Debug, Default)]
pub struct TemplateSchemaStore {
    template_types: IndexMap<String, TemplateSchema>,
    shared_fields: IndexMap<String, FieldSpec>,
    universal_fields: Vec<String>,
    reserved_tags: Vec<String>,
    resolvers: ResolverRegistry,
}

impl TemplateSchemaStore {
    /// Start building a store from a document.
    pub fn builder(document: SchemaDocument) -> StoreBuilder {
        StoreBuilder::new(document)
    }

    /// Build a store from YAML with the built-in resolvers.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SchemaError> {
        StoreBuilder::new(SchemaDocument::from_yaml_str(yaml)?).build()
    }

    /// Load a store from a YAML file with the built-in resolvers.
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        StoreBuilder::new(SchemaDocument::load(path)?).build()
    }

    /// A store with no templates, universal fields or reserved tags.
    pub fn empty() -> Self {
        Self {
            resolvers: ResolverRegistry::with_builtins(),
            ..Default::default()
        }
    }

    // =========================================================================
    // Read contract
    // =========================================================================

    /// Template types in declaration order.
    pub fn template_types(&self) -> &IndexMap<String, TemplateSchema> {
        &self.template_types
    }

    /// Template type names in declaration order.
    pub fn template_names(&self) -> impl Iterator<Item = &str> {
        self.template_types.keys().map(String::as_str)
    }

    /// Whether a template type is registered.
    pub fn has_template(&self, name: &str) -> bool {
        self.template_types.contains_key(name)
    }

    /// Look up a template type.
    pub fn template(&self, name: &str) -> Option<&TemplateSchema> {
        self.template_types.get(name)
    }

    /// Fields applied to every template.
    pub fn universal_fields(&self) -> &[String] {
        &self.universal_fields
    }

    /// Tags injected into every note.
    pub fn reserved_tags(&self) -> &[String] {
        &self.reserved_tags
    }

    /// The template followed by its ancestors, nearest first.
    ///
    /// Unknown templates yield an empty chain. Inheritance is checked for
    /// cycles at build time, so the walk terminates.
    pub fn inheritance_chain(&self, template_type: &str) -> Vec<&str> {
        let mut chain = Vec::new();
        let mut current = self
            .template_types
            .get_key_value(template_type)
            .map(|(k, v)| (k.as_str(), v));

        while let Some((name, template)) = current {
            chain.push(name);
            current = template
                .extends
                .as_deref()
                .and_then(|parent| self.template_types.get_key_value(parent))
                .map(|(k, v)| (k.as_str(), v));
        }
        chain
    }

    /// Field table for a template with inherited fields merged in.
    ///
    /// Ancestor fields come first; a child's spec replaces its parent's.
    pub fn effective_fields(&self, template_type: &str) -> IndexMap<String, &FieldSpec> {
        let mut fields = IndexMap::new();
        for name in self.inheritance_chain(template_type).into_iter().rev() {
            if let Some(template) = self.template_types.get(name) {
                for (field, spec) in &template.fields {
                    fields.insert(field.clone(), spec);
                }
            }
        }
        fields
    }

    /// Find the spec for a field: inheritance chain first, then shared fields.
    pub fn field_spec(&self, template_type: &str, field_name: &str) -> Option<&FieldSpec> {
        self.inheritance_chain(template_type)
            .into_iter()
            .filter_map(|name| self.template_types.get(name))
            .find_map(|template| template.fields.get(field_name))
            .or_else(|| self.shared_fields.get(field_name))
    }

    /// Resolve a value for `field_name` under `template_type`.
    ///
    /// If the field names a resolver and `context` is given, the resolver
    /// is invoked. When that yields nothing (or there is no context) the
    /// field's default is used. Returns `None` when neither applies.
    pub fn resolve_field_value(
        &self,
        template_type: &str,
        field_name: &str,
        context: Option<&ResolverContext<'_>>,
    ) -> Option<MetadataValue> {
        let spec = self.field_spec(template_type, field_name)?;

        if let (Some(key), Some(ctx)) = (spec.resolver.as_deref(), context) {
            match self.resolvers.get(key) {
                Some(resolver) => {
                    if let Some(value) = resolver.resolve(ctx) {
                        return Some(value);
                    }
                }
                None => warn!(field = field_name, resolver = key, "resolver not registered"),
            }
        }

        spec.default.clone()
    }

    /// Names of required fields for a template, inherited ones included.
    pub fn required_fields(&self, template_type: &str) -> Vec<String> {
        self.effective_fields(template_type)
            .into_iter()
            .filter(|(_, spec)| spec.required)
            .map(|(name, _)| name)
            .collect()
    }

    /// Required fields that are absent or blank in `metadata`.
    pub fn missing_required_fields(&self, template_type: &str, metadata: &MetadataMap) -> Vec<String> {
        if !self.has_template(template_type) {
            debug!(template_type, "validating against unknown template type");
        }
        self.required_fields(template_type)
            .into_iter()
            .filter(|field| metadata.is_missing_or_empty(field))
            .collect()
    }

    /// Whether every required field is present and non-blank.
    pub fn validate_template(&self, template_type: &str, metadata: &MetadataMap) -> bool {
        self.missing_required_fields(template_type, metadata).is_empty()
    }
}
