//! template::resolvers
//!
//! Field resolver trait and the built-in resolvers.
//!
//! # Design
//!
//! A field spec may name a resolver key (e.g. `resolver: current_date`).
//! At merge time the store looks the key up in its [`ResolverRegistry`] and
//! calls it with a [`ResolverContext`]. A resolver returning `None` defers
//! to the field's schema default.
//!
//! Resolvers must be `Send + Sync`: the store is shared across worker
//! threads during a vault scan.
//!
//! # Built-in Resolvers
//!
//! | Key | Value |
//! |-----|-------|
//! | `current_date` | today as `YYYY-MM-DD` |
//! | `uuid` | random v4 UUID |
//! | `file_name` | the file's stem |
//! | `file_title` | the file's stem, separators turned into spaces, title-cased |
//! | `template_type` | the template being applied |
//! | `program`, `course`, `class`, `module` | hierarchy value from the context |
//!
//! # Example
//!
//! ```
//! use vaultkit::core::metadata::MetadataValue;
//! use vaultkit::template::resolvers::{ResolverContext, ResolverRegistry};
//! use std::path::Path;
//!
//! let registry = ResolverRegistry::with_builtins();
//! let ctx = ResolverContext::for_path(Path::new("/vault/MBA/intro_to_finance.md"));
//!
//! let title = registry.get("file_title").unwrap().resolve(&ctx);
//! assert_eq!(title, Some(MetadataValue::Text("Intro To Finance".into())));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use chrono::Local;

use crate::core::metadata::MetadataValue;
use crate::core::types::HierarchyField;
use crate::hierarchy::HierarchyInfo;

/// Inputs available to a resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolverContext<'a> {
    /// The note or content file being processed.
    pub path: Option<&'a Path>,
    /// Hierarchy inferred for that path.
    pub hierarchy: Option<&'a HierarchyInfo>,
    /// Template type being applied.
    pub template_type: Option<&'a str>,
}

impl<'a> ResolverContext<'a> {
    /// Context carrying only a path.
    pub fn for_path(path: &'a Path) -> Self {
        Self {
            path: Some(path),
            ..Default::default()
        }
    }

    /// Attach hierarchy info.
    pub fn with_hierarchy(mut self, hierarchy: &'a HierarchyInfo) -> Self {
        self.hierarchy = Some(hierarchy);
        self
    }

    /// Attach the template type.
    pub fn with_template_type(mut self, template_type: &'a str) -> Self {
        self.template_type = Some(template_type);
        self
    }
}

/// Computes a field value from context.
pub trait FieldResolver: Send + Sync {
    /// Produce a value, or `None` to fall back to the schema default.
    fn resolve(&self, ctx: &ResolverContext<'_>) -> Option<MetadataValue>;
}

impl<F> FieldResolver for F
where
    F: Fn(&ResolverContext<'_>) -> Option<MetadataValue> + Send + Sync,
{
    fn resolve(&self, ctx: &ResolverContext<'_>) -> Option<MetadataValue> {
        self(ctx)
    }
}

/// Named resolvers available to field specs.
#[derive(Default)]
pub struct ResolverRegistry {
    resolvers: HashMap<String, Box<dyn FieldResolver>>,
}

impl fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = self.names();
        names.sort_unstable();
        f.debug_struct("ResolverRegistry")
            .field("resolvers", &names)
            .finish()
    }
}

impl ResolverRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in resolvers.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("current_date", current_date);
        registry.register("uuid", random_uuid);
        registry.register("file_name", file_name);
        registry.register("file_title", file_title);
        registry.register("template_type", template_type);
        registry.register("program", program);
        registry.register("course", course);
        registry.register("class", class);
        registry.register("module", module);
        registry
    }

    /// Register (or replace) a resolver.
    pub fn register(&mut self, key: impl Into<String>, resolver: impl FieldResolver + 'static) {
        self.resolvers.insert(key.into(), Box::new(resolver));
    }

    /// Look up a resolver.
    pub fn get(&self, key: &str) -> Option<&dyn FieldResolver> {
        self.resolvers.get(key).map(|r| r.as_ref())
    }

    /// Whether a resolver is registered under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.resolvers.contains_key(key)
    }

    /// Registered keys, unordered.
    pub fn names(&self) -> Vec<&str> {
        self.resolvers.keys().map(String::as_str).collect()
    }
}

fn current_date(_ctx: &ResolverContext<'_>) -> Option<MetadataValue> {
    Some(MetadataValue::Text(
        Local::now().format("%Y-%m-%d").to_string(),
    ))
}

fn random_uuid(_ctx: &ResolverContext<'_>) -> Option<MetadataValue> {
    Some(MetadataValue::Text(uuid::Uuid::new_v4().to_string()))
}

fn file_stem(ctx: &ResolverContext<'_>) -> Option<String> {
    ctx.path
        .and_then(Path::file_stem)
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
}

fn file_name(ctx: &ResolverContext<'_>) -> Option<MetadataValue> {
    file_stem(ctx).map(MetadataValue::Text)
}

fn file_title(ctx: &ResolverContext<'_>) -> Option<MetadataValue> {
    let stem = file_stem(ctx)?;
    let title = stem
        .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    Some(MetadataValue::Text(title))
}

fn template_type(ctx: &ResolverContext<'_>) -> Option<MetadataValue> {
    ctx.template_type
        .filter(|t| !t.is_empty())
        .map(|t| MetadataValue::Text(t.to_string()))
}

fn hierarchy_value(ctx: &ResolverContext<'_>, field: HierarchyField) -> Option<MetadataValue> {
    ctx.hierarchy
        .and_then(|h| h.get(field))
        .map(|v| MetadataValue::Text(v.to_string()))
}

fn program(ctx: &ResolverContext<'_>) -> Option<MetadataValue> {
    hierarchy_value(ctx, HierarchyField::Program)
}

fn course(ctx: &ResolverContext<'_>) -> Option<MetadataValue> {
    hierarchy_value(ctx, HierarchyField::Course)
}

fn class(ctx: &ResolverContext<'_>) -> Option<MetadataValue> {
    hierarchy_value(ctx, HierarchyField::Class)
}

fn module(ctx: &ResolverContext<'_>) -> Option<MetadataValue> {
    hierarchy_value(ctx, HierarchyField::Module)
}
