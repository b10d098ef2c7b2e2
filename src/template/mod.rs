//! template
//!
//! Template schema: field definitions, inheritance and resolvers.
//!
//! # Modules
//!
//! - [`schema`] - The on-disk YAML document
//! - [`resolvers`] - Field resolver trait and built-ins
//! - [`store`] - The immutable, validated schema store
//!
//! # Architecture
//!
//! The schema is loaded once, validated, and frozen into a
//! [`TemplateSchemaStore`]. The store is passed explicitly to the merger
//! and the pipeline; nothing caches it globally.

pub mod resolvers;
pub mod schema;
pub mod store;

pub use resolvers::{FieldResolver, ResolverContext, ResolverRegistry};
pub use schema::{FieldSpec, SchemaDocument, SchemaError, TemplateSchema};
pub use store::{StoreBuilder, TemplateSchemaStore};
