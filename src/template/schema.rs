//! template::schema
//!
//! Template schema document: the on-disk YAML format.
//!
//! # Format
//!
//! ```yaml
//! universal_fields: [template-type, date-created]
//! reserved_tags: [course-notes]
//!
//! # Field specs shared by every template (used for universal fields).
//! fields:
//!   template-type: { resolver: template_type }
//!   date-created: { resolver: current_date }
//!
//! template_types:
//!   program-index:
//!     fields:
//!       program: { required: true }
//!   course-index:
//!     extends: program-index
//!     fields:
//!       course: { required: true }
//!       status: { default: active }
//! ```
//!
//! Unknown keys are rejected so that typos (`requried: true`) fail at load
//! time instead of silently dropping a requirement.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::metadata::MetadataValue;

/// Errors from schema loading and validation.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read schema file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse schema: {0}")]
    ParseError(String),

    #[error("template '{template}' extends unknown template '{parent}'")]
    UnknownParent { template: String, parent: String },

    #[error("template inheritance cycle: {}", .0.join(" -> "))]
    InheritanceCycle(Vec<String>),

    #[error("field '{field}' uses unknown resolver '{resolver}'")]
    UnknownResolver { field: String, resolver: String },

    #[error("invalid schema value: {0}")]
    InvalidValue(String),
}

/// Definition of one metadata field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FieldSpec {
    /// Value used when no resolver produces one.
    pub default: Option<MetadataValue>,

    /// Key of a registered resolver.
    pub resolver: Option<String>,

    /// Whether the field must be present and non-blank.
    pub required: bool,
}

/// A named template type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateSchema {
    /// Parent template whose fields are inherited.
    pub extends: Option<String>,

    /// Human-readable description.
    pub description: Option<String>,

    /// Field table, in declaration order.
    pub fields: IndexMap<String, FieldSpec>,
}

/// The whole schema file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaDocument {
    /// Fields applied to every template.
    pub universal_fields: Vec<String>,

    /// Tags injected into every note.
    pub reserved_tags: Vec<String>,

    /// Field specs shared by all templates.
    pub fields: IndexMap<String, FieldSpec>,

    /// Template types, in declaration order.
    pub template_types: IndexMap<String, TemplateSchema>,
}

impl SchemaDocument {
    /// Parse a schema document from YAML.
    ///
    /// An empty document is valid and yields an empty schema.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SchemaError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| SchemaError::ParseError(e.to_string()))
    }

    /// Read and parse a schema file.
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        let contents = fs::read_to_string(path).map_err(|e| SchemaError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml_str(&contents).map_err(|e| match e {
            SchemaError::ParseError(message) => {
                SchemaError::ParseError(format!("{}: {}", path.display(), message))
            }
            other => other,
        })
    }

    /// Check values that serde cannot express.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.universal_fields.iter().any(|f| f.trim().is_empty()) {
            return Err(SchemaError::InvalidValue(
                "universal_fields cannot contain blank names".to_string(),
            ));
        }
        if self.reserved_tags.iter().any(|t| t.trim().is_empty()) {
            return Err(SchemaError::InvalidValue(
                "reserved_tags cannot contain blank tags".to_string(),
            ));
        }
        if self.template_types.keys().any(|name| name.trim().is_empty()) {
            return Err(SchemaError::InvalidValue(
                "template type names cannot be blank".to_string(),
            ));
        }
        Ok(())
    }
}
