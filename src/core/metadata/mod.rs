//! core::metadata
//!
//! Note metadata (front-matter) model and codec.
//!
//! # Modules
//!
//! - [`value`] - `MetadataValue` tagged union and ordered `MetadataMap`
//! - [`frontmatter`] - Split/render YAML front-matter blocks
//!
//! # Ownership
//!
//! A `MetadataMap` always belongs to the caller. The merge pipeline borrows
//! it mutably and either fully merges it or leaves it untouched.
//!
//! # Example
//!
//! ```
//! use vaultkit::core::metadata::frontmatter::parse_note;
//!
//! let note = parse_note("---\nprogram: MBA\n---\n# Notes\n").unwrap();
//! assert_eq!(note.metadata.get_text("program"), Some("MBA"));
//! assert_eq!(note.body, "# Notes\n");
//! ```

pub mod frontmatter;
pub mod value;

pub use frontmatter::{parse_note, render_frontmatter, FrontmatterError, Note};
pub use value::{MetadataMap, MetadataValue};

/// Front-matter key holding the note's template type.
pub const TEMPLATE_TYPE_KEY: &str = "template-type";

/// Alternate spelling of [`TEMPLATE_TYPE_KEY`] accepted on read.
pub const TEMPLATE_TYPE_KEY_ALT: &str = "templateType";

/// Front-matter key holding the note's tags.
pub const TAGS_KEY: &str = "tags";

/// Read the template type recorded in a note's metadata, if any.
pub fn recorded_template_type(metadata: &MetadataMap) -> Option<&str> {
    [TEMPLATE_TYPE_KEY, TEMPLATE_TYPE_KEY_ALT]
        .iter()
        .filter_map(|key| metadata.get_text(key))
        .map(str::trim)
        .find(|s| !s.is_empty())
}
