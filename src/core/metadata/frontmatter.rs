//! core::metadata::frontmatter
//!
//! Split a markdown note into YAML front-matter and body, and render a
//! metadata map back into a front-matter block.
//!
//! The rendered byte format is whatever `serde_yaml` produces; callers that
//! care about exact formatting own their own writer.

use thiserror::Error;

use super::value::MetadataMap;

/// Errors from front-matter parsing and rendering.
#[derive(Debug, Error)]
pub enum FrontmatterError {
    #[error("invalid front-matter YAML: {0}")]
    Yaml(String),

    #[error("failed to render front-matter: {0}")]
    Render(String),
}

/// A markdown note split into metadata and body.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    /// Parsed front-matter (empty when the note has none).
    pub metadata: MetadataMap,
    /// Whether the note carried a front-matter block at all.
    pub has_frontmatter: bool,
    /// Everything after the closing delimiter.
    pub body: String,
}

/// Locate the front-matter block.
///
/// Returns `(yaml, body)` when the content opens with `---` on its own line
/// and a later line is exactly `---` or `...`.
pub fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let rest = content.strip_prefix("---")?;
    let rest = rest.trim_start_matches([' ', '\t']);
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Parse a note into its metadata map and body.
///
/// # Errors
///
/// Returns `FrontmatterError::Yaml` if the block exists but is not a YAML
/// mapping.
pub fn parse_note(content: &str) -> Result<Note, FrontmatterError> {
    let Some((yaml, body)) = split_frontmatter(content) else {
        return Ok(Note {
            metadata: MetadataMap::new(),
            has_frontmatter: false,
            body: content.to_string(),
        });
    };

    let metadata = if yaml.trim().is_empty() {
        MetadataMap::new()
    } else {
        serde_yaml::from_str(yaml).map_err(|e| FrontmatterError::Yaml(e.to_string()))?
    };

    Ok(Note {
        metadata,
        has_frontmatter: true,
        body: body.to_string(),
    })
}

/// Render a metadata map as a delimited front-matter block.
pub fn render_frontmatter(metadata: &MetadataMap) -> Result<String, FrontmatterError> {
    if metadata.is_empty() {
        return Ok("---\n---\n".to_string());
    }
    let yaml =
        serde_yaml::to_string(metadata).map_err(|e| FrontmatterError::Render(e.to_string()))?;
    Ok(format!("---\n{}---\n", yaml))
}

/// Render a full note (front-matter followed by body).
pub fn render_note(note: &Note) -> Result<String, FrontmatterError> {
    Ok(format!("{}{}", render_frontmatter(&note.metadata)?, note.body))
}
