//! merge and validate commands - Merge a note's front-matter without writing it

use std::path::Path;

use anyhow::{bail, Context as _, Result};
use serde::Serialize;

use crate::cli::Context;
use crate::core::metadata::{render_frontmatter, MetadataMap};
use crate::engine::{read_note, MergeOutcome, Pipeline};
use crate::ui::output::{self, format_list};

#[derive(Serialize)]
struct MergeOutput<'a> {
    #[serde(flatten)]
    outcome: &'a MergeOutcome,
    metadata: &'a MetadataMap,
}

/// Front-matter to start from: `--from`, else the note itself, else nothing.
fn starting_metadata(path: &Path, from: Option<&Path>) -> Result<MetadataMap> {
    let source = match from {
        Some(from) => from,
        None if path.is_file() => path,
        None => return Ok(MetadataMap::new()),
    };
    let note = read_note(source)?;
    Ok(note.metadata)
}

fn run_merge(
    pipeline: &Pipeline,
    path: &Path,
    template_type: Option<&str>,
    from: Option<&Path>,
) -> Result<(MetadataMap, MergeOutcome)> {
    let mut metadata = starting_metadata(path, from)?;
    let outcome = pipeline
        .process(path, &mut metadata, template_type)
        .with_context(|| format!("failed to merge '{}'", path.display()))?;
    Ok((metadata, outcome))
}

/// Print a note's front-matter merged with its hierarchy.
pub fn merge(
    ctx: &Context,
    path: &Path,
    template_type: Option<&str>,
    from: Option<&Path>,
) -> Result<()> {
    let pipeline = ctx.pipeline()?;
    let (metadata, outcome) = run_merge(&pipeline, path, template_type, from)?;

    if ctx.json {
        return output::print_json(&MergeOutput {
            outcome: &outcome,
            metadata: &metadata,
        });
    }

    print!("{}", render_frontmatter(&metadata)?);
    if !outcome.missing_required.is_empty() {
        output::warn(
            format!(
                "template '{}' requires: {}",
                outcome.template_type,
                outcome.missing_required.join(", ")
            ),
            ctx.verbosity,
        );
    }
    Ok(())
}

/// Check a note's required fields after merging.
pub fn validate(ctx: &Context, path: &Path, template_type: Option<&str>) -> Result<()> {
    let pipeline = ctx.pipeline()?;
    let (_, outcome) = run_merge(&pipeline, path, template_type, None)?;

    if ctx.json {
        output::print_json(&outcome)?;
    } else if outcome.missing_required.is_empty() {
        output::print(
            format!("ok: '{}' satisfies template '{}'", path.display(), outcome.template_type),
            ctx.verbosity,
        );
    } else {
        println!("missing required fields for '{}':", outcome.template_type);
        println!("{}", format_list(&outcome.missing_required, "  - "));
    }

    if !outcome.missing_required.is_empty() {
        bail!(
            "{} required field(s) missing for template '{}'",
            outcome.missing_required.len(),
            outcome.template_type
        );
    }
    Ok(())
}
