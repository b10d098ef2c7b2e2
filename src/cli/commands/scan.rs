//! scan command - Report on every file below a folder

use std::path::Path;

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::ui::output;

/// Report hierarchy and classification for every file in a folder.
pub fn scan(ctx: &Context, dir: Option<&Path>) -> Result<()> {
    let pipeline = ctx.pipeline()?;
    let root = match dir {
        Some(dir) => dir.to_path_buf(),
        None => pipeline.resolver().vault_root().as_path().to_path_buf(),
    };

    let report = pipeline
        .scan(&root)
        .with_context(|| format!("failed to scan '{}'", root.display()))?;

    if ctx.json {
        return output::print_json(&report);
    }

    for file in &report.files {
        let kind = if file.classification.is_content {
            "content"
        } else {
            "structural"
        };
        println!(
            "{:>2}  {:<10}  {:<20}  {}",
            file.level,
            kind,
            output::or_dash(&file.template_type),
            file.relative
        );
        if let Some(error) = &file.error {
            output::warn(format!("{}: {}", file.relative, error), ctx.verbosity);
        } else if !file.missing_required.is_empty() {
            output::warn(
                format!(
                    "{}: missing {}",
                    file.relative,
                    file.missing_required.join(", ")
                ),
                ctx.verbosity,
            );
        }
    }
    for error in &report.walk_errors {
        output::warn(error, ctx.verbosity);
    }

    output::print(
        format!(
            "{} files, {} content, {} need attention",
            report.files.len(),
            report.content_count(),
            report.invalid_count()
        ),
        ctx.verbosity,
    );
    Ok(())
}
