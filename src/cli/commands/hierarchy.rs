//! hierarchy, level and classify commands - Inspect path heuristics

use std::path::Path;

use anyhow::{Context as _, Result};
use serde_json::json;

use crate::cli::Context;
use crate::hierarchy::{
    calculate_hierarchy_level_with_offset, extract_numeric_module_prefix,
    template_type_for_level, ContentClassifier, PathHierarchyResolver,
};
use crate::ui::output::or_dash;

fn resolver(ctx: &Context) -> Result<PathHierarchyResolver> {
    PathHierarchyResolver::from_config(&ctx.config).context("cannot resolve hierarchy")
}

/// Show the hierarchy inferred for a path.
pub fn hierarchy(ctx: &Context, path: &Path) -> Result<()> {
    let info = resolver(ctx)?.find_hierarchy_info(path);

    if ctx.json {
        return crate::ui::output::print_json(&info);
    }

    println!("program: {}", or_dash(&info.program));
    println!("course:  {}", or_dash(&info.course));
    println!("class:   {}", or_dash(&info.class));
    println!("module:  {}", or_dash(info.module.as_deref().unwrap_or("")));
    println!("depth:   {}", info.depth);
    Ok(())
}

/// Show the hierarchy level and template type for a folder.
pub fn level(ctx: &Context, path: &str, base: Option<&Path>, base_level: i32) -> Result<()> {
    let resolver = resolver(ctx)?;
    let level = match base {
        Some(base) => {
            calculate_hierarchy_level_with_offset(&resolver.resolve(path), base, base_level)
        }
        None => resolver.calculate_hierarchy_level(path, None),
    };
    let template_type = template_type_for_level(level);

    if ctx.json {
        return crate::ui::output::print_json(&json!({
            "path": path,
            "level": level,
            "template_type": template_type,
        }));
    }

    println!("{} ({})", level, template_type);
    Ok(())
}

/// Classify a path as content or structural.
pub fn classify(ctx: &Context, path: &Path) -> Result<()> {
    let classification = ContentClassifier::new().classify(path);
    let module_prefix = path
        .parent()
        .and_then(Path::file_name)
        .map(|name| extract_numeric_module_prefix(&name.to_string_lossy()))
        .unwrap_or_default();

    if ctx.json {
        return crate::ui::output::print_json(&json!({
            "path": path,
            "is_content": classification.is_content,
            "rule": classification.rule,
            "module_prefix": module_prefix,
        }));
    }

    let kind = if classification.is_content {
        "content"
    } else {
        "structural"
    };
    println!("{} (rule: {})", kind, classification.rule);
    println!("module prefix: {}", or_dash(&module_prefix));
    Ok(())
}
