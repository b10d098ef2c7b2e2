//! templates command - List the loaded template schema

use anyhow::Result;
use serde::Serialize;

use crate::cli::Context;
use crate::ui::output::{self, format_list};

#[derive(Serialize)]
struct TemplateSummary<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    extends: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    required: Vec<String>,
}

#[derive(Serialize)]
struct SchemaSummary<'a> {
    template_types: Vec<TemplateSummary<'a>>,
    universal_fields: &'a [String],
    reserved_tags: &'a [String],
}

/// List template types, universal fields and reserved tags.
pub fn templates(ctx: &Context) -> Result<()> {
    let pipeline = ctx.pipeline()?;
    let store = pipeline.store();

    let summary = SchemaSummary {
        template_types: store
            .template_types()
            .iter()
            .map(|(name, template)| TemplateSummary {
                name,
                extends: template.extends.as_deref(),
                description: template.description.as_deref(),
                required: store.required_fields(name),
            })
            .collect(),
        universal_fields: store.universal_fields(),
        reserved_tags: store.reserved_tags(),
    };

    if ctx.json {
        return output::print_json(&summary);
    }

    if summary.template_types.is_empty() {
        output::print("no template types defined", ctx.verbosity);
    }
    for template in &summary.template_types {
        match template.extends {
            Some(parent) => println!("{} (extends {})", template.name, parent),
            None => println!("{}", template.name),
        }
        if let Some(description) = template.description {
            println!("    {}", description);
        }
        if !template.required.is_empty() {
            println!("    required: {}", template.required.join(", "));
        }
    }

    if !summary.universal_fields.is_empty() {
        println!("\nuniversal fields:");
        println!("{}", format_list(summary.universal_fields, "  - "));
    }
    if !summary.reserved_tags.is_empty() {
        println!("\nreserved tags:");
        println!("{}", format_list(summary.reserved_tags, "  - "));
    }
    Ok(())
}
