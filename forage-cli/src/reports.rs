use anyhow::Result;
use colored::Colorize;
use forage_game::{CriticalFind, FoundIngredient, GenerationResult, TagCatalog};
use serde::Serialize;
use std::io::Write;

/// JSON payload: the result plus resolved tag names and the seed used.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    seed: u64,
    tag_names: Vec<String>,
    #[serde(flatten)]
    result: &'a GenerationResult,
}

fn tag_names(result: &GenerationResult, tags: &TagCatalog) -> Vec<String> {
    result
        .inputs
        .tags
        .iter()
        .map(|id| tags.display_name(id).unwrap_or(id.as_str()).to_string())
        .collect()
}

fn ingredient_details(found: &FoundIngredient) -> Vec<String> {
    let mut details = Vec::new();
    if found.mana > 0 {
        details.push(format!("mana: {}", found.mana));
    }
    if found.resource_yield > 0 {
        details.push(format!("suroviny: {}", found.resource_yield));
    }
    if !found.rarity.as_str().is_empty() {
        details.push(format!("rarity: {}", found.rarity));
    }
    details
}

fn find_details(find: &CriticalFind) -> Vec<String> {
    match find {
        CriticalFind::Ingredient(found) => ingredient_details(found),
        CriticalFind::Mana { mana, .. } => vec![format!("mana: {mana}")],
        CriticalFind::Resource { resource_yield, .. } => {
            vec![format!("suroviny: {resource_yield}")]
        }
    }
}

fn find_usage(find: &CriticalFind) -> Option<&str> {
    match find {
        CriticalFind::Ingredient(found) => found.usage.as_deref(),
        CriticalFind::Mana { .. } | CriticalFind::Resource { .. } => None,
    }
}

fn visible(result: &GenerationResult) -> impl Iterator<Item = &FoundIngredient> {
    result.ingredients.iter().filter(|found| found.count > 0)
}

pub fn generate_console_report<W: Write + ?Sized>(
    out: &mut W,
    result: &GenerationResult,
    tags: &TagCatalog,
    verbose: bool,
) -> Result<()> {
    let inputs = &result.inputs;
    writeln!(out, "{}", "🌿 Forage Result".bright_green().bold())?;
    writeln!(out, "{}", "================".green())?;
    writeln!(
        out,
        "Environment: {} | Season: {}",
        inputs.environment.bold(),
        inputs.season.bold()
    )?;
    writeln!(out, "Score: {}, Hours: {}", inputs.score, inputs.hours)?;
    let names = tag_names(result, tags);
    if !names.is_empty() {
        writeln!(out, "Tags: {}", names.join(", "))?;
    }
    if verbose {
        writeln!(
            out,
            "Pool: {} candidates, {} per hour, {} draws",
            result.pool_size, result.rate_per_hour, result.total_draws
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Base resources: {}", result.raw.to_string().yellow())?;
    writeln!(out)?;

    writeln!(out, "{}", "Found ingredients".bright_cyan().bold())?;
    let mut any = false;
    for found in visible(result) {
        any = true;
        let details = ingredient_details(found);
        if details.is_empty() {
            writeln!(out, "  • {} × {}", found.name.bold(), found.count)?;
        } else {
            writeln!(
                out,
                "  • {} × {} ({})",
                found.name.bold(),
                found.count,
                details.join(", ").dimmed()
            )?;
        }
        if let Some(usage) = &found.usage {
            writeln!(out, "      {usage}")?;
        }
    }
    if !any {
        writeln!(out, "  (nothing)")?;
    }

    if let Some(find) = &result.rare_find {
        writeln!(out)?;
        writeln!(out, "{}", "✨ Critical find".bright_magenta().bold())?;
        let details = find_details(find);
        if details.is_empty() {
            writeln!(out, "  {}", find.name().bold())?;
        } else {
            writeln!(out, "  {} ({})", find.name().bold(), details.join(", "))?;
        }
        if let Some(usage) = find_usage(find) {
            writeln!(out, "      {usage}")?;
        }
    }
    Ok(())
}

pub fn generate_json_report<W: Write + ?Sized>(
    out: &mut W,
    result: &GenerationResult,
    tags: &TagCatalog,
    seed: u64,
) -> Result<()> {
    let report = JsonReport {
        seed,
        tag_names: tag_names(result, tags),
        result,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report<W: Write + ?Sized>(
    out: &mut W,
    result: &GenerationResult,
    tags: &TagCatalog,
) -> Result<()> {
    let inputs = &result.inputs;
    writeln!(out, "# Forage Result\n")?;
    writeln!(
        out,
        "**Environment:** {} | **Season:** {}  ",
        inputs.environment, inputs.season
    )?;
    writeln!(out, "**Score:** {}, **Hours:** {}\n", inputs.score, inputs.hours)?;
    let names = tag_names(result, tags);
    if !names.is_empty() {
        writeln!(out, "**Tags:** {}\n", names.join(", "))?;
    }
    writeln!(out, "**Base resources:** {}\n", result.raw)?;

    writeln!(out, "## Found ingredients\n")?;
    let mut any = false;
    for found in visible(result) {
        any = true;
        let details = ingredient_details(found);
        if details.is_empty() {
            writeln!(out, "- **{}** × {}", found.name, found.count)?;
        } else {
            writeln!(
                out,
                "- **{}** × {} _({})_",
                found.name,
                found.count,
                details.join(", ")
            )?;
        }
        if let Some(usage) = &found.usage {
            writeln!(out, "  - {usage}")?;
        }
    }
    if !any {
        writeln!(out, "_Nothing found._")?;
    }

    if let Some(find) = &result.rare_find {
        writeln!(out, "\n## Critical find\n")?;
        let details = find_details(find);
        if details.is_empty() {
            writeln!(out, "**{}**", find.name())?;
        } else {
            writeln!(out, "**{}** _({})_", find.name(), details.join(", "))?;
        }
        if let Some(usage) = find_usage(find) {
            writeln!(out, "\n{usage}")?;
        }
    }
    Ok(())
}

pub fn generate_tag_listing<W: Write + ?Sized>(out: &mut W, tags: &TagCatalog) -> Result<()> {
    writeln!(out, "Available tags:")?;
    for category in tags.categories() {
        writeln!(out, "  {}", category.name)?;
        for tag in &category.tags {
            writeln!(out, "    {:12} - {}", tag.id, tag.name)?;
        }
    }
    Ok(())
}
