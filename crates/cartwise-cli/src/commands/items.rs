//! Items command - list the items a query can recommend for.

use cartwise::RecommendationConfig;
use colored::Colorize;

use super::load_workspace;
use crate::cli::{InputArgs, QueryArgs};

pub fn run(
    inputs: InputArgs,
    query: QueryArgs,
    json_output: bool,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config: RecommendationConfig = query.resolve()?;
    let workspace = load_workspace(&inputs)?;
    let items = workspace.available_items(&config)?;

    if json_output {
        let listing = serde_json::json!({
            "top_n": config.top_n,
            "count": items.len(),
            "items": items,
        });
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    if items.is_empty() {
        println!(
            "{} No item has {} or more recommendations under these filters.",
            "Empty:".yellow().bold(),
            config.top_n
        );
        return Ok(());
    }

    println!(
        "{} {}",
        items.len().to_string().white().bold(),
        format!("items with at least {} recommendations:", config.top_n).cyan()
    );
    for item in &items {
        println!("  {}", item);
    }
    Ok(())
}
