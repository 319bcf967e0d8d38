//! Trend command - monthly confidence for an item's recommendations.

use cartwise::Month;
use colored::Colorize;

use super::{fit, load_workspace};
use crate::cli::{InputArgs, QueryArgs};

pub fn run(
    inputs: InputArgs,
    query: QueryArgs,
    item: String,
    json_output: bool,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = query.resolve()?;
    let workspace = load_workspace(&inputs)?;
    let result = workspace.recommend(&config, Some(&item))?;

    if result.selected_item.as_deref() != Some(item.as_str()) {
        return Err(format!(
            "'{}' has fewer than {} recommendations under these filters",
            item, config.top_n
        )
        .into());
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&result.trend)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Monthly confidence for".cyan().bold(),
        item.white().bold()
    );
    println!();

    let header: Vec<String> = Month::ALL
        .iter()
        .map(|m| format!("{:>5}", &m.name()[..3]))
        .collect();
    println!("  {} {}", fit("Product", 28).bold(), header.join("").bold());

    for (consequent, series) in &result.trend {
        let cells: Vec<String> = series
            .iter()
            .map(|p| match p.confidence {
                Some(c) => format!("{:>5.2}", c),
                None => format!("{:>5}", "·"),
            })
            .collect();
        println!("  {} {}", fit(consequent, 28), cells.join(""));
    }

    if result.trend.is_empty() {
        println!("  {}", "No dated rules for these recommendations.".dimmed());
    }
    Ok(())
}
