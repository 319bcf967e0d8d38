//! Sales command - per-product summary of a transaction file.

use std::path::PathBuf;

use cartwise::sales::transactions_from_table;
use cartwise::{Parser, SalesSummary, aggregate_sales};
use colored::Colorize;

use super::fit;
use crate::cli::OutputFormat;

pub fn run(
    sales: PathBuf,
    format: OutputFormat,
    limit: Option<usize>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !sales.exists() {
        return Err(format!("File not found: {}", sales.display()).into());
    }

    let (table, source) = Parser::new().parse_file(&sales)?;
    let lines = transactions_from_table(&table)?;
    let summary = aggregate_sales(&lines)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Csv => print!("{}", to_csv(&summary)?),
        OutputFormat::Table => {
            println!(
                "{} {} {}",
                "Sales summary for".cyan().bold(),
                source.file.white(),
                format!("({} lines, {} products)", lines.len(), summary.len()).dimmed()
            );
            if verbose {
                println!("  {} {}", "fingerprint:".dimmed(), source.hash.dimmed());
            }
            println!();
            let header = format!(
                "{} {:>10} {:>10} {:>12}",
                fit("Description", 36),
                "Items",
                "Price",
                "Spent"
            );
            println!("  {}", header.bold());
            let shown = limit.unwrap_or(summary.len());
            for s in summary.iter().take(shown) {
                println!(
                    "  {} {:>10} {:>10.2} {:>12.2}",
                    fit(s.description.as_deref().unwrap_or("(blank)"), 36),
                    s.total_items,
                    s.price,
                    s.total_spent
                );
            }
            if shown < summary.len() {
                println!("  {}", format!("... {} more", summary.len() - shown).dimmed());
            }
        }
    }
    Ok(())
}

fn to_csv(summary: &[SalesSummary]) -> Result<String, Box<dyn std::error::Error>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for s in summary {
        writer.serialize(s)?;
    }
    Ok(String::from_utf8(writer.into_inner()?)?)
}
