//! Inspect command - load statistics and join coverage.

use colored::Colorize;

use super::load_workspace;
use crate::cli::InputArgs;

pub fn run(inputs: InputArgs, json_output: bool, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let workspace = load_workspace(&inputs)?;
    let summary = &workspace.summary;

    if json_output {
        let report = serde_json::json!({
            "rules_source": workspace.rules_source,
            "sales_source": workspace.sales_source,
            "join_on": inputs.join_on,
            "summary": summary,
            "join_warnings": workspace.warnings,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for source in [&workspace.rules_source, &workspace.sales_source].into_iter().flatten() {
        println!(
            "{} {} {}",
            "Loaded".cyan().bold(),
            source.file.white(),
            format!(
                "({}, {} rows x {} columns)",
                source.format, source.row_count, source.column_count
            )
            .dimmed()
        );
        if verbose {
            println!("  {} {}", "fingerprint:".dimmed(), source.hash.dimmed());
        }
    }
    println!();

    println!("{}", "Rules:".yellow().bold());
    println!("  Rows:        {}", summary.raw_rules.to_string().white());
    println!("  In catalog:  {}", summary.catalog_rules.to_string().white());
    println!("  Antecedents: {}", summary.antecedents.to_string().white());
    println!();

    println!("{}", "Sales:".yellow().bold());
    println!("  Lines:       {}", summary.transaction_lines.to_string().white());
    println!("  Products:    {}", summary.products.to_string().white());
    println!();

    let coverage = summary.join_coverage * 100.0;
    let coverage_text = format!("{:.1}%", coverage);
    let coverage_color = if coverage >= 80.0 {
        coverage_text.green()
    } else if coverage >= 50.0 {
        coverage_text.yellow()
    } else {
        coverage_text.red()
    };
    println!(
        "{} {} of {} rules matched on {} ({})",
        "Join:".yellow().bold(),
        summary.matched_rules.to_string().white().bold(),
        summary.catalog_rules,
        inputs.join_on,
        coverage_color
    );

    if !workspace.warnings.is_empty() {
        println!();
        println!(
            "{} {}",
            "Ambiguous joins:".red().bold(),
            workspace.warnings.len()
        );
        for warning in &workspace.warnings {
            println!("  {}", warning);
        }
    }
    Ok(())
}
