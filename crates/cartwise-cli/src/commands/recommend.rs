//! Recommend command - rank recommendations for one item.

use std::fmt::Write as _;
use std::path::PathBuf;

use cartwise::export::recommendations_to_csv;
use cartwise::{EnrichedRule, Recommendation, RecommendationConfig};
use colored::Colorize;

use super::{emit, fit, load_workspace, or_dash};
use crate::cli::{InputArgs, OutputFormat, QueryArgs};

pub fn run(
    inputs: InputArgs,
    query: QueryArgs,
    item: Option<String>,
    format: OutputFormat,
    output: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = query.resolve()?;
    let workspace = load_workspace(&inputs)?;
    let result = workspace.recommend(&config, item.as_deref())?;

    if let (Some(wanted), Some(selected)) = (&item, &result.selected_item) {
        if wanted != selected {
            eprintln!(
                "{} '{}' is not available under these filters; showing '{}'",
                "Note:".yellow().bold(),
                wanted,
                selected
            );
        }
    }

    if output.is_some() {
        colored::control::set_override(false);
    }

    let text = match format {
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(&result)?),
        OutputFormat::Csv => recommendations_to_csv(&result.top)?,
        OutputFormat::Table => render_table(&result, &config, verbose),
    };
    emit(&text, output.as_deref())?;

    if let Some(path) = &output {
        eprintln!(
            "{} {} recommendations to {}",
            "Wrote".green().bold(),
            result.top.len(),
            path.display()
        );
    }
    Ok(())
}

fn render_table(result: &Recommendation, config: &RecommendationConfig, verbose: bool) -> String {
    let mut out = String::new();

    let Some(item) = &result.selected_item else {
        let _ = writeln!(
            out,
            "{} No item has {} or more recommendations under these filters ({} rules in pool).",
            "Empty:".yellow().bold(),
            config.top_n,
            result.pool_size
        );
        return out;
    };

    let _ = writeln!(
        out,
        "{} {} {}",
        "Top recommendations for".cyan().bold(),
        item.white().bold(),
        format!("(sorted by {}, {} rules in pool)", config.sort_by, result.pool_size).dimmed()
    );
    let _ = writeln!(out);

    for (group, rules) in &result.groups {
        if result.groups.len() > 1 || group != "all" {
            let _ = writeln!(out, "{}", format!("{}:", group).yellow().bold());
        }
        let header = format!(
            "{} {:>10} {:>6} {:>8} {:>8} {:>11}",
            fit("Product", 32),
            "Confidence",
            "Lift",
            "Support",
            "Items",
            "Spent"
        );
        let _ = writeln!(out, "  {}", header.bold());
        for rule in rules {
            let _ = writeln!(out, "  {}", row(rule, item));
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "{}", "Why:".yellow().bold());
    for explanation in &result.explanations {
        let _ = writeln!(out, "  {}", explanation);
    }

    if verbose && !result.trend.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "Months with data:".yellow().bold());
        for (consequent, series) in &result.trend {
            let months: Vec<String> = series
                .iter()
                .filter_map(|p| p.confidence.map(|c| format!("{} {:.2}", p.month, c)))
                .collect();
            let _ = writeln!(out, "  {} {}", fit(consequent, 32), months.join(", ").dimmed());
        }
    }

    out
}

fn row(rule: &EnrichedRule, item: &str) -> String {
    let other = if rule.antecedent() == item {
        rule.consequent().to_string()
    } else {
        format!("{} (reverse)", rule.antecedent())
    };
    let confidence = format!("{:>10.3}", rule.rule.confidence);
    let lift = format!("{:>6.2}", rule.rule.lift);

    format!(
        "{} {} {} {:>8.4} {:>8} {:>11}",
        fit(&other, 32),
        if rule.rule.confidence >= 0.7 {
            confidence.green()
        } else {
            confidence.normal()
        },
        if rule.rule.lift >= 2.0 {
            lift.green()
        } else {
            lift.normal()
        },
        rule.rule.support,
        or_dash(rule.total_items()),
        or_dash(rule.total_spent().map(|v| format!("{:.2}", v)))
    )
}
