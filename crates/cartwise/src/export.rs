//! Recommendation export in delimited text.

use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::model::EnrichedRule;

/// Header of the exported recommendation table.
pub const EXPORT_COLUMNS: [&str; 7] = [
    "consequent",
    "support",
    "confidence",
    "lift",
    "total_items",
    "price",
    "total_spent",
];

#[derive(Serialize)]
struct ExportRecord<'a> {
    consequent: &'a str,
    support: f64,
    confidence: f64,
    lift: f64,
    total_items: Option<i64>,
    price: Option<f64>,
    total_spent: Option<f64>,
}

impl<'a> From<&'a EnrichedRule> for ExportRecord<'a> {
    fn from(r: &'a EnrichedRule) -> Self {
        Self {
            consequent: r.consequent(),
            support: r.rule.support,
            confidence: r.rule.confidence,
            lift: r.rule.lift,
            total_items: r.total_items(),
            price: r.price(),
            total_spent: r.total_spent(),
        }
    }
}

/// Write recommendations with the given delimiter.
///
/// The header is always written, so an empty list still yields a valid
/// table. Missing sales figures are empty cells.
pub fn write_recommendations<W: Write>(
    writer: W,
    rules: &[EnrichedRule],
    delimiter: u8,
) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .from_writer(writer);

    writer.write_record(EXPORT_COLUMNS)?;
    for rule in rules {
        writer.serialize(ExportRecord::from(rule))?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write recommendations as CSV.
pub fn write_recommendations_csv<W: Write>(writer: W, rules: &[EnrichedRule]) -> Result<()> {
    write_recommendations(writer, rules, b',')
}

/// Render recommendations as a CSV string.
pub fn recommendations_to_csv(rules: &[EnrichedRule]) -> Result<String> {
    let mut buffer = Vec::new();
    write_recommendations_csv(&mut buffer, rules)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
