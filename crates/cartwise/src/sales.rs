//! Reduction of raw transaction lines into per-product sales summaries.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{CartwiseError, Result};
use crate::input::DataTable;
use crate::model::{SalesSummary, TransactionLine};
use crate::schema::{TableLayout, sales};

/// Read transaction lines from a parsed sales table.
///
/// Fails with a schema error when `Description`, `Quantity` or
/// `UnitPrice` are missing; `TotalSpent`/`Total_Spent` is optional.
pub fn transactions_from_table(table: &DataTable) -> Result<Vec<TransactionLine>> {
    let layout = TableLayout::resolve("sales", table, sales::ALL)?;

    (0..table.row_count())
        .map(|row| {
            Ok(TransactionLine {
                description: layout
                    .text(table, row, &sales::DESCRIPTION)
                    .map(str::to_string),
                quantity: layout.required_integer(table, row, &sales::QUANTITY)?,
                unit_price: layout.required_float(table, row, &sales::UNIT_PRICE)?,
                total_spent: layout.float(table, row, &sales::TOTAL_SPENT)?,
            })
        })
        .collect()
}

#[derive(Default)]
struct Group {
    quantity: i128,
    prices: Vec<f64>,
    totals: Vec<f64>,
}

/// Group lines by description into one summary per product.
///
/// Blank descriptions form a single `None` bucket, listed first; the rest
/// follow in description order. Float sums run over sorted values, so the
/// output is identical for any permutation of `lines`.
///
/// Quantities are summed without intermediate overflow; a product whose
/// total does not fit in an `i64` is an error.
pub fn aggregate_sales(lines: &[TransactionLine]) -> Result<Vec<SalesSummary>> {
    let mut groups: BTreeMap<Option<&str>, Group> = BTreeMap::new();

    for line in lines {
        let group = groups.entry(line.description.as_deref()).or_default();
        group.quantity += i128::from(line.quantity);
        group.prices.push(line.unit_price);
        group.totals.push(line.line_total());
    }

    let summaries = groups
        .into_iter()
        .map(|(description, group)| {
            let total_items = i64::try_from(group.quantity).map_err(|_| {
                CartwiseError::QuantityOverflow {
                    product: description.unwrap_or("(blank)").to_string(),
                }
            })?;
            let count = group.prices.len() as f64;
            Ok(SalesSummary {
                description: description.map(str::to_string),
                total_items,
                price: ordered_sum(group.prices) / count,
                total_spent: ordered_sum(group.totals),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        lines = lines.len(),
        products = summaries.len(),
        "aggregated sales"
    );
    Ok(summaries)
}

fn ordered_sum(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    values.into_iter().sum()
}
