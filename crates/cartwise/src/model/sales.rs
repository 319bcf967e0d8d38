//! Transaction lines and per-product sales summaries.

use serde::{Deserialize, Serialize};

use super::rule::SalesFigures;

/// One line of the raw transaction table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionLine {
    /// Product description; `None` for blank cells.
    pub description: Option<String>,
    pub quantity: i64,
    pub unit_price: f64,
    /// Precomputed line total, when the export carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_spent: Option<f64>,
}

impl TransactionLine {
    pub fn new(description: impl Into<String>, quantity: i64, unit_price: f64) -> Self {
        Self {
            description: Some(description.into()),
            quantity,
            unit_price,
            total_spent: None,
        }
    }

    /// Line total: the precomputed value if present, else quantity times unit price.
    pub fn line_total(&self) -> f64 {
        self.total_spent
            .unwrap_or(self.quantity as f64 * self.unit_price)
    }
}

/// Aggregated sales for one product description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    /// `None` is the bucket of lines with a blank description.
    pub description: Option<String>,
    /// Summed quantity across all lines.
    pub total_items: i64,
    /// Mean unit price across lines.
    pub price: f64,
    /// Summed line totals.
    pub total_spent: f64,
}

impl SalesSummary {
    /// The figures carried onto an enriched rule.
    pub fn figures(&self) -> SalesFigures {
        SalesFigures {
            total_items: self.total_items,
            price: self.price,
            total_spent: self.total_spent,
        }
    }
}
