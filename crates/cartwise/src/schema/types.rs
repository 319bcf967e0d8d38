//! Core type definitions for column specifications.

use serde::{Deserialize, Serialize};

/// Expected data type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Whole numbers (no decimal point).
    Integer,
    /// Floating-point numbers.
    Float,
    /// Text/string values.
    String,
}

impl ColumnType {
    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    /// Short label used in parse error messages.
    pub fn label(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "number",
            ColumnType::String => "text",
        }
    }
}

/// Declares a column an input table is expected to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Canonical column name, as documented for the input file.
    pub name: &'static str,
    /// Alternative header spellings accepted for this column.
    pub aliases: &'static [&'static str],
    /// Whether the table is unusable without this column.
    pub required: bool,
    /// Expected cell type.
    pub column_type: ColumnType,
}

impl ColumnSpec {
    /// A column that must be present.
    pub const fn required(name: &'static str, column_type: ColumnType) -> Self {
        Self {
            name,
            aliases: &[],
            required: true,
            column_type,
        }
    }

    /// A column that may be absent.
    pub const fn optional(name: &'static str, column_type: ColumnType) -> Self {
        Self {
            name,
            aliases: &[],
            required: false,
            column_type,
        }
    }

    /// Attach alternative header spellings.
    pub const fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    /// Whether a header names this column.
    ///
    /// Matching ignores case and the separators `_`, `-` and spaces, so
    /// `UnitPrice`, `unit_price` and `Unit Price` are the same column.
    pub fn matches(&self, header: &str) -> bool {
        let header = normalize_header(header);
        normalize_header(self.name) == header
            || self.aliases.iter().any(|a| normalize_header(a) == header)
    }
}

fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Columns of the association rules table.
pub mod rules {
    use super::{ColumnSpec, ColumnType};

    pub const ANTECEDENT: ColumnSpec =
        ColumnSpec::required("antecedent", ColumnType::String).with_aliases(&["antecedents"]);
    pub const CONSEQUENT: ColumnSpec =
        ColumnSpec::required("consequent", ColumnType::String).with_aliases(&["consequents"]);
    pub const SUPPORT: ColumnSpec = ColumnSpec::required("support", ColumnType::Float);
    pub const CONFIDENCE: ColumnSpec = ColumnSpec::required("confidence", ColumnType::Float);
    pub const LIFT: ColumnSpec = ColumnSpec::required("lift", ColumnType::Float);
    pub const MONTH: ColumnSpec = ColumnSpec::optional("Month", ColumnType::String);
    pub const TYPE: ColumnSpec =
        ColumnSpec::optional("type", ColumnType::String).with_aliases(&["rule_type"]);
    pub const SKU: ColumnSpec =
        ColumnSpec::optional("SKU", ColumnType::String).with_aliases(&["StockCode"]);

    /// Every column the rules table may carry.
    pub const ALL: &[ColumnSpec] = &[
        ANTECEDENT, CONSEQUENT, SUPPORT, CONFIDENCE, LIFT, MONTH, TYPE, SKU,
    ];
}

/// Columns of the raw sales/transaction table.
pub mod sales {
    use super::{ColumnSpec, ColumnType};

    pub const DESCRIPTION: ColumnSpec = ColumnSpec::required("Description", ColumnType::String);
    pub const QUANTITY: ColumnSpec = ColumnSpec::required("Quantity", ColumnType::Integer);
    pub const UNIT_PRICE: ColumnSpec = ColumnSpec::required("UnitPrice", ColumnType::Float);
    pub const TOTAL_SPENT: ColumnSpec =
        ColumnSpec::optional("TotalSpent", ColumnType::Float).with_aliases(&["Total_Spent"]);

    /// Every column the sales table may carry.
    pub const ALL: &[ColumnSpec] = &[DESCRIPTION, QUANTITY, UNIT_PRICE, TOTAL_SPENT];
}
