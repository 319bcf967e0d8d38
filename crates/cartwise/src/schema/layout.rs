//! Resolution of declared columns against a parsed table's headers.

use indexmap::IndexMap;

use super::types::ColumnSpec;
use crate::error::{CartwiseError, Result};
use crate::input::DataTable;

/// Column positions of a table, keyed by canonical column name.
#[derive(Debug, Clone)]
pub struct TableLayout {
    positions: IndexMap<&'static str, Option<usize>>,
}

impl TableLayout {
    /// Locate every declared column in `data`.
    ///
    /// All missing required columns are collected into a single
    /// [`CartwiseError::Schema`], so the caller can report them at once.
    pub fn resolve(table: &str, data: &DataTable, specs: &[ColumnSpec]) -> Result<Self> {
        let mut positions = IndexMap::with_capacity(specs.len());
        let mut missing = Vec::new();

        for spec in specs {
            let position = data.headers.iter().position(|h| spec.matches(h));
            if position.is_none() && spec.required {
                missing.push(spec.name.to_string());
            }
            positions.insert(spec.name, position);
        }

        if !missing.is_empty() {
            return Err(CartwiseError::Schema {
                table: table.to_string(),
                missing,
            });
        }

        Ok(Self { positions })
    }

    /// Whether the column was found.
    pub fn has(&self, spec: &ColumnSpec) -> bool {
        self.position(spec).is_some()
    }

    /// Position of the column in the table, if present.
    pub fn position(&self, spec: &ColumnSpec) -> Option<usize> {
        self.positions.get(spec.name).copied().flatten()
    }

    /// Non-null, trimmed text of a cell; `None` for absent columns or null cells.
    pub fn text<'a>(&self, data: &'a DataTable, row: usize, spec: &ColumnSpec) -> Option<&'a str> {
        self.position(spec).and_then(|col| data.cell(row, col))
    }

    /// A floating-point cell; `Ok(None)` when the column is absent or the cell is null.
    pub fn float(&self, data: &DataTable, row: usize, spec: &ColumnSpec) -> Result<Option<f64>> {
        match self.text(data, row, spec) {
            None => Ok(None),
            Some(raw) => match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(Some(v)),
                _ => Err(self.parse_error(row, spec, raw)),
            },
        }
    }

    /// An integer cell; tolerates a trailing `.0` as written by spreadsheet exports.
    ///
    /// Whole floats outside the `i64` range are rejected, not clamped.
    pub fn integer(&self, data: &DataTable, row: usize, spec: &ColumnSpec) -> Result<Option<i64>> {
        match self.text(data, row, spec) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .or_else(|| raw.parse::<f64>().ok().and_then(whole_i64))
                .map(Some)
                .ok_or_else(|| self.parse_error(row, spec, raw)),
        }
    }

    /// Like [`TableLayout::float`] but a null cell is an error.
    pub fn required_float(&self, data: &DataTable, row: usize, spec: &ColumnSpec) -> Result<f64> {
        self.float(data, row, spec)?
            .ok_or_else(|| self.null_error(row, spec))
    }

    /// Like [`TableLayout::integer`] but a null cell is an error.
    pub fn required_integer(&self, data: &DataTable, row: usize, spec: &ColumnSpec) -> Result<i64> {
        self.integer(data, row, spec)?
            .ok_or_else(|| self.null_error(row, spec))
    }

    /// Like [`TableLayout::text`] but a null cell is an error.
    pub fn required_text<'a>(
        &self,
        data: &'a DataTable,
        row: usize,
        spec: &ColumnSpec,
    ) -> Result<&'a str> {
        self.text(data, row, spec)
            .ok_or_else(|| self.null_error(row, spec))
    }

    /// Error for a cell that fails a domain check after parsing.
    pub fn invalid(&self, row: usize, spec: &ColumnSpec, message: impl Into<String>) -> CartwiseError {
        CartwiseError::Parse {
            row: row + 1,
            column: spec.name.to_string(),
            message: message.into(),
        }
    }

    fn parse_error(&self, row: usize, spec: &ColumnSpec, raw: &str) -> CartwiseError {
        self.invalid(
            row,
            spec,
            format!("expected {}, found '{}'", spec.column_type.label(), raw),
        )
    }

    fn null_error(&self, row: usize, spec: &ColumnSpec) -> CartwiseError {
        self.invalid(row, spec, "value is missing")
    }
}

/// `v` as an `i64` when it is a whole number the type can hold exactly.
fn whole_i64(v: f64) -> Option<i64> {
    // 2^63 is exact as an f64; i64::MAX is not
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    (v.is_finite() && v.fract() == 0.0 && (-LIMIT..LIMIT).contains(&v)).then_some(v as i64)
}
