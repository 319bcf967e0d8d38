//! Column specifications for the rules and sales tables.

mod layout;
mod types;

pub use layout::TableLayout;
pub use types::{ColumnSpec, ColumnType, rules, sales};
