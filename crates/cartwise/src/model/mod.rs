//! Domain types shared by every pipeline stage.

mod month;
mod rule;
mod sales;

pub use month::{Month, MonthFilter};
pub use rule::{EnrichedRule, Rule, RuleType, SalesFigures, TypeFilter};
pub use sales::{SalesSummary, TransactionLine};
