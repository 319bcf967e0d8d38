//! Monthly confidence series for charting.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{Month, Rule};

/// One month of a confidence series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub month: Month,
    /// `None` when no rule was mined for that month.
    pub confidence: Option<f64>,
}

/// A twelve-point series in calendar order.
pub type TrendSeries = Vec<TrendPoint>;

/// Per-consequent monthly confidence for rules whose antecedent is `item`.
///
/// Pass month-level rows from before any deduplication so every month
/// and every repeated mining result is visible; plain and enriched rules
/// both work. Rules without a month cannot be placed on the axis and are
/// skipped. Repeated `(month, consequent)` rows collapse to their highest
/// confidence. Consequents with no dated rows are omitted; the rest
/// appear in the order of `consequents`.
pub fn trend_for_item<R: AsRef<Rule>>(
    rules: &[R],
    item: &str,
    consequents: &[String],
) -> IndexMap<String, TrendSeries> {
    let mut best: HashMap<(&str, Month), f64> = HashMap::new();

    for rule in rules.iter().map(|r| r.as_ref()) {
        let Some(month) = rule.month else {
            continue;
        };
        if rule.antecedent != item || !consequents.iter().any(|c| *c == rule.consequent) {
            continue;
        }
        best.entry((rule.consequent.as_str(), month))
            .and_modify(|c| *c = c.max(rule.confidence))
            .or_insert(rule.confidence);
    }

    let mut series = IndexMap::new();
    for consequent in consequents {
        if series.contains_key(consequent) {
            continue;
        }
        let points: TrendSeries = Month::ALL
            .iter()
            .map(|&month| TrendPoint {
                month,
                confidence: best.get(&(consequent.as_str(), month)).copied(),
            })
            .collect();
        if points.iter().any(|p| p.confidence.is_some()) {
            series.insert(consequent.clone(), points);
        }
    }

    debug!(
        item,
        requested = consequents.len(),
        series = series.len(),
        "projected confidence trends"
    );
    series
}
