//! Plain-language explanations of recommended rules, plus the per-item
//! sales panel.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::EnrichedRule;

/// Which way a rule relates to the selected item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// The item is the antecedent: buyers of the item go on to buy the other product.
    Buys,
    /// The item is the consequent (bidirectional matches only).
    AlsoBoughtWith,
}

impl Direction {
    pub fn verb(&self) -> &'static str {
        match self {
            Direction::Buys => "buys",
            Direction::AlsoBoughtWith => "also bought with",
        }
    }
}

/// A rendered explanation for one recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub item: String,
    /// The product on the other side of the rule.
    pub other: String,
    pub direction: Direction,
    pub confidence: f64,
    pub lift: f64,
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "If someone {} {}, they often buy {} (confidence: {:.2}, lift: {:.2})",
            self.direction.verb(),
            self.item,
            self.other,
            self.confidence,
            self.lift
        )
    }
}

/// Explain one rule from the point of view of `item`.
pub fn explain_rule(rule: &EnrichedRule, item: &str) -> Explanation {
    let (direction, other) = if rule.antecedent() == item {
        (Direction::Buys, rule.consequent())
    } else {
        (Direction::AlsoBoughtWith, rule.antecedent())
    };
    Explanation {
        item: item.to_string(),
        other: other.to_string(),
        direction,
        confidence: rule.rule.confidence,
        lift: rule.rule.lift,
    }
}

/// Explain every rule of a ranked list.
pub fn explain_all(ranked: &[EnrichedRule], item: &str) -> Vec<Explanation> {
    ranked.iter().map(|r| explain_rule(r, item)).collect()
}

/// Sales of a product recommended alongside the selected item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSales {
    pub consequent: String,
    pub total_items: Option<i64>,
    pub total_spent: Option<f64>,
}

/// Quantity and spend for everything recommended from `item`.
///
/// Reads the joined sales figures, so the rows reflect whichever side the
/// merge was keyed on.
pub fn sales_for_item(enriched: &[EnrichedRule], item: &str) -> Vec<ItemSales> {
    enriched
        .iter()
        .filter(|r| r.antecedent() == item)
        .map(|r| ItemSales {
            consequent: r.consequent().to_string(),
            total_items: r.total_items(),
            total_spent: r.total_spent(),
        })
        .collect()
}
