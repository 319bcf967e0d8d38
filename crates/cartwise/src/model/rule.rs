//! Association rules and their enriched form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::month::Month;

/// Category tag of a rule.
///
/// Upstream mining jobs have used two vocabularies for the same split:
/// `color_swap`/`cross_category` and `variant`/`cross`. Unknown tags are
/// preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleType {
    ColorSwap,
    CrossCategory,
    Variant,
    Cross,
    Other(String),
}

impl RuleType {
    /// Tag as written in the rules table.
    pub fn as_str(&self) -> &str {
        match self {
            RuleType::ColorSwap => "color_swap",
            RuleType::CrossCategory => "cross_category",
            RuleType::Variant => "variant",
            RuleType::Cross => "cross",
            RuleType::Other(tag) => tag,
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("Empty rule type".to_string());
        }
        Ok(match trimmed.to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "color_swap" | "colour_swap" => RuleType::ColorSwap,
            "cross_category" => RuleType::CrossCategory,
            "variant" => RuleType::Variant,
            "cross" => RuleType::Cross,
            _ => RuleType::Other(trimmed.to_string()),
        })
    }
}

impl Serialize for RuleType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RuleType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Rule-type filter option; `All` disables type filtering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(RuleType),
}

impl TypeFilter {
    /// Whether a rule's type passes this filter. Untyped rules only pass `All`.
    pub fn accepts(&self, rule_type: Option<&RuleType>) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(wanted) => rule_type == Some(wanted),
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => f.write_str("All"),
            TypeFilter::Only(t) => write!(f, "{}", t),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Ok(TypeFilter::All)
        } else {
            trimmed.parse().map(TypeFilter::Only)
        }
    }
}

impl Serialize for TypeFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TypeFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One row of the normalized rules table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Product bought first.
    pub antecedent: String,
    /// Product recommended.
    pub consequent: String,
    /// Month the rule was mined for; `None` means all months.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<Month>,
    /// Category tag, given or derived.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub rule_type: Option<RuleType>,
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
    /// Stock code on the antecedent side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Distinct consequents of this rule's antecedent.
    #[serde(default)]
    pub consequent_count: usize,
}

impl Rule {
    /// Build a rule with no month, type or SKU.
    pub fn new(
        antecedent: impl Into<String>,
        consequent: impl Into<String>,
        support: f64,
        confidence: f64,
        lift: f64,
    ) -> Self {
        Self {
            antecedent: antecedent.into(),
            consequent: consequent.into(),
            month: None,
            rule_type: None,
            support,
            confidence,
            lift,
            sku: None,
            consequent_count: 0,
        }
    }

    pub fn with_month(mut self, month: Month) -> Self {
        self.month = Some(month);
        self
    }

    pub fn with_type(mut self, rule_type: RuleType) -> Self {
        self.rule_type = Some(rule_type);
        self
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    /// Whether the rule recommends its own antecedent.
    pub fn is_self_loop(&self) -> bool {
        self.antecedent == self.consequent
    }
}

/// Sales figures joined onto a rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalesFigures {
    pub total_items: i64,
    pub price: f64,
    pub total_spent: f64,
}

/// A rule left-joined with zero or one sales summary row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRule {
    #[serde(flatten)]
    pub rule: Rule,
    /// `None` when no sales row matched the join key.
    #[serde(default)]
    pub sales: Option<SalesFigures>,
}

impl EnrichedRule {
    /// A rule with no matching sales row.
    pub fn unmatched(rule: Rule) -> Self {
        Self { rule, sales: None }
    }

    pub fn antecedent(&self) -> &str {
        &self.rule.antecedent
    }

    pub fn consequent(&self) -> &str {
        &self.rule.consequent
    }

    pub fn total_items(&self) -> Option<i64> {
        self.sales.map(|s| s.total_items)
    }

    pub fn price(&self) -> Option<f64> {
        self.sales.map(|s| s.price)
    }

    pub fn total_spent(&self) -> Option<f64> {
        self.sales.map(|s| s.total_spent)
    }
}

impl From<Rule> for EnrichedRule {
    fn from(rule: Rule) -> Self {
        Self::unmatched(rule)
    }
}

impl AsRef<Rule> for Rule {
    fn as_ref(&self) -> &Rule {
        self
    }
}

impl AsMut<Rule> for Rule {
    fn as_mut(&mut self) -> &mut Rule {
        self
    }
}

impl AsRef<Rule> for EnrichedRule {
    fn as_ref(&self) -> &Rule {
        &self.rule
    }
}

impl AsMut<Rule> for EnrichedRule {
    fn as_mut(&mut self) -> &mut Rule {
        &mut self.rule
    }
}
