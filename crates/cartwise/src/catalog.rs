//! Loading and normalization of the association rules table.
//!
//! Normalization parses months into the calendar domain, optionally
//! derives missing rule types with a pluggable [`RuleClassifier`], drops
//! duplicate `(antecedent, consequent, month, type)` rows (the first row
//! wins) and fills in each rule's `consequent_count`.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::input::DataTable;
use crate::model::{Month, Rule, RuleType};
use crate::schema::{TableLayout, rules};

/// Separators between words of a product name.
static TOKEN_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s\-_/]+").expect("valid token regex"));

/// Strategy that assigns a type to a rule whose table row has none.
pub trait RuleClassifier: Send + Sync {
    /// Classify the pair of products a rule links.
    fn classify(&self, antecedent: &str, consequent: &str) -> RuleType;

    /// Name for logging.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> RuleClassifier for F
where
    F: Fn(&str, &str) -> RuleType + Send + Sync,
{
    fn classify(&self, antecedent: &str, consequent: &str) -> RuleType {
        self(antecedent, consequent)
    }
}

/// Which pair of tags a classifier emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeVocabulary {
    /// `color_swap` / `cross_category`.
    #[default]
    ColorSwap,
    /// `variant` / `cross`.
    Variant,
}

impl TypeVocabulary {
    fn tags(&self) -> (RuleType, RuleType) {
        match self {
            TypeVocabulary::ColorSwap => (RuleType::ColorSwap, RuleType::CrossCategory),
            TypeVocabulary::Variant => (RuleType::Variant, RuleType::Cross),
        }
    }
}

/// Heuristic classifier: products sharing a leading word are variants of
/// one another, anything else is a cross-category rule.
///
/// This is a guess from product naming and is not guaranteed accurate.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadingTokenClassifier {
    pub vocabulary: TypeVocabulary,
}

impl LeadingTokenClassifier {
    pub fn new(vocabulary: TypeVocabulary) -> Self {
        Self { vocabulary }
    }

    /// First word of a product name, lowercased.
    pub fn leading_token(name: &str) -> Option<String> {
        TOKEN_SPLIT
            .split(name.trim())
            .find(|t| !t.is_empty())
            .map(str::to_lowercase)
    }
}

impl RuleClassifier for LeadingTokenClassifier {
    fn classify(&self, antecedent: &str, consequent: &str) -> RuleType {
        let (same, different) = self.vocabulary.tags();
        match (
            Self::leading_token(antecedent),
            Self::leading_token(consequent),
        ) {
            (Some(a), Some(c)) if a == c => same,
            _ => different,
        }
    }

    fn name(&self) -> &str {
        "leading-token"
    }
}

/// Options for [`load_and_normalize_rules`].
#[derive(Clone)]
pub struct CatalogOptions {
    /// Derive a type for rules whose `type` cell is absent.
    pub derive_types: bool,
    /// Strategy used when deriving types.
    pub classifier: Arc<dyn RuleClassifier>,
}

impl CatalogOptions {
    /// Options that never derive types.
    pub fn without_derivation() -> Self {
        Self {
            derive_types: false,
            ..Self::default()
        }
    }

    /// Replace the classification strategy.
    pub fn with_classifier(mut self, classifier: impl RuleClassifier + 'static) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            derive_types: true,
            classifier: Arc::new(LeadingTokenClassifier::default()),
        }
    }
}

impl fmt::Debug for CatalogOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogOptions")
            .field("derive_types", &self.derive_types)
            .field("classifier", &self.classifier.name())
            .finish()
    }
}

/// Read rules from a parsed table without normalizing them.
///
/// Fails with a schema error when a required column is missing, and with
/// a parse error for unparseable metrics, unknown month names, or metrics
/// outside their domain (support and confidence in `[0, 1]`, lift `>= 0`).
pub fn rules_from_table(table: &DataTable) -> Result<Vec<Rule>> {
    let layout = TableLayout::resolve("rules", table, rules::ALL)?;

    (0..table.row_count())
        .map(|row| {
            let month = match layout.text(table, row, &rules::MONTH) {
                Some(raw) => Some(
                    raw.parse::<Month>()
                        .map_err(|e| layout.invalid(row, &rules::MONTH, e))?,
                ),
                None => None,
            };

            let rule_type = layout
                .text(table, row, &rules::TYPE)
                .and_then(|raw| raw.parse::<RuleType>().ok());

            let support = layout.required_float(table, row, &rules::SUPPORT)?;
            let confidence = layout.required_float(table, row, &rules::CONFIDENCE)?;
            let lift = layout.required_float(table, row, &rules::LIFT)?;

            if !(0.0..=1.0).contains(&support) {
                return Err(layout.invalid(row, &rules::SUPPORT, "support must be within [0, 1]"));
            }
            if !(0.0..=1.0).contains(&confidence) {
                return Err(layout.invalid(
                    row,
                    &rules::CONFIDENCE,
                    "confidence must be within [0, 1]",
                ));
            }
            if lift < 0.0 {
                return Err(layout.invalid(row, &rules::LIFT, "lift must not be negative"));
            }

            Ok(Rule {
                antecedent: layout
                    .required_text(table, row, &rules::ANTECEDENT)?
                    .to_string(),
                consequent: layout
                    .required_text(table, row, &rules::CONSEQUENT)?
                    .to_string(),
                month,
                rule_type,
                support,
                confidence,
                lift,
                sku: layout.text(table, row, &rules::SKU).map(str::to_string),
                consequent_count: 0,
            })
        })
        .collect()
}

/// Read and normalize the rules table.
pub fn load_and_normalize_rules(table: &DataTable, options: &CatalogOptions) -> Result<Vec<Rule>> {
    let raw = rules_from_table(table)?;
    Ok(normalize_rules(raw, options))
}

/// Normalize rules already in memory.
pub fn normalize_rules(raw: Vec<Rule>, options: &CatalogOptions) -> Vec<Rule> {
    let raw_len = raw.len();
    let mut derived = 0usize;

    let typed = raw.into_iter().map(|mut rule| {
        if rule.rule_type.is_none() && options.derive_types {
            rule.rule_type = Some(
                options
                    .classifier
                    .classify(&rule.antecedent, &rule.consequent),
            );
            derived += 1;
        }
        rule
    });

    let mut seen: HashSet<(String, String, Option<Month>, Option<RuleType>)> = HashSet::new();
    let mut rules: Vec<Rule> = typed
        .filter(|rule| {
            seen.insert((
                rule.antecedent.clone(),
                rule.consequent.clone(),
                rule.month,
                rule.rule_type.clone(),
            ))
        })
        .collect();

    assign_consequent_counts(&mut rules);

    debug!(
        raw = raw_len,
        kept = rules.len(),
        derived,
        classifier = options.classifier.name(),
        "normalized rule catalog"
    );
    rules
}

/// Number of distinct consequents per antecedent.
pub fn consequent_counts<'a, I>(rules: I) -> HashMap<&'a str, usize>
where
    I: IntoIterator<Item = &'a Rule>,
{
    let mut distinct: HashMap<&str, HashSet<&str>> = HashMap::new();
    for rule in rules {
        distinct
            .entry(rule.antecedent.as_str())
            .or_default()
            .insert(rule.consequent.as_str());
    }
    distinct.into_iter().map(|(a, cs)| (a, cs.len())).collect()
}

/// Overwrite each rule's `consequent_count` from the rules given.
///
/// Works on plain and enriched rules alike.
pub fn assign_consequent_counts<R>(rules: &mut [R])
where
    R: AsRef<Rule> + AsMut<Rule>,
{
    let counts: HashMap<String, usize> = consequent_counts(rules.iter().map(|r| r.as_ref()))
        .into_iter()
        .map(|(a, n)| (a.to_string(), n))
        .collect();
    for rule in rules.iter_mut().map(|r| r.as_mut()) {
        rule.consequent_count = counts.get(&rule.antecedent).copied().unwrap_or(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EnrichedRule;

    fn rules_table(rows: &[&[&str]]) -> DataTable {
        DataTable::from_rows(
            &["antecedent", "consequent", "Month", "type", "support", "confidence", "lift", "SKU"],
            rows,
        )
    }

    #[test]
    fn test_leading_token_classifier() {
        let classifier = LeadingTokenClassifier::default();
        assert_eq!(
            classifier.classify("RED RETROSPOT MUG", "red retrospot plate"),
            RuleType::ColorSwap
        );
        assert_eq!(
            classifier.classify("WHITE HANGING HEART", "JUMBO BAG RED"),
            RuleType::CrossCategory
        );

        let variant = LeadingTokenClassifier::new(TypeVocabulary::Variant);
        assert_eq!(variant.classify("LUNCH-BAG PINK", "lunch bag black"), RuleType::Cross);
        assert_eq!(variant.classify("LUNCH BAG PINK", "LUNCH BAG BLACK"), RuleType::Variant);
        assert_eq!(variant.classify("", "LUNCH BAG BLACK"), RuleType::Cross);
    }

    #[test]
    fn test_closure_classifier() {
        let options = CatalogOptions::default()
            .with_classifier(|_: &str, _: &str| RuleType::Other("manual".to_string()));
        let rules = normalize_rules(vec![Rule::new("A", "B", 0.1, 0.5, 1.2)], &options);
        assert_eq!(rules[0].rule_type, Some(RuleType::Other("manual".to_string())));
    }

    #[test]
    fn test_derivation_can_be_disabled() {
        let rules = normalize_rules(
            vec![Rule::new("RED MUG", "RED PLATE", 0.1, 0.5, 1.2)],
            &CatalogOptions::without_derivation(),
        );
        assert_eq!(rules[0].rule_type, None);
    }

    #[test]
    fn test_given_type_is_kept() {
        let rule = Rule::new("RED MUG", "RED PLATE", 0.1, 0.5, 1.2).with_type(RuleType::Cross);
        let rules = normalize_rules(vec![rule], &CatalogOptions::default());
        assert_eq!(rules[0].rule_type, Some(RuleType::Cross));
    }

    #[test]
    fn test_dedup_keeps_first() {
        let rules = normalize_rules(
            vec![
                Rule::new("A", "B", 0.02, 0.5, 1.5).with_month(Month::March),
                Rule::new("A", "B", 0.03, 0.9, 2.0).with_month(Month::March),
                Rule::new("A", "B", 0.03, 0.8, 2.0).with_month(Month::April),
            ],
            &CatalogOptions::without_derivation(),
        );
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].confidence, 0.5);
        assert_eq!(rules[1].month, Some(Month::April));
    }

    #[test]
    fn test_consequent_count_is_distinct() {
        let rules = normalize_rules(
            vec![
                Rule::new("A", "B", 0.02, 0.5, 1.5).with_month(Month::March),
                Rule::new("A", "B", 0.02, 0.5, 1.5).with_month(Month::April),
                Rule::new("A", "C", 0.02, 0.5, 1.5),
                Rule::new("D", "B", 0.02, 0.5, 1.5),
            ],
            &CatalogOptions::without_derivation(),
        );
        assert_eq!(rules[0].consequent_count, 2);
        assert_eq!(rules[1].consequent_count, 2);
        assert_eq!(rules[3].consequent_count, 1);
    }

    #[test]
    fn test_counts_assigned_on_enriched_rules() {
        let mut rules: Vec<EnrichedRule> = vec![
            Rule::new("A", "B", 0.02, 0.5, 1.5).into(),
            Rule::new("A", "C", 0.02, 0.5, 1.5).into(),
            Rule::new("A", "B", 0.02, 0.7, 1.5).into(),
            Rule::new("D", "B", 0.02, 0.5, 1.5).into(),
        ];
        assign_consequent_counts(&mut rules);
        let counts: Vec<usize> = rules.iter().map(|r| r.rule.consequent_count).collect();
        assert_eq!(counts, vec![2, 2, 2, 1]);
    }

    #[test]
    fn test_load_from_table() {
        let table = rules_table(&[
            &["RED MUG", "RED PLATE", "March", "", "0.02", "0.5", "1.5", "85123A"],
            &["RED MUG", "JUMBO BAG", "", "cross_category", "0.01", "0.4", "1.2", ""],
        ]);
        let rules = load_and_normalize_rules(&table, &CatalogOptions::default()).unwrap();

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].month, Some(Month::March));
        assert_eq!(rules[0].rule_type, Some(RuleType::ColorSwap));
        assert_eq!(rules[0].sku.as_deref(), Some("85123A"));
        assert_eq!(rules[1].month, None);
        assert_eq!(rules[1].sku, None);
        assert_eq!(rules[1].consequent_count, 2);
    }

    #[test]
    fn test_load_rejects_unknown_month() {
        let table = rules_table(&[&["A", "B", "Smarch", "", "0.02", "0.5", "1.5", ""]]);
        assert!(load_and_normalize_rules(&table, &CatalogOptions::default()).is_err());
    }

    #[test]
    fn test_load_rejects_out_of_range_metrics() {
        let table = rules_table(&[&["A", "B", "", "", "0.02", "1.5", "1.5", ""]]);
        assert!(rules_from_table(&table).is_err());
        let table = rules_table(&[&["A", "B", "", "", "0.02", "0.5", "-1", ""]]);
        assert!(rules_from_table(&table).is_err());
    }

    #[test]
    fn test_load_reports_missing_columns() {
        let table = DataTable::from_rows(&["antecedent", "consequent", "confidence"], &[]);
        let err = load_and_normalize_rules(&table, &CatalogOptions::default()).unwrap_err();
        assert_eq!(
            err.missing_columns(),
            &["support".to_string(), "lift".to_string()]
        );
    }
}
