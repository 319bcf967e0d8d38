//! Left join of rules onto sales summaries.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::{EnrichedRule, Rule, SalesSummary};

/// Which side of a rule is matched against `SalesSummary::description`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKey {
    Antecedent,
    /// The recommended product, whose sales are shown next to each recommendation.
    #[default]
    Consequent,
}

impl JoinKey {
    fn key<'a>(&self, rule: &'a Rule) -> &'a str {
        match self {
            JoinKey::Antecedent => &rule.antecedent,
            JoinKey::Consequent => &rule.consequent,
        }
    }
}

impl fmt::Display for JoinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinKey::Antecedent => f.write_str("antecedent"),
            JoinKey::Consequent => f.write_str("consequent"),
        }
    }
}

impl FromStr for JoinKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "antecedent" => Ok(JoinKey::Antecedent),
            "consequent" => Ok(JoinKey::Consequent),
            _ => Err(format!(
                "Unknown join key: {}. Use antecedent or consequent.",
                s
            )),
        }
    }
}

/// A description that matched more than one sales summary row.
///
/// Only the first matching row is joined; the rule is never duplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinAmbiguityWarning {
    pub description: String,
    /// Number of sales rows sharing the description.
    pub matches: usize,
}

impl fmt::Display for JoinAmbiguityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' matches {} sales rows; using the first",
            self.description, self.matches
        )
    }
}

/// Output of [`merge`].
#[derive(Debug, Clone, Default)]
pub struct Merged {
    /// One enriched row per input rule, in input order.
    pub rules: Vec<EnrichedRule>,
    /// Ambiguous join keys that rules actually hit.
    pub warnings: Vec<JoinAmbiguityWarning>,
}

impl Merged {
    /// Number of rules that found a sales row.
    pub fn matched(&self) -> usize {
        self.rules.iter().filter(|r| r.sales.is_some()).count()
    }
}

/// Left-join `rules` to `sales` on `rule[join_key] == sales.description`.
///
/// The output has exactly one row per input rule. The null-description
/// bucket of the sales summary never matches.
pub fn merge(rules: &[Rule], sales: &[SalesSummary], join_key: JoinKey) -> Merged {
    let mut index: HashMap<&str, (&SalesSummary, usize)> = HashMap::with_capacity(sales.len());
    for summary in sales {
        if let Some(description) = summary.description.as_deref() {
            index
                .entry(description)
                .and_modify(|(_, n)| *n += 1)
                .or_insert((summary, 1));
        }
    }

    let mut warned: Vec<&str> = Vec::new();
    let mut warnings = Vec::new();

    let enriched: Vec<EnrichedRule> = rules
        .iter()
        .map(|rule| {
            let key = join_key.key(rule);
            let sales = index.get(key).map(|(summary, matches)| {
                if *matches > 1 && !warned.contains(&key) {
                    warn!(description = key, matches, "ambiguous sales join");
                    warned.push(key);
                    warnings.push(JoinAmbiguityWarning {
                        description: key.to_string(),
                        matches: *matches,
                    });
                }
                summary.figures()
            });
            EnrichedRule {
                rule: rule.clone(),
                sales,
            }
        })
        .collect();

    let merged = Merged {
        rules: enriched,
        warnings,
    };
    debug!(
        rules = rules.len(),
        matched = merged.matched(),
        %join_key,
        "merged rules with sales"
    );
    merged
}
