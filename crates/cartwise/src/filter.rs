//! The recommendation filter chain.
//!
//! Steps run in a fixed order because later steps depend on the row set
//! produced by earlier ones:
//!
//! 1. month
//! 2. rule type
//! 3. confidence, lift and support thresholds (all must hold)
//! 4. drop repeated `(antecedent, consequent)` pairs, first row wins
//! 5. recount distinct consequents per antecedent
//! 6. consequent-frequency bound
//! 7. SKU substring
//! 8. consequent keyword
//! 9. settle: recount and re-apply the frequency bound, since steps 7
//!    and 8 can shrink a group below it
//!
//! Step 9 makes the chain idempotent: filtering its own output with the
//! same config returns that output unchanged.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::assign_consequent_counts;
use crate::config::RecommendationConfig;
use crate::model::EnrichedRule;

/// Output of [`filter_recommendations`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilteredPool {
    /// Rules that survived every step, in input order.
    pub rules: Vec<EnrichedRule>,
    /// Sorted antecedents with at least `top_n` distinct non-self consequents.
    pub available_items: Vec<String>,
}

impl FilteredPool {
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether the item picker offers `item`.
    pub fn offers(&self, item: &str) -> bool {
        self.available_items.binary_search_by(|i| i.as_str().cmp(item)).is_ok()
    }
}

/// Case-insensitive substring test; a blank needle always matches.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Run the filter chain over `enriched`.
///
/// Never fails: when nothing survives, both vectors are empty.
pub fn filter_recommendations(
    enriched: &[EnrichedRule],
    config: &RecommendationConfig,
) -> FilteredPool {
    let thresholded = enriched.iter().filter(|r| {
        let rule = &r.rule;
        config.month.accepts(rule.month)
            && config.rule_type.accepts(rule.rule_type.as_ref())
            && rule.confidence >= config.min_confidence
            && rule.lift >= config.min_lift
            && rule.support >= config.min_support
    });

    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut rules: Vec<EnrichedRule> = thresholded
        .filter(|r| seen.insert((r.antecedent(), r.consequent())))
        .cloned()
        .collect();
    let after_thresholds = rules.len();

    assign_consequent_counts(&mut rules);
    rules.retain(|r| r.rule.consequent_count >= config.min_consequent_frequency);
    let after_frequency = rules.len();

    let sku = config.sku_contains.trim();
    if !sku.is_empty() {
        rules.retain(|r| r.rule.sku.as_deref().is_some_and(|s| contains_ci(s, sku)));
    }
    if !config.keyword.trim().is_empty() {
        rules.retain(|r| contains_ci(r.consequent(), &config.keyword));
    }

    assign_consequent_counts(&mut rules);
    rules.retain(|r| r.rule.consequent_count >= config.min_consequent_frequency);

    let available_items = available_items(&rules, config.top_n);

    debug!(
        input = enriched.len(),
        after_thresholds,
        after_frequency,
        output = rules.len(),
        available = available_items.len(),
        "filtered recommendations"
    );

    FilteredPool {
        rules,
        available_items,
    }
}

/// Antecedents that can fill a page of `top_n` recommendations.
///
/// Self-loops are not counted because the top selector drops them.
/// Antecedents with fewer matches are left out of the picker entirely
/// rather than offered with a short list.
pub fn available_items(rules: &[EnrichedRule], top_n: usize) -> Vec<String> {
    let mut distinct: HashMap<&str, HashSet<&str>> = HashMap::new();
    for r in rules.iter().filter(|r| !r.rule.is_self_loop()) {
        distinct.entry(r.antecedent()).or_default().insert(r.consequent());
    }
    distinct
        .into_iter()
        .filter(|(_, consequents)| consequents.len() >= top_n)
        .map(|(antecedent, _)| antecedent.to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
