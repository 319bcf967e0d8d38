//! Ranking of one item's recommendations and grouping for display.

use std::cmp::Ordering;

use indexmap::IndexMap;
use tracing::debug;

use crate::config::{GroupBy, RecommendationConfig, SortKey};
use crate::model::{EnrichedRule, Month};

/// Key used for rows whose grouping field is empty.
pub const UNSPECIFIED_GROUP: &str = "unspecified";

impl SortKey {
    fn value(&self, rule: &EnrichedRule) -> f64 {
        match self {
            SortKey::Confidence => rule.rule.confidence,
            SortKey::Lift => rule.rule.lift,
        }
    }
}

/// Whether `rule` involves `item` under the configured matching mode.
pub fn matches_item(rule: &EnrichedRule, item: &str, bidirectional: bool) -> bool {
    rule.antecedent() == item || (bidirectional && rule.consequent() == item)
}

/// The top `top_n` rules for `item`, best first.
///
/// Rows are matched on the antecedent, or on either side when
/// `bidirectional` is set; self-loops are dropped. Ties on the sort key
/// keep their order from `filtered`.
pub fn top_for_item(
    filtered: &[EnrichedRule],
    item: &str,
    config: &RecommendationConfig,
) -> Vec<EnrichedRule> {
    let mut candidates: Vec<&EnrichedRule> = filtered
        .iter()
        .filter(|r| matches_item(r, item, config.bidirectional))
        .filter(|r| !r.rule.is_self_loop())
        .collect();
    let matched = candidates.len();

    // Vec::sort_by is stable, which gives the tie-break rule
    candidates.sort_by(|a, b| {
        config
            .sort_by
            .value(b)
            .partial_cmp(&config.sort_by.value(a))
            .unwrap_or(Ordering::Equal)
    });
    candidates.truncate(config.top_n);

    debug!(
        item,
        matched,
        returned = candidates.len(),
        sort_by = %config.sort_by,
        "selected top recommendations"
    );
    candidates.into_iter().cloned().collect()
}

/// Split a ranked list into display groups.
///
/// `GroupBy::None` gives a single `"all"` group. Type groups are ordered
/// by tag, month groups by calendar; rows without a value go last under
/// [`UNSPECIFIED_GROUP`]. Rank order is preserved inside each group.
pub fn group_recommendations(
    ranked: &[EnrichedRule],
    group_by: GroupBy,
) -> IndexMap<String, Vec<EnrichedRule>> {
    let mut groups: IndexMap<String, Vec<EnrichedRule>> = IndexMap::new();

    match group_by {
        GroupBy::None => {
            if !ranked.is_empty() {
                groups.insert("all".to_string(), ranked.to_vec());
            }
        }
        GroupBy::Type => {
            let mut keyed: Vec<(Option<String>, &EnrichedRule)> = ranked
                .iter()
                .map(|r| (r.rule.rule_type.as_ref().map(|t| t.to_string()), r))
                .collect();
            keyed.sort_by(|a, b| group_order(&a.0, &b.0));
            for (key, rule) in keyed {
                push_group(&mut groups, key, rule);
            }
        }
        GroupBy::Month => {
            let mut keyed: Vec<(Option<Month>, &EnrichedRule)> =
                ranked.iter().map(|r| (r.rule.month, r)).collect();
            keyed.sort_by(|a, b| group_order(&a.0, &b.0));
            for (month, rule) in keyed {
                push_group(&mut groups, month.map(|m| m.to_string()), rule);
            }
        }
    }

    groups
}

/// Present keys in ascending order, missing keys last.
fn group_order<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn push_group(
    groups: &mut IndexMap<String, Vec<EnrichedRule>>,
    key: Option<String>,
    rule: &EnrichedRule,
) {
    groups
        .entry(key.unwrap_or_else(|| UNSPECIFIED_GROUP.to_string()))
        .or_default()
        .push(rule.clone());
}
