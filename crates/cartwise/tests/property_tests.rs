//! Property-based tests for the Cartwise pipeline.
//!
//! These tests use proptest to generate random rule and sales tables and
//! verify that every stage keeps its invariants.
//!
//! # Running Property Tests
//!
//! ```bash
//! # Run all property tests
//! cargo test -p cartwise --test property_tests
//!
//! # Run with more cases (slower but more thorough)
//! PROPTEST_CASES=10000 cargo test -p cartwise --test property_tests
//! ```

use proptest::prelude::*;

use cartwise::{
    EnrichedRule, Month, RecommendationConfig, Rule, SortKey, TransactionLine,
    aggregate_sales, filter_recommendations, top_for_item,
};

// =============================================================================
// Test Strategies
// =============================================================================

/// Product names from a small pool, so rules collide often.
fn product() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("WHITE MUG".to_string()),
        Just("BLUE MUG".to_string()),
        Just("TEA PLATE".to_string()),
        Just("CAKE STAND".to_string()),
        Just("PLATE RACK".to_string()),
        Just("LANTERN".to_string()),
    ]
}

fn month() -> impl Strategy<Value = Option<Month>> {
    prop_oneof![Just(None), (1u32..=12).prop_map(Month::from_number)]
}

fn rule() -> impl Strategy<Value = EnrichedRule> {
    (
        product(),
        product(),
        month(),
        0.0f64..=0.2,
        0.0f64..=1.0,
        0.0f64..=5.0,
        prop::option::of("[0-9]{5}[A-C]?"),
    )
        .prop_map(|(a, c, month, support, confidence, lift, sku)| {
            let mut rule = Rule::new(a, c, support, confidence, lift);
            rule.month = month;
            rule.sku = sku;
            EnrichedRule::from(rule)
        })
}

fn rules() -> impl Strategy<Value = Vec<EnrichedRule>> {
    prop::collection::vec(rule(), 0..60)
}

fn config() -> impl Strategy<Value = RecommendationConfig> {
    (
        0.0f64..=0.8,
        0.0f64..=2.0,
        0.0f64..=0.1,
        0usize..5,
        1usize..6,
        any::<bool>(),
        prop_oneof![Just(SortKey::Confidence), Just(SortKey::Lift)],
        prop_oneof![Just(String::new()), Just("mug".to_string()), Just("PLATE".to_string())],
        prop_oneof![Just(String::new()), Just("2".to_string()), Just("A".to_string())],
    )
        .prop_map(
            |(min_confidence, min_lift, min_support, min_freq, top_n, bidirectional, sort_by, keyword, sku)| {
                RecommendationConfig {
                    min_confidence,
                    min_lift,
                    min_support,
                    min_consequent_frequency: min_freq,
                    top_n,
                    bidirectional,
                    sort_by,
                    keyword,
                    sku_contains: sku,
                    ..RecommendationConfig::default()
                }
            },
        )
}

fn transaction() -> impl Strategy<Value = TransactionLine> {
    (
        prop::option::of(product()),
        -10i64..50,
        0.1f64..20.0,
    )
        .prop_map(|(description, quantity, unit_price)| TransactionLine {
            description,
            quantity,
            unit_price,
            total_spent: None,
        })
}

// =============================================================================
// Filter and selection
// =============================================================================

proptest! {
    /// The ranked list never exceeds top_n and never holds a self-loop.
    #[test]
    fn top_list_is_bounded_and_loop_free(table in rules(), config in config(), item in product()) {
        let pool = filter_recommendations(&table, &config);
        let top = top_for_item(&pool.rules, &item, &config);

        prop_assert!(top.len() <= config.top_n);
        for r in &top {
            prop_assert_ne!(r.antecedent(), r.consequent());
        }
    }

    /// Ranked lists are sorted on the configured key, best first.
    #[test]
    fn top_list_is_sorted(table in rules(), config in config(), item in product()) {
        let top = top_for_item(&table, &item, &config);
        let key = |r: &EnrichedRule| match config.sort_by {
            SortKey::Confidence => r.rule.confidence,
            SortKey::Lift => r.rule.lift,
        };
        for pair in top.windows(2) {
            prop_assert!(key(&pair[0]) >= key(&pair[1]));
        }
    }

    /// Filtering a filtered pool changes nothing.
    #[test]
    fn filter_is_idempotent(table in rules(), config in config()) {
        let once = filter_recommendations(&table, &config);
        let twice = filter_recommendations(&once.rules, &config);
        prop_assert_eq!(once, twice);
    }

    /// Every offered item can fill a whole page.
    #[test]
    fn available_items_fill_a_page(table in rules(), config in config()) {
        let pool = filter_recommendations(&table, &config);
        let forward = RecommendationConfig { bidirectional: false, ..config.clone() };
        for item in &pool.available_items {
            let top = top_for_item(&pool.rules, item, &forward);
            prop_assert_eq!(top.len(), config.top_n);
        }
    }

    /// Repeated pairs keep the first row, unchanged.
    #[test]
    fn dedup_keeps_first_row(
        first in rule(),
        confidence in 0.0f64..=1.0,
        lift in 0.0f64..=5.0,
    ) {
        let mut second = first.clone();
        second.rule.confidence = confidence;
        second.rule.lift = lift;

        let config = RecommendationConfig::permissive();
        let pool = filter_recommendations(&[first.clone(), second], &config);

        prop_assert_eq!(pool.rules.len(), 1);
        prop_assert_eq!(pool.rules[0].rule.confidence, first.rule.confidence);
        prop_assert_eq!(pool.rules[0].rule.lift, first.rule.lift);
        prop_assert_eq!(pool.rules[0].rule.support, first.rule.support);
    }
}

// =============================================================================
// Sales aggregation
// =============================================================================

proptest! {
    /// Summed quantity is preserved, including the blank-description bucket.
    #[test]
    fn aggregation_conserves_quantity(lines in prop::collection::vec(transaction(), 0..80)) {
        let summary = aggregate_sales(&lines).unwrap();
        let input: i64 = lines.iter().map(|l| l.quantity).sum();
        let output: i64 = summary.iter().map(|s| s.total_items).sum();
        prop_assert_eq!(input, output);
    }

    /// One summary row per distinct description.
    #[test]
    fn aggregation_keys_are_unique(lines in prop::collection::vec(transaction(), 0..80)) {
        let summary = aggregate_sales(&lines).unwrap();
        let mut keys: Vec<Option<&str>> = summary.iter().map(|s| s.description.as_deref()).collect();
        let before = keys.len();
        keys.dedup();
        prop_assert_eq!(before, keys.len());
    }

    /// Row order does not change the result.
    #[test]
    fn aggregation_ignores_row_order(
        (lines, shuffled) in prop::collection::vec(transaction(), 0..40)
            .prop_flat_map(|lines| (Just(lines.clone()), Just(lines).prop_shuffle()))
    ) {
        prop_assert_eq!(aggregate_sales(&lines).unwrap(), aggregate_sales(&shuffled).unwrap());
    }
}
