//! Fuzz target for the query pipeline.
//!
//! Checks the ranked list bound and self-loop removal for arbitrary
//! rule tables and thresholds.

#![no_main]

use arbitrary::Arbitrary;
use cartwise::{
    EnrichedRule, RecommendationConfig, Rule, filter_recommendations, top_for_item,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    rules: Vec<(u8, u8, u8, u8, u8)>,
    min_confidence: u8,
    min_lift: u8,
    min_frequency: u8,
    top_n: u8,
    bidirectional: bool,
    item: u8,
}

fn name(n: u8) -> String {
    format!("ITEM {}", n % 8)
}

fuzz_target!(|input: Input| {
    let table: Vec<EnrichedRule> = input
        .rules
        .iter()
        .take(500)
        .map(|&(a, c, s, conf, lift)| {
            EnrichedRule::from(Rule::new(
                name(a),
                name(c),
                f64::from(s) / 255.0,
                f64::from(conf) / 255.0,
                f64::from(lift) / 50.0,
            ))
        })
        .collect();

    let config = RecommendationConfig {
        min_confidence: f64::from(input.min_confidence) / 255.0,
        min_lift: f64::from(input.min_lift) / 50.0,
        min_consequent_frequency: usize::from(input.min_frequency % 8),
        top_n: usize::from(input.top_n % 12) + 1,
        bidirectional: input.bidirectional,
        ..RecommendationConfig::permissive()
    };

    let pool = filter_recommendations(&table, &config);
    let top = top_for_item(&pool.rules, &name(input.item), &config);

    assert!(top.len() <= config.top_n);
    assert!(top.iter().all(|r| r.antecedent() != r.consequent()));
});
