//! Integration tests for the Cartwise pipeline.

use std::io::Write;
use tempfile::NamedTempFile;

use cartwise::export::recommendations_to_csv;
use cartwise::{
    Cartwise, CartwiseConfig, CartwiseError, CatalogOptions, EnrichedRule, GroupBy, JoinKey,
    Month, MonthFilter, RecommendationConfig, Rule, RuleType, SortKey, TransactionLine,
    TypeFilter, aggregate_sales, filter_recommendations, top_for_item, trend_for_item,
};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

fn permissive(top_n: usize) -> RecommendationConfig {
    RecommendationConfig {
        top_n,
        ..RecommendationConfig::permissive()
    }
}

const RULES: &str = "antecedent,consequent,Month,type,SKU,support,confidence,lift\n\
    WHITE MUG,BLUE MUG,January,color_swap,84029E,0.03,0.8,3.1\n\
    WHITE MUG,TEA PLATE,January,cross_category,22423,0.02,0.6,2.0\n\
    WHITE MUG,TEA PLATE,March,cross_category,22423,0.02,0.7,2.2\n\
    WHITE MUG,CAKE STAND,March,,22457,0.01,0.45,1.3\n\
    TEA PLATE,WHITE MUG,January,cross_category,84029E,0.02,0.5,1.9\n\
    TEA PLATE,TEA PLATE,January,variant,22423,0.05,0.95,4.0\n";

const SALES: &str = "InvoiceNo,Description,Quantity,UnitPrice\n\
    536365,BLUE MUG,6,2.55\n\
    536366,BLUE MUG,2,2.55\n\
    536367,TEA PLATE,12,1.65\n\
    536368,WHITE MUG,3,2.10\n\
    536369,,4,0.85\n";

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_load_from_files() {
    let rules = create_test_file(RULES);
    let sales = create_test_file(SALES);

    let workspace = Cartwise::new()
        .load(rules.path(), sales.path())
        .expect("Load failed");

    let rules_source = workspace.rules_source.as_ref().unwrap();
    assert_eq!(rules_source.format, "csv");
    assert_eq!(rules_source.row_count, 6);
    assert!(rules_source.hash.starts_with("sha256:"));

    assert_eq!(workspace.summary.catalog_rules, 6);
    assert_eq!(workspace.summary.transaction_lines, 5);
    // BLUE MUG, TEA PLATE, WHITE MUG and the blank bucket
    assert_eq!(workspace.summary.products, 4);
    assert_eq!(workspace.summary.matched_rules, 5);
}

#[test]
fn test_tab_delimited_inputs() {
    let rules = create_test_file(&RULES.replace(',', "\t"));
    let sales = create_test_file(&SALES.replace(',', "\t"));

    let workspace = Cartwise::new()
        .load(rules.path(), sales.path())
        .expect("Load failed");
    assert_eq!(workspace.rules_source.unwrap().format, "tsv");
    assert_eq!(workspace.catalog.len(), 6);
}

#[test]
fn test_missing_columns_reported_together() {
    let rules = create_test_file("antecedent,consequent,support\nA,B,0.1\n");
    let sales = create_test_file(SALES);

    let err = Cartwise::new().load(rules.path(), sales.path()).unwrap_err();
    match &err {
        CartwiseError::Schema { table, missing } => {
            assert_eq!(table, "rules");
            assert_eq!(missing, &vec!["confidence".to_string(), "lift".to_string()]);
        }
        other => panic!("expected schema error, got {other:?}"),
    }
    assert!(err.to_string().contains("confidence, lift"));
}

#[test]
fn test_out_of_range_metric_is_rejected() {
    let rules = create_test_file("antecedent,consequent,support,confidence,lift\nA,B,0.1,1.7,2.0\n");
    let sales = create_test_file(SALES);

    let err = Cartwise::new().load(rules.path(), sales.path()).unwrap_err();
    assert!(matches!(err, CartwiseError::Parse { row: 1, .. }));
}

#[test]
fn test_missing_file() {
    let sales = create_test_file(SALES);
    let err = Cartwise::new()
        .load("/nonexistent/rules.csv", sales.path())
        .unwrap_err();
    assert!(matches!(err, CartwiseError::Io { .. }));
}

#[test]
fn test_header_only_inputs_give_empty_workspace() {
    let rules = create_test_file("antecedent,consequent,support,confidence,lift\n");
    let sales = create_test_file("Description,Quantity,UnitPrice\n");

    let workspace = Cartwise::new()
        .load(rules.path(), sales.path())
        .expect("Load failed");
    let result = workspace.recommend(&permissive(1), None).unwrap();

    assert!(workspace.catalog.is_empty());
    assert!(result.selected_item.is_none());
    assert!(result.is_empty());
}

// =============================================================================
// Recommendation queries
// =============================================================================

#[test]
fn test_recommend_end_to_end() {
    let rules = create_test_file(RULES);
    let sales = create_test_file(SALES);
    let workspace = Cartwise::new().load(rules.path(), sales.path()).unwrap();

    let config = RecommendationConfig {
        min_consequent_frequency: 2,
        top_n: 3,
        ..RecommendationConfig::permissive()
    };
    let result = workspace.recommend(&config, Some("WHITE MUG")).unwrap();

    assert_eq!(result.available_items, vec!["WHITE MUG".to_string()]);
    let names: Vec<&str> = result.top.iter().map(|r| r.consequent()).collect();
    assert_eq!(names, vec!["BLUE MUG", "TEA PLATE", "CAKE STAND"]);

    // first (January) TEA PLATE row wins the filter's dedup
    assert_eq!(result.top[1].rule.month, Some(Month::January));
    assert_eq!(result.top[0].total_items(), Some(8));

    // trend reads the unfiltered table, so March is still visible
    let plate = &result.trend["TEA PLATE"];
    assert_eq!(plate[Month::January.index()].confidence, Some(0.6));
    assert_eq!(plate[Month::March.index()].confidence, Some(0.7));

    assert_eq!(
        result.explanations[0].to_string(),
        "If someone buys WHITE MUG, they often buy BLUE MUG (confidence: 0.80, lift: 3.10)"
    );
}

#[test]
fn test_month_and_type_filters() {
    let rules = create_test_file(RULES);
    let sales = create_test_file(SALES);
    let workspace = Cartwise::new().load(rules.path(), sales.path()).unwrap();

    let config = RecommendationConfig {
        month: MonthFilter::Only(Month::March),
        rule_type: TypeFilter::Only(RuleType::CrossCategory),
        ..permissive(1)
    };
    let items = workspace.available_items(&config).unwrap();
    assert_eq!(items, vec!["WHITE MUG".to_string()]);

    let result = workspace.recommend(&config, None).unwrap();
    assert_eq!(result.top.len(), 1);
    assert_eq!(result.top[0].rule.confidence, 0.7);
}

#[test]
fn test_keyword_and_sku_filters() {
    let rules = create_test_file(RULES);
    let sales = create_test_file(SALES);
    let workspace = Cartwise::new().load(rules.path(), sales.path()).unwrap();

    let config = RecommendationConfig {
        keyword: "plate".to_string(),
        ..permissive(1)
    };
    let result = workspace.recommend(&config, Some("WHITE MUG")).unwrap();
    assert!(result.top.iter().all(|r| r.consequent() == "TEA PLATE"));

    let config = RecommendationConfig {
        sku_contains: "84029".to_string(),
        ..permissive(1)
    };
    let result = workspace.recommend(&config, None).unwrap();
    assert_eq!(result.available_items, vec!["TEA PLATE".to_string(), "WHITE MUG".to_string()]);
}

#[test]
fn test_self_loop_never_recommended() {
    let rules = create_test_file(RULES);
    let sales = create_test_file(SALES);
    let workspace = Cartwise::new().load(rules.path(), sales.path()).unwrap();

    let config = RecommendationConfig {
        bidirectional: true,
        ..permissive(1)
    };
    let result = workspace.recommend(&config, Some("TEA PLATE")).unwrap();
    assert!(!result.top.is_empty());
    assert!(result.top.iter().all(|r| !r.rule.is_self_loop()));
}

#[test]
fn test_group_by_type_and_sort_by_lift() {
    let rules = create_test_file(RULES);
    let sales = create_test_file(SALES);
    let workspace = Cartwise::new().load(rules.path(), sales.path()).unwrap();

    let config = RecommendationConfig {
        sort_by: SortKey::Lift,
        group_by: GroupBy::Type,
        ..permissive(3)
    };
    let result = workspace.recommend(&config, Some("WHITE MUG")).unwrap();
    let keys: Vec<&str> = result.groups.keys().map(String::as_str).collect();
    // CAKE STAND has no type cell; it is derived as cross_category
    assert_eq!(keys, vec!["color_swap", "cross_category"]);
    assert_eq!(result.groups["cross_category"].len(), 2);
    assert_eq!(result.top[0].rule.lift, 3.1);
}

#[test]
fn test_untyped_rules_without_derivation() {
    let rules = create_test_file(RULES);
    let sales = create_test_file(SALES);
    let config = CartwiseConfig {
        catalog: CatalogOptions::without_derivation(),
        ..CartwiseConfig::default()
    };
    let workspace = Cartwise::with_config(config)
        .load(rules.path(), sales.path())
        .unwrap();

    let query = RecommendationConfig {
        group_by: GroupBy::Type,
        ..permissive(3)
    };
    let result = workspace.recommend(&query, Some("WHITE MUG")).unwrap();
    assert_eq!(result.groups["unspecified"].len(), 1);
    assert_eq!(result.groups["unspecified"][0].consequent(), "CAKE STAND");

    let typed_only = RecommendationConfig {
        rule_type: TypeFilter::Only(RuleType::ColorSwap),
        ..permissive(1)
    };
    let result = workspace.recommend(&typed_only, Some("WHITE MUG")).unwrap();
    assert_eq!(result.top.len(), 1);
    assert_eq!(result.top[0].consequent(), "BLUE MUG");
}

#[test]
fn test_join_on_antecedent() {
    let rules = create_test_file(RULES);
    let sales = create_test_file(SALES);
    let workspace = Cartwise::new()
        .with_join_key(JoinKey::Antecedent)
        .load(rules.path(), sales.path())
        .unwrap();

    let white_mug_rows: Vec<&EnrichedRule> = workspace
        .enriched
        .iter()
        .filter(|r| r.antecedent() == "WHITE MUG")
        .collect();
    assert!(white_mug_rows.iter().all(|r| r.total_items() == Some(3)));
}

#[test]
fn test_export_csv() {
    let rules = create_test_file(RULES);
    let sales = create_test_file(SALES);
    let workspace = Cartwise::new().load(rules.path(), sales.path()).unwrap();
    let result = workspace.recommend(&permissive(3), Some("WHITE MUG")).unwrap();

    let csv = recommendations_to_csv(&result.top).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "consequent,support,confidence,lift,total_items,price,total_spent");
    assert!(lines[3].starts_with("CAKE STAND,0.01,0.45,1.3,"));
    assert!(lines[3].ends_with(",,,"));
}

// =============================================================================
// Reference scenarios
// =============================================================================

#[test]
fn test_threshold_then_dedup_scenario() {
    let enriched: Vec<EnrichedRule> = vec![
        Rule::new("A", "B", 0.02, 0.5, 1.5),
        Rule::new("A", "B", 0.03, 0.9, 2.0),
        Rule::new("A", "C", 0.01, 0.3, 1.1),
    ]
    .into_iter()
    .map(EnrichedRule::from)
    .collect();

    let config = RecommendationConfig {
        min_confidence: 0.4,
        min_lift: 1.2,
        min_support: 0.01,
        min_consequent_frequency: 1,
        top_n: 5,
        sort_by: SortKey::Confidence,
        bidirectional: false,
        ..RecommendationConfig::default()
    };

    let pool = filter_recommendations(&enriched, &config);
    let top = top_for_item(&pool.rules, "A", &config);

    assert_eq!(top.len(), 1);
    assert_eq!(top[0].consequent(), "B");
    assert_eq!(top[0].rule.confidence, 0.5);
}

#[test]
fn test_aggregate_scenario() {
    let lines = vec![
        TransactionLine::new("Mug", 2, 3.0),
        TransactionLine::new("Mug", 1, 3.0),
        TransactionLine::new("Plate", 5, 2.0),
    ];
    let summary = aggregate_sales(&lines).unwrap();

    assert_eq!(summary.len(), 2);
    assert_eq!(summary[0].description.as_deref(), Some("Mug"));
    assert_eq!(summary[0].total_items, 3);
    assert_eq!(summary[0].price, 3.0);
    assert_eq!(summary[0].total_spent, 9.0);
    assert_eq!(summary[1].description.as_deref(), Some("Plate"));
    assert_eq!(summary[1].total_items, 5);
    assert_eq!(summary[1].price, 2.0);
    assert_eq!(summary[1].total_spent, 10.0);
}

#[test]
fn test_bidirectional_scenario() {
    let enriched: Vec<EnrichedRule> = vec![
        Rule::new("A", "X", 0.1, 0.6, 1.5),
        Rule::new("X", "Y", 0.1, 0.7, 1.5),
    ]
    .into_iter()
    .map(EnrichedRule::from)
    .collect();

    let config = RecommendationConfig {
        bidirectional: true,
        ..permissive(10)
    };
    let top = top_for_item(&enriched, "X", &config);
    assert_eq!(top.len(), 2);
}

#[test]
fn test_trend_max_scenario() {
    let enriched: Vec<EnrichedRule> = vec![
        Rule::new("A", "B", 0.1, 0.4, 1.5).with_month(Month::March),
        Rule::new("A", "B", 0.1, 0.6, 1.5).with_month(Month::March),
    ]
    .into_iter()
    .map(EnrichedRule::from)
    .collect();

    let trend = trend_for_item(&enriched, "A", &["B".to_string()]);
    let series = &trend["B"];
    for point in series {
        if point.month == Month::March {
            assert_eq!(point.confidence, Some(0.6));
        } else {
            assert_eq!(point.confidence, None);
        }
    }
}

#[test]
fn test_trend_max_scenario_from_files() {
    let rules = create_test_file(
        "antecedent,consequent,Month,support,confidence,lift\n\
         A,B,March,.02,0.4,1.5\n\
         A,B,March,.02,0.6,1.5\n",
    );
    let sales = create_test_file(SALES);
    let workspace = Cartwise::new().load(rules.path(), sales.path()).unwrap();

    let trend = workspace.trend("A", &["B".to_string()]);
    let series = &trend["B"];
    for point in series {
        if point.month == Month::March {
            assert_eq!(point.confidence, Some(0.6));
        } else {
            assert_eq!(point.confidence, None);
        }
    }
}
