//! Main Cartwise struct and public API.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{CatalogOptions, RuleClassifier, normalize_rules, rules_from_table};
use crate::config::RecommendationConfig;
use crate::error::Result;
use crate::explain::{Explanation, ItemSales, explain_all, sales_for_item};
use crate::filter::filter_recommendations;
use crate::input::{DataTable, Parser, ParserConfig, SourceMetadata};
use crate::merge::{JoinAmbiguityWarning, JoinKey, merge};
use crate::model::{EnrichedRule, Rule, SalesSummary};
use crate::sales::{aggregate_sales, transactions_from_table};
use crate::select::{group_recommendations, top_for_item};
use crate::trend::{TrendSeries, trend_for_item};

/// Configuration for loading inputs.
#[derive(Debug, Clone, Default)]
pub struct CartwiseConfig {
    /// Parser configuration, shared by both input files.
    pub parser: ParserConfig,
    /// Rule normalization options.
    pub catalog: CatalogOptions,
    /// Side of each rule matched against sales descriptions.
    pub join_key: JoinKey,
}

/// Counts describing a loaded workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadSummary {
    /// Rows in the rules file.
    pub raw_rules: usize,
    /// Rules left after normalization.
    pub catalog_rules: usize,
    /// Distinct antecedents in the catalog.
    pub antecedents: usize,
    /// Transaction lines in the sales file.
    pub transaction_lines: usize,
    /// Products in the sales summary.
    pub products: usize,
    /// Rules that matched a sales row.
    pub matched_rules: usize,
    /// Share of rules that matched a sales row (0.0-1.0).
    pub join_coverage: f64,
}

/// Loaded, immutable inputs ready to be queried.
///
/// Every query borrows these tables; nothing in a `Workspace` changes
/// after loading, so one instance can serve any number of queries.
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Metadata of the rules file, when loaded from disk.
    pub rules_source: Option<SourceMetadata>,
    /// Metadata of the sales file, when loaded from disk.
    pub sales_source: Option<SourceMetadata>,
    /// Rules as read, before deduplication. Trends chart these so
    /// repeated monthly rows collapse by max confidence.
    pub monthly_rules: Vec<Rule>,
    /// Normalized rule catalog.
    pub catalog: Vec<Rule>,
    /// Per-product sales summary.
    pub sales: Vec<SalesSummary>,
    /// Catalog joined with sales.
    pub enriched: Vec<EnrichedRule>,
    /// Ambiguous sales joins found while merging.
    pub warnings: Vec<JoinAmbiguityWarning>,
    /// Load statistics.
    pub summary: LoadSummary,
}

/// Result of one recommendation query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    /// The item the list was built for; `None` when nothing is available.
    pub selected_item: Option<String>,
    /// Items the picker can offer under the query's filters.
    pub available_items: Vec<String>,
    /// Rules left in the filtered pool.
    pub pool_size: usize,
    /// Ranked recommendations.
    pub top: Vec<EnrichedRule>,
    /// Ranked recommendations split by the configured grouping.
    pub groups: IndexMap<String, Vec<EnrichedRule>>,
    /// One sentence per recommendation.
    pub explanations: Vec<Explanation>,
    /// Monthly confidence for each recommended consequent.
    pub trend: IndexMap<String, TrendSeries>,
    /// Sales of products recommended from the selected item.
    pub item_sales: Vec<ItemSales>,
}

impl Recommendation {
    pub fn is_empty(&self) -> bool {
        self.top.is_empty()
    }
}

/// The main Cartwise engine.
pub struct Cartwise {
    config: CartwiseConfig,
    parser: Parser,
}

impl Cartwise {
    /// Create a new Cartwise instance with default configuration.
    pub fn new() -> Self {
        Self::with_config(CartwiseConfig::default())
    }

    /// Create a Cartwise instance with custom configuration.
    pub fn with_config(config: CartwiseConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        Self { config, parser }
    }

    /// Use a different strategy to derive missing rule types.
    pub fn with_classifier(mut self, classifier: impl RuleClassifier + 'static) -> Self {
        self.config.catalog = self.config.catalog.with_classifier(classifier);
        self
    }

    /// Join sales on a different side of each rule.
    pub fn with_join_key(mut self, join_key: JoinKey) -> Self {
        self.config.join_key = join_key;
        self
    }

    pub fn config(&self) -> &CartwiseConfig {
        &self.config
    }

    /// Read both files and build a workspace.
    ///
    /// Schema problems in either file surface here, before any filtering.
    pub fn load(
        &self,
        rules_path: impl AsRef<Path>,
        sales_path: impl AsRef<Path>,
    ) -> Result<Workspace> {
        let (rules_table, rules_source) = self.parser.parse_file(rules_path)?;
        let (sales_table, sales_source) = self.parser.parse_file(sales_path)?;

        let mut workspace = self.load_tables(&rules_table, &sales_table)?;
        info!(
            rules = %rules_source.file,
            sales = %sales_source.file,
            catalog = workspace.catalog.len(),
            products = workspace.sales.len(),
            "loaded workspace"
        );
        workspace.rules_source = Some(rules_source);
        workspace.sales_source = Some(sales_source);
        Ok(workspace)
    }

    /// Build a workspace from tables already in memory.
    pub fn load_tables(&self, rules: &DataTable, sales: &DataTable) -> Result<Workspace> {
        let monthly_rules = rules_from_table(rules)?;
        let catalog = normalize_rules(monthly_rules.clone(), &self.config.catalog);
        let lines = transactions_from_table(sales)?;
        let summary_rows = aggregate_sales(&lines)?;
        let merged = merge(&catalog, &summary_rows, self.config.join_key);

        let matched_rules = merged.matched();
        let antecedents = catalog
            .iter()
            .map(|r| r.antecedent.as_str())
            .collect::<std::collections::HashSet<_>>()
            .len();

        let summary = LoadSummary {
            raw_rules: rules.row_count(),
            catalog_rules: catalog.len(),
            antecedents,
            transaction_lines: lines.len(),
            products: summary_rows.len(),
            matched_rules,
            join_coverage: if catalog.is_empty() {
                0.0
            } else {
                matched_rules as f64 / catalog.len() as f64
            },
        };

        Ok(Workspace {
            rules_source: None,
            sales_source: None,
            monthly_rules,
            catalog,
            sales: summary_rows,
            enriched: merged.rules,
            warnings: merged.warnings,
            summary,
        })
    }
}

impl Default for Cartwise {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    /// Run the full query pipeline.
    ///
    /// When `item` is `None`, or names an item the filters do not offer,
    /// the first available item is used, as the dashboard's picker does.
    pub fn recommend(
        &self,
        config: &RecommendationConfig,
        item: Option<&str>,
    ) -> Result<Recommendation> {
        config.validate()?;

        let pool = filter_recommendations(&self.enriched, config);

        let selected_item = match item {
            Some(wanted) if pool.offers(wanted) => Some(wanted.to_string()),
            Some(wanted) => {
                debug!(item = wanted, "requested item not offered; using first available");
                pool.available_items.first().cloned()
            }
            None => pool.available_items.first().cloned(),
        };

        let Some(selected) = selected_item.clone() else {
            return Ok(Recommendation {
                selected_item: None,
                available_items: pool.available_items,
                pool_size: pool.rules.len(),
                top: Vec::new(),
                groups: IndexMap::new(),
                explanations: Vec::new(),
                trend: IndexMap::new(),
                item_sales: Vec::new(),
            });
        };

        let top = top_for_item(&pool.rules, &selected, config);
        let consequents: Vec<String> = top.iter().map(|r| r.consequent().to_string()).collect();

        Ok(Recommendation {
            selected_item,
            pool_size: pool.rules.len(),
            groups: group_recommendations(&top, config.group_by),
            explanations: explain_all(&top, &selected),
            trend: trend_for_item(&self.monthly_rules, &selected, &consequents),
            item_sales: sales_for_item(&self.enriched, &selected),
            available_items: pool.available_items,
            top,
        })
    }

    /// The items a query would offer, without ranking anything.
    pub fn available_items(&self, config: &RecommendationConfig) -> Result<Vec<String>> {
        config.validate()?;
        Ok(filter_recommendations(&self.enriched, config).available_items)
    }

    /// Monthly trend for an explicit item and consequent list.
    pub fn trend(&self, item: &str, consequents: &[String]) -> IndexMap<String, TrendSeries> {
        trend_for_item(&self.monthly_rules, item, consequents)
    }
}
