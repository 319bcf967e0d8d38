//! Cartwise: association-rule filtering and recommendation ranking.
//!
//! Cartwise loads a table of mined market-basket rules and a table of raw
//! transaction lines, joins them, and answers "what else do buyers of this
//! item take home?" under a configurable set of thresholds.
//!
//! # Pipeline
//!
//! - **Catalog**: parse, validate, type and deduplicate rules
//! - **Sales**: aggregate transaction lines per product
//! - **Merge**: attach sales figures to each rule
//! - **Filter / Select**: gate the pool, then rank one item's rules
//! - **Trend / Explain / Export**: present the result
//!
//! # Example
//!
//! ```no_run
//! use cartwise::{Cartwise, RecommendationConfig};
//!
//! let workspace = Cartwise::new()
//!     .load("association_rules.csv", "online_retail.csv")
//!     .unwrap();
//!
//! let result = workspace
//!     .recommend(&RecommendationConfig::default(), None)
//!     .unwrap();
//!
//! for explanation in &result.explanations {
//!     println!("{}", explanation);
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod explain;
pub mod export;
pub mod filter;
pub mod input;
pub mod merge;
pub mod model;
pub mod sales;
pub mod schema;
pub mod select;
pub mod trend;

mod cartwise;

pub use crate::cartwise::{Cartwise, CartwiseConfig, LoadSummary, Recommendation, Workspace};
pub use catalog::{
    CatalogOptions, LeadingTokenClassifier, RuleClassifier, TypeVocabulary,
    load_and_normalize_rules,
};
pub use config::{GroupBy, RecommendationConfig, SortKey};
pub use error::{CartwiseError, Result};
pub use explain::{Direction, Explanation, ItemSales};
pub use filter::{FilteredPool, filter_recommendations};
pub use input::{DataTable, Parser, ParserConfig, SourceMetadata};
pub use merge::{JoinAmbiguityWarning, JoinKey, Merged, merge};
pub use model::{
    EnrichedRule, Month, MonthFilter, Rule, RuleType, SalesFigures, SalesSummary,
    TransactionLine, TypeFilter,
};
pub use sales::aggregate_sales;
pub use select::{group_recommendations, top_for_item};
pub use trend::{TrendPoint, TrendSeries, trend_for_item};
