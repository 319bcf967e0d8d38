//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use cartwise::{GroupBy, JoinKey, MonthFilter, RecommendationConfig, SortKey, TypeFilter};

/// Cartwise: market-basket recommendations from association rules
#[derive(Parser)]
#[command(name = "cartwise")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank recommendations for one item
    Recommend {
        #[command(flatten)]
        inputs: InputArgs,

        #[command(flatten)]
        query: QueryArgs,

        /// Item to recommend for (default: first available item)
        #[arg(short, long)]
        item: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,

        /// Write the output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the items a query can recommend for
    Items {
        #[command(flatten)]
        inputs: InputArgs,

        #[command(flatten)]
        query: QueryArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show monthly confidence for an item's recommendations
    Trend {
        #[command(flatten)]
        inputs: InputArgs,

        #[command(flatten)]
        query: QueryArgs,

        /// Item to chart
        #[arg(short, long)]
        item: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarize transaction lines per product
    Sales {
        /// Path to the transaction file (CSV/TSV)
        #[arg(long, value_name = "FILE")]
        sales: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,

        /// Show at most this many products in table output
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show load statistics and join coverage
    Inspect {
        #[command(flatten)]
        inputs: InputArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the default recommendation config as JSON
    InitConfig {
        /// Destination path
        #[arg(value_name = "PATH", default_value = "cartwise.json")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// The two input tables.
#[derive(Args, Clone, Debug)]
pub struct InputArgs {
    /// Path to the association rules file (CSV/TSV)
    #[arg(long, value_name = "FILE")]
    pub rules: PathBuf,

    /// Path to the transaction file (CSV/TSV)
    #[arg(long, value_name = "FILE")]
    pub sales: PathBuf,

    /// Rule side matched against sales descriptions
    #[arg(long, default_value = "consequent")]
    pub join_on: JoinKey,
}

/// Query settings; flags override values read from `--config`.
#[derive(Args, Clone, Debug, Default)]
pub struct QueryArgs {
    /// JSON config file with recommendation settings
    #[arg(short, long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Month to keep (name, abbreviation, 1-12 or "any")
    #[arg(long)]
    pub month: Option<MonthFilter>,

    /// Rule type to keep (e.g. color_swap, cross_category, or "all")
    #[arg(long = "type", value_name = "TYPE")]
    pub rule_type: Option<TypeFilter>,

    /// Minimum confidence (0-1)
    #[arg(long)]
    pub min_confidence: Option<f64>,

    /// Minimum lift
    #[arg(long)]
    pub min_lift: Option<f64>,

    /// Minimum support (0-1)
    #[arg(long)]
    pub min_support: Option<f64>,

    /// Minimum distinct consequents per antecedent
    #[arg(long)]
    pub min_frequency: Option<usize>,

    /// Keep rules whose SKU contains this text
    #[arg(long)]
    pub sku: Option<String>,

    /// Keep rules whose consequent contains this text
    #[arg(long)]
    pub keyword: Option<String>,

    /// Match the item on either side of a rule
    #[arg(long)]
    pub bidirectional: bool,

    /// Number of recommendations to show
    #[arg(short = 'n', long)]
    pub top_n: Option<usize>,

    /// Ranking metric (confidence, lift)
    #[arg(long)]
    pub sort_by: Option<SortKey>,

    /// Group results by (none, type, month)
    #[arg(long)]
    pub group_by: Option<GroupBy>,
}

impl QueryArgs {
    /// Build the recommendation config: file values first, then flags.
    pub fn resolve(&self) -> cartwise::Result<RecommendationConfig> {
        let mut config = match &self.config {
            Some(path) => RecommendationConfig::load(path)?,
            None => RecommendationConfig::default(),
        };

        if let Some(month) = self.month {
            config.month = month;
        }
        if let Some(rule_type) = &self.rule_type {
            config.rule_type = rule_type.clone();
        }
        if let Some(v) = self.min_confidence {
            config.min_confidence = v;
        }
        if let Some(v) = self.min_lift {
            config.min_lift = v;
        }
        if let Some(v) = self.min_support {
            config.min_support = v;
        }
        if let Some(v) = self.min_frequency {
            config.min_consequent_frequency = v;
        }
        if let Some(sku) = &self.sku {
            config.sku_contains = sku.clone();
        }
        if let Some(keyword) = &self.keyword {
            config.keyword = keyword.clone();
        }
        if self.bidirectional {
            config.bidirectional = true;
        }
        if let Some(n) = self.top_n {
            config.top_n = n;
        }
        if let Some(sort_by) = self.sort_by {
            config.sort_by = sort_by;
        }
        if let Some(group_by) = self.group_by {
            config.group_by = group_by;
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use table, csv, or json.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
