//! Cartwise CLI - market-basket recommendations from association rules.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Recommend {
            inputs,
            query,
            item,
            format,
            output,
        } => commands::recommend::run(inputs, query, item, format, output, cli.verbose),

        Commands::Items {
            inputs,
            query,
            json,
        } => commands::items::run(inputs, query, json, cli.verbose),

        Commands::Trend {
            inputs,
            query,
            item,
            json,
        } => commands::trend::run(inputs, query, item, json, cli.verbose),

        Commands::Sales {
            sales,
            format,
            limit,
        } => commands::sales::run(sales, format, limit, cli.verbose),

        Commands::Inspect { inputs, json } => commands::inspect::run(inputs, json, cli.verbose),

        Commands::InitConfig { path, force } => commands::init_config::run(path, force),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
