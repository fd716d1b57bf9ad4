//! ShoeARizz search service & CLI
//!
//! Dual-mode application:
//! - Server mode (default): HTTP service exposing the search endpoints
//! - CLI mode: command-line utility running the same pipeline directly
//!
//! Both modes load the product catalog from a JSON file and share one
//! `SearchEngine` over it.

mod catalog;
mod cli;
mod error;
mod search;
mod server;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing::info;

use catalog::{Filters, MemoryStore};
use search::{SearchEngine, SearchRequest, SortMode};

#[tokio::main]
async fn main() -> Result<()> {
    // Detect mode: CLI if args present, HTTP server otherwise
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        run_cli_mode().await
    } else {
        run_server_mode().await
    }
}

/// Run in CLI mode
async fn run_cli_mode() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity flags
    let log_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr) // Log to stderr to keep stdout clean
        .init();

    let result = match cli.command {
        Some(Commands::Search(args)) => execute_search_cli(&cli.catalog, args),
        Some(Commands::Suggest(args)) => execute_suggest_cli(&cli.catalog, args),
        Some(Commands::Serve(args)) => {
            return execute_serve_cli(&cli.catalog, args).await;
        }
        None => {
            eprintln!("Error: No command specified. Use --help for usage information.");
            std::process::exit(1);
        }
    };

    match result {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(get_exit_code(&e));
        }
    }
}

fn load_engine(catalog_path: &str) -> Result<SearchEngine<MemoryStore>> {
    let store = MemoryStore::from_json_file(catalog_path)
        .map_err(|e| anyhow::anyhow!(error::AppError::from(e).message()))?;
    info!("loaded {} products from {}", store.len(), catalog_path);
    Ok(SearchEngine::new(store))
}

/// Execute the listing search in CLI mode
fn execute_search_cli(catalog_path: &str, args: cli::SearchArgs) -> Result<String> {
    error::validate_query(&args.query).map_err(|e| anyhow::anyhow!(e.message()))?;
    let engine = load_engine(catalog_path)?;

    let request = SearchRequest {
        query: args.query,
        sort: args.sort.as_deref().map(SortMode::parse).unwrap_or_default(),
        filters: Filters {
            category: args.category,
            brand: args.brand,
            color: args.color,
            price_min: args.price_min,
            price_max: args.price_max,
        },
        limit: args.limit,
    };

    let outcome = engine
        .search(&request)
        .map_err(|e| anyhow::anyhow!(error::AppError::from(e).message()))?;
    Ok(serde_json::to_string_pretty(&outcome)?)
}

/// Execute the typeahead search in CLI mode
fn execute_suggest_cli(catalog_path: &str, args: cli::SuggestArgs) -> Result<String> {
    error::validate_query(&args.query).map_err(|e| anyhow::anyhow!(e.message()))?;
    let engine = load_engine(catalog_path)?;

    let limit = args.limit.unwrap_or(search::engine::DEFAULT_SUGGEST_LIMIT);
    let quick = engine
        .quick_search(&args.query, limit)
        .map_err(|e| anyhow::anyhow!(error::AppError::from(e).message()))?;
    Ok(serde_json::to_string_pretty(&quick)?)
}

/// Start the HTTP service from the CLI
async fn execute_serve_cli(catalog_path: &str, args: cli::ServeArgs) -> Result<()> {
    let addr: SocketAddr = args
        .addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid listen address {:?}: {}", args.addr, e))?;
    let engine = Arc::new(load_engine(catalog_path)?);
    server::serve(addr, engine)
        .await
        .map_err(|e| anyhow::anyhow!(e.message()))?;
    Ok(())
}

/// Map errors to exit codes
fn get_exit_code(err: &anyhow::Error) -> i32 {
    let err_str = err.to_string().to_lowercase();

    if err_str.contains("invalid") || err_str.contains("usage") {
        1 // Invalid arguments or usage error
    } else if err_str.contains("unavailable") || err_str.contains("connection") {
        2 // Catalog or store error
    } else if err_str.contains("not found") {
        3 // Not found error
    } else {
        5 // Other application errors
    }
}

/// Run in HTTP server mode with environment defaults
async fn run_server_mode() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting ShoeARizz search service");

    let catalog_path =
        std::env::var("SHOERIZZ_CATALOG").unwrap_or_else(|_| "catalog.json".to_string());
    let addr: SocketAddr = std::env::var("SHOERIZZ_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid listen address: {}", e))?;

    let engine = Arc::new(load_engine(&catalog_path)?);
    server::serve(addr, engine)
        .await
        .map_err(|e| anyhow::anyhow!(e.message()))?;

    Ok(())
}
