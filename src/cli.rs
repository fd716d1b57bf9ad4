//! CLI mode implementation
//!
//! Provides a command-line interface over the same search pipeline the
//! HTTP endpoints use

use clap::{Parser, Subcommand};

/// ShoeARizz search CLI
#[derive(Parser)]
#[command(name = "shoerizz-search")]
#[command(about = "Keyword product search for the ShoeARizz catalog", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output (no short flag to avoid conflicts)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Path to the product catalog JSON file
    #[arg(long, global = true, env = "SHOERIZZ_CATALOG", default_value = "catalog.json")]
    pub catalog: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a full listing search with filters and sort
    Search(SearchArgs),
    /// Run the lightweight typeahead search
    Suggest(SuggestArgs),
    /// Start the HTTP service
    Serve(ServeArgs),
}

/// Listing search arguments
#[derive(Parser, Clone, Debug)]
pub struct SearchArgs {
    /// Search terms (case-insensitive)
    #[arg(short = 'q', long)]
    pub query: String,

    /// Result ordering: relevance, price_low, price_high, az, newness
    #[arg(short = 's', long)]
    pub sort: Option<String>,

    /// Restrict to one category
    #[arg(long)]
    pub category: Option<String>,

    /// Restrict to one brand
    #[arg(long)]
    pub brand: Option<String>,

    /// Restrict to one color
    #[arg(long)]
    pub color: Option<String>,

    /// Lower price bound
    #[arg(long)]
    pub price_min: Option<f64>,

    /// Upper price bound
    #[arg(long)]
    pub price_max: Option<f64>,

    /// Maximum number of results
    #[arg(short = 'l', long)]
    pub limit: Option<usize>,
}

/// Typeahead search arguments
#[derive(Parser, Clone, Debug)]
pub struct SuggestArgs {
    /// Search terms (case-insensitive)
    #[arg(short = 'q', long)]
    pub query: String,

    /// Maximum number of results
    #[arg(short = 'l', long)]
    pub limit: Option<usize>,
}

/// HTTP service arguments
#[derive(Parser, Clone, Debug)]
pub struct ServeArgs {
    /// Socket address to listen on
    #[arg(long, env = "SHOERIZZ_ADDR", default_value = "127.0.0.1:8080")]
    pub addr: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_command_parses() {
        let cli = Cli::parse_from([
            "shoerizz-search",
            "search",
            "-q",
            "running shoes",
            "--sort",
            "price_low",
            "--color",
            "Blue",
            "--price-max",
            "150",
        ]);
        match cli.command {
            Some(Commands::Search(args)) => {
                assert_eq!(args.query, "running shoes");
                assert_eq!(args.sort.as_deref(), Some("price_low"));
                assert_eq!(args.color.as_deref(), Some("Blue"));
                assert_eq!(args.price_max, Some(150.0));
                assert_eq!(args.price_min, None);
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn test_suggest_command_parses() {
        let cli = Cli::parse_from(["shoerizz-search", "suggest", "-q", "b", "-l", "5"]);
        match cli.command {
            Some(Commands::Suggest(args)) => {
                assert_eq!(args.query, "b");
                assert_eq!(args.limit, Some(5));
            }
            _ => panic!("expected suggest command"),
        }
    }

    #[test]
    fn test_global_flags_and_defaults() {
        let cli = Cli::parse_from(["shoerizz-search", "--verbose", "serve"]);
        assert!(cli.verbose);
        assert!(!cli.quiet);
        assert_eq!(cli.catalog, "catalog.json");
        match cli.command {
            Some(Commands::Serve(args)) => assert_eq!(args.addr, "127.0.0.1:8080"),
            _ => panic!("expected serve command"),
        }
    }

    #[test]
    fn test_catalog_override() {
        let cli = Cli::parse_from([
            "shoerizz-search",
            "--catalog",
            "/data/products.json",
            "suggest",
            "-q",
            "red",
        ]);
        assert_eq!(cli.catalog, "/data/products.json");
    }
}
