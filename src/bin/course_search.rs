//! Course Search CLI
//!
//! Loads a catalog document and runs searches against it from the command
//! line.
//!
//! # CLI Commands
//!
//! - `search` - Filter the catalog (default output: one line per course)
//! - `masters` - Print the label vocabularies usable in filters
//! - `check-config` - Validate configuration and print a summary
//!
//! # Configuration
//!
//! The configuration file is chosen from:
//! 1. `--config` flag
//! 2. `COURSE_FILTER_CONFIG` environment variable
//! 3. `./course-filter.toml` in current directory
//! 4. Default configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use course_filter::config::Config;
use course_filter::query::FilterCriteria;
use course_filter::search::CourseSearch;
use course_filter::types::Attribute;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "course-search")]
#[command(version)]
#[command(about = "Multi-criteria search over a course catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file (overrides COURSE_FILTER_CONFIG env var)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override catalog document path
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter the catalog
    Search {
        /// Course identifier prefix (case-insensitive)
        #[arg(long = "id")]
        id_prefix: Option<String>,

        /// Title substring (case-insensitive)
        #[arg(long)]
        title: Option<String>,

        /// Year label (repeatable)
        #[arg(long = "year")]
        years: Vec<String>,

        /// Term label (repeatable)
        #[arg(long = "term")]
        terms: Vec<String>,

        /// Period label (repeatable)
        #[arg(long = "period")]
        periods: Vec<String>,

        /// Class format label (repeatable)
        #[arg(long = "class-format")]
        formats: Vec<String>,

        /// Maximum rows to print (overrides search.max_results)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print label vocabularies
    Masters {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Validate configuration without loading the catalog
    CheckConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

// =============================================================================
// Configuration
// =============================================================================

fn load_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let path = cli
        .config
        .clone()
        .or_else(|| std::env::var_os("COURSE_FILTER_CONFIG").map(PathBuf::from))
        .or_else(|| {
            let local = PathBuf::from("course-filter.toml");
            local.exists().then_some(local)
        });

    let mut config = match path {
        Some(path) => Config::from_file_with_env(&path)?,
        None => Config::from_env(),
    };

    if let Some(catalog) = &cli.catalog {
        config.catalog.path = catalog.clone();
    }

    config.validate()?;
    Ok(config)
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

// =============================================================================
// Command Handlers
// =============================================================================

fn cmd_check_config(config: &Config) {
    println!("Configuration is valid!");
    println!();
    println!("Catalog:");
    println!("  Path: {}", config.catalog.path.display());
    println!();
    println!("Search:");
    println!("  Parallel threshold: {}", config.search.parallel_threshold);
    match config.search.max_results {
        0 => println!("  Max results: unlimited"),
        n => println!("  Max results: {}", n),
    }
    println!();
    println!("Logging:");
    println!("  Log level: {}", config.logging.log_level);
}

fn cmd_masters(search: &CourseSearch, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let vocabularies = search.vocabularies();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&vocabularies)?),
        OutputFormat::Text => {
            for attribute in Attribute::ALL {
                println!("{} ({}):", attribute, vocabularies.labels(attribute).len());
                for (position, label) in vocabularies.labels(attribute).iter().enumerate() {
                    println!("  {:>2}  {}", position, label);
                }
            }
        },
    }
    Ok(())
}

fn cmd_search(
    search: &CourseSearch,
    criteria: &FilterCriteria,
    limit: usize,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut result = search.search(criteria);
    let total = result.len();
    result.truncate(limit);

    match format {
        OutputFormat::Json => {
            let rows: Vec<_> = result.iter().collect();
            let body = serde_json::json!({
                "total": total,
                "returned": rows.len(),
                "courses": rows,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        },
        OutputFormat::Text => {
            for record in result.iter() {
                println!(
                    "{:<10} {:<40} {:>4}  {} | {} | {} | {}",
                    record.identifier,
                    record.title,
                    record.credits,
                    record.display.year,
                    record.display.term,
                    record.display.period,
                    record.display.format
                );
            }
            println!();
            println!("{} of {} matching courses shown", result.len(), total);
        },
    }
    Ok(())
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    if let Commands::CheckConfig = cli.command {
        cmd_check_config(&config);
        return Ok(());
    }

    init_tracing(&config);
    debug!("Configuration: {:?}", config);

    let search = CourseSearch::from_config(&config.search);
    let catalog = search.load_from_path(&config.catalog.path)?;
    info!(
        "Loaded {} courses from {}",
        catalog.len(),
        config.catalog.path.display()
    );

    match cli.command {
        Commands::Masters { format } => cmd_masters(&search, format),
        Commands::Search {
            id_prefix,
            title,
            years,
            terms,
            periods,
            formats,
            limit,
            format,
        } => {
            let criteria = FilterCriteria {
                id_prefix,
                title_substring: title,
                years,
                terms,
                periods,
                formats,
            };
            let limit = limit.unwrap_or(config.search.max_results);
            cmd_search(&search, &criteria, limit, format)
        },
        Commands::CheckConfig => Ok(()),
    }
}
