//! readiego-query - Query the book recommendation API
//!
//! Unix-style tool that runs one request against the recommendation backend
//! and prints the result as text or JSON.

use clap::{Parser, Subcommand, ValueEnum};
use libreadiego::config::resolve_config_path;
use libreadiego::present::{self, BookCard};
use libreadiego::service::query::STATISTICS_ERROR;
use libreadiego::service::view;
use libreadiego::types::{BookSummary, QueryMode, SampleUsers, Statistics, UserRecord};
use libreadiego::{Config, ReadiegoError, ReadiegoService, Result};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "readiego-query")]
#[command(version)]
#[command(about = "Query the Readiego book recommendation API")]
#[command(long_about = "\
readiego-query - Query the Readiego book recommendation API

DESCRIPTION:
    readiego-query runs a single request against the recommendation backend
    and prints the result. Text output uses the same wording as the terminal
    UI; JSON output is meant for scripting.

COMMANDS:
    stats         Show graph statistics
    recommend     Recommend books for a user
    similar       Find books similar to a book
    books         List the books a user has rated
    book          Show the catalogue record of a book
    user          Show the record of a user
    sample-users  List users with enough ratings to try recommendations

USAGE EXAMPLES:
    # Graph statistics
    readiego-query stats

    # Ten recommendations for user 276725
    readiego-query recommend 276725

    # Five books similar to a given ISBN, as JSON
    readiego-query --top-n 5 --format json similar 0439136350

    # Books rated by a user, piped through jq
    readiego-query --format json books 11676 | jq '.[].user_rating'

    # Pick a user to try
    readiego-query sample-users

CONFIGURATION:
    Configuration file: ~/.config/readiego/config.toml

    Override with environment variables:
        READIEGO_CONFIG     - Path to config file
        READIEGO_API_URL    - API base URL (including the /api prefix)
        READIEGO_LOG_LEVEL  - Log level for stderr (default: error)
        READIEGO_LOG_FORMAT - Log format: text, json or pretty

OUTPUT FORMATS:
    text - Human-readable cards (default)
    json - Pretty-printed JSON

EXIT CODES:
    0 - Success (including empty results)
    1 - Request failed or configuration error
    3 - Invalid input (empty identifier)
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// API base URL, overriding the configuration
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Number of items requested from the recommendation endpoints
    #[arg(short = 'n', long, global = true, value_name = "N")]
    top_n: Option<usize>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    #[arg(help = "Enable verbose logging to stderr (useful for debugging)")]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show graph statistics
    Stats,

    /// Recommend books for a user
    Recommend {
        /// User ID
        user_id: String,
    },

    /// Find books similar to a book
    Similar {
        /// ISBN of the reference book
        isbn: String,
    },

    /// List the books a user has rated
    Books {
        /// User ID
        user_id: String,
    },

    /// Show the catalogue record of a book
    Book {
        /// ISBN
        isbn: String,
    },

    /// Show the record of a user
    User {
        /// User ID
        user_id: String,
    },

    /// List users with enough ratings to try recommendations
    SampleUsers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    libreadiego::logging::config_from_env(cli.verbose, "error").init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let top_n = config.query.top_n;
    let service = ReadiegoService::from_config(config)?;
    let format = cli.format;

    match cli.command {
        Commands::Stats => cmd_stats(&service, format).await,
        Commands::Recommend { user_id } => {
            let user_id = require_id(&user_id, "user ID")?;
            let items = service
                .query()
                .load_user_recommendations(user_id, top_n)
                .await?;
            let cards: Vec<BookCard> = items.iter().map(BookCard::from).collect();
            output_list(format, QueryMode::UserRecommendations, &items, &cards)
        }
        Commands::Similar { isbn } => {
            let isbn = require_id(&isbn, "ISBN")?;
            let items = service.query().load_similar_books(isbn, top_n).await?;
            let cards: Vec<BookCard> = items.iter().map(BookCard::from).collect();
            output_list(format, QueryMode::SimilarBooks, &items, &cards)
        }
        Commands::Books { user_id } => {
            let user_id = require_id(&user_id, "user ID")?;
            let items = service.query().load_user_books(user_id).await?;
            let cards: Vec<BookCard> = items.iter().map(BookCard::from).collect();
            output_list(format, QueryMode::UserBooks, &items, &cards)
        }
        Commands::Book { isbn } => {
            let isbn = require_id(&isbn, "ISBN")?;
            let record = service.client().book_info(isbn).await?;
            match format {
                OutputFormat::Json => print_json(&record),
                OutputFormat::Text => {
                    let publisher = record.publisher.clone();
                    let summary: BookSummary = record.into();
                    let card = BookCard::from(&summary);
                    print_card(None, &card);
                    if let Some(publisher) = publisher.filter(|p| !p.trim().is_empty()) {
                        println!("   {publisher}");
                    }
                    Ok(())
                }
            }
        }
        Commands::User { user_id } => {
            let user_id = require_id(&user_id, "user ID")?;
            let record = service.client().user_info(user_id).await?;
            match format {
                OutputFormat::Json => print_json(&record),
                OutputFormat::Text => {
                    output_user_text(&record);
                    Ok(())
                }
            }
        }
        Commands::SampleUsers => {
            let samples = service.client().sample_users().await?;
            match format {
                OutputFormat::Json => print_json(&samples),
                OutputFormat::Text => {
                    output_samples_text(&samples);
                    Ok(())
                }
            }
        }
    }
}

/// Configuration file (explicit path or default location), then
/// `READIEGO_API_URL`, then flags
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match cli.config {
        Some(ref path) => {
            let mut config = Config::load_from_path(path)?;
            config.apply_env_overrides();
            config
        }
        None => Config::load()?,
    };
    tracing::debug!(
        path = ?cli.config.clone().or_else(|| resolve_config_path().ok()),
        "Loaded configuration"
    );

    if let Some(ref url) = cli.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(top_n) = cli.top_n {
        config.query.top_n = top_n;
    }

    config.validate()?;
    Ok(config)
}

/// Trim an identifier; blank ones never reach the network
fn require_id<'a>(raw: &'a str, what: &str) -> Result<&'a str> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(ReadiegoError::InvalidInput(format!("{what} must not be empty")));
    }
    Ok(id)
}

/// Statistics go through the query controller; a failure is reported with
/// the message it recorded in the store
async fn cmd_stats(service: &ReadiegoService, format: OutputFormat) -> Result<()> {
    service.query().load_statistics().await;

    let Some(stats) = service.store().statistics() else {
        let message = service
            .store()
            .error()
            .unwrap_or_else(|| STATISTICS_ERROR.to_string());
        return Err(ReadiegoError::Recorded(message));
    };

    match format {
        OutputFormat::Json => print_json(&stats),
        OutputFormat::Text => {
            output_stats_text(&stats);
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn output_stats_text(stats: &Statistics) {
    println!("{}", present::STATS_TITLE);
    for figure in present::stat_figures(stats) {
        println!("  {}: {}", figure.label, figure.value);
    }
}

/// Result lists: JSON gets the raw items, text gets the labelled cards
///
/// An empty list is a success and prints nothing in text mode.
fn output_list<T: Serialize>(
    format: OutputFormat,
    mode: QueryMode,
    items: &[T],
    cards: &[BookCard],
) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(items);
    }
    if cards.is_empty() {
        return Ok(());
    }

    if let Some(label) = view::label(mode.into()) {
        println!("{label} ({})", present::results_count(cards.len()));
        println!();
    }
    for (i, card) in cards.iter().enumerate() {
        print_card(Some(i + 1), card);
    }
    Ok(())
}

fn print_card(position: Option<usize>, card: &BookCard) {
    let prefix = position.map(|n| format!("{n}. ")).unwrap_or_default();
    match card.badge {
        Some(ref badge) => println!("{prefix}{}  {badge}", card.title),
        None => println!("{prefix}{}", card.title),
    }
    println!("   {} · {}", card.author, card.year);
    if let Some(ref isbn) = card.isbn_line {
        println!("   {isbn}");
    }
}

fn output_user_text(user: &UserRecord) {
    println!("User {}", user.user_id);
    if let Some(ref location) = user.location {
        println!("  Location: {location}");
    }
    if let Some(age) = user.age {
        println!("  Age: {age}");
    }
}

fn output_samples_text(samples: &SampleUsers) {
    for user in &samples.sample_users {
        println!("{}\t{} books", user.user_id, user.books_count);
    }
    println!(
        "{} users in the graph",
        present::group_thousands(samples.total_users_in_graph)
    );
}
