//! botpulse - AI crawler traffic analyzer
//!
//! Imports web-server access logs, keeps the lines from tracked AI crawlers,
//! and reports daily activity and period-over-period changes.

mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use botpulse_core::analytics::summarize;
use botpulse_core::format::format_count;
use botpulse_core::insight::{create_insight_client, generate_insight, FAILURE_MESSAGE};
use botpulse_core::{ingest, BotType, Config, Database, DateRange, LogStore};
use chrono::{Duration, NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "botpulse")]
#[command(about = "Analyze AI crawler traffic in web-server access logs")]
#[command(version)]
struct Cli {
    /// Database path (overrides config and the XDG default)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import one or more access log files
    Import {
        /// Log files to import
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Show daily activity per bot
    Stats {
        /// First day (YYYY-MM-DD), default 7 days ago
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day (YYYY-MM-DD), default today
        #[arg(long)]
        to: Option<NaiveDate>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Compare two periods bot by bot
    Compare {
        /// Current period first day, default 7 days ago
        #[arg(long)]
        current_from: Option<NaiveDate>,

        /// Current period last day, default today
        #[arg(long)]
        current_to: Option<NaiveDate>,

        /// Previous period first day, default 14 days ago
        #[arg(long)]
        previous_from: Option<NaiveDate>,

        /// Previous period last day, default 8 days ago
        #[arg(long)]
        previous_to: Option<NaiveDate>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List the most recent entries
    List {
        /// Maximum number of entries to show
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,

        /// Only show this bot (GPTBot, ClaudeBot, Google-Extended, PerplexityBot)
        #[arg(short, long)]
        bot: Option<BotType>,
    },

    /// Show store size and location
    Status,

    /// Delete every stored entry
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },

    /// Ask the configured LLM to comment on recent activity
    Insight {
        /// First day (YYYY-MM-DD), default 7 days ago
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day (YYYY-MM-DD), default today
        #[arg(long)]
        to: Option<NaiveDate>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// `from..=to` in whole days, defaulting each end to `default_from`/`default_to`
/// days before today.
fn day_window(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    default_from: i64,
    default_to: i64,
) -> DateRange {
    let today = Utc::now().date_naive();
    DateRange::days(
        from.unwrap_or(today - Duration::days(default_from)),
        to.unwrap_or(today - Duration::days(default_to)),
    )
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging
    let _log_guard =
        botpulse_core::logging::init(&config.logging).context("failed to initialize logging")?;

    // Open database
    let db_path = cli
        .database
        .clone()
        .unwrap_or_else(|| config.store.resolved_database_path());
    tracing::info!(path = %db_path.display(), "Opening database");
    let db = Database::open(&db_path).context("failed to open database")?;
    db.migrate().context("failed to run database migrations")?;

    let mut store = LogStore::initialize(db, &config.store);

    match cli.command {
        Command::Import { files } => {
            for path in files {
                let (entries, report) = ingest::parse_file(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                let imported = entries.len();
                let summary = store.save(entries).context("failed to save entries")?;

                println!(
                    "{}: imported {} bot logs ({} lines, {} skipped)",
                    path.display(),
                    format_count(imported as u64),
                    format_count(report.lines_read as u64),
                    format_count(report.rejected() as u64)
                );
                if summary.evicted > 0 {
                    println!(
                        "  store full: dropped {} oldest entries",
                        format_count(summary.evicted as u64)
                    );
                }
            }
            println!("{} entries stored", format_count(store.len() as u64));
        }

        Command::Stats { from, to, format } => {
            let window = day_window(from, to, 7, 0);
            let rows = store.get_stats(window.start, window.end);
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
                OutputFormat::Text => {
                    print!("{}", render::stats_table(&window, &rows, &summarize(&rows)))
                }
            }
        }

        Command::Compare {
            current_from,
            current_to,
            previous_from,
            previous_to,
            format,
        } => {
            let current = day_window(current_from, current_to, 7, 0);
            let previous = day_window(previous_from, previous_to, 14, 8);
            let result =
                store.compare_periods(current.start, current.end, previous.start, previous.end);
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Text => {
                    print!("{}", render::comparison_table(&current, &previous, &result))
                }
            }
        }

        Command::List { limit, bot } => {
            let recent: Vec<_> = store
                .get_all()
                .iter()
                .rev()
                .filter(|e| bot.map_or(true, |b| e.bot_type == b))
                .take(limit)
                .collect();
            if recent.is_empty() {
                println!("No entries stored.");
            } else {
                print!("{}", render::entry_list(&recent));
            }
        }

        Command::Status => {
            println!(
                "Database: {} ({} bytes)",
                db_path.display(),
                format_count(store.database().size_bytes())
            );
            println!("Logs:     {}", botpulse_core::logging::log_file_path().display());
            println!(
                "Entries:  {} / {}",
                format_count(store.len() as u64),
                format_count(store.capacity() as u64)
            );
            if let (Some(first), Some(last)) = (store.get_all().first(), store.get_all().last()) {
                println!(
                    "Range:    {} .. {}",
                    first.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    last.timestamp.format("%Y-%m-%d %H:%M:%S")
                );
            }
        }

        Command::Clear { yes } => {
            if !yes {
                anyhow::bail!("refusing to clear {} entries without --yes", store.len());
            }
            store.clear().context("failed to clear store")?;
            println!("Cleared all entries.");
        }

        Command::Insight { from, to } => {
            let llm = config
                .llm
                .as_ref()
                .context("no [llm] section in configuration")?;
            let window = day_window(from, to, 7, 0);
            let rows = store.get_stats(window.start, window.end);
            match create_insight_client(llm) {
                Ok(client) => println!("{}", generate_insight(&rows, client.as_ref())),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to create LLM client");
                    println!("{}", FAILURE_MESSAGE);
                }
            }
        }
    }

    store.shutdown();
    Ok(())
}
