use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use homeowners::importer::failed_stats;
use homeowners::parallel_processing::write_import_stats;
use homeowners::{
    BatchImporter, HomeownerParser, ImportConfig, JsonFileStore, PersonRecord, ReaderConfig,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "homeowners")]
#[command(about = "Parse homeowner name strings into structured person records")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse homeowner strings given as arguments, or one per stdin line
    Parse {
        lines: Vec<String>,
    },

    /// Import the homeowner column of a CSV file into the store
    Import {
        /// CSV file whose first row is a header
        csv: PathBuf,

        /// JSON store file
        #[arg(long, default_value = "people.json")]
        store: PathBuf,

        /// Stats output file path
        #[arg(long, default_value = "import_stats.json")]
        stats_out: PathBuf,

        /// Parse workers (defaults to CPU count)
        #[arg(long)]
        workers: Option<usize>,

        /// Treat the first row as data
        #[arg(long)]
        no_header: bool,

        /// Zero-based column holding the homeowner string
        #[arg(long, default_value_t = 0)]
        column: usize,

        /// Suppress console progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Search stored people by name substring
    Search {
        term: String,

        /// JSON store file
        #[arg(long, default_value = "people.json")]
        store: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // WHY: logs go to stderr so stdout carries only command output
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let args = Args::parse();
    info!(?args, "Parsed CLI arguments");

    match args.command {
        Command::Parse { lines } => run_parse(lines).await,
        Command::Import {
            csv,
            store,
            stats_out,
            workers,
            no_header,
            column,
            no_progress,
        } => {
            let mut config = ImportConfig {
                reader: ReaderConfig {
                    has_header: !no_header,
                    column,
                    ..Default::default()
                },
                ..Default::default()
            };
            if let Some(workers) = workers {
                config.workers = workers;
            }
            run_import(csv, store, stats_out, config, no_progress).await
        }
        Command::Search { term, store } => run_search(&term, store),
    }
}

async fn run_parse(lines: Vec<String>) -> Result<()> {
    let parser = HomeownerParser::with_default_lexicon();

    let people: Vec<PersonRecord> = if lines.is_empty() {
        let mut stdin_lines = BufReader::new(tokio::io::stdin()).lines();
        let mut collected = Vec::new();
        while let Some(line) = stdin_lines.next_line().await.context("Failed to read stdin")? {
            collected.push(line);
        }
        parser.parse_lines(&collected)
    } else {
        parser.parse_lines(&lines)
    };

    println!("{}", serde_json::to_string_pretty(&people)?);
    Ok(())
}

async fn run_import(
    csv: PathBuf,
    store_path: PathBuf,
    stats_out: PathBuf,
    config: ImportConfig,
    no_progress: bool,
) -> Result<()> {
    let start = Instant::now();
    let mut store = JsonFileStore::load(&store_path)
        .with_context(|| format!("Failed to load store {}", store_path.display()))?;

    let progress = if no_progress {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(0);
        bar.set_style(ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} people",
        )?);
        bar
    };

    info!("Starting import of {} into {}", csv.display(), store.path().display());
    let importer = BatchImporter::new(HomeownerParser::with_default_lexicon(), config);
    let result = importer.import_csv_with_progress(&csv, &mut store, &progress).await;
    progress.finish_and_clear();

    let elapsed_ms = start.elapsed().as_millis() as u64;
    match result {
        Ok(summary) => {
            write_import_stats(&stats_out, &summary.to_stats(&csv, elapsed_ms)).await?;

            println!("Successfully imported {} homeowners.", summary.created_count());
            if summary.skipped_duplicates > 0 {
                println!("  Skipped duplicates: {}", summary.skipped_duplicates);
            }
            if summary.blank_rows > 0 {
                println!("  Blank rows: {}", summary.blank_rows);
            }
            if !summary.unparsed_lines.is_empty() {
                println!("  Unparsed lines: {:?}", summary.unparsed_lines);
            }
            if !summary.review_lines.is_empty() {
                println!("  Lines flagged for review: {:?}", summary.review_lines);
            }
            Ok(())
        }
        Err(e) => {
            write_import_stats(&stats_out, &failed_stats(&csv, &e, elapsed_ms)).await?;
            Err(e).context("Import failed; no homeowners were saved")
        }
    }
}

fn run_search(term: &str, store_path: PathBuf) -> Result<()> {
    let store = JsonFileStore::load(&store_path)
        .with_context(|| format!("Failed to load store {}", store_path.display()))?;

    let matches = store.people().search(term);
    info!("Search for {:?} in {} matched {} people", term, store.path().display(), matches.len());
    for stored in matches {
        println!("{}\t{}", stored.id, stored.full_name);
    }
    Ok(())
}
