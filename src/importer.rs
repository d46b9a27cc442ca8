// WHY: Host-side batch import: validate -> read -> parse -> persist all-or-nothing
// Parsing never fails; only validation, reading and persistence produce errors

use indicatif::ProgressBar;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::fs;
use tokio::task::JoinError;
use tracing::{info, warn};

use crate::homeowner::HomeownerParser;
use crate::parallel_processing::{parse_lines_parallel, ImportStats, ParsedLine};
use crate::reader::{AsyncFileReader, ReaderConfig, SourceLine};
use crate::store::{PersonStore, StoreError, StoredPerson};

/// Errors surfaced by a batch import
#[derive(Error, Debug)]
pub enum ImportError {
    /// Input is not an importable file; nothing was read
    #[error("invalid import file: {0}")]
    Validation(String),

    #[error("failed to read import file: {0:#}")]
    Read(anyhow::Error),

    #[error("parse worker failed: {0}")]
    Worker(#[from] JoinError),

    /// Storage failed mid-batch; every record of the batch was rolled back
    #[error("import rolled back: {0}")]
    Persistence(#[from] StoreError),
}

/// Configuration for batch imports
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Parse workers; defaults to the number of CPUs
    pub workers: usize,
    pub reader: ReaderConfig,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
            reader: ReaderConfig::default(),
        }
    }
}

/// Outcome of a committed import
#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    pub created: Vec<StoredPerson>,
    pub lines_read: usize,
    /// Data rows whose homeowner cell was empty; never parsed
    pub blank_rows: usize,
    pub people_parsed: usize,
    pub skipped_duplicates: usize,
    /// Source lines that produced no person
    pub unparsed_lines: Vec<u64>,
    /// Source lines flagged for manual review
    pub review_lines: Vec<u64>,
}

impl ImportSummary {
    pub fn created_count(&self) -> usize {
        self.created.len()
    }

    /// Stats record for a successful import
    pub fn to_stats(&self, path: &Path, processing_time_ms: u64) -> ImportStats {
        ImportStats {
            path: path.display().to_string(),
            lines_read: self.lines_read as u64,
            blank_rows: self.blank_rows as u64,
            people_parsed: self.people_parsed as u64,
            created: self.created.len() as u64,
            skipped_duplicates: self.skipped_duplicates as u64,
            unparsed_lines: self.unparsed_lines.clone(),
            review_lines: self.review_lines.clone(),
            processing_time_ms,
            lines_per_sec: ImportStats::throughput(self.lines_read as u64, processing_time_ms),
            status: "success".to_string(),
            error: None,
        }
    }
}

/// Stats record for a failed import
pub fn failed_stats(path: &Path, error: &ImportError, processing_time_ms: u64) -> ImportStats {
    ImportStats {
        path: path.display().to_string(),
        lines_read: 0,
        blank_rows: 0,
        people_parsed: 0,
        created: 0,
        skipped_duplicates: 0,
        unparsed_lines: Vec::new(),
        review_lines: Vec::new(),
        processing_time_ms,
        lines_per_sec: 0.0,
        status: "failed".to_string(),
        error: Some(error.to_string()),
    }
}

/// Check that `path` is an existing regular file with a .csv extension
pub async fn validate_source(path: &Path) -> Result<(), ImportError> {
    let metadata = fs::metadata(path)
        .await
        .map_err(|e| ImportError::Validation(format!("Cannot access file {}: {}", path.display(), e)))?;

    if !metadata.is_file() {
        return Err(ImportError::Validation(format!("Path is not a file: {}", path.display())));
    }

    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(ImportError::Validation(format!("File must be a CSV file: {}", path.display())));
    }

    Ok(())
}

/// Runs CSV imports into a person store
pub struct BatchImporter {
    parser: Arc<HomeownerParser>,
    config: ImportConfig,
}

impl BatchImporter {
    pub fn new(parser: HomeownerParser, config: ImportConfig) -> Self {
        Self {
            parser: Arc::new(parser),
            config,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(HomeownerParser::with_default_lexicon(), ImportConfig::default())
    }

    /// Import every homeowner in a CSV file
    pub async fn import_csv<S: PersonStore>(
        &self,
        path: &Path,
        store: &mut S,
    ) -> Result<ImportSummary, ImportError> {
        self.import_csv_with_progress(path, store, &ProgressBar::hidden()).await
    }

    /// Import every homeowner in a CSV file, ticking `progress` once per person
    pub async fn import_csv_with_progress<S: PersonStore>(
        &self,
        path: &Path,
        store: &mut S,
        progress: &ProgressBar,
    ) -> Result<ImportSummary, ImportError> {
        validate_source(path).await?;

        let reader = AsyncFileReader::new(self.config.reader.clone());
        let (lines, read_stats) = reader
            .read_homeowner_lines(path)
            .await
            .map_err(ImportError::Read)?;

        let mut summary = self.import_lines(lines, store, progress).await?;
        summary.blank_rows = read_stats.blank_rows as usize;
        Ok(summary)
    }

    /// Parse and persist already-read lines in one transaction
    pub async fn import_lines<S: PersonStore>(
        &self,
        lines: Vec<SourceLine>,
        store: &mut S,
        progress: &ProgressBar,
    ) -> Result<ImportSummary, ImportError> {
        let parsed = parse_lines_parallel(Arc::clone(&self.parser), lines, self.config.workers).await?;
        persist(&parsed, store, progress)
    }
}

/// Write parsed people inside one store transaction, skipping duplicates
pub fn persist<S: PersonStore>(
    parsed: &[ParsedLine],
    store: &mut S,
    progress: &ProgressBar,
) -> Result<ImportSummary, ImportError> {
    let mut summary = ImportSummary {
        lines_read: parsed.len(),
        ..Default::default()
    };

    progress.set_length(parsed.iter().map(|line| line.people.len() as u64).sum());

    store.begin();
    for line in parsed {
        if line.people.is_empty() {
            summary.unparsed_lines.push(line.line_number);
        }
        if line.needs_review {
            summary.review_lines.push(line.line_number);
        }

        for person in &line.people {
            summary.people_parsed += 1;
            progress.inc(1);

            // WHY: exists() sees this batch's records too, so in-file repeats are skipped
            if store.exists(person) {
                summary.skipped_duplicates += 1;
                continue;
            }

            match store.create(person.clone()) {
                Ok(stored) => summary.created.push(stored),
                Err(e) => {
                    warn!("Store failed at line {}: {}; rolling back", line.line_number, e);
                    store.rollback();
                    return Err(ImportError::Persistence(e));
                }
            }
        }
    }

    if let Err(e) = store.commit() {
        warn!("Commit failed: {}; rolling back", e);
        store.rollback();
        return Err(ImportError::Persistence(e));
    }

    if summary.skipped_duplicates > 0 {
        info!("Skipped {} duplicate homeowners during import", summary.skipped_duplicates);
    }
    info!(
        "Import committed: {} created, {} lines unparsed, {} flagged for review",
        summary.created.len(),
        summary.unparsed_lines.len(),
        summary.review_lines.len()
    );

    Ok(summary)
}
