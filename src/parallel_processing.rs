// WHY: Batch parsing across workers for large imports, plus the per-run stats file
// Lines are independent, so chunks parse in parallel and reassemble in source order

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::task::JoinError;
use tracing::{debug, info};

use crate::homeowner::{HomeownerParser, PersonRecord};
use crate::reader::SourceLine;

/// Parse result for one source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub line_number: u64,
    pub people: Vec<PersonRecord>,
    /// Line took the ambiguous title-conjunction-surname branch
    pub needs_review: bool,
}

/// Parse a single source line, normalizing into `buffer`
pub fn parse_source_line(parser: &HomeownerParser, line: SourceLine, buffer: &mut String) -> ParsedLine {
    let analysis = parser.analyze_with_buffer(&line.text, buffer);
    ParsedLine {
        line_number: line.line_number,
        needs_review: analysis.needs_review(),
        people: analysis.people,
    }
}

/// Parse lines on tokio's blocking pool, one contiguous chunk per worker
/// Output order matches input order
pub async fn parse_lines_parallel(
    parser: Arc<HomeownerParser>,
    lines: Vec<SourceLine>,
    workers: usize,
) -> Result<Vec<ParsedLine>, JoinError> {
    if lines.is_empty() {
        return Ok(Vec::new());
    }

    let workers = workers.max(1);
    let chunk_size = lines.len().div_ceil(workers);
    let total = lines.len();

    let mut remaining = lines.into_iter();
    let mut handles = Vec::with_capacity(workers);
    loop {
        let chunk: Vec<SourceLine> = remaining.by_ref().take(chunk_size).collect();
        if chunk.is_empty() {
            break;
        }
        let parser = Arc::clone(&parser);
        handles.push(tokio::task::spawn_blocking(move || {
            let mut buffer = String::new();
            chunk
                .into_iter()
                .map(|line| parse_source_line(&parser, line, &mut buffer))
                .collect::<Vec<_>>()
        }));
    }

    debug!("Parsing {} lines in {} chunks of up to {}", total, handles.len(), chunk_size);

    let chunks = futures::future::try_join_all(handles).await?;
    let parsed: Vec<ParsedLine> = chunks.into_iter().flatten().collect();

    info!(
        "Parsed {} lines into {} people",
        parsed.len(),
        parsed.iter().map(|line| line.people.len()).sum::<usize>()
    );
    Ok(parsed)
}

/// Per-import statistics written next to the store
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ImportStats {
    /// Source file path
    pub path: String,
    /// Non-blank homeowner lines read
    pub lines_read: u64,
    /// Data rows with an empty homeowner cell
    pub blank_rows: u64,
    /// People produced by the parser
    pub people_parsed: u64,
    /// People written to the store
    pub created: u64,
    /// People already present in the store
    pub skipped_duplicates: u64,
    /// Lines that produced no person
    pub unparsed_lines: Vec<u64>,
    /// Lines flagged for manual review
    pub review_lines: Vec<u64>,
    /// Total processing time in milliseconds
    pub processing_time_ms: u64,
    /// Throughput in lines per second
    pub lines_per_sec: f64,
    /// Import status (success, failed)
    pub status: String,
    /// Error message if the import failed
    pub error: Option<String>,
}

impl ImportStats {
    pub fn throughput(lines: u64, processing_time_ms: u64) -> f64 {
        if processing_time_ms > 0 {
            lines as f64 / (processing_time_ms as f64 / 1000.0)
        } else {
            0.0
        }
    }
}

/// Write import stats as pretty JSON
pub async fn write_import_stats(stats_path: &Path, stats: &ImportStats) -> Result<()> {
    if let Some(parent) = stats_path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let file = tokio::fs::File::create(stats_path).await?;
    let mut writer = BufWriter::new(file);

    let content = serde_json::to_string_pretty(stats)?;
    writer.write_all(content.as_bytes()).await?;
    writer.write_all(b"\n").await?;

    writer.flush().await?;
    Ok(())
}
