use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, BufReader};
use tracing::{debug, info};

/// Configuration for reading homeowner lines from a CSV file
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Whether the first row is a header to skip
    pub has_header: bool,
    /// Zero-based column holding the homeowner string
    pub column: usize,
    /// Buffer size for async reading (default: 8KB)
    pub buffer_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            has_header: true,
            column: 0,
            buffer_size: 8192,
        }
    }
}

/// One homeowner string with the physical line it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based line in the source file (header is line 1)
    pub line_number: u64,
    pub text: String,
}

impl SourceLine {
    pub fn new(line_number: u64, text: impl Into<String>) -> Self {
        Self {
            line_number,
            text: text.into(),
        }
    }
}

/// Statistics for file reading operations
#[derive(Debug, Clone)]
pub struct ReadStats {
    pub file_path: String,
    pub rows_read: u64,
    pub blank_rows: u64,
    pub bytes_read: u64,
    pub duration_ms: u64,
}

/// Async reader yielding the homeowner column of each CSV data row
pub struct AsyncFileReader {
    config: ReaderConfig,
}

impl AsyncFileReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Read every non-blank homeowner cell with its source line number
    pub async fn read_homeowner_lines<P: AsRef<Path>>(
        &self,
        file_path: P,
    ) -> Result<(Vec<SourceLine>, ReadStats)> {
        let path = file_path.as_ref();
        let start_time = std::time::Instant::now();

        debug!("Starting async read of file: {}", path.display());

        let file = File::open(path)
            .await
            .with_context(|| format!("Failed to open file {}", path.display()))?;

        let mut reader = BufReader::with_capacity(self.config.buffer_size, file);
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .await
            .with_context(|| format!("Failed to read file {}", path.display()))?;

        // WHY: flexible rows; only the homeowner column has to be present
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(self.config.has_header)
            .flexible(true)
            .from_reader(bytes.as_slice());

        let mut lines = Vec::new();
        let mut rows_read = 0u64;
        let mut blank_rows = 0u64;

        for (index, result) in csv_reader.records().enumerate() {
            let record = result.with_context(|| {
                format!("Malformed CSV in {} at data row {}", path.display(), index + 1)
            })?;
            rows_read += 1;

            let line_number = record
                .position()
                .map(|position| position.line())
                .unwrap_or(index as u64 + 1);

            match record.get(self.config.column).map(str::trim) {
                Some(text) if !text.is_empty() => lines.push(SourceLine::new(line_number, text)),
                _ => blank_rows += 1,
            }
        }

        let stats = ReadStats {
            file_path: path.display().to_string(),
            rows_read,
            blank_rows,
            bytes_read: bytes.len() as u64,
            duration_ms: start_time.elapsed().as_millis() as u64,
        };

        info!(
            "Read {}: {} rows ({} blank), {} bytes in {}ms",
            path.display(),
            stats.rows_read,
            stats.blank_rows,
            stats.bytes_read,
            stats.duration_ms
        );

        Ok((lines, stats))
    }
}

/// Convenience function for reading homeowner lines with default configuration
pub async fn read_csv_lines<P: AsRef<Path>>(file_path: P) -> Result<Vec<SourceLine>> {
    let reader = AsyncFileReader::new(ReaderConfig::default());
    let (lines, _stats) = reader.read_homeowner_lines(file_path).await?;
    Ok(lines)
}
