pub mod homeowner;
pub mod reader;
pub mod parallel_processing;
pub mod store;
pub mod importer;

// Re-export main types for convenient access
pub use homeowner::{
    Detection, HomeownerParser, Lexicon, LineAnalysis, NameQualifier, PersonRecord, Title,
};

// Re-export host-side import types
pub use importer::{BatchImporter, ImportConfig, ImportError, ImportSummary};
pub use reader::{ReaderConfig, SourceLine};
pub use store::{JsonFileStore, MemoryStore, PersonStore, StoreError, StoredPerson};

/// Parse one homeowner line with the default vocabulary
pub fn parse_homeowner_string(line: &str) -> Vec<PersonRecord> {
    HomeownerParser::with_default_lexicon().parse_homeowner_string(line)
}

/// Parse every non-blank line with the default vocabulary
pub fn parse_lines<I, S>(lines: I) -> Vec<PersonRecord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    HomeownerParser::with_default_lexicon().parse_lines(lines)
}
