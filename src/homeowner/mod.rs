// WHY: Parser entry points and the person record shared by every stage
// Pipeline: normalize -> detect -> single or multi-person parsing

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

pub mod lexicon;
pub mod normalization;
pub mod classifier;
pub mod detector;
pub mod single;
pub mod multi;

// Re-export core types
pub use lexicon::{Lexicon, Title};
pub use normalization::{normalize_line, normalize_line_into};
pub use detector::Detection;

/// What stands between title and surname: nothing, a first name, or an initial
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NameQualifier {
    #[default]
    None,
    FirstName(String),
    Initial(char),
}

/// One parsed person; the surname is always non-empty
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "PersonRow", try_from = "PersonRow")]
pub struct PersonRecord {
    title: Option<Title>,
    qualifier: NameQualifier,
    last_name: String,
}

impl PersonRecord {
    /// Build a record, or None when the surname is empty
    pub fn new(title: Option<Title>, qualifier: NameQualifier, last_name: impl Into<String>) -> Option<Self> {
        let last_name = last_name.into();
        if last_name.is_empty() {
            return None;
        }
        Some(Self {
            title,
            qualifier,
            last_name,
        })
    }

    /// A person named by title alone, taking the surname of their partner
    pub fn inheriting(title: Title, partner: &PersonRecord) -> Option<Self> {
        Self::new(Some(title), NameQualifier::None, partner.last_name.clone())
    }

    pub fn title(&self) -> Option<Title> {
        self.title
    }

    pub fn qualifier(&self) -> &NameQualifier {
        &self.qualifier
    }

    pub fn first_name(&self) -> Option<&str> {
        match &self.qualifier {
            NameQualifier::FirstName(name) => Some(name),
            _ => None,
        }
    }

    pub fn initial(&self) -> Option<char> {
        match self.qualifier {
            NameQualifier::Initial(initial) => Some(initial),
            _ => None,
        }
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Display form: title, first name or initial, surname; absent parts skipped
    pub fn full_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PersonRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(title) = self.title {
            write!(f, "{title} ")?;
        }
        match &self.qualifier {
            NameQualifier::FirstName(name) => write!(f, "{name} ")?,
            NameQualifier::Initial(initial) => write!(f, "{initial} ")?,
            NameQualifier::None => {}
        }
        f.write_str(&self.last_name)
    }
}

/// Flat wire shape: {title, first_name, initial, last_name}
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersonRow {
    title: Option<Title>,
    first_name: Option<String>,
    initial: Option<String>,
    last_name: String,
}

impl From<PersonRecord> for PersonRow {
    fn from(person: PersonRecord) -> Self {
        let (first_name, initial) = match person.qualifier {
            NameQualifier::None => (None, None),
            NameQualifier::FirstName(name) => (Some(name), None),
            NameQualifier::Initial(initial) => (None, Some(initial.to_string())),
        };
        Self {
            title: person.title,
            first_name,
            initial,
            last_name: person.last_name,
        }
    }
}

impl TryFrom<PersonRow> for PersonRecord {
    type Error = String;

    fn try_from(row: PersonRow) -> Result<Self, Self::Error> {
        let qualifier = match (row.first_name, row.initial) {
            (Some(_), Some(_)) => return Err("first_name and initial are both set".to_string()),
            (Some(name), None) => NameQualifier::FirstName(name),
            (None, Some(initial)) => {
                let mut chars = initial.chars();
                match (chars.next(), chars.next()) {
                    (Some(letter), None) => NameQualifier::Initial(letter),
                    _ => return Err(format!("initial must be a single letter, got {initial:?}")),
                }
            }
            (None, None) => NameQualifier::None,
        };
        PersonRecord::new(row.title, qualifier, row.last_name)
            .ok_or_else(|| "last_name must not be empty".to_string())
    }
}

/// People parsed from one line together with how the line was classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineAnalysis {
    pub detection: Detection,
    pub people: Vec<PersonRecord>,
}

impl LineAnalysis {
    pub fn needs_review(&self) -> bool {
        self.detection.needs_review()
    }
}

/// Homeowner-string parser; pure and shareable across threads
#[derive(Debug, Clone, Default)]
pub struct HomeownerParser {
    lexicon: Lexicon,
}

impl HomeownerParser {
    /// Create parser with a custom lexicon
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    /// Create parser with the default title and conjunction sets
    pub fn with_default_lexicon() -> Self {
        Self::new(Lexicon::new())
    }

    /// Parse one raw line into zero or more people; never fails
    pub fn parse_homeowner_string(&self, line: &str) -> Vec<PersonRecord> {
        self.analyze(line).people
    }

    /// Parse one raw line, keeping the detector's verdict for review reporting
    pub fn analyze(&self, line: &str) -> LineAnalysis {
        self.analyze_normalized(&normalize_line(line))
    }

    /// Same as `analyze`, normalizing through a caller-owned buffer
    /// Batch callers keep one buffer per worker
    pub fn analyze_with_buffer(&self, line: &str, buffer: &mut String) -> LineAnalysis {
        normalize_line_into(line, buffer);
        self.analyze_normalized(buffer)
    }

    fn analyze_normalized(&self, normalized: &str) -> LineAnalysis {
        let detection = detector::detect(&self.lexicon, normalized);

        if detection.needs_review() {
            warn!(line = %normalized, "Line matched title-conjunction-surname pattern; flag for review");
        }

        let people = if detection.is_multi_person() {
            multi::parse_multiple(&self.lexicon, normalized)
        } else {
            single::parse_single(&self.lexicon, normalized).into_iter().collect()
        };

        debug!(line = %normalized, people = people.len(), "Parsed homeowner line");
        LineAnalysis { detection, people }
    }

    /// Parse every non-blank line in order and concatenate the people found
    pub fn parse_lines<I, S>(&self, lines: I) -> Vec<PersonRecord>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut buffer = String::new();
        lines
            .into_iter()
            .filter(|line| !line.as_ref().trim().is_empty())
            .flat_map(|line| self.analyze_with_buffer(line.as_ref(), &mut buffer).people)
            .collect()
    }

    /// Check if a raw line names more than one person
    pub fn is_multi_person(&self, line: &str) -> bool {
        detector::is_multi_person(&self.lexicon, &normalize_line(line))
    }
}
