// WHY: Gates single vs multi-person parsing from title and conjunction placement
// Heuristic, not a grammar: scans words left to right

use tracing::debug;

use super::classifier::{is_conjunction, is_title, words};
use super::lexicon::Lexicon;

/// Outcome of multi-person detection for one normalized line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    /// No title ... conjunction ... pattern; parse as one person
    Single,
    /// "Title ... conjunction ... Title ...", e.g. "Dr & Mrs Joe Bloggs"
    TitledPair,
    /// "Title ... conjunction Word" with no later title, e.g. "Mr & Smith"
    ///
    /// Lines taking this branch are ambiguous and should be reviewed by a person.
    BareConjunction,
}

impl Detection {
    pub fn is_multi_person(self) -> bool {
        !matches!(self, Detection::Single)
    }

    pub fn needs_review(self) -> bool {
        matches!(self, Detection::BareConjunction)
    }
}

/// Classify a normalized line
pub fn detect(lexicon: &Lexicon, normalized: &str) -> Detection {
    let words = words(normalized);

    let Some(title_at) = words.iter().position(|word| is_title(lexicon, word)) else {
        return Detection::Single;
    };

    let Some(conjunction_at) = words[title_at + 1..]
        .iter()
        .position(|word| is_conjunction(lexicon, word))
        .map(|offset| title_at + 1 + offset)
    else {
        return Detection::Single;
    };

    let after = &words[conjunction_at + 1..];
    let detection = if after.iter().any(|word| is_title(lexicon, word)) {
        Detection::TitledPair
    } else if !after.is_empty() {
        // Conjunction followed by whitespace and more words, none of them a title
        Detection::BareConjunction
    } else {
        Detection::Single
    };

    debug!(?detection, title_at, conjunction_at, "Detected people in line");
    detection
}

/// Check if a normalized line names more than one person
pub fn is_multi_person(lexicon: &Lexicon, normalized: &str) -> bool {
    detect(lexicon, normalized).is_multi_person()
}
