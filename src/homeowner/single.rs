// WHY: Role assignment for words already known to describe one person
// Order is fixed: [title] [first name | initial] surname...

use tracing::debug;

use super::classifier::{canonical_initial, canonical_title, words};
use super::lexicon::{Lexicon, Title};
use super::{NameQualifier, PersonRecord};

/// Parse one person from a segment, or None if the segment has no surname
pub fn parse_single(lexicon: &Lexicon, segment: &str) -> Option<PersonRecord> {
    let words = words(segment);
    let person = parse_words(lexicon, &words);
    if person.is_none() {
        debug!(segment, "Segment did not yield a person");
    }
    person
}

/// Parse one person from pre-split words
pub(crate) fn parse_words(lexicon: &Lexicon, words: &[&str]) -> Option<PersonRecord> {
    let first = words.first()?;

    let (title, rest) = match canonical_title(lexicon, first) {
        Some(title) => (Some(title), &words[1..]),
        None => (None, words),
    };

    match rest {
        // A title alone is not a person
        [] => None,
        [surname] => PersonRecord::new(title, NameQualifier::None, *surname),
        [given, surname @ ..] => {
            let qualifier = match canonical_initial(given) {
                Some(initial) => NameQualifier::Initial(initial),
                None => NameQualifier::FirstName(given.to_string()),
            };
            PersonRecord::new(title, qualifier, surname.join(" "))
        }
    }
}

/// The canonical title when a segment is exactly one title word ("Mrs" in "Mr & Mrs Smith")
pub(crate) fn title_only(lexicon: &Lexicon, words: &[&str]) -> Option<Title> {
    match words {
        [word] => canonical_title(lexicon, word),
        _ => None,
    }
}
