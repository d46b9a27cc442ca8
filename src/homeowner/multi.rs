// WHY: Splits a multi-person line at its conjunction and shares a surname with
// a partner named by title alone ("Mr & Mrs Smith")

use tracing::debug;

use super::classifier::words;
use super::lexicon::Lexicon;
use super::single::{parse_words, title_only};
use super::PersonRecord;

/// Parse every person named in a multi-person line, in textual order
pub fn parse_multiple(lexicon: &Lexicon, normalized: &str) -> Vec<PersonRecord> {
    let words = words(normalized);

    let Some(conjunction) = lexicon
        .conjunctions()
        .find(|conjunction| words.iter().any(|word| word.eq_ignore_ascii_case(conjunction)))
    else {
        return Vec::new();
    };

    let fragments: Vec<&[&str]> = words
        .split(|word| word.eq_ignore_ascii_case(conjunction))
        .filter(|fragment| !fragment.is_empty())
        .collect();

    debug!(conjunction, fragments = fragments.len(), "Split multi-person line");

    match fragments.as_slice() {
        [first, second] => parse_pair(lexicon, first, second),
        // No inheritance across three or more fragments
        _ => fragments
            .iter()
            .filter_map(|fragment| parse_words(lexicon, fragment))
            .collect(),
    }
}

/// Two fragments: either side may be a bare title borrowing the other side's surname
fn parse_pair(lexicon: &Lexicon, first: &[&str], second: &[&str]) -> Vec<PersonRecord> {
    let first_person = parse_words(lexicon, first);

    let second_person = match title_only(lexicon, second) {
        Some(title) => first_person
            .as_ref()
            .and_then(|partner| PersonRecord::inheriting(title, partner)),
        None => parse_words(lexicon, second),
    };

    let first_person = match title_only(lexicon, first) {
        Some(title) => second_person
            .as_ref()
            .and_then(|partner| PersonRecord::inheriting(title, partner)),
        None => first_person,
    };

    first_person.into_iter().chain(second_person).collect()
}
