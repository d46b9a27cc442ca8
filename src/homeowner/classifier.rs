// WHY: Per-word role checks; "Dr." / "Dr" and "F." / "F" must classify the same way

use super::lexicon::{Lexicon, Title};

/// Strip one optional trailing period
fn strip_period(word: &str) -> &str {
    word.strip_suffix('.').unwrap_or(word)
}

/// Split a normalized string into its space-separated words, dropping empty tokens
pub(crate) fn words(text: &str) -> Vec<&str> {
    text.split(' ').filter(|word| !word.is_empty()).collect()
}

/// Check if a word is a recognized title
pub fn is_title(lexicon: &Lexicon, word: &str) -> bool {
    canonical_title(lexicon, word).is_some()
}

/// Canonical title for a word, or None if the word is not a title
pub fn canonical_title(lexicon: &Lexicon, word: &str) -> Option<Title> {
    lexicon.title_for(strip_period(word))
}

/// Check if a word is a single alphabetic letter, optionally followed by a period
pub fn is_initial(word: &str) -> bool {
    canonical_initial(word).is_some()
}

/// Upper-cased initial letter, or None if the word is not an initial
pub fn canonical_initial(word: &str) -> Option<char> {
    let mut chars = strip_period(word).chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) if letter.is_alphabetic() => Some(upper_letter(letter)),
        _ => None,
    }
}

/// Check if a word is a conjunction
pub fn is_conjunction(lexicon: &Lexicon, word: &str) -> bool {
    lexicon.is_conjunction(word)
}

// Letters like 'ß' upper-case to two chars; keep the original letter then
fn upper_letter(letter: char) -> char {
    let mut upper = letter.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => letter,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_detection_ignores_case_and_period() {
        let lexicon = Lexicon::new();
        for word in ["Mr", "mr", "MR", "Mr.", "dr.", "Prof.", "Mistress"] {
            assert!(is_title(&lexicon, word), "{} should be a title", word);
        }
        for word in ["Mr..", "Smith", "M", ".", ""] {
            assert!(!is_title(&lexicon, word), "{} should not be a title", word);
        }
    }

    #[test]
    fn test_canonical_title() {
        let lexicon = Lexicon::new();
        assert_eq!(canonical_title(&lexicon, "Mister."), Some(Title::Mr));
        assert_eq!(canonical_title(&lexicon, "DR."), Some(Title::Dr));
        assert_eq!(canonical_title(&lexicon, "professor"), Some(Title::Prof));
        assert_eq!(canonical_title(&lexicon, "Bloggs"), None);
    }

    #[test]
    fn test_initial_detection() {
        for word in ["F", "F.", "f", "j.", "é"] {
            assert!(is_initial(word), "{} should be an initial", word);
        }
        for word in ["Jo", "F..", "1", "1.", ".", "", "-"] {
            assert!(!is_initial(word), "{} should not be an initial", word);
        }
    }

    #[test]
    fn test_canonical_initial_uppercases() {
        assert_eq!(canonical_initial("p"), Some('P'));
        assert_eq!(canonical_initial("m."), Some('M'));
        assert_eq!(canonical_initial("é"), Some('É'));
        assert_eq!(canonical_initial("ß"), Some('ß'));
        assert_eq!(canonical_initial("Joe"), None);
    }

    #[test]
    fn test_words_drops_empty_tokens() {
        assert_eq!(words(" Mr  John "), vec!["Mr", "John"]);
        assert!(words("").is_empty());
    }

    #[test]
    fn test_conjunction_is_whole_word() {
        let lexicon = Lexicon::new();
        assert!(is_conjunction(&lexicon, "And"));
        assert!(!is_conjunction(&lexicon, "Andrews"));
        assert!(!is_conjunction(&lexicon, "Sand"));
    }
}
