// WHY: Fixed title and conjunction vocabularies shared by every parsing stage
// Built once per parser and never mutated afterwards

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Recognized title spellings, matched case-insensitively with one optional trailing period
pub const TITLES: &[&str] = &[
    "Mr", "Mrs", "Ms", "Miss", "Dr", "Prof", "Professor",
    "Mister", "Mistress", "Master",
];

/// Words separating two or more people in one line, in lookup order
pub const CONJUNCTIONS: &[&str] = &["and", "&"];

/// Canonical title emitted on a parsed person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Title {
    Mr,
    Mrs,
    Ms,
    Miss,
    Dr,
    Prof,
    Master,
}

impl Title {
    pub fn as_str(&self) -> &'static str {
        match self {
            Title::Mr => "Mr",
            Title::Mrs => "Mrs",
            Title::Ms => "Ms",
            Title::Miss => "Miss",
            Title::Dr => "Dr",
            Title::Prof => "Prof",
            Title::Master => "Master",
        }
    }

    /// Map a title-cased spelling to its canonical title
    /// Synonyms collapse here: Mister -> Mr, Mistress -> Mrs, Professor -> Prof
    fn from_title_case(spelling: &str) -> Option<Self> {
        match spelling {
            "Mr" | "Mister" => Some(Title::Mr),
            "Mrs" | "Mistress" => Some(Title::Mrs),
            "Ms" => Some(Title::Ms),
            "Miss" => Some(Title::Miss),
            "Dr" => Some(Title::Dr),
            "Prof" | "Professor" => Some(Title::Prof),
            "Master" => Some(Title::Master),
            _ => None,
        }
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upper-case the first character and lower-case the rest ("mISTER" -> "Mister")
pub fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Immutable vocabulary lookup for titles and conjunctions
#[derive(Debug, Clone)]
pub struct Lexicon {
    /// Lower-cased spelling -> canonical title
    titles: HashMap<String, Title>,
    conjunctions: Vec<&'static str>,
}

impl Lexicon {
    /// Create a lexicon with the default title and conjunction sets
    pub fn new() -> Self {
        Self::from_parts(TITLES, CONJUNCTIONS)
    }

    /// Build a lexicon from explicit vocabularies
    /// Spellings with no canonical title are ignored
    pub fn from_parts(titles: &[&str], conjunctions: &[&'static str]) -> Self {
        let titles = titles
            .iter()
            .filter_map(|spelling| {
                Title::from_title_case(&title_case(spelling))
                    .map(|title| (spelling.to_lowercase(), title))
            })
            .collect();

        Self {
            titles,
            conjunctions: conjunctions.to_vec(),
        }
    }

    /// Canonical title for a bare spelling (trailing period already stripped)
    pub fn title_for(&self, spelling: &str) -> Option<Title> {
        self.titles.get(&spelling.to_lowercase()).copied()
    }

    /// Check if a whole word is a conjunction, ignoring case
    pub fn is_conjunction(&self, word: &str) -> bool {
        self.conjunctions
            .iter()
            .any(|conjunction| conjunction.eq_ignore_ascii_case(word))
    }

    /// Conjunctions in declaration order
    pub fn conjunctions(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.conjunctions.iter().copied()
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new()
    }
}
