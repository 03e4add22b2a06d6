//! Person name and organization heuristics.
//!
//! Both are capitalization heuristics, not entity recognition: a name is two
//! adjacent capitalized words, an organization a run of two to six.

use super::{PatternMatch, PatternMatcher, SensitiveCategory};
use once_cell::sync::Lazy;
use regex::Regex;

/// Words that look like name tokens when capitalized but rarely are.
pub const COMMON_WORDS: &[&str] = &[
    "the", "and", "that", "have", "for", "not", "with", "you", "this", "but", "his", "her",
    "she", "they", "them", "from", "will", "would", "there", "their", "what", "about", "which",
    "when", "make", "like", "time", "just", "know", "take", "people", "into", "year", "your",
    "good", "some", "could", "contact", "dear", "hello", "please", "call", "email", "phone",
    "regards", "thanks", "sincerely",
];

fn is_common_word(token: &str) -> bool {
    let lower = token.to_lowercase();
    COMMON_WORDS.contains(&lower.as_str())
}

/// Matches two adjacent capitalized words (`John Smith`).
///
/// With common-word filtering enabled, a match containing a stoplisted token
/// is dropped and the search resumes at its second token, so in
/// `Contact John Smith` the name found is `John Smith`.
#[derive(Debug, Clone)]
pub struct NameMatcher {
    filter_common_words: bool,
}

impl NameMatcher {
    pub fn new() -> Self {
        Self {
            filter_common_words: true,
        }
    }

    pub fn with_common_word_filter(filter_common_words: bool) -> Self {
        Self { filter_common_words }
    }

    fn regex() -> &'static Regex {
        static PATTERN: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+ [A-Z][a-z]+\b").expect("Valid name regex"));
        &PATTERN
    }
}

impl Default for NameMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternMatcher for NameMatcher {
    fn category(&self) -> SensitiveCategory {
        SensitiveCategory::Name
    }

    fn pattern(&self) -> &Regex {
        Self::regex()
    }

    fn extract_all<'a>(&self, text: &'a str) -> Vec<PatternMatch<'a>> {
        let mut found = Vec::new();
        let mut at = 0;

        while let Some(m) = self.pattern().find_at(text, at) {
            let stoplisted =
                self.filter_common_words && m.as_str().split(' ').any(is_common_word);
            if !stoplisted {
                found.push(PatternMatch::from(m));
                at = m.end();
                continue;
            }
            at = match m.as_str().find(' ') {
                Some(space) => m.start() + space + 1,
                None => m.end(),
            };
        }

        found
    }
}

/// Matches runs of two to six capitalized words.
///
/// Runs shorter than ten characters are dropped. The analyzer additionally
/// drops runs identical to a name already found.
#[derive(Debug, Clone, Default)]
pub struct OrganizationMatcher;

/// Shortest organization literal kept, in characters.
pub const MIN_ORGANIZATION_CHARS: usize = 10;

impl OrganizationMatcher {
    pub fn new() -> Self {
        Self
    }

    fn regex() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"\b(?:[A-Z][a-z]+\s+){1,5}[A-Z][a-z]+\b").expect("Valid organization regex")
        });
        &PATTERN
    }
}

impl PatternMatcher for OrganizationMatcher {
    fn category(&self) -> SensitiveCategory {
        SensitiveCategory::Organization
    }

    fn pattern(&self) -> &Regex {
        Self::regex()
    }

    fn extract_all<'a>(&self, text: &'a str) -> Vec<PatternMatch<'a>> {
        self.pattern()
            .find_iter(text)
            .map(PatternMatch::from)
            .filter(|m| {
                m.text.chars().count() >= MIN_ORGANIZATION_CHARS
                    && m.text.split_whitespace().count() >= 2
            })
            .collect()
    }
}
