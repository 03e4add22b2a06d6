//! Sensitive-span detection.
//!
//! Each category is found by a [`PatternMatcher`] over one section's text.
//! The [`SensitiveDataAnalyzer`] runs the matchers section by section and
//! merges the candidates into deduplicated [`SensitiveItem`]s.

pub mod address;
pub mod analyzer;
pub mod contact;
pub mod date;
pub mod identifiers;
pub mod item;
pub mod names;

pub use address::AddressMatcher;
pub use analyzer::SensitiveDataAnalyzer;
pub use contact::{EmailMatcher, PhoneMatcher};
pub use date::DateMatcher;
pub use identifiers::{CardNumberMatcher, SsnMatcher};
pub use item::{ItemPosition, SensitiveCategory, SensitiveItem};
pub use names::{NameMatcher, OrganizationMatcher};

use regex::Regex;

/// Confidence for categories without a dedicated rule.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// A span found by a matcher, with byte offsets into the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternMatch<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

impl<'a> From<regex::Match<'a>> for PatternMatch<'a> {
    fn from(m: regex::Match<'a>) -> Self {
        Self {
            text: m.as_str(),
            start: m.start(),
            end: m.end(),
        }
    }
}

/// Trait for pattern matching strategies.
pub trait PatternMatcher: Send + Sync {
    fn category(&self) -> SensitiveCategory;

    fn pattern(&self) -> &Regex;

    /// All non-overlapping, non-empty matches in `text`.
    fn extract_all<'a>(&self, text: &'a str) -> Vec<PatternMatch<'a>> {
        self.pattern()
            .find_iter(text)
            .filter(|m| !m.as_str().is_empty())
            .map(PatternMatch::from)
            .collect()
    }

    /// Confidence for a matched literal.
    fn confidence(&self, matched: &str) -> f64 {
        confidence_for(self.category(), matched)
    }
}

fn digit_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_ascii_digit()).count()
}

/// Scores a matched literal from its shape alone.
pub fn confidence_for(category: SensitiveCategory, literal: &str) -> f64 {
    match category {
        SensitiveCategory::Email => {
            if literal.contains('@') && literal.contains('.') {
                0.95
            } else {
                0.5
            }
        }
        SensitiveCategory::Phone => {
            if digit_count(literal) >= 10 {
                0.9
            } else {
                0.7
            }
        }
        SensitiveCategory::Ssn => {
            if digit_count(literal) == 9 {
                0.95
            } else {
                0.7
            }
        }
        SensitiveCategory::CreditCard => {
            if digit_count(literal) >= 15 {
                0.9
            } else {
                0.6
            }
        }
        SensitiveCategory::Name => {
            if literal.split(' ').filter(|t| !t.is_empty()).count() >= 2 {
                0.7
            } else {
                0.5
            }
        }
        SensitiveCategory::Address => {
            if literal.chars().count() > 15 {
                0.8
            } else {
                0.6
            }
        }
        SensitiveCategory::Date => 0.7,
        SensitiveCategory::Organization => 0.6,
        _ => DEFAULT_CONFIDENCE,
    }
}
