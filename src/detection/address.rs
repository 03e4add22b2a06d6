//! Street address matcher.

use super::{PatternMatcher, SensitiveCategory};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// Matches a house number followed by words and a street suffix, such as
/// `742 Evergreen Terrace Lane` or `12 Main St`. Case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct AddressMatcher;

impl AddressMatcher {
    pub fn new() -> Self {
        Self
    }

    fn regex() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            RegexBuilder::new(
                r"\b\d+\s+[A-Za-z\s,]+\b(?:Avenue|Lane|Road|Boulevard|Drive|Street|Ave|Dr|Rd|Blvd|Ln|St)\.?\b",
            )
            .case_insensitive(true)
            .build()
            .expect("Valid address regex")
        });
        &PATTERN
    }
}

impl PatternMatcher for AddressMatcher {
    fn category(&self) -> SensitiveCategory {
        SensitiveCategory::Address
    }

    fn pattern(&self) -> &Regex {
        Self::regex()
    }
}
