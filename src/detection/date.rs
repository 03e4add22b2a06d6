//! Numeric date matcher.

use super::{PatternMatcher, SensitiveCategory};
use once_cell::sync::Lazy;
use regex::Regex;

/// Matches day/month/year style dates: one or two digit day and month, a two
/// to four digit year, separated by `/`, `-` or `.`.
#[derive(Debug, Clone, Default)]
pub struct DateMatcher;

impl DateMatcher {
    pub fn new() -> Self {
        Self
    }

    fn regex() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"\b\d{1,2}[/.-]\d{1,2}[/.-]\d{2,4}\b").expect("Valid date regex")
        });
        &PATTERN
    }
}

impl PatternMatcher for DateMatcher {
    fn category(&self) -> SensitiveCategory {
        SensitiveCategory::Date
    }

    fn pattern(&self) -> &Regex {
        Self::regex()
    }
}
