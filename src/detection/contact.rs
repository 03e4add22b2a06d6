//! Email address and phone number matchers.

use super::{PatternMatcher, SensitiveCategory};
use once_cell::sync::Lazy;
use regex::Regex;

/// Matches email addresses such as `john.smith@example.com`.
#[derive(Debug, Clone, Default)]
pub struct EmailMatcher;

impl EmailMatcher {
    pub fn new() -> Self {
        Self
    }

    fn regex() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("Valid email regex")
        });
        &PATTERN
    }
}

impl PatternMatcher for EmailMatcher {
    fn category(&self) -> SensitiveCategory {
        SensitiveCategory::Email
    }

    fn pattern(&self) -> &Regex {
        Self::regex()
    }
}

/// Phone number matcher.
///
/// Accepts ten-digit numbers in the usual groupings with an optional
/// country prefix:
/// - 555-123-4567
/// - (555) 123-4567
/// - 555.123.4567
/// - +44 555 123 4567
#[derive(Debug, Clone, Default)]
pub struct PhoneMatcher;

impl PhoneMatcher {
    pub fn new() -> Self {
        Self
    }

    fn regex() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"(?:\+\d{1,3}[\s.-])?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}")
                .expect("Valid phone number regex")
        });
        &PATTERN
    }
}

impl PatternMatcher for PhoneMatcher {
    fn category(&self) -> SensitiveCategory {
        SensitiveCategory::Phone
    }

    fn pattern(&self) -> &Regex {
        Self::regex()
    }
}
