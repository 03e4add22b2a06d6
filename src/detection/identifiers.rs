//! National identifier and payment card matchers.

use super::{PatternMatcher, SensitiveCategory};
use once_cell::sync::Lazy;
use regex::Regex;

/// Matches nine-digit national identifiers, optionally hyphenated (`123-45-6789`).
#[derive(Debug, Clone, Default)]
pub struct SsnMatcher;

impl SsnMatcher {
    pub fn new() -> Self {
        Self
    }

    fn regex() -> &'static Regex {
        static PATTERN: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"\b\d{3}-?\d{2}-?\d{4}\b").expect("Valid SSN regex"));
        &PATTERN
    }
}

impl PatternMatcher for SsnMatcher {
    fn category(&self) -> SensitiveCategory {
        SensitiveCategory::Ssn
    }

    fn pattern(&self) -> &Regex {
        Self::regex()
    }
}

/// Payment card matcher.
///
/// Sixteen-digit cards in groups of four, plus fifteen-digit cards in the
/// 4-6-5 grouping. Groups may be separated by a space or a hyphen.
#[derive(Debug, Clone, Default)]
pub struct CardNumberMatcher;

impl CardNumberMatcher {
    pub fn new() -> Self {
        Self
    }

    fn regex() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"\b(?:\d{4}[-\s]?){3}\d{4}\b|\b\d{4}[-\s]?\d{6}[-\s]?\d{5}\b")
                .expect("Valid card number regex")
        });
        &PATTERN
    }
}

impl PatternMatcher for CardNumberMatcher {
    fn category(&self) -> SensitiveCategory {
        SensitiveCategory::CreditCard
    }

    fn pattern(&self) -> &Regex {
        Self::regex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(matcher: &dyn PatternMatcher, text: &str) -> Vec<String> {
        matcher
            .extract_all(text)
            .into_iter()
            .map(|m| m.text.to_string())
            .collect()
    }

    #[test]
    fn test_ssn_forms() {
        let matcher = SsnMatcher::new();
        assert_eq!(texts(&matcher, "SSN 123-45-6789."), vec!["123-45-6789"]);
        assert_eq!(texts(&matcher, "id 123456789 on file"), vec!["123456789"]);
        assert!(texts(&matcher, "order 1234567890").is_empty());
        assert_eq!(matcher.confidence("123-45-6789"), 0.95);
    }

    #[test]
    fn test_card_groupings() {
        let matcher = CardNumberMatcher::new();
        assert_eq!(
            texts(&matcher, "Visa 4111 1111 1111 1111 expires"),
            vec!["4111 1111 1111 1111"]
        );
        assert_eq!(texts(&matcher, "card 4111-1111-1111-1111"), vec!["4111-1111-1111-1111"]);
        assert_eq!(texts(&matcher, "Amex 3782 822463 10005"), vec!["3782 822463 10005"]);
        assert_eq!(matcher.confidence("3782 822463 10005"), 0.9);
    }

    #[test]
    fn test_short_digit_runs_are_not_cards() {
        assert!(texts(&CardNumberMatcher::new(), "ref 4111 1111 1111").is_empty());
    }
}
