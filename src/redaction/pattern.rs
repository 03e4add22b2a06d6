//! Search patterns for literal redaction targets.

use super::RedactionOptions;
use crate::error::{RedactorError, RedactorResult};
use regex::{Regex, RegexBuilder};

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Compiles a pattern matching `literal` under `options`.
///
/// The literal is escaped and matched case-insensitively unless
/// `case_sensitive` is set. With `whole_word`, a `\b` assertion is added on
/// each side whose edge character is a word character; a literal such as
/// `(555) 123-4567` is only anchored on the right.
pub fn build_search_pattern(literal: &str, options: &RedactionOptions) -> RedactorResult<Regex> {
    let escaped = regex::escape(literal);
    let source = if options.whole_word {
        let leading = literal.chars().next().is_some_and(is_word_char);
        let trailing = literal.chars().next_back().is_some_and(is_word_char);
        format!(
            "{}{escaped}{}",
            if leading { r"\b" } else { "" },
            if trailing { r"\b" } else { "" }
        )
    } else {
        escaped
    };

    RegexBuilder::new(&source)
        .case_insensitive(!options.case_sensitive)
        .build()
        .map_err(|e| RedactorError::PatternError {
            pattern: literal.to_string(),
            reason: e.to_string(),
        })
}
