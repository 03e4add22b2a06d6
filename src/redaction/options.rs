//! Redaction options and replacement marks.

use crate::error::RedactorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default marker for [`RedactionMethod::Replace`].
pub const DEFAULT_REPLACEMENT: &str = "[REDACTED]";

const ASTERISK_MARK: &str = "*******";
const BLACKOUT_MARK: &str = "█████";

/// How a matched span is overwritten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedactionMethod {
    #[default]
    Replace,
    Asterisks,
    Blackout,
}

impl RedactionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedactionMethod::Replace => "replace",
            RedactionMethod::Asterisks => "asterisks",
            RedactionMethod::Blackout => "blackout",
        }
    }
}

impl fmt::Display for RedactionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RedactionMethod {
    type Err = RedactorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "replace" => Ok(RedactionMethod::Replace),
            "asterisks" => Ok(RedactionMethod::Asterisks),
            "blackout" => Ok(RedactionMethod::Blackout),
            other => Err(RedactorError::InvalidInput {
                parameter: "method".to_string(),
                reason: format!("unknown redaction method '{other}' (expected replace, asterisks or blackout)"),
            }),
        }
    }
}

/// Options controlling how items are matched and replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedactionOptions {
    pub method: RedactionMethod,
    /// Marker used by [`RedactionMethod::Replace`].
    pub replacement_text: String,
    /// Make every replacement exactly as long (in characters) as the span it replaces.
    pub preserve_length: bool,
    pub case_sensitive: bool,
    /// Only match on word boundaries.
    pub whole_word: bool,
}

impl Default for RedactionOptions {
    fn default() -> Self {
        Self {
            method: RedactionMethod::Replace,
            replacement_text: DEFAULT_REPLACEMENT.to_string(),
            preserve_length: false,
            case_sensitive: false,
            whole_word: true,
        }
    }
}

impl RedactionOptions {
    pub fn with_method(mut self, method: RedactionMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_replacement_text(mut self, text: impl Into<String>) -> Self {
        self.replacement_text = text.into();
        self
    }

    pub fn with_preserve_length(mut self, preserve_length: bool) -> Self {
        self.preserve_length = preserve_length;
        self
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_whole_word(mut self, whole_word: bool) -> Self {
        self.whole_word = whole_word;
        self
    }
}

/// Builds the text that replaces `original`.
pub fn build_replacement(original: &str, options: &RedactionOptions) -> String {
    let length = original.chars().count();
    match options.method {
        RedactionMethod::Asterisks if options.preserve_length => "*".repeat(length),
        RedactionMethod::Asterisks => ASTERISK_MARK.to_string(),
        RedactionMethod::Blackout if options.preserve_length => "█".repeat(length),
        RedactionMethod::Blackout => BLACKOUT_MARK.to_string(),
        RedactionMethod::Replace => {
            let marker = if options.replacement_text.is_empty() {
                DEFAULT_REPLACEMENT
            } else {
                options.replacement_text.as_str()
            };
            if options.preserve_length {
                let mut fitted: String = marker.chars().take(length).collect();
                let missing = length - fitted.chars().count();
                fitted.extend(std::iter::repeat(' ').take(missing));
                fitted
            } else {
                marker.to_string()
            }
        }
    }
}
