//! Detected sensitive items.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Items above this confidence are selected for redaction by default.
pub const SELECTION_THRESHOLD: f64 = 0.7;

/// PII category of a detected item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensitiveCategory {
    Name,
    Email,
    Phone,
    Address,
    Ssn,
    CreditCard,
    Date,
    Organization,
    Financial,
    Medical,
    Other,
}

impl SensitiveCategory {
    pub const ALL: [SensitiveCategory; 11] = [
        SensitiveCategory::Name,
        SensitiveCategory::Email,
        SensitiveCategory::Phone,
        SensitiveCategory::Address,
        SensitiveCategory::Ssn,
        SensitiveCategory::CreditCard,
        SensitiveCategory::Date,
        SensitiveCategory::Organization,
        SensitiveCategory::Financial,
        SensitiveCategory::Medical,
        SensitiveCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SensitiveCategory::Name => "name",
            SensitiveCategory::Email => "email",
            SensitiveCategory::Phone => "phone",
            SensitiveCategory::Address => "address",
            SensitiveCategory::Ssn => "ssn",
            SensitiveCategory::CreditCard => "creditcard",
            SensitiveCategory::Date => "date",
            SensitiveCategory::Organization => "organization",
            SensitiveCategory::Financial => "financial",
            SensitiveCategory::Medical => "medical",
            SensitiveCategory::Other => "other",
        }
    }
}

impl fmt::Display for SensitiveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One occurrence of an item, relative to a section's content at detection time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPosition {
    pub section_id: String,
    pub start: usize,
    pub end: usize,
}

/// A deduplicated detection, or a user-supplied literal when `is_custom`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitiveItem {
    pub id: String,
    pub text: String,
    pub category: SensitiveCategory,
    pub positions: Vec<ItemPosition>,
    pub confidence: f64,
    pub selected: bool,
    #[serde(default)]
    pub is_custom: bool,
}

impl SensitiveItem {
    /// A detected item with its first occurrence.
    pub fn detected(
        text: impl Into<String>,
        category: SensitiveCategory,
        position: ItemPosition,
        confidence: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            category,
            positions: vec![position],
            confidence,
            selected: confidence > SELECTION_THRESHOLD,
            is_custom: false,
        }
    }

    /// A user-supplied literal, redacted wherever it appears.
    pub fn custom(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            category: SensitiveCategory::Other,
            positions: Vec::new(),
            confidence: 1.0,
            selected: true,
            is_custom: true,
        }
    }

    /// True when one of the positions points into `section_id`.
    pub fn occurs_in(&self, section_id: &str) -> bool {
        self.positions.iter().any(|p| p.section_id == section_id)
    }
}
