//! Document-level sensitive data analysis.

use super::item::SELECTION_THRESHOLD;
use super::{
    AddressMatcher, CardNumberMatcher, DateMatcher, EmailMatcher, ItemPosition, NameMatcher,
    OrganizationMatcher, PatternMatcher, PhoneMatcher, SensitiveCategory, SensitiveItem,
    SsnMatcher,
};
use crate::document::{DocumentSection, ParsedDocument};
use std::collections::{HashMap, HashSet};

/// Runs every matcher over every section and merges the results.
///
/// Items with identical text are merged document-wide: positions are
/// concatenated in encounter order and the confidence is the highest seen.
/// The same span matched by two categories stays two items.
#[derive(Debug, Clone)]
pub struct SensitiveDataAnalyzer {
    filter_common_words: bool,
}

struct Candidate {
    text: String,
    category: SensitiveCategory,
    position: ItemPosition,
    confidence: f64,
}

impl SensitiveDataAnalyzer {
    pub fn new() -> Self {
        Self {
            filter_common_words: true,
        }
    }

    /// Enables or disables the common-word stoplist for name matches.
    pub fn set_common_word_filtering(&mut self, enabled: bool) {
        self.filter_common_words = enabled;
    }

    pub fn common_word_filtering(&self) -> bool {
        self.filter_common_words
    }

    /// Detects sensitive items, sorted by descending confidence.
    pub fn analyze(&self, document: &ParsedDocument) -> Vec<SensitiveItem> {
        let matchers: [Box<dyn PatternMatcher>; 7] = [
            Box::new(EmailMatcher::new()),
            Box::new(PhoneMatcher::new()),
            Box::new(SsnMatcher::new()),
            Box::new(CardNumberMatcher::new()),
            Box::new(DateMatcher::new()),
            Box::new(NameMatcher::with_common_word_filter(self.filter_common_words)),
            Box::new(AddressMatcher::new()),
        ];
        let organizations = OrganizationMatcher::new();

        let mut candidates = Vec::new();
        let mut names_seen: HashSet<String> = HashSet::new();

        for section in &document.sections {
            let mut found = Vec::new();
            for matcher in &matchers {
                collect(matcher.as_ref(), section, &mut found);
            }
            names_seen.extend(
                found
                    .iter()
                    .filter(|c| c.category == SensitiveCategory::Name)
                    .map(|c| c.text.clone()),
            );

            let mut orgs = Vec::new();
            collect(&organizations, section, &mut orgs);
            orgs.retain(|c| !names_seen.contains(&c.text));

            candidates.extend(found);
            candidates.extend(orgs);
        }

        let candidate_count = candidates.len();
        let items = merge(candidates);
        tracing::debug!(
            filename = %document.filename,
            sections = document.sections.len(),
            candidates = candidate_count,
            items = items.len(),
            "analyzed document"
        );
        items
    }
}

impl Default for SensitiveDataAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn collect(matcher: &dyn PatternMatcher, section: &DocumentSection, out: &mut Vec<Candidate>) {
    for m in matcher.extract_all(&section.content) {
        if m.text.is_empty() {
            continue;
        }
        out.push(Candidate {
            text: m.text.to_string(),
            category: matcher.category(),
            position: ItemPosition {
                section_id: section.id.clone(),
                start: m.start,
                end: m.end,
            },
            confidence: matcher.confidence(m.text),
        });
    }
}

fn merge(candidates: Vec<Candidate>) -> Vec<SensitiveItem> {
    let mut items: Vec<SensitiveItem> = Vec::new();
    let mut by_text: HashMap<String, usize> = HashMap::new();

    for candidate in candidates {
        match by_text.get(&candidate.text) {
            Some(&index) => {
                let item = &mut items[index];
                item.positions.push(candidate.position);
                if candidate.confidence > item.confidence {
                    item.confidence = candidate.confidence;
                    item.category = candidate.category;
                }
            }
            None => {
                by_text.insert(candidate.text.clone(), items.len());
                items.push(SensitiveItem::detected(
                    candidate.text,
                    candidate.category,
                    candidate.position,
                    candidate.confidence,
                ));
            }
        }
    }

    for item in &mut items {
        item.selected = item.confidence > SELECTION_THRESHOLD;
    }
    items.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    items
}
