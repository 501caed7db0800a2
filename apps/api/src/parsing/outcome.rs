use serde::Serialize;
use tracing::warn;

use crate::models::resume::SectionLabel;

/// A raw piece of section text a field extractor could not turn into an entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedFragment {
    pub section: SectionLabel,
    pub fragment: String,
    pub reason: String,
}

/// Result of one field extractor: the entries it produced plus every fragment
/// it had to skip. A skipped fragment never aborts the rest of the extraction.
#[derive(Debug, Clone)]
pub struct Extraction<T> {
    pub entries: Vec<T>,
    pub skipped: Vec<SkippedFragment>,
}

impl<T> Extraction<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: T) {
        self.entries.push(entry);
    }

    /// Records a skipped fragment and logs it as a partial-extraction warning.
    pub fn skip(&mut self, section: SectionLabel, fragment: &str, reason: &str) {
        let fragment = fragment.trim().to_string();
        warn!(
            section = section.as_str(),
            fragment = %fragment,
            "Skipping unparseable {section} fragment: {reason}"
        );
        self.skipped.push(SkippedFragment {
            section,
            fragment,
            reason: reason.to_string(),
        });
    }
}

impl<T> Default for Extraction<T> {
    fn default() -> Self {
        Self::new()
    }
}
