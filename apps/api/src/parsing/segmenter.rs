//! Section segmentation: partitions extracted resume text into labeled zones.
//!
//! Header detection is a substring test of the lowercased line against an
//! ordered keyword table. The first group in table order wins when a line
//! matches several groups, and header lines never land in section content.

use std::collections::BTreeMap;

use crate::models::resume::SectionLabel;

/// Ordered (label, keywords) table. Order is the tie-break.
pub const KEYWORD_GROUPS: &[(SectionLabel, &[&str])] = &[
    (
        SectionLabel::Education,
        &["education", "academic", "qualification"],
    ),
    (
        SectionLabel::Experience,
        &["experience", "employment", "work history"],
    ),
    (
        SectionLabel::Skills,
        &["skills", "technologies", "technical skills", "competencies"],
    ),
    (SectionLabel::Summary, &["summary", "objective"]),
    (SectionLabel::Projects, &["projects", "personal projects"]),
    (
        SectionLabel::Achievements,
        &["achievements", "accomplishments", "honors"],
    ),
];

/// Returns the section a header line opens, if any.
pub fn classify_header(line: &str) -> Option<SectionLabel> {
    let lower = line.to_lowercase();
    KEYWORD_GROUPS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(label, _)| *label)
}

/// Section label → ordered, trimmed content lines.
///
/// Every label is always present; an unvisited label maps to no lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMap {
    sections: BTreeMap<SectionLabel, Vec<String>>,
}

impl Default for SectionMap {
    fn default() -> Self {
        Self {
            sections: SectionLabel::ALL.iter().map(|l| (*l, Vec::new())).collect(),
        }
    }
}

impl SectionMap {
    pub fn lines(&self, label: SectionLabel) -> &[String] {
        self.sections.get(&label).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Section content flattened with single spaces.
    pub fn text(&self, label: SectionLabel) -> String {
        self.lines(label).join(" ")
    }

    /// Section content with the original line breaks, for the field extractors.
    pub fn block(&self, label: SectionLabel) -> String {
        self.lines(label).join("\n")
    }

    pub fn is_empty(&self, label: SectionLabel) -> bool {
        self.lines(label).is_empty()
    }

    fn flush(&mut self, label: SectionLabel, lines: &mut Vec<String>) {
        self.sections.entry(label).or_default().append(lines);
    }
}

/// Splits `text` into sections. Pure: the same text always yields the same map.
pub fn segment(text: &str) -> SectionMap {
    let mut map = SectionMap::default();
    let mut current: Option<SectionLabel> = None;
    let mut accumulator: Vec<String> = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();

        if let Some(label) = classify_header(line) {
            if let Some(previous) = current {
                map.flush(previous, &mut accumulator);
            }
            current = Some(label);
            accumulator.clear();
            continue;
        }

        if current.is_some() && !line.is_empty() {
            accumulator.push(line.to_string());
        }
    }

    if let Some(last) = current {
        map.flush(last, &mut accumulator);
    }

    map
}
