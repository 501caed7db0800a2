//! Resume parsing pipeline: text extraction, section segmentation, field
//! extraction and assembly into a [`Resume`].

pub mod assembler;
pub mod contact;
pub mod dates;
pub mod education;
pub mod experience;
pub mod extractor;
pub mod extras;
pub mod nlp;
pub mod outcome;
pub mod segmenter;
pub mod skills;

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::models::resume::{Resume, SectionLabel};
use assembler::{assemble, section_feedback, ResumeParts};
use dates::DateDefaults;
use extractor::RawDocument;
use nlp::NlpModel;
use outcome::SkippedFragment;

pub const UPLOADED_RESUME_TITLE: &str = "Uploaded Resume";

const BULLET_GLYPHS: [char; 3] = ['•', '-', '●'];

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
    #[error("Text extraction failed: {0}")]
    ExtractionFailure(String),
}

/// Returns the line without its leading bullet glyph, or `None` when the line
/// is not a bullet.
pub(crate) fn strip_bullet(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    trimmed
        .strip_prefix(BULLET_GLYPHS)
        .map(|rest| rest.trim())
}

/// A parsed upload plus everything the caller should report back.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedResume {
    pub resume: Resume,
    pub skipped_fragments: Vec<SkippedFragment>,
    pub feedback: Vec<String>,
}

/// Runs the full pipeline. Holds the injected language model and the date
/// placeholder; otherwise stateless and safe to share across requests.
#[derive(Clone)]
pub struct ResumeParser {
    nlp: Arc<dyn NlpModel>,
    dates: DateDefaults,
}

impl ResumeParser {
    pub fn new(nlp: Arc<dyn NlpModel>, dates: DateDefaults) -> Self {
        Self { nlp, dates }
    }

    /// Extracts text from the document and parses it. Blocking: callers on
    /// the async runtime should run this on a blocking thread.
    pub fn parse_document(
        &self,
        document: &RawDocument,
        target_job_description: &str,
    ) -> Result<ParsedResume, ParseError> {
        let text = extractor::extract(document)?;
        Ok(self.parse_text(&text, target_job_description))
    }

    pub fn parse_text(&self, text: &str, target_job_description: &str) -> ParsedResume {
        let sections = segmenter::segment(text);

        let parts = ResumeParts {
            title: UPLOADED_RESUME_TITLE.to_string(),
            summary: self.summary(&sections.text(SectionLabel::Summary)),
            contact: contact::extract_contact(text, self.nlp.as_ref()),
            education: education::extract_education(
                &sections.block(SectionLabel::Education),
                &self.dates,
            ),
            experience: experience::extract_experience(
                &sections.block(SectionLabel::Experience),
                &self.dates,
            ),
            skills: skills::extract_skills(&sections.block(SectionLabel::Skills)),
            projects: extras::extract_projects(&sections.block(SectionLabel::Projects)),
            achievements: extras::extract_achievements(
                &sections.block(SectionLabel::Achievements),
            ),
        };

        let assembled = assemble(&sections, parts, target_job_description);
        let feedback = section_feedback(&assembled.resume.missing_sections);

        info!(
            education = assembled.resume.education.len(),
            experience = assembled.resume.experience.len(),
            skills = assembled.resume.skills.len(),
            skipped = assembled.skipped.len(),
            "Parsed resume"
        );

        ParsedResume {
            resume: assembled.resume,
            skipped_fragments: assembled.skipped,
            feedback,
        }
    }

    fn summary(&self, text: &str) -> String {
        self.nlp.split_sentences(text).join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use chrono::NaiveDate;
    use nlp::RuleBasedNlp;

    fn parser() -> ResumeParser {
        ResumeParser::new(
            Arc::new(RuleBasedNlp),
            DateDefaults::Fixed(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
        )
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_strip_bullet() {
        assert_eq!(strip_bullet("• Built search"), Some("Built search"));
        assert_eq!(strip_bullet("  - Led team  "), Some("Led team"));
        assert_eq!(strip_bullet("●Shipped"), Some("Shipped"));
        assert_eq!(strip_bullet("Google Inc."), None);
    }

    #[test]
    fn test_happy_path_scenario() {
        let text = "Education\nBachelor of Science, MIT University\n2016\n2020\nExperience\nGoogle Inc.\nSoftware Engineer\n- Built search\nSkills\nPython, Go, SQL";
        let sections = segmenter::segment(text);
        assert!(sections.text(SectionLabel::Education).contains("MIT University"));
        assert!(sections.text(SectionLabel::Experience).contains("Google Inc."));
        assert_eq!(sections.text(SectionLabel::Skills), "Python, Go, SQL");

        let parsed = parser().parse_text(text, "Backend engineer");
        let resume = &parsed.resume;

        assert_eq!(resume.title, UPLOADED_RESUME_TITLE);
        assert_eq!(resume.education.len(), 1);
        let edu = &resume.education[0];
        assert!(edu.degree.starts_with("Bachelor"));
        assert!(edu.institution.contains("MIT University"));
        assert_eq!(edu.start_date, ymd(2016, 1, 1));
        assert_eq!(edu.end_date, Some(ymd(2020, 1, 1)));

        assert_eq!(resume.experience.len(), 1);
        let exp = &resume.experience[0];
        assert_eq!(exp.company, "Google Inc.");
        assert_eq!(exp.position, "Software Engineer");
        assert_eq!(exp.highlights, vec!["Built search"]);

        let names: Vec<_> = resume.skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Python", "Go", "SQL"]);
        assert!(resume.skills.iter().all(|s| s.category == "Technical"));

        assert!(resume.missing_sections.is_empty());
        assert!(parsed.feedback.is_empty());
        assert_eq!(resume.target_job_description, "Backend engineer");
    }

    #[test]
    fn test_missing_section_scenario() {
        let text = "Experience\nAcme Corp.\nPlatform Engineer\n- Ran the fleet";
        let parsed = parser().parse_text(text, "");

        assert_eq!(
            parsed.resume.missing_sections,
            [SectionLabel::Education, SectionLabel::Skills].into_iter().collect()
        );
        assert_eq!(parsed.feedback.len(), 2);
        assert!(parsed.feedback[0].contains("Education"));
        assert!(parsed.feedback[1].contains("Skills"));
        assert_eq!(parsed.resume.experience.len(), 1);
    }

    #[test]
    fn test_bad_entry_does_not_discard_other_sections() {
        let text = "Jane Doe\njane@example.com\nEducation\nSome unrelated line\nExperience\nAcme Corp.\nEngineer\nSkills\nRust, C";
        let parsed = parser().parse_text(text, "");

        assert!(parsed.resume.education.is_empty());
        assert_eq!(parsed.resume.experience.len(), 1);
        assert_eq!(parsed.resume.skills.len(), 1);
        assert_eq!(parsed.skipped_fragments.len(), 2);
        assert_eq!(parsed.resume.contact_info.full_name.as_deref(), Some("Jane Doe"));
        assert_eq!(
            parsed.resume.contact_info.email.as_deref(),
            Some("jane@example.com")
        );
        // Education had content, so it is not "missing" even though no entry survived.
        assert!(parsed.resume.missing_sections.is_empty());
    }

    #[test]
    fn test_summary_is_sentence_normalised() {
        let text = "Summary\nBackend engineer.   Loves Rust!\nfocused on   search.";
        let parsed = parser().parse_text(text, "");
        assert_eq!(
            parsed.resume.summary,
            "Backend engineer. Loves Rust! focused on search."
        );
    }

    #[test]
    fn test_unsupported_file_fails_before_parsing() {
        let err = RawDocument::new(Bytes::from_static(b"\x89PNG\r\n"), "image/png").unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_parse_document_surfaces_extraction_failure() {
        let doc = RawDocument::new(Bytes::from_static(b"%PDF-garbage"), "application/pdf").unwrap();
        let err = parser().parse_document(&doc, "").unwrap_err();
        assert!(matches!(err, ParseError::ExtractionFailure(_)));
    }
}
