use std::sync::LazyLock;

use regex::Regex;

use crate::models::resume::{ExperienceEntry, SectionLabel};
use crate::parsing::dates::{extract_span, DateDefaults};
use crate::parsing::outcome::Extraction;
use crate::parsing::strip_bullet;

/// A line made only of capitalised words, optionally ending in a corporate
/// suffix, opens a new company block.
static COMPANY_BOUNDARY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][\w&'.-]*(?:\s+[A-Z][\w&'.-]*)*(?:\s+(?:Ltd\.|Inc\.|Corp\.))?$")
        .expect("valid company boundary regex")
});

/// Lines of one company block: up to two header lines, then the body.
#[derive(Default)]
struct Block<'a> {
    header: Vec<&'a str>,
    bullets: Vec<&'a str>,
    description: Vec<&'a str>,
    raw: Vec<&'a str>,
}

impl<'a> Block<'a> {
    fn has_full_header(&self) -> bool {
        self.header.len() >= 2
    }

    fn push(&mut self, line: &'a str) {
        self.raw.push(line);
        match strip_bullet(line) {
            Some(rest) => self.bullets.push(rest),
            None if !self.has_full_header() => self.header.push(line),
            None => self.description.push(line),
        }
    }
}

/// Parses the experience section into one entry per company block.
///
/// The first two non-bullet lines of a block are company then position.
/// Single-line or multi-line company headers are not special-cased.
pub fn extract_experience(section: &str, defaults: &DateDefaults) -> Extraction<ExperienceEntry> {
    let mut out = Extraction::new();
    let mut blocks: Vec<Block<'_>> = Vec::new();

    for line in section.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let starts_block = match blocks.last() {
            None => true,
            Some(current) => {
                current.has_full_header()
                    && strip_bullet(line).is_none()
                    && COMPANY_BOUNDARY_REGEX.is_match(line)
            }
        };
        if starts_block {
            blocks.push(Block::default());
        }
        if let Some(current) = blocks.last_mut() {
            current.push(line);
        }
    }

    for block in blocks {
        let raw = block.raw.join("\n");
        let company = block.header.first().copied().unwrap_or_default();
        let position = block.header.get(1).copied().unwrap_or_default();

        if company.is_empty() && position.is_empty() {
            out.skip(SectionLabel::Experience, &raw, "no company or position line");
            continue;
        }

        let span = extract_span(&raw, defaults);
        out.push(ExperienceEntry {
            company: company.to_string(),
            position: position.to_string(),
            start_date: span.start,
            end_date: span.end,
            description: block.description.join(" "),
            highlights: block
                .bullets
                .iter()
                .filter(|b| !b.is_empty())
                .map(|b| b.to_string())
                .collect(),
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn defaults() -> DateDefaults {
        DateDefaults::Fixed(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap())
    }

    #[test]
    fn test_company_position_and_highlights() {
        let out = extract_experience(
            "Google Inc.\nSoftware Engineer\n- Built search",
            &defaults(),
        );
        assert_eq!(out.entries.len(), 1);
        let entry = &out.entries[0];
        assert_eq!(entry.company, "Google Inc.");
        assert_eq!(entry.position, "Software Engineer");
        assert_eq!(entry.highlights, vec!["Built search"]);
        assert_eq!(entry.description, "");
        assert_eq!(entry.start_date, NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        assert_eq!(entry.end_date, None);
    }

    #[test]
    fn test_new_company_block_starts_after_full_header() {
        let section = "Acme Corp.\nBackend Developer\nJan 2019 - Mar 2021\nOwned the billing service.\n\
                       • Cut invoice latency by 40%\n● Migrated to Postgres\n\
                       Initech Ltd.\nIntern\n06/2018\n- Wrote tests";
        let out = extract_experience(section, &defaults());
        assert_eq!(out.entries.len(), 2);

        let acme = &out.entries[0];
        assert_eq!(acme.company, "Acme Corp.");
        assert_eq!(acme.position, "Backend Developer");
        assert_eq!(acme.description, "Jan 2019 - Mar 2021 Owned the billing service.");
        assert_eq!(
            acme.highlights,
            vec!["Cut invoice latency by 40%", "Migrated to Postgres"]
        );
        assert_eq!(acme.start_date, NaiveDate::from_ymd_opt(2019, 1, 1).unwrap());
        assert_eq!(acme.end_date, NaiveDate::from_ymd_opt(2021, 3, 1));

        let initech = &out.entries[1];
        assert_eq!(initech.company, "Initech Ltd.");
        assert_eq!(initech.position, "Intern");
        assert_eq!(initech.start_date, NaiveDate::from_ymd_opt(2018, 6, 1).unwrap());
        assert_eq!(initech.end_date, None);
        assert_eq!(initech.highlights, vec!["Wrote tests"]);
    }

    #[test]
    fn test_bullets_only_block_is_skipped() {
        let out = extract_experience("- orphan bullet\n• another", &defaults());
        assert!(out.entries.is_empty());
        assert_eq!(out.skipped.len(), 1);
        assert_eq!(out.skipped[0].section, SectionLabel::Experience);
    }

    #[test]
    fn test_single_header_line_leaves_position_empty() {
        let out = extract_experience("Freelance", &defaults());
        assert_eq!(out.entries.len(), 1);
        assert_eq!(out.entries[0].company, "Freelance");
        assert_eq!(out.entries[0].position, "");
    }

    #[test]
    fn test_lowercase_description_lines_do_not_split_blocks() {
        let out = extract_experience(
            "Globex\nEngineer\nWorked on the data platform\nand the ingestion pipeline",
            &defaults(),
        );
        assert_eq!(out.entries.len(), 1);
        assert_eq!(
            out.entries[0].description,
            "Worked on the data platform and the ingestion pipeline"
        );
    }
}
