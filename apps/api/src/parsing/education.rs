use std::sync::LazyLock;

use regex::Regex;

use crate::models::resume::{EducationEntry, SectionLabel};
use crate::parsing::dates::{extract_span, DateDefaults};
use crate::parsing::outcome::Extraction;

static DEGREE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:Bachelor|Master|Ph\.D|PhD|B\.|M\.|Associate)").expect("valid degree regex")
});

static INSTITUTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"University|College|Institute").expect("valid institution regex"));

// Degree token, then "of"/"in", then the field up to the next comma.
static FIELD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s,]*\s+(?:of|in)\s+([^,\n]+)").expect("valid field-of-study regex")
});

static GPA_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"GPA:\s*(\d+\.\d+(?:\s*/\s*\d+(?:\.\d+)?)?)|(\d+\.\d+(?:/\d+(?:\.\d+)?)?)\s*GPA")
        .expect("valid GPA regex")
});

/// Splits the education section at each degree keyword and parses every chunk.
pub fn extract_education(section: &str, defaults: &DateDefaults) -> Extraction<EducationEntry> {
    let mut out = Extraction::new();

    let starts: Vec<usize> = DEGREE_REGEX.find_iter(section).map(|m| m.start()).collect();
    let mut chunks: Vec<&str> = Vec::new();

    let preamble_end = starts.first().copied().unwrap_or(section.len());
    if !section[..preamble_end].trim().is_empty() {
        chunks.push(&section[..preamble_end]);
    }
    for (i, start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(section.len());
        chunks.push(&section[*start..end]);
    }

    for chunk in chunks {
        match parse_chunk(chunk, defaults) {
            Some(entry) => out.push(entry),
            None => out.skip(
                SectionLabel::Education,
                chunk,
                "no degree keyword or institution found",
            ),
        }
    }

    out
}

fn parse_chunk(chunk: &str, defaults: &DateDefaults) -> Option<EducationEntry> {
    let degree = DEGREE_REGEX
        .find(chunk)
        .filter(|m| m.start() == 0)
        .map(|m| m.as_str().to_string());

    let institution = chunk
        .lines()
        .map(str::trim)
        .find(|line| INSTITUTION_REGEX.is_match(line))
        .map(institution_from_line);

    if degree.is_none() && institution.is_none() {
        return None;
    }

    let field_of_study = if degree.is_some() {
        FIELD_REGEX
            .captures(chunk)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default()
    } else {
        String::new()
    };

    let gpa = GPA_REGEX
        .captures(chunk)
        .and_then(|c| c.get(1).or_else(|| c.get(2)))
        .map(|m| m.as_str().to_string());

    let span = extract_span(chunk, defaults);

    Some(EducationEntry {
        institution: institution.unwrap_or_default(),
        degree: degree.unwrap_or_default(),
        field_of_study,
        start_date: span.start,
        end_date: span.end,
        gpa,
    })
}

/// Narrows "Bachelor of Science, MIT University, 2020" to "MIT University".
fn institution_from_line(line: &str) -> String {
    line.split(',')
        .map(str::trim)
        .find(|part| INSTITUTION_REGEX.is_match(part))
        .unwrap_or(line)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn defaults() -> DateDefaults {
        DateDefaults::Fixed(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap())
    }

    fn year(y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, 1, 1).unwrap()
    }

    #[test]
    fn test_single_degree_with_dates() {
        let out = extract_education(
            "Bachelor of Science, MIT University\n2016\n2020",
            &defaults(),
        );
        assert_eq!(out.entries.len(), 1);
        assert!(out.skipped.is_empty());
        let entry = &out.entries[0];
        assert_eq!(entry.degree, "Bachelor");
        assert_eq!(entry.institution, "MIT University");
        assert_eq!(entry.field_of_study, "Science");
        assert_eq!(entry.start_date, year(2016));
        assert_eq!(entry.end_date, Some(year(2020)));
        assert_eq!(entry.gpa, None);
    }

    #[test]
    fn test_splits_on_each_degree_keyword() {
        let section = "Master of Engineering in Robotics\nStanford University 2019 - 2021\nGPA: 3.9/4.0\n\
                       Bachelor of Arts\nBoston College\n2015 2019\n3.5 GPA";
        let out = extract_education(section, &defaults());
        assert_eq!(out.entries.len(), 2);

        assert_eq!(out.entries[0].degree, "Master");
        assert_eq!(out.entries[0].field_of_study, "Engineering in Robotics");
        assert_eq!(out.entries[0].institution, "Stanford University 2019 - 2021");
        assert_eq!(out.entries[0].gpa.as_deref(), Some("3.9/4.0"));
        assert_eq!(out.entries[0].end_date, Some(year(2021)));

        assert_eq!(out.entries[1].degree, "Bachelor");
        assert_eq!(out.entries[1].institution, "Boston College");
        assert_eq!(out.entries[1].gpa.as_deref(), Some("3.5"));
        assert_eq!(out.entries[1].start_date, year(2015));
    }

    #[test]
    fn test_abbreviated_degrees() {
        let out = extract_education("Ph.D in Physics, Caltech Institute\nB. Tech, IIT College", &defaults());
        let degrees: Vec<_> = out.entries.iter().map(|e| e.degree.as_str()).collect();
        assert_eq!(degrees, vec!["Ph.D", "B."]);
        assert_eq!(out.entries[0].field_of_study, "Physics");
        assert_eq!(out.entries[1].institution, "IIT College");
    }

    #[test]
    fn test_institution_only_preamble_is_kept() {
        let out = extract_education("Springfield Community College\n2012", &defaults());
        assert_eq!(out.entries.len(), 1);
        assert_eq!(out.entries[0].degree, "");
        assert_eq!(out.entries[0].institution, "Springfield Community College");
        assert_eq!(out.entries[0].start_date, year(2012));
        assert_eq!(out.entries[0].end_date, None);
    }

    #[test]
    fn test_fragment_without_degree_or_institution_is_skipped_not_fatal() {
        let out = extract_education(
            "Dean's list, top of class\nBachelor of Commerce, Toronto University",
            &defaults(),
        );
        assert_eq!(out.entries.len(), 1);
        assert_eq!(out.skipped.len(), 1);
        assert_eq!(out.skipped[0].section, SectionLabel::Education);
        assert_eq!(out.skipped[0].fragment, "Dean's list, top of class");
    }

    #[test]
    fn test_missing_dates_use_placeholder() {
        let out = extract_education("Associate Degree, Lakeside College", &defaults());
        assert_eq!(out.entries[0].degree, "Associate");
        assert_eq!(out.entries[0].start_date, year(2000));
        assert_eq!(out.entries[0].end_date, None);
    }

    #[test]
    fn test_empty_section_yields_nothing() {
        let out = extract_education("", &defaults());
        assert!(out.entries.is_empty());
        assert!(out.skipped.is_empty());
    }
}
