//! Projects and achievements. Both are optional sections, so nothing here
//! falls back to placeholder dates.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::resume::{AchievementEntry, ProjectEntry, SectionLabel};
use crate::parsing::dates::{extract_optional_span, find_dates};
use crate::parsing::outcome::Extraction;
use crate::parsing::strip_bullet;

static STACK_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:tech stack|stack|built with)\s*:\s*(.+)$").expect("valid stack regex")
});

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s)]+").expect("valid url regex"));

struct ProjectDraft<'a> {
    title: &'a str,
    description: Vec<&'a str>,
    technologies: Vec<String>,
    raw: Vec<&'a str>,
}

impl ProjectDraft<'_> {
    fn finish(self) -> ProjectEntry {
        let raw = self.raw.join("\n");
        let url = URL_REGEX.find(&raw).map(|m| m.as_str().to_string());
        let title = URL_REGEX.replace_all(self.title, "").trim().to_string();
        let span = extract_optional_span(&raw);
        ProjectEntry {
            title,
            description: self.description.join(" "),
            technologies: self.technologies,
            url,
            start_date: span.map(|s| s.start),
            end_date: span.and_then(|s| s.end),
        }
    }
}

/// Each non-bullet line opens a project; bullets describe it and a
/// `Tech Stack:` / `Built with:` line lists its technologies.
pub fn extract_projects(section: &str) -> Extraction<ProjectEntry> {
    let mut out = Extraction::new();
    let mut current: Option<ProjectDraft<'_>> = None;

    for line in section.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let content = strip_bullet(line).unwrap_or(line);

        if let Some(caps) = STACK_LINE_REGEX.captures(content) {
            match current.as_mut() {
                Some(draft) => {
                    draft.raw.push(line);
                    draft.technologies.extend(
                        caps.get(1)
                            .map(|m| m.as_str())
                            .unwrap_or_default()
                            .split(',')
                            .map(str::trim)
                            .filter(|t| !t.is_empty())
                            .map(str::to_string),
                    );
                }
                None => out.skip(SectionLabel::Projects, line, "technology list without a project"),
            }
            continue;
        }

        match strip_bullet(line) {
            Some(bullet) => match current.as_mut() {
                Some(draft) => {
                    draft.raw.push(line);
                    draft.description.push(bullet);
                }
                None => out.skip(SectionLabel::Projects, line, "bullet without a project title"),
            },
            None => {
                if let Some(done) = current.take() {
                    out.push(done.finish());
                }
                current = Some(ProjectDraft {
                    title: line,
                    description: Vec::new(),
                    technologies: Vec::new(),
                    raw: vec![line],
                });
            }
        }
    }

    if let Some(done) = current.take() {
        out.push(done.finish());
    }
    out
}

/// One achievement per line, split into title and description at the first
/// `": "` or `" - "`.
pub fn extract_achievements(section: &str) -> Extraction<AchievementEntry> {
    let mut out = Extraction::new();

    for line in section.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let text = strip_bullet(line).unwrap_or(line);
        if text.chars().count() < 2 {
            out.skip(SectionLabel::Achievements, line, "achievement text too short");
            continue;
        }

        let (title, description) = text
            .split_once(": ")
            .or_else(|| text.split_once(" - "))
            .map(|(t, d)| (t.trim(), d.trim()))
            .unwrap_or((text, ""));

        out.push(AchievementEntry {
            title: title.to_string(),
            description: description.to_string(),
            date: find_dates(text).first().copied(),
        });
    }

    out
}
