use crate::models::resume::{SectionLabel, SkillEntry};
use crate::parsing::outcome::Extraction;

const SKILL_DELIMITERS: &[char] = &['•', ',', '-', '|'];

/// One skill per delimited token. Every skill is filed under "Technical"
/// with no proficiency; single-character tokens are skipped.
pub fn extract_skills(section: &str) -> Extraction<SkillEntry> {
    let mut out = Extraction::new();
    let normalized = section.replace(SKILL_DELIMITERS, "\n");

    for token in normalized.lines().map(str::trim).filter(|t| !t.is_empty()) {
        if token.chars().count() > 1 {
            out.push(SkillEntry::technical(token));
        } else {
            out.skip(SectionLabel::Skills, token, "skill name too short");
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(out: &Extraction<SkillEntry>) -> Vec<&str> {
        out.entries.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_comma_separated_list() {
        let out = extract_skills("Python, Go, SQL");
        assert_eq!(names(&out), vec!["Python", "Go", "SQL"]);
        assert!(out.entries.iter().all(|s| s.category == "Technical"));
        assert!(out.entries.iter().all(|s| s.proficiency_level.is_none()));
    }

    #[test]
    fn test_mixed_delimiters_and_lines() {
        let out = extract_skills("• Rust | TypeScript\n- Docker\nKubernetes");
        assert_eq!(names(&out), vec!["Rust", "TypeScript", "Docker", "Kubernetes"]);
    }

    #[test]
    fn test_single_character_tokens_are_skipped() {
        let out = extract_skills("C, R, Haskell");
        assert_eq!(names(&out), vec!["Haskell"]);
        assert_eq!(out.skipped.len(), 2);
        assert_eq!(out.skipped[0].fragment, "C");
    }

    #[test]
    fn test_empty_section() {
        let out = extract_skills("  \n ");
        assert!(out.entries.is_empty());
        assert!(out.skipped.is_empty());
    }
}
