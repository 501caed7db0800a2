use std::collections::BTreeSet;

use crate::models::resume::{
    AchievementEntry, ContactInfo, EducationEntry, ExperienceEntry, ProjectEntry, Resume,
    SectionLabel, SkillEntry,
};
use crate::parsing::outcome::{Extraction, SkippedFragment};
use crate::parsing::segmenter::SectionMap;

/// Sections whose absence is reported back to the user, in feedback order.
pub const REQUIRED_SECTIONS: [SectionLabel; 3] = [
    SectionLabel::Education,
    SectionLabel::Experience,
    SectionLabel::Skills,
];

/// Required labels whose section content is empty.
pub fn missing_sections(sections: &SectionMap) -> BTreeSet<SectionLabel> {
    REQUIRED_SECTIONS
        .into_iter()
        .filter(|label| sections.is_empty(*label))
        .collect()
}

/// One suggestion per missing section, education → experience → skills.
pub fn section_feedback(missing: &BTreeSet<SectionLabel>) -> Vec<String> {
    REQUIRED_SECTIONS
        .iter()
        .filter(|label| missing.contains(label))
        .map(|label| {
            format!(
                "Consider adding a {} section to strengthen your resume",
                label.heading()
            )
        })
        .collect()
}

/// Everything the field extractors produced for one document.
#[derive(Debug, Default)]
pub struct ResumeParts {
    pub title: String,
    pub summary: String,
    pub contact: ContactInfo,
    pub education: Extraction<EducationEntry>,
    pub experience: Extraction<ExperienceEntry>,
    pub skills: Extraction<SkillEntry>,
    pub projects: Extraction<ProjectEntry>,
    pub achievements: Extraction<AchievementEntry>,
}

#[derive(Debug, Clone)]
pub struct AssembledResume {
    pub resume: Resume,
    pub skipped: Vec<SkippedFragment>,
}

/// Pure aggregation. Nothing is rejected here; the extractors already did that.
pub fn assemble(
    sections: &SectionMap,
    parts: ResumeParts,
    target_job_description: &str,
) -> AssembledResume {
    let mut skipped = Vec::new();
    skipped.extend(parts.education.skipped);
    skipped.extend(parts.experience.skipped);
    skipped.extend(parts.skills.skipped);
    skipped.extend(parts.projects.skipped);
    skipped.extend(parts.achievements.skipped);

    let resume = Resume {
        title: parts.title,
        summary: parts.summary,
        contact_info: parts.contact,
        target_job_description: target_job_description.to_string(),
        education: parts.education.entries,
        experience: parts.experience.entries,
        skills: parts.skills.entries,
        projects: parts.projects.entries,
        achievements: parts.achievements.entries,
        missing_sections: missing_sections(sections),
    };

    AssembledResume { resume, skipped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::segmenter::segment;

    #[test]
    fn test_missing_sections_only_flags_required_labels() {
        let sections = segment("Summary\nBuilds things\nProjects\nRadar");
        let missing = missing_sections(&sections);
        assert_eq!(missing, REQUIRED_SECTIONS.into_iter().collect());
        assert!(!missing.contains(&SectionLabel::Summary));
        assert!(!missing.contains(&SectionLabel::Projects));
    }

    #[test]
    fn test_missing_iff_section_content_empty() {
        let inputs = [
            "",
            "Education\nBSc, MIT University",
            "Experience\nAcme\nEngineer\nSkills\nRust",
            "Education\nExperience\nSkills\n",
            "Jane Doe\nEducation\nMIT University\nExperience\nAcme\nSkills\nGo",
        ];
        for text in inputs {
            let sections = segment(text);
            let missing = missing_sections(&sections);
            for label in SectionLabel::ALL {
                let expected = REQUIRED_SECTIONS.contains(&label) && sections.is_empty(label);
                assert_eq!(missing.contains(&label), expected, "{label} in {text:?}");
            }
        }
    }

    #[test]
    fn test_header_with_no_content_counts_as_missing() {
        let sections = segment("Skills\n\n  \nExperience\nAcme");
        assert!(missing_sections(&sections).contains(&SectionLabel::Skills));
    }

    #[test]
    fn test_feedback_is_one_line_per_missing_section_in_fixed_order() {
        let missing: BTreeSet<_> = [SectionLabel::Skills, SectionLabel::Education]
            .into_iter()
            .collect();
        assert_eq!(
            section_feedback(&missing),
            vec![
                "Consider adding a Education section to strengthen your resume",
                "Consider adding a Skills section to strengthen your resume",
            ]
        );
        assert!(section_feedback(&BTreeSet::new()).is_empty());
    }

    #[test]
    fn test_assemble_collects_skipped_fragments_from_every_extractor() {
        let sections = segment("Experience\nAcme\nEngineer");
        let mut parts = ResumeParts {
            title: "Uploaded Resume".to_string(),
            ..Default::default()
        };
        parts.skills.skip(SectionLabel::Skills, "C", "too short");
        parts.projects.skip(SectionLabel::Projects, "- orphan", "no title");
        parts.skills.push(SkillEntry::technical("Rust"));

        let assembled = assemble(&sections, parts, "Backend role");
        assert_eq!(assembled.skipped.len(), 2);
        assert_eq!(assembled.skipped[0].section, SectionLabel::Skills);
        assert_eq!(assembled.resume.title, "Uploaded Resume");
        assert_eq!(assembled.resume.target_job_description, "Backend role");
        assert_eq!(assembled.resume.skills.len(), 1);
        assert_eq!(
            assembled.resume.missing_sections,
            [SectionLabel::Education, SectionLabel::Skills].into_iter().collect()
        );
    }
}
