use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The six resume zones recognised by the section segmenter.
///
/// Declaration order is also the `Ord` order, which puts the required
/// sections in the education → experience → skills order used for feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionLabel {
    Summary,
    Education,
    Experience,
    Skills,
    Projects,
    Achievements,
}

impl SectionLabel {
    pub const ALL: [SectionLabel; 6] = [
        SectionLabel::Summary,
        SectionLabel::Education,
        SectionLabel::Experience,
        SectionLabel::Skills,
        SectionLabel::Projects,
        SectionLabel::Achievements,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionLabel::Summary => "summary",
            SectionLabel::Education => "education",
            SectionLabel::Experience => "experience",
            SectionLabel::Skills => "skills",
            SectionLabel::Projects => "projects",
            SectionLabel::Achievements => "achievements",
        }
    }

    /// Human-facing section heading, e.g. "Skills".
    pub fn heading(&self) -> &'static str {
        match self {
            SectionLabel::Summary => "Summary",
            SectionLabel::Education => "Education",
            SectionLabel::Experience => "Experience",
            SectionLabel::Skills => "Skills",
            SectionLabel::Projects => "Projects",
            SectionLabel::Achievements => "Achievements",
        }
    }
}

impl fmt::Display for SectionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contact details. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    #[serde(default)]
    pub field_of_study: String,
    pub start_date: NaiveDate,
    /// `None` means ongoing.
    pub end_date: Option<NaiveDate>,
    /// Kept verbatim so formats like "3.8/4.0" survive.
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub company: String,
    pub position: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

pub const DEFAULT_SKILL_CATEGORY: &str = "Technical";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub name: String,
    #[serde(default = "default_skill_category")]
    pub category: String,
    pub proficiency_level: Option<String>,
}

fn default_skill_category() -> String {
    DEFAULT_SKILL_CATEGORY.to_string()
}

impl SkillEntry {
    pub fn technical(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: default_skill_category(),
            proficiency_level: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub url: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementEntry {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: Option<NaiveDate>,
}

/// The resume aggregate. Owns every entry collection outright; entries have
/// no identity outside the resume they belong to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub contact_info: ContactInfo,
    #[serde(default)]
    pub target_job_description: String,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub skills: Vec<SkillEntry>,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    #[serde(default)]
    pub achievements: Vec<AchievementEntry>,
    #[serde(default)]
    pub missing_sections: BTreeSet<SectionLabel>,
}

impl Resume {
    /// Recomputes `missing_sections` from the entry collections. Used for
    /// resumes entered by hand, where there is no segmented source text.
    pub fn refresh_missing_sections(&mut self) {
        let mut missing = BTreeSet::new();
        if self.education.is_empty() {
            missing.insert(SectionLabel::Education);
        }
        if self.experience.is_empty() {
            missing.insert(SectionLabel::Experience);
        }
        if self.skills.is_empty() {
            missing.insert(SectionLabel::Skills);
        }
        self.missing_sections = missing;
    }

    /// Skill names, lowercased and trimmed, for job matching.
    pub fn skill_names(&self) -> Vec<String> {
        self.skills
            .iter()
            .map(|s| s.name.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }
}
