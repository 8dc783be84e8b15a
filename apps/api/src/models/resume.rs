use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::profile::EducationRecord;

/// One generated role. Company, title, and dates must echo the matching base role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub company: String,
    pub title: String,
    pub dates: String,
    pub bullets: Vec<String>,
}

/// The only object handed to the document renderer.
///
/// Built fresh on every validation pass; `education` is always copied from the
/// profile, never taken from model output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeContent {
    pub summary: String,
    /// Wire form `"Category: item, item, ..."`. See [`SkillLine`].
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationRecord>,
}

impl ResumeContent {
    /// Content with nothing parsed from the model, carrying only profile education.
    pub fn empty(education: &[EducationRecord]) -> Self {
        Self {
            education: education.to_vec(),
            ..Self::default()
        }
    }
}

/// Typed view over a `"Category: item, item"` skills line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillLine {
    pub category: String,
    pub items: Vec<String>,
}

impl SkillLine {
    /// Splits on the first colon; items are comma-separated, trimmed, and empty
    /// entries dropped. Returns `None` for lines without a colon.
    pub fn parse(line: &str) -> Option<Self> {
        let (category, payload) = line.split_once(':')?;
        Some(Self {
            category: category.trim().to_string(),
            items: split_items(payload),
        })
    }
}

impl fmt::Display for SkillLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category, self.items.join(", "))
    }
}

pub fn split_items(payload: &str) -> Vec<String> {
    payload
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
