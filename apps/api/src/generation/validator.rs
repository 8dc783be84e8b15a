//! Content Validator: parses sanitized model output into `ResumeContent` and
//! checks every structural and semantic rule.
//!
//! # Rule order
//! 1. JSON object root (fatal: nothing else is checked)
//! 2. Summary: present, years-phrase prefix, no PII, 4-5 sentences
//! 3. Skills: 3-6 lines; each line has a category and 5-8 items
//! 4. Experience: one entry per base role with matching identity, 5-6 bullets, no PII
//!
//! Independent rules all report. Per-list rules stop at their first violation so
//! one broken structure does not flood the repair prompt.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::generation::sanitizer::contains_pii;
use crate::models::profile::Profile;
use crate::models::resume::{split_items, ExperienceEntry, ResumeContent};

const SUMMARY_SENTENCES: std::ops::RangeInclusive<usize> = 4..=5;
const SKILL_LINES: std::ops::RangeInclusive<usize> = 3..=6;
const SKILL_ITEMS: std::ops::RangeInclusive<usize> = 5..=8;
const BULLETS_PER_ROLE: std::ops::RangeInclusive<usize> = 5..=6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    EmptyOutput,
    InvalidJson,
    SchemaViolation,
}

/// One broken rule, phrased for both humans and the repair prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    fn schema(message: impl Into<String>) -> Self {
        Self::new(IssueKind::SchemaViolation, message)
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Best-effort content plus every issue found, in rule order.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub content: ResumeContent,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Validates sanitized model output against the profile and years label.
///
/// The returned content is populated from whatever parsed, even when issues
/// exist; education always comes from the profile.
pub fn validate_content(json_text: &str, profile: &Profile, years_label: &str) -> ValidationOutcome {
    let fatal = |issue: ValidationIssue| ValidationOutcome {
        content: ResumeContent::empty(&profile.education),
        issues: vec![issue],
    };

    if json_text.trim().is_empty() {
        return fatal(ValidationIssue::new(
            IssueKind::EmptyOutput,
            "Response was empty; return a single JSON object",
        ));
    }

    let root = match serde_json::from_str::<Value>(json_text) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            return fatal(ValidationIssue::new(
                IssueKind::InvalidJson,
                "Response must be a JSON object with keys summary, skills, experience",
            ))
        }
        Err(e) => {
            return fatal(ValidationIssue::new(
                IssueKind::InvalidJson,
                format!("Response was not valid JSON: {e}"),
            ))
        }
    };

    let mut issues = Vec::new();

    let summary = read_string(&root, "summary");
    check_summary(&summary, years_label, &mut issues);

    let skills = read_string_array(root.get("skills"));
    check_skills(&skills, &mut issues);

    let experience = read_experience(root.get("experience"));
    check_experience(&experience, profile, &mut issues);

    ValidationOutcome {
        content: ResumeContent {
            summary,
            skills,
            experience,
            education: profile.education.clone(),
        },
        issues,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Extraction
// ────────────────────────────────────────────────────────────────────────────

fn read_string(map: &Map<String, Value>, key: &str) -> String {
    map.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// String elements only; anything else in the array is ignored.
fn read_string_array(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn read_experience(value: Option<&Value>) -> Vec<ExperienceEntry> {
    value
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_object)
                .map(|entry| ExperienceEntry {
                    company: read_string(entry, "company"),
                    title: read_string(entry, "title"),
                    dates: read_string(entry, "dates"),
                    bullets: read_string_array(entry.get("bullets")),
                })
                .collect()
        })
        .unwrap_or_default()
}

// ────────────────────────────────────────────────────────────────────────────
// Rules
// ────────────────────────────────────────────────────────────────────────────

fn check_summary(summary: &str, years_label: &str, issues: &mut Vec<ValidationIssue>) {
    if summary.trim().is_empty() {
        issues.push(ValidationIssue::schema("Summary is missing or empty"));
        return;
    }

    let prefix = format!("{years_label} years of experience");
    if !summary
        .trim_start()
        .to_lowercase()
        .starts_with(&prefix.to_lowercase())
    {
        issues.push(ValidationIssue::schema(format!(
            "Summary must start with \"{prefix}\""
        )));
    }

    if contains_pii(summary) {
        issues.push(ValidationIssue::schema(
            "Summary must not contain emails, phone numbers, or URLs",
        ));
    }

    let sentences = count_sentences(summary);
    if !SUMMARY_SENTENCES.contains(&sentences) {
        issues.push(ValidationIssue::schema(format!(
            "Summary must have 4-5 sentences, found {sentences}"
        )));
    }
}

fn check_skills(skills: &[String], issues: &mut Vec<ValidationIssue>) {
    if skills.len() < *SKILL_LINES.start() {
        issues.push(ValidationIssue::schema(format!(
            "Skills must have at least 3 category lines, found {}",
            skills.len()
        )));
        return;
    }
    if skills.len() > *SKILL_LINES.end() {
        issues.push(ValidationIssue::schema(format!(
            "Skills must have at most 6 category lines, found {}",
            skills.len()
        )));
    }

    for (idx, line) in skills.iter().enumerate() {
        let Some((category, payload)) = line.split_once(':') else {
            issues.push(ValidationIssue::schema(format!(
                "Skills line {} must be formatted \"Category: item, item\": {line:?}",
                idx + 1
            )));
            break;
        };
        if category.trim().is_empty() {
            issues.push(ValidationIssue::schema(format!(
                "Skills line {} is missing a category name",
                idx + 1
            )));
            break;
        }
        let count = split_items(payload).len();
        if !SKILL_ITEMS.contains(&count) {
            issues.push(ValidationIssue::schema(format!(
                "Skills line \"{}\" must list 5-8 items, found {count}",
                category.trim()
            )));
            break;
        }
    }
}

fn check_experience(
    experience: &[ExperienceEntry],
    profile: &Profile,
    issues: &mut Vec<ValidationIssue>,
) {
    let roles = &profile.base_roles;
    if experience.len() != roles.len() {
        issues.push(ValidationIssue::schema(format!(
            "Experience must contain exactly {} roles matching the base roles, found {}",
            roles.len(),
            experience.len()
        )));
        return;
    }

    let mut identity_failed = false;
    let mut bullets_failed = false;
    let mut pii_failed = false;

    for (idx, (entry, role)) in experience.iter().zip(roles).enumerate() {
        if !identity_failed && !role.matches(&entry.company, &entry.title, &entry.dates) {
            issues.push(ValidationIssue::schema(format!(
                "Experience entry {} must be exactly {} | {} | {}",
                idx + 1,
                role.company,
                role.title,
                role.dates
            )));
            identity_failed = true;
        }

        if bullets_failed {
            continue;
        }
        if !BULLETS_PER_ROLE.contains(&entry.bullets.len()) {
            issues.push(ValidationIssue::schema(format!(
                "Experience entry {} ({}) must have 5-6 bullets, found {}",
                idx + 1,
                role.company,
                entry.bullets.len()
            )));
            bullets_failed = true;
            continue;
        }

        if !pii_failed && entry.bullets.iter().any(|b| contains_pii(b)) {
            issues.push(ValidationIssue::schema(format!(
                "Experience entry {} ({}) has a bullet with an email, phone number, or URL",
                idx + 1,
                role.company
            )));
            pii_failed = true;
        }
    }
}

/// Counts sentences split on `.`, `!`, or `?` followed by whitespace.
pub fn count_sentences(text: &str) -> usize {
    let mut count = 0;
    let mut current_has_text = false;
    let mut chars = text.trim().chars().peekable();

    while let Some(c) = chars.next() {
        if !c.is_whitespace() {
            current_has_text = true;
        }
        let ends_sentence =
            matches!(c, '.' | '!' | '?') && chars.peek().is_some_and(|n| n.is_whitespace());
        if ends_sentence && current_has_text {
            count += 1;
            current_has_text = false;
        }
    }

    if current_has_text {
        count += 1;
    }
    count
}
