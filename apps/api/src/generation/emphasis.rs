//! Bullet emphasis: bolds the first unmarked occurrence of a known skill in
//! each experience bullet.
//!
//! At most one `**span**` is added per bullet, and a bullet that already carries
//! one is never touched, so the pass is idempotent.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::models::resume::{ExperienceEntry, ResumeContent, SkillLine};

const MARKER: &str = "**";
const MIN_TERM_CHARS: usize = 3;

/// Any `**...**` pair, including spans whose text itself contains `*`.
static MARKED_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*.+?\*\*").expect("valid marked span regex"));

/// Returns a copy of `content` with one skill term emphasized per bullet.
pub fn emphasize_bullets(content: &ResumeContent) -> ResumeContent {
    let matchers: Vec<Regex> = collect_terms(&content.skills)
        .iter()
        .filter_map(|term| {
            RegexBuilder::new(&regex::escape(term))
                .case_insensitive(true)
                .build()
                .ok()
        })
        .collect();

    let experience = content
        .experience
        .iter()
        .map(|entry| ExperienceEntry {
            bullets: entry
                .bullets
                .iter()
                .map(|bullet| emphasize_bullet(bullet, &matchers))
                .collect(),
            ..entry.clone()
        })
        .collect();

    ResumeContent {
        experience,
        ..content.clone()
    }
}

/// Skill items from every parseable line, deduplicated case-insensitively and
/// sorted longest first. Short terms survive only if they contain `#` or `+`.
pub fn collect_terms(skills: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut terms: Vec<String> = skills
        .iter()
        .filter_map(|line| SkillLine::parse(line))
        .flat_map(|line| line.items)
        .filter(|item| item.chars().count() >= MIN_TERM_CHARS || item.contains(['#', '+']))
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect();

    terms.sort_by_key(|term| std::cmp::Reverse(term.chars().count()));
    terms
}

/// `matchers` must already be ordered longest term first.
fn emphasize_bullet(bullet: &str, matchers: &[Regex]) -> String {
    if MARKED_SPAN.is_match(bullet) {
        return bullet.to_string();
    }

    for matcher in matchers {
        let hit = matcher
            .find_iter(bullet)
            .find(|m| has_word_boundaries(bullet, m.start(), m.end()));
        if let Some(m) = hit {
            return format!(
                "{}{MARKER}{}{MARKER}{}",
                &bullet[..m.start()],
                m.as_str(),
                &bullet[m.end()..]
            );
        }
    }

    bullet.to_string()
}

/// Neighbours on both sides are non-alphanumeric or the string boundary.
fn has_word_boundaries(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}
