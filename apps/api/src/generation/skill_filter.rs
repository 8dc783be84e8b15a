//! Skill realism filter: normalizes skills lines and keeps frontend framework
//! claims believable.
//!
//! Per line: dedupe items case-insensitively, cap frontend categories at two of
//! React/Angular/Vue (job-description mentions first), cap every line at 8 items.
//! Never fails: lines without a colon pass through, lines left empty are dropped.

use std::collections::HashSet;

use tracing::debug;

use crate::models::resume::{ResumeContent, SkillLine};

const MAX_ITEMS_PER_LINE: usize = 8;
const MAX_FRONTEND_FRAMEWORKS: usize = 2;
/// Checked in order; the first key contained in an item wins.
const FRONTEND_FRAMEWORKS: &[&str] = &["react", "angular", "vue"];

/// Returns a copy of `content` with normalized, pruned skills lines.
pub fn apply_skill_realism(content: &ResumeContent, jd_text: &str) -> ResumeContent {
    let jd_lower = jd_text.to_lowercase();

    let skills: Vec<String> = content
        .skills
        .iter()
        .filter_map(|line| match SkillLine::parse(line) {
            Some(parsed) => normalize_line(parsed, &jd_lower).map(|l| l.to_string()),
            None => Some(line.clone()),
        })
        .collect();

    if skills != content.skills {
        debug!(
            "Skills normalized: {} line(s) in, {} line(s) out",
            content.skills.len(),
            skills.len()
        );
    }

    ResumeContent {
        skills,
        ..content.clone()
    }
}

fn normalize_line(line: SkillLine, jd_lower: &str) -> Option<SkillLine> {
    let mut items = dedupe_case_insensitive(line.items);

    if line.category.to_lowercase().contains("front") {
        items = prune_frontend_frameworks(items, jd_lower);
    }
    items.truncate(MAX_ITEMS_PER_LINE);

    if items.is_empty() {
        return None;
    }
    Some(SkillLine {
        category: line.category,
        items,
    })
}

fn dedupe_case_insensitive(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect()
}

fn framework_key(item: &str) -> Option<&'static str> {
    let lower = item.to_lowercase();
    FRONTEND_FRAMEWORKS
        .iter()
        .copied()
        .find(|key| lower.contains(key))
}

/// Keeps at most two distinct framework keys: those named in the job
/// description first, then by first appearance. Unmapped items are kept.
fn prune_frontend_frameworks(items: Vec<String>, jd_lower: &str) -> Vec<String> {
    let mut keys_in_order: Vec<&'static str> = Vec::new();
    for key in items.iter().filter_map(|item| framework_key(item)) {
        if !keys_in_order.contains(&key) {
            keys_in_order.push(key);
        }
    }

    if keys_in_order.len() <= MAX_FRONTEND_FRAMEWORKS {
        return items;
    }

    let (mentioned, unmentioned): (Vec<_>, Vec<_>) = keys_in_order
        .into_iter()
        .partition(|key| jd_lower.contains(key));
    let kept: Vec<&'static str> = mentioned
        .into_iter()
        .chain(unmentioned)
        .take(MAX_FRONTEND_FRAMEWORKS)
        .collect();

    items
        .into_iter()
        .filter(|item| framework_key(item).map_or(true, |key| kept.contains(&key)))
        .collect()
}
