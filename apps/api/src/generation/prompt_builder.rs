//! Prompt Builder: composes the generation prompt and the repair prompt.
//!
//! Pure functions of their inputs. Long free-text blocks are cut to a fixed
//! character prefix with no regard for sentence or word boundaries.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::generation::prompts::{GENERATION_PROMPT_TEMPLATE, REPAIR_PROMPT_TEMPLATE};
use crate::generation::validator::ValidationIssue;
use crate::llm_client::prompts::GROUNDING_INSTRUCTION;
use crate::models::profile::BaseRole;

/// Maximum characters of job description embedded in the prompt.
pub const JD_MAX_CHARS: usize = 7000;
/// Maximum characters of candidate corpus embedded in the prompt.
pub const CORPUS_MAX_CHARS: usize = 5000;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([a-z_]+)\}").expect("valid placeholder regex"));

/// Builds the initial generation prompt.
pub fn build_generation_prompt(
    jd_text: &str,
    corpus_text: &str,
    base_roles: &[BaseRole],
    years_label: &str,
) -> String {
    let roles_json = serde_json::to_string_pretty(base_roles).unwrap_or_default();
    let role_count = base_roles.len().to_string();

    fill_template(
        GENERATION_PROMPT_TEMPLATE,
        &[
            ("grounding_instruction", GROUNDING_INSTRUCTION),
            ("years", years_label),
            ("role_count", &role_count),
            ("roles_json", &roles_json),
            ("jd_text", truncate_chars(jd_text, JD_MAX_CHARS)),
            ("corpus_text", truncate_chars(corpus_text, CORPUS_MAX_CHARS)),
        ],
    )
}

/// Builds the single repair prompt from the original prompt, the previous
/// output, and the issues it produced (in validation order).
pub fn build_repair_prompt(
    original_prompt: &str,
    previous_output: &str,
    issues: &[ValidationIssue],
) -> String {
    let issues = issues
        .iter()
        .map(|issue| format!("- {issue}"))
        .collect::<Vec<_>>()
        .join("\n");

    fill_template(
        REPAIR_PROMPT_TEMPLATE,
        &[
            ("original_prompt", original_prompt),
            ("issues", &issues),
            ("previous_output", previous_output),
        ],
    )
}

/// Substitutes `{name}` placeholders in a single pass over `template`.
/// Inserted values are never rescanned; unknown placeholders are left as-is.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            values
                .iter()
                .find(|(name, _)| *name == &caps[1])
                .map_or_else(|| caps[0].to_string(), |(_, value)| value.to_string())
        })
        .into_owned()
}

/// Returns the first `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
