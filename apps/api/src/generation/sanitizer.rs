//! Response cleanup: pulls the JSON envelope out of raw model text and hosts the
//! PII predicate shared by the validator.
//!
//! Nothing here fails: the worst case is non-JSON text, which the validator rejects.

use once_cell::sync::Lazy;
use regex::Regex;

const FENCE: &str = "```";

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email regex")
});

/// At least 8 digits, optionally led by `+`/`(` and separated by short runs of
/// spaces, dots, dashes, or parentheses.
static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\+?\(?\d(?:[\s().-]{0,2}\d){7,}").expect("valid phone regex")
});

static URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bhttps?://|\bwww\.").expect("valid url regex"));

/// Extracts the JSON body from raw model output.
///
/// Strips a surrounding code fence (with or without a language tag), drops
/// everything before the first `{` or `[`, removes stray fence markers, and
/// trims. Blank input yields an empty string.
pub fn extract_json_payload(raw: &str) -> String {
    let mut text = raw.trim();
    if text.is_empty() {
        return String::new();
    }

    if let Some(rest) = text.strip_prefix(FENCE) {
        text = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            // Single-line fence: only a language tag can precede the body.
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
        };
    }
    text = text.trim_end();
    if let Some(rest) = text.strip_suffix(FENCE) {
        text = rest;
    }

    if let Some(start) = text.find(['{', '[']) {
        text = &text[start..];
    }

    text.replace(FENCE, "").trim().to_string()
}

/// True if `text` contains an email address, a phone-like digit run of 8+
/// digits, or an http(s)/www URL.
pub fn contains_pii(text: &str) -> bool {
    EMAIL.is_match(text) || PHONE.is_match(text) || URL.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::validator::{validate_content, IssueKind};
    use crate::models::profile::Profile;

    #[test]
    fn test_extract_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(extract_json_payload(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_extract_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(extract_json_payload(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_extract_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(extract_json_payload(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_extract_drops_leading_prose() {
        let input = "Sure! Here is the tailored resume:\n\n{\"summary\": \"x\"}";
        assert_eq!(extract_json_payload(input), "{\"summary\": \"x\"}");
    }

    #[test]
    fn test_extract_array_before_object() {
        let input = "Result: [{\"a\": 1}]";
        assert_eq!(extract_json_payload(input), "[{\"a\": 1}]");
    }

    #[test]
    fn test_extract_single_line_fence() {
        let input = "```json{\"a\": 1}```";
        assert_eq!(extract_json_payload(input), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_keeps_trailing_prose_after_inner_fence() {
        // Only a fence at the very start or end is stripped, so trailing chatter
        // survives and the payload is rejected downstream as invalid JSON.
        let input = "Here you go:\n```json\n{\"a\": 1}\n```\nLet me know!";
        let payload = extract_json_payload(input);
        assert_eq!(payload, "{\"a\": 1}\n\nLet me know!");

        let outcome = validate_content(&payload, &Profile::default(), "5+");
        assert_eq!(outcome.issues.len(), 1);
        assert_eq!(outcome.issues[0].kind, IssueKind::InvalidJson);
    }

    #[test]
    fn test_extract_blank_input() {
        assert_eq!(extract_json_payload(""), "");
        assert_eq!(extract_json_payload("  \n\t "), "");
    }

    #[test]
    fn test_extract_non_json_passes_through() {
        assert_eq!(extract_json_payload("  I cannot help  "), "I cannot help");
    }

    #[test]
    fn test_pii_email() {
        assert!(contains_pii("Reach me at jane.doe@example.com today"));
    }

    #[test]
    fn test_pii_phone_variants() {
        assert!(contains_pii("Call +1 (555) 123-4567"));
        assert!(contains_pii("Phone 555.123.4567"));
        assert!(contains_pii("0612345678"));
    }

    #[test]
    fn test_pii_url_variants() {
        assert!(contains_pii("See https://github.com/jane"));
        assert!(contains_pii("Portfolio at WWW.jane.dev"));
    }

    #[test]
    fn test_pii_ignores_ordinary_numbers() {
        assert!(!contains_pii("Reduced p99 latency by 40% across 12 services"));
        assert!(!contains_pii("Served 1,200,000 requests per day"));
        assert!(!contains_pii("Worked 2018 - 2023 on payments"));
        assert!(!contains_pii("7+ years of experience building APIs"));
    }
}
