use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Four-digit years between 1950 and 2099, as they appear in role date ranges.
static YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(19[5-9]\d|20\d{2})\b").expect("valid year regex"));

/// An employment entry from the candidate profile. Generated experience must
/// reproduce these fields exactly, in profile order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseRole {
    pub company: String,
    pub title: String,
    pub dates: String,
}

impl BaseRole {
    /// Case-insensitive, whitespace-trimmed identity check against generated fields.
    pub fn matches(&self, company: &str, title: &str, dates: &str) -> bool {
        loose_eq(&self.company, company)
            && loose_eq(&self.title, title)
            && loose_eq(&self.dates, dates)
    }
}

fn loose_eq(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationRecord {
    pub institution: String,
    pub degree: String,
    #[serde(default)]
    pub dates: String,
    #[serde(default)]
    pub details: Vec<String>,
}

/// Candidate profile. Read-only to the generation pipeline; contact fields are
/// kept for the renderer and never included in a prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub links: Vec<String>,
    pub base_roles: Vec<BaseRole>,
    #[serde(default)]
    pub education: Vec<EducationRecord>,
}

/// Computes the years-of-experience label (e.g. `"7+"`) from the earliest year
/// mentioned in any role's dates up to `current_year`.
///
/// Returns `None` when no role carries a recognizable year.
pub fn years_of_experience_label(roles: &[BaseRole], current_year: i32) -> Option<String> {
    let earliest = roles
        .iter()
        .flat_map(|role| YEAR.find_iter(&role.dates))
        .filter_map(|m| m.as_str().parse::<i32>().ok())
        .min()?;

    let years = (current_year - earliest).max(1);
    Some(format!("{years}+"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(company: &str, title: &str, dates: &str) -> BaseRole {
        BaseRole {
            company: company.to_string(),
            title: title.to_string(),
            dates: dates.to_string(),
        }
    }

    #[test]
    fn test_base_role_matches_ignores_case_and_padding() {
        let r = role("Acme Corp", "Senior Engineer", "Jan 2020 - Present");
        assert!(r.matches("  acme corp ", "SENIOR ENGINEER", "jan 2020 - present"));
        assert!(!r.matches("Acme", "Senior Engineer", "Jan 2020 - Present"));
    }

    #[test]
    fn test_years_label_from_earliest_role() {
        let roles = vec![
            role("Acme", "Engineer", "2021 - Present"),
            role("Globex", "Developer", "Jun 2017 - Dec 2020"),
        ];
        assert_eq!(years_of_experience_label(&roles, 2024), Some("7+".to_string()));
    }

    #[test]
    fn test_years_label_has_floor_of_one() {
        let roles = vec![role("Acme", "Engineer", "2024 - Present")];
        assert_eq!(years_of_experience_label(&roles, 2024), Some("1+".to_string()));
    }

    #[test]
    fn test_years_label_none_without_years() {
        let roles = vec![role("Acme", "Engineer", "recently")];
        assert_eq!(years_of_experience_label(&roles, 2024), None);
        assert_eq!(years_of_experience_label(&[], 2024), None);
    }

    #[test]
    fn test_profile_deserializes_with_defaults() {
        let json = r#"{
            "base_roles": [{"company": "Acme", "title": "Engineer", "dates": "2020 - 2023"}]
        }"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.base_roles.len(), 1);
        assert!(profile.education.is_empty());
        assert!(profile.email.is_empty());
    }
}
