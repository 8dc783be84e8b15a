//! Axum route handlers for the Generation API.

use axum::{extract::State, Json};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::orchestrator::{generate_resume_content, GenerationRequest};
use crate::generation::sanitizer::extract_json_payload;
use crate::generation::validator::{validate_content, ValidationIssue};
use crate::models::profile::{years_of_experience_label, Profile};
use crate::models::resume::ResumeContent;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateResumeRequest {
    pub profile: Profile,
    pub job_description: String,
    #[serde(default)]
    pub candidate_corpus: String,
    /// Computed from the profile's role dates when absent.
    pub years_of_experience: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResumeResponse {
    pub generation_id: Uuid,
    pub years_of_experience: String,
    pub content: ResumeContent,
}

#[derive(Debug, Deserialize)]
pub struct ValidateOutputRequest {
    pub profile: Profile,
    pub raw_output: String,
    pub years_of_experience: String,
}

#[derive(Debug, Serialize)]
pub struct ValidateOutputResponse {
    pub valid: bool,
    pub issues: Vec<ValidationIssue>,
    pub content: ResumeContent,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/generate
///
/// Full pipeline: prompt → draft → validate → (repair → validate) → skill filter → emphasis.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateResumeRequest>,
) -> Result<Json<GenerateResumeResponse>, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }
    if request.profile.base_roles.is_empty() {
        return Err(AppError::Validation(
            "profile.base_roles must contain at least one role".to_string(),
        ));
    }

    let years_of_experience = match request.years_of_experience {
        Some(label) if !label.trim().is_empty() => label.trim().to_string(),
        _ => years_of_experience_label(&request.profile.base_roles, chrono::Utc::now().year())
            .ok_or_else(|| {
                AppError::Validation(
                    "years_of_experience not provided and no year found in role dates"
                        .to_string(),
                )
            })?,
    };

    let generation_id = Uuid::new_v4();
    info!(
        "Generation {generation_id}: {} base roles, {} years label",
        request.profile.base_roles.len(),
        years_of_experience
    );

    let params = state.config.model_parameters();
    let content = generate_resume_content(
        state.llm.as_ref(),
        GenerationRequest {
            job_description: &request.job_description,
            candidate_corpus: &request.candidate_corpus,
            profile: &request.profile,
            years_label: &years_of_experience,
            model_parameters: &params,
        },
    )
    .await?;

    Ok(Json(GenerateResumeResponse {
        generation_id,
        years_of_experience,
        content,
    }))
}

/// POST /api/v1/resumes/validate
///
/// Sanitizes and validates a raw model response without calling the model.
pub async fn handle_validate(
    Json(request): Json<ValidateOutputRequest>,
) -> Result<Json<ValidateOutputResponse>, AppError> {
    let payload = extract_json_payload(&request.raw_output);
    let outcome = validate_content(&payload, &request.profile, &request.years_of_experience);

    Ok(Json(ValidateOutputResponse {
        valid: outcome.is_valid(),
        issues: outcome.issues,
        content: outcome.content,
    }))
}
