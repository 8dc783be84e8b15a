//! Generation Orchestrator: drives draft → validate → (repair → validate).
//!
//! States:
//! ```text
//! Draft(Initial) → Validate(Initial) → Done | NeedsRepair
//! NeedsRepair → Draft(Repair) → Validate(Repair) → Done | Failed
//! ```
//! There is exactly one repair. A failed repair surfaces only the second
//! validation's issues. Accepted content goes through skill filtering and
//! bullet emphasis before it is returned.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::generation::emphasis::emphasize_bullets;
use crate::generation::prompt_builder::{build_generation_prompt, build_repair_prompt};
use crate::generation::prompts::GENERATION_SYSTEM;
use crate::generation::sanitizer::extract_json_payload;
use crate::generation::skill_filter::apply_skill_realism;
use crate::generation::validator::{validate_content, ValidationIssue};
use crate::llm_client::{CompletionTransport, LlmError, ModelParameters};
use crate::models::profile::Profile;
use crate::models::resume::ResumeContent;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("No API credential configured for the completion service")]
    MissingCredential,

    #[error("Completion request failed: {0}")]
    Transport(#[from] LlmError),

    #[error("Generated resume still invalid after repair: {summary}")]
    RepairExhausted {
        issues: Vec<ValidationIssue>,
        summary: String,
    },
}

impl GenerationError {
    fn repair_exhausted(issues: Vec<ValidationIssue>) -> Self {
        let summary = issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        GenerationError::RepairExhausted { issues, summary }
    }
}

/// Everything one generation needs. Built once per request.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub job_description: &'a str,
    pub candidate_corpus: &'a str,
    pub profile: &'a Profile,
    /// e.g. `"7+"`
    pub years_label: &'a str,
    pub model_parameters: &'a ModelParameters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Initial,
    Repair,
}

enum GenerationState {
    Draft {
        attempt: Attempt,
        prompt: String,
    },
    Validate {
        attempt: Attempt,
        raw: String,
    },
    NeedsRepair {
        previous_output: String,
        issues: Vec<ValidationIssue>,
    },
    Done(ResumeContent),
    Failed(Vec<ValidationIssue>),
}

/// Runs the generation state machine and post-processes accepted content.
pub async fn generate_resume_content(
    transport: &dyn CompletionTransport,
    request: GenerationRequest<'_>,
) -> Result<ResumeContent, GenerationError> {
    if !transport.has_credential() {
        return Err(GenerationError::MissingCredential);
    }

    let original_prompt = build_generation_prompt(
        request.job_description,
        request.candidate_corpus,
        &request.profile.base_roles,
        request.years_label,
    );

    let mut state = GenerationState::Draft {
        attempt: Attempt::Initial,
        prompt: original_prompt.clone(),
    };

    loop {
        state = match state {
            GenerationState::Draft { attempt, prompt } => {
                info!("Requesting {:?} draft from {}", attempt, request.model_parameters.model);
                let raw = transport
                    .complete(GENERATION_SYSTEM, &prompt, request.model_parameters)
                    .await?;
                GenerationState::Validate { attempt, raw }
            }

            GenerationState::Validate { attempt, raw } => {
                let payload = extract_json_payload(&raw);
                debug!(
                    "{:?} draft payload preview: {:?}",
                    attempt,
                    payload.chars().take(60).collect::<String>()
                );
                let outcome = validate_content(&payload, request.profile, request.years_label);

                match (outcome.is_valid(), attempt) {
                    (true, _) => GenerationState::Done(outcome.content),
                    (false, Attempt::Initial) => {
                        warn!(
                            "Initial draft failed validation with {} issue(s), requesting repair",
                            outcome.issues.len()
                        );
                        GenerationState::NeedsRepair {
                            previous_output: payload,
                            issues: outcome.issues,
                        }
                    }
                    (false, Attempt::Repair) => GenerationState::Failed(outcome.issues),
                }
            }

            GenerationState::NeedsRepair {
                previous_output,
                issues,
            } => GenerationState::Draft {
                attempt: Attempt::Repair,
                prompt: build_repair_prompt(&original_prompt, &previous_output, &issues),
            },

            GenerationState::Done(content) => {
                let content = apply_skill_realism(&content, request.job_description);
                let content = emphasize_bullets(&content);
                info!(
                    "Resume content accepted: {} skill lines, {} roles",
                    content.skills.len(),
                    content.experience.len()
                );
                return Ok(content);
            }

            GenerationState::Failed(issues) => {
                warn!("Repair draft still has {} issue(s), giving up", issues.len());
                return Err(GenerationError::repair_exhausted(issues));
            }
        };
    }
}
