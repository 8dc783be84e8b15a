//! LLM Client: the completion transport used by the resume generation pipeline.
//!
//! ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
//! The pipeline only sees the `CompletionTransport` trait, so tests and
//! alternative backends plug in without touching the orchestrator.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// Default model for resume generation. Overridable via `LLM_MODEL`.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Sampling configuration. Identical for the initial draft and the repair draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            model: MODEL.to_string(),
            temperature: 0.4,
            top_p: 0.9,
        }
    }
}

/// Black-box completion interface consumed by the generation orchestrator.
///
/// Carried in `AppState` as `Arc<dyn CompletionTransport>`.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    /// Whether a non-empty API credential is configured.
    fn has_credential(&self) -> bool;

    /// Sends one completion request and returns the raw model text.
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        params: &ModelParameters,
    ) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Anthropic Messages API client with transport-level retry on 429 and 5xx.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()?,
            api_key,
        })
    }

    /// Makes a raw call to the Claude API, returning the full response object.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn call(
        &self,
        prompt: &str,
        system: &str,
        params: &ModelParameters,
    ) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: &params.model,
            max_tokens: MAX_TOKENS,
            temperature: params.temperature,
            top_p: params.top_p,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Completion attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<AnthropicError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let body = response.text().await?;
            let llm_response = parse_response(&body)?;

            debug!(
                "LLM call succeeded: model={}, input_tokens={}, output_tokens={}",
                params.model, llm_response.usage.input_tokens, llm_response.usage.output_tokens
            );

            return Ok(llm_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl CompletionTransport for LlmClient {
    fn has_credential(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        params: &ModelParameters,
    ) -> Result<String, LlmError> {
        let response = self.call(prompt, system, params).await?;
        non_empty_text(response.text())
    }
}

fn parse_response(body: &str) -> Result<LlmResponse, LlmError> {
    Ok(serde_json::from_str(body)?)
}

fn non_empty_text(text: Option<&str>) -> Result<String, LlmError> {
    match text {
        Some(t) if !t.trim().is_empty() => Ok(t.to_string()),
        _ => Err(LlmError::EmptyContent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_picks_first_text_block() {
        let json = r#"{
            "content": [
                {"type": "tool_use", "text": null},
                {"type": "text", "text": "{\"summary\": \"x\"}"}
            ],
            "usage": {"input_tokens": 10, "output_tokens": 5}
        }"#;
        let response: LlmResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), Some("{\"summary\": \"x\"}"));
    }

    #[test]
    fn test_malformed_success_body_is_parse_error() {
        assert!(matches!(
            parse_response("<html>upstream proxy</html>"),
            Err(LlmError::Parse(_))
        ));
        assert!(matches!(
            parse_response(r#"{"content": []}"#),
            Err(LlmError::Parse(_))
        ));
        let ok = parse_response(
            r#"{"content": [{"type": "text", "text": "{}"}], "usage": {"input_tokens": 1, "output_tokens": 1}}"#,
        )
        .unwrap();
        assert_eq!(ok.text(), Some("{}"));
    }

    #[test]
    fn test_blank_text_is_empty_content() {
        assert!(matches!(
            non_empty_text(Some("   \n")),
            Err(LlmError::EmptyContent)
        ));
        assert!(matches!(non_empty_text(None), Err(LlmError::EmptyContent)));
        assert_eq!(non_empty_text(Some("{}")).unwrap(), "{}");
    }

    #[test]
    fn test_request_serializes_sampling_parameters() {
        let params = ModelParameters::default();
        let body = AnthropicRequest {
            model: &params.model,
            max_tokens: MAX_TOKENS,
            temperature: params.temperature,
            top_p: params.top_p,
            system: "sys",
            messages: vec![AnthropicMessage {
                role: "user",
                content: "hi",
            }],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["model"], MODEL);
        assert!(value.get("temperature").is_some());
        assert!(value.get("top_p").is_some());
        assert_eq!(value["messages"][0]["role"], "user");
    }

    #[test]
    fn test_credential_detection() {
        assert!(!LlmClient::new("  ".to_string()).unwrap().has_credential());
        assert!(LlmClient::new("sk-ant-test".to_string())
            .unwrap()
            .has_credential());
    }
}
