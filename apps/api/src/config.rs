use anyhow::{bail, Context, Result};

use crate::llm_client::{ModelParameters, MODEL};

const DEFAULT_TEMPERATURE: f32 = 0.4;
const DEFAULT_TOP_P: f32 = 0.9;

/// Application configuration loaded from environment variables.
///
/// The API key is optional at startup: a missing key only fails the first
/// generation request, so the validate endpoint keeps working without one.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY").unwrap_or_default(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            model: std::env::var("LLM_MODEL").unwrap_or_else(|_| MODEL.to_string()),
            temperature: optional_unit_interval("LLM_TEMPERATURE", DEFAULT_TEMPERATURE)?,
            top_p: optional_unit_interval("LLM_TOP_P", DEFAULT_TOP_P)?,
        })
    }

    /// Sampling configuration shared by every attempt of every generation request.
    pub fn model_parameters(&self) -> ModelParameters {
        ModelParameters {
            model: self.model.clone(),
            temperature: self.temperature,
            top_p: self.top_p,
        }
    }
}

fn optional_unit_interval(key: &str, default: f32) -> Result<f32> {
    match std::env::var(key) {
        Ok(raw) => parse_unit_interval(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_unit_interval(key: &str, raw: &str) -> Result<f32> {
    let value = raw
        .trim()
        .parse::<f32>()
        .with_context(|| format!("{key} must be a number"))?;
    if !(0.0..=1.0).contains(&value) {
        bail!("{key} must be between 0 and 1, got {value}");
    }
    Ok(value)
}
