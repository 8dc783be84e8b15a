use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionTransport;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Completion transport. Default: `LlmClient`; tests swap in scripted transports.
    pub llm: Arc<dyn CompletionTransport>,
    pub config: Config,
}
