//! Decision explainer. Answers "why" questions about the journey.
//!
//! Provides an `ExplanationBackend` trait with implementations for:
//! - **Remote** — `POST {endpoint}/api/explain-decision` with the question and
//!   the full journey as context
//! - **Keyword** — local first-match rule table with a short simulated delay
//!
//! `DecisionExplainer` wraps a backend, validates the question, and folds every
//! failure into a displayable `DecisionAnswer`. One request per call, no retry.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::ExplainerConfig;
use crate::error::ExplainError;
use crate::models::{DecisionAnswer, DecisionQuery, TimelineEntry};
use crate::rules::RuleBook;

pub const EMPTY_QUESTION_MESSAGE: &str = "Please enter a question about a decision.";

/// Shown when the explanation service cannot be reached at all.
pub const CONNECT_FAILURE_MESSAGE: &str = "An error occurred while connecting to the backend. Please ensure the backend is running and the URL is correct.";

/// Path of the explanation endpoint, relative to the configured base URL.
pub const EXPLAIN_PATH: &str = "/api/explain-decision";

// ============================================================================
// ExplanationBackend trait
// ============================================================================

#[async_trait]
pub trait ExplanationBackend: Send + Sync {
    /// Produce an answer for an already-validated query.
    async fn explain(&self, query: &DecisionQuery<'_>) -> Result<DecisionAnswer, ExplainError>;

    /// Backend name for logging and health output.
    fn name(&self) -> &str;
}

impl ExplainError {
    /// Text shown to the user in place of an explanation.
    pub fn user_message(&self) -> String {
        match self {
            ExplainError::Validation => EMPTY_QUESTION_MESSAGE.to_string(),
            ExplainError::Transport(_) => CONNECT_FAILURE_MESSAGE.to_string(),
            ExplainError::Backend { message, .. } => format!("Error from backend: {}", message),
            ExplainError::MalformedResponse(_) => "Error from backend: Unknown error".to_string(),
        }
    }
}

// ============================================================================
// RemoteExplainer
// ============================================================================

/// Either field may be present; a success body without `explanation` is malformed.
#[derive(Debug, Deserialize)]
struct ExplainResponseBody {
    explanation: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RemoteExplainer {
    client: Client,
    base_url: String,
}

impl RemoteExplainer {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ExplainError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ExplanationBackend for RemoteExplainer {
    async fn explain(&self, query: &DecisionQuery<'_>) -> Result<DecisionAnswer, ExplainError> {
        let url = format!("{}{}", self.base_url, EXPLAIN_PATH);

        let response = self.client.post(&url).json(query).send().await?;
        let status = response.status();
        let raw = response.text().await?;

        let body = serde_json::from_str::<ExplainResponseBody>(&raw).ok();

        if !status.is_success() {
            let message = body
                .and_then(|b| b.error)
                .unwrap_or_else(|| "Unknown error".to_string());
            tracing::warn!(code = status.as_u16(), message = %message, "Explanation service error");
            return Err(ExplainError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        match body {
            Some(ExplainResponseBody {
                explanation: Some(text),
                ..
            }) => Ok(DecisionAnswer::remote(text)),
            Some(ExplainResponseBody {
                error: Some(message),
                ..
            }) => Err(ExplainError::Backend {
                status: status.as_u16(),
                message,
            }),
            _ => Err(ExplainError::MalformedResponse(raw)),
        }
    }

    fn name(&self) -> &str {
        "remote"
    }
}

// ============================================================================
// KeywordExplainer
// ============================================================================

/// Local fallback: evaluates a rule book after a short "thinking" pause.
#[derive(Debug, Clone)]
pub struct KeywordExplainer {
    rules: RuleBook,
    delay: Duration,
}

impl KeywordExplainer {
    pub fn new(rules: RuleBook, delay: Duration) -> Self {
        Self { rules, delay }
    }
}

#[async_trait]
impl ExplanationBackend for KeywordExplainer {
    async fn explain(&self, query: &DecisionQuery<'_>) -> Result<DecisionAnswer, ExplainError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(DecisionAnswer::fallback(
            self.rules.respond(query.question_text),
        ))
    }

    fn name(&self) -> &str {
        "local-fallback"
    }
}

// ============================================================================
// DecisionExplainer
// ============================================================================

pub struct DecisionExplainer {
    backend: Box<dyn ExplanationBackend>,
}

impl DecisionExplainer {
    pub fn new(backend: Box<dyn ExplanationBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Answer `question` against `context`. Never fails: validation, transport
    /// and backend problems all come back as a displayable answer.
    pub async fn explain(&self, question: &str, context: &[TimelineEntry]) -> DecisionAnswer {
        let query = match DecisionQuery::new(question, context) {
            Ok(q) => q,
            Err(_) => return DecisionAnswer::fallback(EMPTY_QUESTION_MESSAGE),
        };

        match self.backend.explain(&query).await {
            Ok(answer) => answer,
            Err(e) => {
                match &e {
                    ExplainError::Transport(_) => tracing::error!(
                        backend = self.backend.name(),
                        error = %e,
                        "Explanation request failed"
                    ),
                    _ => tracing::warn!(
                        backend = self.backend.name(),
                        error = %e,
                        "Explanation service returned an error"
                    ),
                }
                DecisionAnswer::error(e.user_message())
            }
        }
    }
}

/// Build the explainer selected by `[explainer]`: remote when an endpoint is
/// configured, the dashboard keyword table otherwise.
pub fn create_explainer(config: &ExplainerConfig) -> Result<DecisionExplainer, ExplainError> {
    let backend: Box<dyn ExplanationBackend> = match config.endpoint() {
        Some(endpoint) => Box::new(RemoteExplainer::new(
            endpoint,
            Duration::from_secs(config.timeout_seconds),
        )?),
        None => Box::new(KeywordExplainer::new(
            RuleBook::dashboard(),
            Duration::from_millis(config.fallback_delay_ms),
        )),
    };
    tracing::info!(backend = backend.name(), "Decision explainer ready");
    Ok(DecisionExplainer::new(backend))
}

// ============================================================================
// TESTS
// ============================================================================
