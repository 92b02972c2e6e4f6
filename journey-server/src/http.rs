//! Journey HTTP API
//!
//! Axum-based HTTP server with two roles:
//! - the dashboard API: read-only journey views plus the decision query, which
//!   runs the configured `DecisionExplainer` with the loaded journey as context
//! - the keyword explanation service (`/api/explain-decision`,
//!   `/api/generate-message`), which other dashboards can point their
//!   `[explainer] endpoint` at
//!
//! Architecture: each endpoint has a thin axum handler that delegates to a pure
//! inner function. The inner functions are directly testable without axum
//! dispatch machinery.
//!
//! Endpoints:
//! - GET  /health                 — health check with journey and explainer status
//! - GET  /version                — server version info
//! - GET  /api/dashboard          — dashboard summary
//! - GET  /api/timeline           — full timeline, document order
//! - GET  /api/messages           — messages, most recent first
//! - GET  /api/specialists        — specialist roster
//! - GET  /api/profile            — client profile and user id
//! - POST /api/decision-query     — explain a decision against the loaded journey
//! - POST /api/explain-decision   — keyword explanation service
//! - POST /api/generate-message   — keyword message generation

use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use journey_core::views::{DashboardView, MessagesView, ProfileView, SpecialistsView, TimelineView};
use journey_core::{
    bootstrap_identity, create_explainer, DecisionExplainer, JourneyConfig, JourneyError,
    JourneyStore, RuleBook,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared state for all HTTP handlers
pub struct HttpState {
    pub config: JourneyConfig,
    pub store: JourneyStore,
    pub data_available: bool,
    pub explainer: DecisionExplainer,
    pub concierge: RuleBook,
    pub user_id: String,
}

impl HttpState {
    /// Load the journey document, build the explainer and resolve the user id.
    ///
    /// A missing or unreadable journey document leaves the store empty; the
    /// views then report their empty-state message.
    pub async fn bootstrap(config: JourneyConfig) -> Result<Self> {
        let (store, data_available) = match JourneyStore::load(&config.data.timeline_path) {
            Ok(store) => (store, true),
            Err(e @ JourneyError::DataUnavailable { .. }) => {
                tracing::warn!(error = %e, "Starting with an empty journey");
                (JourneyStore::default(), false)
            }
            Err(e) => return Err(e.into()),
        };

        let explainer = create_explainer(&config.explainer)?;
        let identity = bootstrap_identity(&config.identity);
        let user_id = identity.resolve().await;
        tracing::info!(provider = identity.name(), user_id = %user_id, "Identity ready");

        Ok(Self {
            config,
            store,
            data_available,
            explainer,
            concierge: RuleBook::concierge(),
            user_id,
        })
    }
}

/// Build the Axum router with all endpoints
pub fn build_router(state: Arc<HttpState>) -> Router {
    let cors = state.config.http.cors;

    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        .route("/api/dashboard", get(dashboard_handler))
        .route("/api/timeline", get(timeline_handler))
        .route("/api/messages", get(messages_handler))
        .route("/api/specialists", get(specialists_handler))
        .route("/api/profile", get(profile_handler))
        .route("/api/decision-query", post(decision_query_handler))
        .route("/api/explain-decision", post(explain_decision_handler))
        .route("/api/generate-message", post(generate_message_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// Start the HTTP server on the configured address.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_http_server(
    state: Arc<HttpState>,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let addr = format!("{}:{}", state.config.http.host, state.config.http.port);

    let app = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Journey HTTP API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Request / Response DTOs
// ============================================================================

#[derive(Debug, Deserialize, Default)]
pub struct DecisionQueryRequest {
    pub question: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExplainDecisionRequest {
    pub query: Option<String>,
    /// Accepted as context; the keyword service does not read it.
    #[serde(default)]
    pub journey_data: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateMessageRequest {
    pub prompt: Option<String>,
    /// Accepted for compatibility; not used for the reply.
    #[serde(default)]
    pub chat_history: Vec<serde_json::Value>,
}

/// Standard HTTP error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            status: "error".to_string(),
        }
    }

    fn into_value(self) -> serde_json::Value {
        serde_json::json!({ "error": self.error, "status": self.status })
    }
}

// ============================================================================
// Inner (directly testable) business logic functions
// ============================================================================

/// Inner health check. Reports journey size and explainer mode.
pub fn health_inner(state: &HttpState) -> (StatusCode, serde_json::Value) {
    (
        StatusCode::OK,
        serde_json::json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
            "entries": state.store.len(),
            "dataAvailable": state.data_available,
            "explainer": state.explainer.backend_name(),
        }),
    )
}

/// Inner version: returns version info (pure, no IO).
pub fn version_inner() -> serde_json::Value {
    serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "protocol": "journey/1",
    })
}

/// Inner decision query. Every outcome (including validation and backend
/// failures) is a 200 carrying `{ explanation, origin }`.
pub async fn decision_query_inner(
    state: &HttpState,
    req: DecisionQueryRequest,
) -> (StatusCode, serde_json::Value) {
    let question = req.question.unwrap_or_default();
    let answer = state
        .explainer
        .explain(&question, state.store.full_timeline())
        .await;

    match serde_json::to_value(&answer) {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new(e.to_string()).into_value(),
        ),
    }
}

/// Inner explain-decision: the keyword explanation service.
pub fn explain_decision_inner(
    rules: &RuleBook,
    req: ExplainDecisionRequest,
) -> (StatusCode, serde_json::Value) {
    let query = match req.query {
        Some(q) if !q.trim().is_empty() => q,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("Query is required.").into_value(),
            );
        }
    };

    tracing::debug!(context_entries = req.journey_data.len(), "Explaining decision");

    (
        StatusCode::OK,
        serde_json::json!({ "explanation": rules.respond(&query) }),
    )
}

/// Inner generate-message: same keyword table, `{ message }` reply.
pub fn generate_message_inner(
    rules: &RuleBook,
    req: GenerateMessageRequest,
) -> (StatusCode, serde_json::Value) {
    let prompt = match req.prompt {
        Some(p) if !p.trim().is_empty() => p,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("Prompt is required.").into_value(),
            );
        }
    };

    tracing::debug!(history = req.chat_history.len(), "Generating message");

    (
        StatusCode::OK,
        serde_json::json!({ "message": rules.respond(&prompt) }),
    )
}

fn view_response<T: Serialize>(view: &T) -> (StatusCode, serde_json::Value) {
    match serde_json::to_value(view) {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new(e.to_string()).into_value(),
        ),
    }
}

// ============================================================================
// Axum handler wrappers (thin, delegate to inner functions)
// ============================================================================

pub async fn health_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = health_inner(&state);
    (status, Json(body))
}

pub async fn version_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(version_inner()))
}

pub async fn dashboard_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = view_response(&DashboardView::build(&state.store));
    (status, Json(body))
}

pub async fn timeline_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = view_response(&TimelineView::build(&state.store));
    (status, Json(body))
}

pub async fn messages_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = view_response(&MessagesView::build(&state.store));
    (status, Json(body))
}

pub async fn specialists_handler() -> impl IntoResponse {
    let (status, body) = view_response(&SpecialistsView::build());
    (status, Json(body))
}

pub async fn profile_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = view_response(&ProfileView::build(Some(state.user_id.as_str())));
    (status, Json(body))
}

pub async fn decision_query_handler(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<DecisionQueryRequest>,
) -> impl IntoResponse {
    let (status, body) = decision_query_inner(&state, req).await;
    (status, Json(body))
}

pub async fn explain_decision_handler(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<ExplainDecisionRequest>,
) -> impl IntoResponse {
    let (status, body) = explain_decision_inner(&state.concierge, req);
    (status, Json(body))
}

pub async fn generate_message_handler(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<GenerateMessageRequest>,
) -> impl IntoResponse {
    let (status, body) = generate_message_inner(&state.concierge, req);
    (status, Json(body))
}

// ============================================================================
// Unit Tests: call inner functions directly
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use journey_core::{KeywordExplainer, TimelineEntry};
    use std::time::Duration;

    fn test_state() -> HttpState {
        let store = JourneyStore::from_entries(vec![
            TimelineEntry::message("2025-08-01 10:00", "Rohan", "My Garmin HR is off."),
            TimelineEntry::message("2025-08-01 10:15", "Advik", "Let's investigate."),
        ]);
        HttpState {
            config: JourneyConfig::default(),
            store,
            data_available: true,
            explainer: DecisionExplainer::new(Box::new(KeywordExplainer::new(
                RuleBook::dashboard(),
                Duration::ZERO,
            ))),
            concierge: RuleBook::concierge(),
            user_id: "user-1".to_string(),
        }
    }

    #[test]
    fn test_version_inner_pure() {
        let v = version_inner();
        assert!(v["version"].is_string(), "version must be string");
        assert_eq!(v["protocol"], "journey/1");
    }

    #[test]
    fn test_health_inner_reports_store_and_explainer() {
        let (status, body) = health_inner(&test_state());
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["entries"], 2);
        assert_eq!(body["explainer"], "local-fallback");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_explain_decision_requires_query() {
        let rules = RuleBook::concierge();
        for query in [None, Some(String::new()), Some("   ".to_string())] {
            let req = ExplainDecisionRequest {
                query,
                journey_data: vec![],
            };
            let (status, body) = explain_decision_inner(&rules, req);
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "Query is required.");
        }
    }

    #[test]
    fn test_explain_decision_keyword_answer() {
        let req = ExplainDecisionRequest {
            query: Some("Why is my HRV trending up?".to_string()),
            journey_data: vec![serde_json::json!({"type": "message"})],
        };
        let (status, body) = explain_decision_inner(&RuleBook::concierge(), req);
        assert_eq!(status, StatusCode::OK);
        assert!(body["explanation"]
            .as_str()
            .unwrap()
            .starts_with("Heart Rate Variability"));
    }

    #[test]
    fn test_generate_message_requires_prompt() {
        let (status, body) =
            generate_message_inner(&RuleBook::concierge(), GenerateMessageRequest::default());
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Prompt is required.");
        assert_eq!(body["status"], "error");
    }

    #[test]
    fn test_generate_message_default_reply() {
        let req = GenerateMessageRequest {
            prompt: Some("hello there".to_string()),
            chat_history: vec![],
        };
        let (status, body) = generate_message_inner(&RuleBook::concierge(), req);
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("I'm a simple keyword agent."));
    }

    #[tokio::test]
    async fn test_decision_query_inner_fallback() {
        let state = test_state();
        let req = DecisionQueryRequest {
            question: Some("What is the couch stretch for?".to_string()),
        };
        let (status, body) = decision_query_inner(&state, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["origin"], "local_fallback");
        assert!(body["explanation"].as_str().unwrap().contains("hip flexor"));
    }

    #[tokio::test]
    async fn test_decision_query_inner_blank_question() {
        let state = test_state();
        let (status, body) =
            decision_query_inner(&state, DecisionQueryRequest { question: None }).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["explanation"], journey_core::EMPTY_QUESTION_MESSAGE);
    }

    #[tokio::test]
    async fn test_bootstrap_with_missing_document_starts_empty() {
        let mut config = JourneyConfig::default();
        config.data.timeline_path = "/nonexistent/journey.json".to_string();
        config.identity.user_id = Some("configured-user".to_string());

        let state = HttpState::bootstrap(config).await.unwrap();
        assert!(!state.data_available);
        assert!(state.store.is_empty());
        assert_eq!(state.user_id, "configured-user");
        assert_eq!(state.explainer.backend_name(), "local-fallback");
    }
}
