use thiserror::Error;

#[derive(Error, Debug)]
pub enum JourneyError {
    #[error("Journey data unavailable at {path}: {reason}")]
    DataUnavailable { path: String, reason: String },

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures on the decision-explanation path.
///
/// None of these escape `DecisionExplainer::explain`; they are folded into a
/// `DecisionAnswer` with `AnswerOrigin::Error` (or the validation message).
#[derive(Error, Debug)]
pub enum ExplainError {
    #[error("Please enter a question about a decision.")]
    Validation,

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Malformed response from explanation service: {0}")]
    MalformedResponse(String),
}
