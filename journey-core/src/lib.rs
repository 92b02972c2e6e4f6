pub mod app_state;
pub mod config;
pub mod error;
pub mod explainer;
pub mod identity;
pub mod models;
pub mod reference;
pub mod rules;
pub mod store;
pub mod views;

pub use app_state::{AppState, PendingQuery, Section};
pub use config::JourneyConfig;
pub use error::{ExplainError, JourneyError};
pub use explainer::{
    create_explainer, DecisionExplainer, ExplanationBackend, KeywordExplainer, RemoteExplainer,
    EMPTY_QUESTION_MESSAGE,
};
pub use identity::{bootstrap_identity, ConfiguredIdentity, IdentityProvider, PlaceholderIdentity};
pub use models::{AnswerOrigin, DecisionAnswer, DecisionQuery, EntryKind, TimelineEntry};
pub use rules::{KeywordRule, RuleBook};
pub use store::JourneyStore;
