//! Presentation state for the dashboard: active section, the decision-query
//! draft and its pending/response lifecycle, and the bootstrapped user id.
//!
//! The record is plain data (serializable) and owned by whichever front end
//! drives it. At most one decision query is in flight; results for a request
//! that was discarded (or superseded) are ignored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::explainer::EMPTY_QUESTION_MESSAGE;
use crate::models::{validate_question, AnswerOrigin, DecisionAnswer};

pub const THINKING_MESSAGE: &str = "Thinking...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    #[default]
    Dashboard,
    Journey,
    Messages,
    Specialists,
    DecisionQuery,
    Profile,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Dashboard,
        Section::Journey,
        Section::Messages,
        Section::Specialists,
        Section::DecisionQuery,
        Section::Profile,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Journey => "Journey",
            Section::Messages => "Messages",
            Section::Specialists => "Specialists",
            Section::DecisionQuery => "Decision Query",
            Section::Profile => "Profile",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::Journey => "journey",
            Section::Messages => "messages",
            Section::Specialists => "specialists",
            Section::DecisionQuery => "decision-query",
            Section::Profile => "profile",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Section::ALL
            .into_iter()
            .find(|sec| sec.slug() == wanted)
            .ok_or_else(|| format!("unknown section: {}", s))
    }
}

/// Handle for the one outstanding decision query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuery {
    token: u64,
    pub question: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub active_section: Section,
    pub decision_query: String,
    pub decision_response: Option<String>,
    pub response_origin: Option<AnswerOrigin>,
    pub is_loading_decision: bool,
    pub user_id: Option<String>,
    pub is_auth_ready: bool,
    #[serde(default)]
    pending_token: Option<u64>,
    #[serde(default)]
    next_token: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_identity(&mut self, user_id: impl Into<String>) {
        self.user_id = Some(user_id.into());
        self.is_auth_ready = true;
    }

    /// Switch tabs. Leaving the decision-query tab drops any pending request.
    pub fn select_section(&mut self, section: Section) {
        if self.active_section == Section::DecisionQuery
            && section != Section::DecisionQuery
            && (self.is_pending() || self.is_loading_decision)
        {
            tracing::debug!("Discarding pending decision query on navigation");
            self.discard_pending();
        }
        self.active_section = section;
    }

    /// Edits are ignored while a request is outstanding (the input is disabled).
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.settle_loading_flag();
        if !self.is_pending() {
            self.decision_query = text.into();
        }
    }

    /// Submit the draft. Returns `None` (and leaves nothing pending) when a
    /// request is already outstanding or the draft is blank; the blank case
    /// sets the instructive message as the response.
    pub fn begin_query(&mut self) -> Option<PendingQuery> {
        self.settle_loading_flag();
        if self.is_pending() {
            return None;
        }
        if validate_question(&self.decision_query).is_err() {
            self.decision_response = Some(EMPTY_QUESTION_MESSAGE.to_string());
            self.response_origin = None;
            return None;
        }

        self.next_token += 1;
        let token = self.next_token;
        self.pending_token = Some(token);
        self.is_loading_decision = true;
        self.decision_response = Some(THINKING_MESSAGE.to_string());
        self.response_origin = None;

        Some(PendingQuery {
            token,
            question: self.decision_query.clone(),
        })
    }

    /// Apply an answer. Returns `false` without touching state when the
    /// request is no longer the live one.
    pub fn complete_query(&mut self, pending: &PendingQuery, answer: DecisionAnswer) -> bool {
        if self.pending_token != Some(pending.token) {
            return false;
        }
        self.pending_token = None;
        self.is_loading_decision = false;
        self.decision_response = Some(answer.explanation_text);
        self.response_origin = Some(answer.origin);
        true
    }

    pub fn discard_pending(&mut self) {
        let had_request = self.pending_token.take().is_some() || self.is_loading_decision;
        if had_request {
            self.is_loading_decision = false;
            self.decision_response = None;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending_token.is_some()
    }

    /// The loading flag only holds while a request token is live. A record
    /// restored with the flag set but no token is not waiting on anything.
    fn settle_loading_flag(&mut self) {
        if self.is_loading_decision && !self.is_pending() {
            tracing::debug!("Clearing loading flag with no pending decision query");
            self.is_loading_decision = false;
            self.decision_response = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_query_tab(question: &str) -> AppState {
        let mut state = AppState::new();
        state.select_section(Section::DecisionQuery);
        state.set_draft(question);
        state
    }

    #[test]
    fn test_section_slugs_round_trip() {
        for section in Section::ALL {
            assert_eq!(section.slug().parse::<Section>().unwrap(), section);
        }
        assert!("settings".parse::<Section>().is_err());
        assert_eq!(Section::default(), Section::Dashboard);
    }

    #[test]
    fn test_begin_query_sets_pending_and_thinking() {
        let mut state = on_query_tab("Why the Whoop?");
        let pending = state.begin_query().expect("should start");
        assert_eq!(pending.question, "Why the Whoop?");
        assert!(state.is_loading_decision);
        assert_eq!(state.decision_response.as_deref(), Some(THINKING_MESSAGE));
    }

    #[test]
    fn test_resubmission_blocked_while_pending() {
        let mut state = on_query_tab("first");
        let _pending = state.begin_query().unwrap();
        state.set_draft("second");
        assert_eq!(state.decision_query, "first");
        assert!(state.begin_query().is_none());
    }

    #[test]
    fn test_blank_draft_short_circuits() {
        let mut state = on_query_tab("   ");
        assert!(state.begin_query().is_none());
        assert!(!state.is_pending());
        assert_eq!(state.decision_response.as_deref(), Some(EMPTY_QUESTION_MESSAGE));
    }

    #[test]
    fn test_complete_applies_answer() {
        let mut state = on_query_tab("q");
        let pending = state.begin_query().unwrap();
        assert!(state.complete_query(&pending, DecisionAnswer::remote("because")));
        assert!(!state.is_loading_decision);
        assert_eq!(state.decision_response.as_deref(), Some("because"));
        assert_eq!(state.response_origin, Some(AnswerOrigin::Remote));
    }

    #[test]
    fn test_navigation_discards_and_late_result_is_noop() {
        let mut state = on_query_tab("q");
        let pending = state.begin_query().unwrap();
        state.select_section(Section::Journey);
        assert!(!state.is_pending());
        assert!(!state.is_loading_decision);

        assert!(!state.complete_query(&pending, DecisionAnswer::remote("late")));
        assert!(state.decision_response.is_none());
        assert_eq!(state.active_section, Section::Journey);
    }

    #[test]
    fn test_stale_token_does_not_clobber_newer_request() {
        let mut state = on_query_tab("one");
        let first = state.begin_query().unwrap();
        state.discard_pending();
        let second = state.begin_query().unwrap();

        assert!(!state.complete_query(&first, DecisionAnswer::remote("stale")));
        assert!(state.is_pending());
        assert!(state.complete_query(&second, DecisionAnswer::fallback("fresh")));
        assert_eq!(state.decision_response.as_deref(), Some("fresh"));
    }

    #[test]
    fn test_state_serializes_camel_case() {
        let mut state = on_query_tab("q");
        state.set_identity("mock-user-id-1234567");
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["activeSection"], "decision-query");
        assert_eq!(json["userId"], "mock-user-id-1234567");
        assert_eq!(json["isAuthReady"], true);
        assert_eq!(json["pendingToken"], serde_json::Value::Null);
    }

    fn round_trip(state: &AppState) -> AppState {
        let json = serde_json::to_string(state).unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_restored_mid_query_state_can_submit_again() {
        let mut state = on_query_tab("why apob?");
        let _pending = state.begin_query().unwrap();

        let mut restored = round_trip(&state);
        assert!(restored.is_loading_decision);
        assert!(restored.is_pending());

        restored.select_section(Section::Journey);
        restored.select_section(Section::DecisionQuery);
        assert!(!restored.is_loading_decision);

        restored.set_draft("new question");
        assert_eq!(restored.decision_query, "new question");
        let next = restored.begin_query().expect("should submit after restore");
        assert_eq!(next.question, "new question");
        assert!(restored.complete_query(&next, DecisionAnswer::remote("answer")));
        assert!(!restored.is_loading_decision);
    }

    #[test]
    fn test_restored_query_completes_with_original_handle() {
        let mut state = on_query_tab("why apob?");
        let pending = state.begin_query().unwrap();

        let mut restored = round_trip(&state);
        assert!(restored.complete_query(&pending, DecisionAnswer::remote("because")));
        assert_eq!(restored.decision_response.as_deref(), Some("because"));

        let again = restored.begin_query().unwrap();
        assert_ne!(again, pending);
    }

    #[test]
    fn test_loading_flag_without_token_recovers() {
        let json = serde_json::json!({
            "activeSection": "decision-query",
            "decisionQuery": "stuck?",
            "decisionResponse": "Thinking...",
            "responseOrigin": null,
            "isLoadingDecision": true,
            "userId": null,
            "isAuthReady": false
        });
        let mut state: AppState = serde_json::from_value(json).unwrap();
        assert!(!state.is_pending());

        state.set_draft("unstuck");
        assert!(!state.is_loading_decision);
        assert!(state.decision_response.is_none());
        let pending = state.begin_query().expect("should submit");
        assert_eq!(pending.question, "unstuck");
    }
}
