use serde::{Deserialize, Serialize};

use super::TimelineEntry;
use crate::error::ExplainError;

/// Where an explanation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOrigin {
    Remote,
    LocalFallback,
    Error,
}

/// Rejects questions that are empty after trimming.
pub fn validate_question(question: &str) -> Result<(), ExplainError> {
    if question.trim().is_empty() {
        return Err(ExplainError::Validation);
    }
    Ok(())
}

/// A single question with the journey snapshot it is asked against.
///
/// Serializes to the explanation service's request body:
/// `{ "query": ..., "journeyData": [...] }`.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionQuery<'a> {
    #[serde(rename = "query")]
    pub question_text: &'a str,
    #[serde(rename = "journeyData")]
    pub context_entries: &'a [TimelineEntry],
}

impl<'a> DecisionQuery<'a> {
    pub fn new(question: &'a str, context: &'a [TimelineEntry]) -> Result<Self, ExplainError> {
        validate_question(question)?;
        Ok(Self {
            question_text: question,
            context_entries: context,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionAnswer {
    #[serde(rename = "explanation")]
    pub explanation_text: String,
    pub origin: AnswerOrigin,
}

impl DecisionAnswer {
    pub fn remote(text: impl Into<String>) -> Self {
        Self {
            explanation_text: text.into(),
            origin: AnswerOrigin::Remote,
        }
    }

    pub fn fallback(text: impl Into<String>) -> Self {
        Self {
            explanation_text: text.into(),
            origin: AnswerOrigin::LocalFallback,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            explanation_text: text.into(),
            origin: AnswerOrigin::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.origin == AnswerOrigin::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_questions_rejected() {
        assert!(matches!(
            DecisionQuery::new("", &[]),
            Err(ExplainError::Validation)
        ));
        assert!(matches!(
            DecisionQuery::new("  \n\t ", &[]),
            Err(ExplainError::Validation)
        ));
    }

    #[test]
    fn test_query_serializes_to_wire_shape() {
        let context = vec![TimelineEntry::message("2025-08-01 10:00", "Rohan", "hello")];
        let query = DecisionQuery::new("Why the Whoop?", &context).unwrap();
        let body = serde_json::to_value(&query).unwrap();
        assert_eq!(body["query"], "Why the Whoop?");
        assert_eq!(body["journeyData"][0]["type"], "message");
        assert_eq!(body["journeyData"][0]["sender"], "Rohan");
    }

    #[test]
    fn test_answer_origin_wire_names() {
        let answer = DecisionAnswer::fallback("text");
        let body = serde_json::to_value(&answer).unwrap();
        assert_eq!(body["explanation"], "text");
        assert_eq!(body["origin"], "local_fallback");
    }
}
