use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Message,
    Event,
}

/// One record of the journey document.
///
/// Fields the dashboard does not interpret (e.g. `eventId`) are kept in
/// `extra` so the entry is forwarded to the explanation service unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_rationale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pillar: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TimelineEntry {
    pub fn message(timestamp: &str, sender: &str, content: &str) -> Self {
        Self {
            kind: EntryKind::Message,
            timestamp: timestamp.to_string(),
            sender: Some(sender.to_string()),
            content: Some(content.to_string()),
            description: None,
            details: None,
            decision_rationale: None,
            pillar: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn event(timestamp: &str, description: &str, details: &str) -> Self {
        Self {
            kind: EntryKind::Event,
            timestamp: timestamp.to_string(),
            sender: None,
            content: None,
            description: Some(description.to_string()),
            details: Some(details.to_string()),
            decision_rationale: None,
            pillar: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_rationale(mut self, rationale: &str) -> Self {
        self.decision_rationale = Some(rationale.to_string());
        self
    }

    pub fn with_pillar(mut self, pillar: &str) -> Self {
        self.pillar = Some(pillar.to_string());
        self
    }

    pub fn is_message(&self) -> bool {
        self.kind == EntryKind::Message
    }

    /// Heading line: `"{sender}:"` for messages, the description for events.
    pub fn headline(&self) -> String {
        match self.kind {
            EntryKind::Message => format!("{}:", self.sender.as_deref().unwrap_or("Unknown")),
            EntryKind::Event => self.description.clone().unwrap_or_default(),
        }
    }

    /// Message content, or event details.
    pub fn body(&self) -> &str {
        self.content
            .as_deref()
            .or(self.details.as_deref())
            .unwrap_or("")
    }

    /// Date portion of the timestamp (everything before the first space).
    pub fn date_label(&self) -> &str {
        self.timestamp.split(' ').next().unwrap_or("")
    }

    /// Best-effort parse; `None` for timestamps in an unknown format.
    pub fn parsed_timestamp(&self) -> Option<NaiveDateTime> {
        let raw = self.timestamp.trim();
        TIMESTAMP_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_deserializes_from_document_shape() {
        let json = r#"{"type":"message","sender":"Rohan","timestamp":"2025-08-01 10:00","content":"My Garmin HR is off."}"#;
        let entry: TimelineEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.kind, EntryKind::Message);
        assert_eq!(entry.sender.as_deref(), Some("Rohan"));
        assert_eq!(entry.headline(), "Rohan:");
        assert_eq!(entry.body(), "My Garmin HR is off.");
        assert_eq!(entry.date_label(), "2025-08-01");
    }

    #[test]
    fn test_event_keeps_unknown_fields() {
        let json = r#"{"type":"event","eventId":"whoop_suggested","timestamp":"2025-08-05 11:00","description":"Whoop strap recommended","decisionRationale":"High-fidelity recovery data."}"#;
        let entry: TimelineEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.kind, EntryKind::Event);
        assert_eq!(entry.headline(), "Whoop strap recommended");
        assert_eq!(
            entry.decision_rationale.as_deref(),
            Some("High-fidelity recovery data.")
        );
        assert_eq!(entry.extra["eventId"], "whoop_suggested");

        let back = serde_json::to_value(&entry).unwrap();
        assert_eq!(back["eventId"], "whoop_suggested");
        assert_eq!(back["decisionRationale"], "High-fidelity recovery data.");
        assert!(back.get("sender").is_none());
    }

    #[test]
    fn test_parsed_timestamp_formats() {
        let a = TimelineEntry::message("2025-08-01 10:00", "Ruby", "hi");
        let b = TimelineEntry::message("2025-08-01T10:00:30Z", "Ruby", "hi");
        let c = TimelineEntry::message("sometime in August", "Ruby", "hi");
        assert!(a.parsed_timestamp().is_some());
        assert!(b.parsed_timestamp().is_some());
        assert!(c.parsed_timestamp().is_none());
        assert!(a.parsed_timestamp() < b.parsed_timestamp());
    }

    #[test]
    fn test_unknown_type_rejected() {
        let json = r#"{"type":"note","timestamp":"2025-08-01 10:00"}"#;
        assert!(serde_json::from_str::<TimelineEntry>(json).is_err());
    }
}
