//! Read-only view models for the dashboard sections. All are built from a
//! `JourneyStore` snapshot plus static reference content.

use serde::Serialize;

use crate::models::TimelineEntry;
use crate::reference::{
    client_first_name, ClientProfile, HealthMetric, Specialist, CLIENT_PROFILE, HEALTH_SNAPSHOT,
    SPECIALISTS, UPCOMING_ACTIVITIES,
};
use crate::store::JourneyStore;

pub const RECENT_MESSAGE_COUNT: usize = 3;
pub const PREVIEW_CHARS: usize = 70;

pub const EMPTY_TIMELINE_MESSAGE: &str = "No journey data available yet.";
pub const NO_RECENT_MESSAGES: &str = "No recent messages yet.";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePreview {
    pub sender: String,
    pub date: String,
    pub snippet: String,
}

impl MessagePreview {
    pub fn from_entry(entry: &TimelineEntry) -> Self {
        Self {
            sender: entry.sender.clone().unwrap_or_default(),
            date: entry.date_label().to_string(),
            snippet: truncate(entry.body(), PREVIEW_CHARS),
        }
    }
}

/// Cuts `text` to `max` characters, appending `...` when anything was dropped.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub greeting: String,
    pub metrics: Vec<HealthMetric>,
    pub last_updated: String,
    pub upcoming: Vec<&'static str>,
    pub recent_messages: Vec<MessagePreview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<&'static str>,
}

impl DashboardView {
    pub fn build(store: &JourneyStore) -> Self {
        let recent_messages: Vec<MessagePreview> = store
            .recent_messages(RECENT_MESSAGE_COUNT)
            .into_iter()
            .map(MessagePreview::from_entry)
            .collect();

        let empty_message = recent_messages.is_empty().then_some(NO_RECENT_MESSAGES);

        Self {
            greeting: format!("Welcome, {}!", client_first_name()),
            metrics: HEALTH_SNAPSHOT.to_vec(),
            last_updated: store
                .latest()
                .map(|e| e.date_label().to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            upcoming: UPCOMING_ACTIVITIES.to_vec(),
            recent_messages,
            empty_message,
        }
    }
}

/// Full timeline in document order, or the empty-state message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineView {
    pub entries: Vec<TimelineEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<&'static str>,
}

impl TimelineView {
    pub fn build(store: &JourneyStore) -> Self {
        Self {
            entries: store.full_timeline().to_vec(),
            empty_message: store.is_empty().then_some(EMPTY_TIMELINE_MESSAGE),
        }
    }
}

/// Message log, most recent first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesView {
    pub messages: Vec<TimelineEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<&'static str>,
}

impl MessagesView {
    pub fn build(store: &JourneyStore) -> Self {
        let messages: Vec<TimelineEntry> =
            store.all_messages_reversed().into_iter().cloned().collect();
        let empty_message = messages.is_empty().then_some(EMPTY_TIMELINE_MESSAGE);
        Self {
            messages,
            empty_message,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialistsView {
    pub specialists: &'static [Specialist],
}

impl SpecialistsView {
    pub fn build() -> Self {
        Self {
            specialists: SPECIALISTS,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub profile: ClientProfile,
    pub user_id: Option<String>,
}

impl ProfileView {
    pub fn build(user_id: Option<&str>) -> Self {
        Self {
            profile: CLIENT_PROFILE,
            user_id: user_id.map(str::to_string),
        }
    }
}
