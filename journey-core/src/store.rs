//! Journey store: the timeline document, loaded once and read many times.
//!
//! Entries are held in document order and never re-sorted. "Recent" and
//! "latest" views assume the document is chronological; `load` logs a
//! warning when it is not but keeps the order as given.

use std::path::Path;

use crate::error::JourneyError;
use crate::models::TimelineEntry;

#[derive(Debug, Clone, Default)]
pub struct JourneyStore {
    entries: Vec<TimelineEntry>,
}

impl JourneyStore {
    pub fn from_entries(entries: Vec<TimelineEntry>) -> Self {
        Self { entries }
    }

    pub fn from_json_str(json: &str) -> Result<Self, JourneyError> {
        let entries: Vec<TimelineEntry> = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries))
    }

    /// Read the whole document from disk. Any read or parse failure is
    /// reported as `DataUnavailable`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, JourneyError> {
        let path = path.as_ref();
        let unavailable = |reason: String| JourneyError::DataUnavailable {
            path: path.display().to_string(),
            reason,
        };

        let raw = std::fs::read_to_string(path).map_err(|e| unavailable(e.to_string()))?;
        let store = Self::from_json_str(&raw).map_err(|e| unavailable(e.to_string()))?;

        if !store.is_chronological() {
            tracing::warn!(
                path = %path.display(),
                "Journey document is not in chronological order; recent views follow document order"
            );
        }
        tracing::info!(path = %path.display(), entries = store.len(), "Loaded journey document");

        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every entry, in document order.
    pub fn full_timeline(&self) -> &[TimelineEntry] {
        &self.entries
    }

    /// The last `n` messages, most recent first. Events are skipped.
    pub fn recent_messages(&self, n: usize) -> Vec<&TimelineEntry> {
        self.messages_rev().take(n).collect()
    }

    /// All messages, most recent first.
    pub fn all_messages_reversed(&self) -> Vec<&TimelineEntry> {
        self.messages_rev().collect()
    }

    pub fn latest(&self) -> Option<&TimelineEntry> {
        self.entries.last()
    }

    /// True when every parseable timestamp is >= the previous parseable one.
    /// Unparseable timestamps are ignored.
    pub fn is_chronological(&self) -> bool {
        let stamps: Vec<_> = self
            .entries
            .iter()
            .filter_map(TimelineEntry::parsed_timestamp)
            .collect();
        stamps.windows(2).all(|w| w[0] <= w[1])
    }

    fn messages_rev(&self) -> impl Iterator<Item = &TimelineEntry> {
        self.entries.iter().rev().filter(|e| e.is_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryKind;

    fn sample_store() -> JourneyStore {
        JourneyStore::from_entries(vec![
            TimelineEntry::message("2025-08-01 10:00", "Rohan", "m1"),
            TimelineEntry::message("2025-08-01 10:15", "Advik", "m2"),
            TimelineEntry::event("2025-08-05 11:00", "Whoop strap recommended", "e1"),
            TimelineEntry::message("2025-08-06 09:00", "Ruby", "m3"),
            TimelineEntry::message("2025-08-07 09:00", "Carla", "m4"),
            TimelineEntry::event("2025-08-08 12:00", "Diagnostic panel", "e2"),
            TimelineEntry::message("2025-08-09 18:30", "Rachel", "m5"),
        ])
    }

    fn write_temp(contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("journey-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_recent_messages_most_recent_first_without_events() {
        let store = sample_store();
        let recent = store.recent_messages(3);
        let contents: Vec<_> = recent.iter().map(|e| e.body()).collect();
        assert_eq!(contents, vec!["m5", "m4", "m3"]);
        assert!(recent.iter().all(|e| e.kind == EntryKind::Message));
    }

    #[test]
    fn test_recent_messages_more_than_available() {
        let store = sample_store();
        assert_eq!(store.recent_messages(50).len(), 5);
        assert!(store.recent_messages(0).is_empty());
    }

    #[test]
    fn test_all_messages_reversed() {
        let store = sample_store();
        let contents: Vec<_> = store.all_messages_reversed().iter().map(|e| e.body()).collect();
        assert_eq!(contents, vec!["m5", "m4", "m3", "m2", "m1"]);
    }

    #[test]
    fn test_full_timeline_keeps_document_order() {
        let store = sample_store();
        let bodies: Vec<_> = store.full_timeline().iter().map(|e| e.body()).collect();
        assert_eq!(bodies, vec!["m1", "m2", "e1", "m3", "m4", "e2", "m5"]);
        assert_eq!(store.latest().map(|e| e.body()), Some("m5"));
    }

    #[test]
    fn test_load_round_trip_preserves_entries() {
        let original = sample_store();
        let json = serde_json::to_string(original.full_timeline()).unwrap();
        let path = write_temp(&json);

        let loaded = JourneyStore::load(&path).unwrap();
        assert_eq!(loaded.len(), 7);
        assert_eq!(loaded.full_timeline(), original.full_timeline());

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_document_is_data_unavailable() {
        let path = std::env::temp_dir().join(format!("journey-absent-{}.json", uuid::Uuid::new_v4()));
        match JourneyStore::load(&path) {
            Err(JourneyError::DataUnavailable { path: p, .. }) => {
                assert!(p.contains("journey-absent-"));
            }
            other => panic!("Expected DataUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_document_is_data_unavailable() {
        let path = write_temp("{ not json");
        assert!(matches!(
            JourneyStore::load(&path),
            Err(JourneyError::DataUnavailable { .. })
        ));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_out_of_order_document_is_not_resorted() {
        let store = JourneyStore::from_entries(vec![
            TimelineEntry::message("2025-08-09 10:00", "Ruby", "later"),
            TimelineEntry::message("2025-08-01 10:00", "Ruby", "earlier"),
        ]);
        assert!(!store.is_chronological());
        assert_eq!(store.recent_messages(1)[0].body(), "earlier");
        assert!(sample_store().is_chronological());
    }

    #[test]
    fn test_empty_store() {
        let store = JourneyStore::default();
        assert!(store.is_empty());
        assert!(store.latest().is_none());
        assert!(store.recent_messages(3).is_empty());
        assert!(store.is_chronological());
    }
}
