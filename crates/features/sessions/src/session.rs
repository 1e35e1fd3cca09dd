use chrono::{DateTime, Utc};
use dtab_kernel::item::ItemId;
use serde::{Deserialize, Serialize};

/// Most recently saved working set for one session key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Registry contents, in first-seen order.
    pub items: Vec<ItemId>,
    /// Identifiers picked for the last generation.
    pub selected: Vec<ItemId>,
    /// `None` only for the empty session returned when nothing was saved.
    pub timestamp: Option<DateTime<Utc>>,
}

impl Session {
    /// A session stamped with the current time.
    #[must_use]
    pub fn new(items: Vec<ItemId>, selected: Vec<ItemId>) -> Self {
        Self { items, selected, timestamp: Some(Utc::now()) }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.selected.is_empty()
    }
}

/// On-disk shape. Entries are kept as plain strings so one bad identifier in a hand-edited
/// file does not discard the whole session.
#[derive(Deserialize)]
pub(crate) struct StoredSession {
    #[serde(default)]
    items: Vec<String>,
    #[serde(default)]
    selected: Vec<String>,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
}

impl From<StoredSession> for Session {
    fn from(stored: StoredSession) -> Self {
        Self {
            items: valid_items(stored.items),
            selected: valid_items(stored.selected),
            timestamp: stored.timestamp,
        }
    }
}

fn valid_items(raw: Vec<String>) -> Vec<ItemId> {
    raw.into_iter()
        .filter_map(|item| match ItemId::parse(&item) {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(error = %e, "Dropping invalid identifier from stored session");
                None
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_sessions_drop_invalid_entries() {
        let stored: StoredSession = serde_json::from_str(
            r#"{"items":["iron_ingot","bad item"],"selected":["iron_ingot"],"timestamp":null}"#,
        )
        .unwrap();
        let session = Session::from(stored);

        assert_eq!(session.items.len(), 1);
        assert_eq!(session.selected[0].as_str(), "iron_ingot");
        assert!(session.timestamp.is_none());
    }

    #[test]
    fn timestamps_serialize_as_rfc3339() {
        let session = Session::new(vec![], vec![]);
        let json = serde_json::to_value(&session).unwrap();
        let raw = json["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(raw).is_ok());
    }
}
