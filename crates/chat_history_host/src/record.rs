//! Persisted chat record shape and listing projection.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the single object collection holding chat records.
pub const CHATS_COLLECTION: &str = "chats";
/// Name of the unique secondary index over [`ChatRecord::url_id`].
pub const URL_ID_INDEX: &str = "urlId";

/// Chat message payload. Message contents are opaque to the persistence layer.
pub type ChatMessage = Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One persisted conversation, keyed by `id` with an optional unique `url_id` slug.
pub struct ChatRecord {
    /// Primary key; a numeric string assigned on first save.
    pub id: String,
    /// Human-readable slug shown in the chat URL.
    ///
    /// Omitted from the stored object when absent so it stays out of the unique index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_id: Option<String>,
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ordered conversation messages.
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    /// ISO-8601 time of the last write.
    #[serde(default)]
    pub timestamp: String,
}

impl ChatRecord {
    /// Creates an unstamped record with no slug or description.
    pub fn new(id: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            id: id.into(),
            url_id: None,
            description: None,
            messages,
            timestamp: String::new(),
        }
    }

    /// Sets the slug.
    pub fn with_url_id(mut self, url_id: Option<String>) -> Self {
        self.url_id = url_id;
        self
    }

    /// Sets the display title.
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Returns a copy stamped with the current write time.
    pub fn stamped(&self) -> Self {
        Self {
            timestamp: crate::time::iso_timestamp_now(),
            ..self.clone()
        }
    }

    /// Whether the record carries a resumable conversation.
    pub fn has_messages(&self) -> bool {
        !self.messages.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Lightweight listing entry for chat-history sidebars.
pub struct ChatHistoryItem {
    /// Primary key.
    pub id: String,
    /// Slug, when assigned.
    pub url_id: Option<String>,
    /// Display title, when assigned.
    pub description: Option<String>,
    /// ISO-8601 time of the last write.
    pub timestamp: String,
    /// Number of stored messages.
    pub message_count: usize,
}

impl ChatHistoryItem {
    /// Path segment used to link to this chat: the slug when present, else the id.
    pub fn route_key(&self) -> &str {
        self.url_id.as_deref().unwrap_or(&self.id)
    }
}

impl From<&ChatRecord> for ChatHistoryItem {
    fn from(record: &ChatRecord) -> Self {
        Self {
            id: record.id.clone(),
            url_id: record.url_id.clone(),
            description: record.description.clone(),
            timestamp: record.timestamp.clone(),
            message_count: record.messages.len(),
        }
    }
}
