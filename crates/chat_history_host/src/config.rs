//! Chat-history configuration model.

use serde::{Deserialize, Serialize};

/// `localStorage` key holding a JSON [`ChatHistoryConfig`] override.
pub const CHAT_HISTORY_CONFIG_KEY: &str = "chat_history.config";
/// Default IndexedDB database name.
pub const DEFAULT_DATABASE_NAME: &str = "boltHistory";
/// Schema version of the `chats` collection.
pub const DEFAULT_DATABASE_VERSION: u32 = 1;
/// Route prefix chats are addressed under.
pub const DEFAULT_CHAT_ROUTE_PREFIX: &str = "/chat";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Runtime configuration for chat persistence.
pub struct ChatHistoryConfig {
    /// Gate checked before any open attempt; `false` behaves exactly like missing storage.
    pub persistence_available: bool,
    /// IndexedDB database name.
    pub database_name: String,
    /// IndexedDB schema version.
    pub database_version: u32,
    /// Route prefix used when rewriting the visible URL, e.g. `/chat`.
    pub chat_route_prefix: String,
}

impl Default for ChatHistoryConfig {
    fn default() -> Self {
        Self {
            persistence_available: true,
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            database_version: DEFAULT_DATABASE_VERSION,
            chat_route_prefix: DEFAULT_CHAT_ROUTE_PREFIX.to_string(),
        }
    }
}

impl ChatHistoryConfig {
    /// Parses a JSON override, falling back to defaults when it is malformed.
    pub fn from_json_or_default(raw: Option<&str>) -> Self {
        raw.and_then(|raw| serde_json::from_str::<Self>(raw).ok())
            .unwrap_or_default()
            .normalized()
    }

    /// Repairs values the storage engine would reject.
    pub fn normalized(mut self) -> Self {
        if self.database_version == 0 {
            self.database_version = DEFAULT_DATABASE_VERSION;
        }
        if self.database_name.trim().is_empty() {
            self.database_name = DEFAULT_DATABASE_NAME.to_string();
        }
        let prefix = self.chat_route_prefix.trim().trim_end_matches('/');
        self.chat_route_prefix = if prefix.is_empty() {
            DEFAULT_CHAT_ROUTE_PREFIX.to_string()
        } else if prefix.starts_with('/') {
            prefix.to_string()
        } else {
            format!("/{prefix}")
        };
        self
    }

    /// Builds the visible URL path for a chat key.
    pub fn chat_path(&self, key: &str) -> String {
        format!("{}/{key}", self.chat_route_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_persistence() {
        let config = ChatHistoryConfig::default();
        assert!(config.persistence_available);
        assert_eq!(config.database_name, "boltHistory");
        assert_eq!(config.database_version, 1);
        assert_eq!(config.chat_path("todo-app"), "/chat/todo-app");
    }

    #[test]
    fn partial_override_keeps_remaining_defaults() {
        let config =
            ChatHistoryConfig::from_json_or_default(Some(r#"{"persistence_available": false}"#));
        assert!(!config.persistence_available);
        assert_eq!(config.database_name, DEFAULT_DATABASE_NAME);
    }

    #[test]
    fn malformed_override_falls_back_to_defaults() {
        assert_eq!(
            ChatHistoryConfig::from_json_or_default(Some("{not json")),
            ChatHistoryConfig::default()
        );
        assert_eq!(
            ChatHistoryConfig::from_json_or_default(None),
            ChatHistoryConfig::default()
        );
    }

    #[test]
    fn normalization_repairs_version_name_and_prefix() {
        let config = ChatHistoryConfig::from_json_or_default(Some(
            r#"{"database_version": 0, "database_name": " ", "chat_route_prefix": "c/"}"#,
        ));
        assert_eq!(config.database_version, 1);
        assert_eq!(config.database_name, DEFAULT_DATABASE_NAME);
        assert_eq!(config.chat_path("1"), "/c/1");
    }
}
