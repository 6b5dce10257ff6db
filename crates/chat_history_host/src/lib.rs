//! Typed chat-history contracts shared by the browser gateway and the session runtime.
//!
//! This crate is the target-independent boundary for chat persistence. It defines the persisted
//! [`ChatRecord`] shape, the [`ChatStore`] service trait, key/slug derivation helpers, and an
//! in-memory store used by tests and non-browser builds. The IndexedDB implementation lives in
//! `chat_history_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod error;
pub mod keys;
pub mod open;
pub mod ops;
pub mod record;
pub mod store;
pub mod time;

pub use config::{
    ChatHistoryConfig, CHAT_HISTORY_CONFIG_KEY, DEFAULT_CHAT_ROUTE_PREFIX, DEFAULT_DATABASE_NAME,
    DEFAULT_DATABASE_VERSION,
};
pub use error::StorageError;
pub use keys::{coerce_primary_key, next_primary_key_from, unique_slug_from};
pub use open::{ChatStoreOpener, GuardedOpener, OpenGuard};
pub use ops::{
    create_chat_from_messages, duplicate_chat, get_by_either_key, list_history_items,
    next_primary_key, unique_slug, update_description,
};
pub use record::{ChatHistoryItem, ChatMessage, ChatRecord, CHATS_COLLECTION, URL_ID_INDEX};
pub use store::{ChatStore, ChatStoreFuture, MemoryChatStore};
pub use time::{
    iso_timestamp_from_ms, iso_timestamp_now, next_monotonic_timestamp_ms, unix_time_ms_now,
};
