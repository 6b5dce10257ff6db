//! Browser IndexedDB bridge for the `chats` collection.
//!
//! `interop` owns the wasm/non-wasm split; this facade is what the store adapters call.

mod interop;

use chat_history_host::{ChatRecord, StorageError};

pub use interop::DbHandle;

/// Probes IndexedDB, opens (creating the collection and indexes on first use), and tests the
/// connection. Returns the failure reason instead of a handle when any step fails.
pub async fn open_chat_database(name: &str, version: u32) -> Result<DbHandle, String> {
    interop::open_chat_database(name, version).await
}

pub async fn chat_get_all(handle: &DbHandle) -> Result<Vec<ChatRecord>, StorageError> {
    interop::chat_get_all(handle).await
}

pub async fn chat_get(handle: &DbHandle, id: &str) -> Result<Option<ChatRecord>, StorageError> {
    interop::chat_get(handle, id).await
}

pub async fn chat_get_by_url_id(
    handle: &DbHandle,
    url_id: &str,
) -> Result<Option<ChatRecord>, StorageError> {
    interop::chat_get_by_url_id(handle, url_id).await
}

pub async fn chat_put(handle: &DbHandle, record: &ChatRecord) -> Result<(), StorageError> {
    interop::chat_put(handle, record).await
}

pub async fn chat_delete(handle: &DbHandle, id: &str) -> Result<(), StorageError> {
    interop::chat_delete(handle, id).await
}

pub async fn chat_keys(handle: &DbHandle) -> Result<Vec<String>, StorageError> {
    interop::chat_keys(handle).await
}

pub async fn chat_url_ids(handle: &DbHandle) -> Result<Vec<String>, StorageError> {
    interop::chat_url_ids(handle).await
}
