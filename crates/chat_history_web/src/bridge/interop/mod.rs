//! Shared transport interop for the chat bridge.
//!
//! This module routes calls to target-specific implementations while preserving a uniform API
//! for the bridge facade. On `wasm32` every IndexedDB request resolves through a single
//! promise-to-`Result` conversion point.

use chat_history_host::{ChatRecord, StorageError};

#[cfg(not(target_arch = "wasm32"))]
mod non_wasm;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(not(target_arch = "wasm32"))]
use non_wasm as imp;
#[cfg(target_arch = "wasm32")]
use wasm as imp;

pub use imp::DbHandle;

pub async fn open_chat_database(name: &str, version: u32) -> Result<DbHandle, String> {
    imp::open_chat_database(name, version).await
}

pub async fn chat_get_all(handle: &DbHandle) -> Result<Vec<ChatRecord>, StorageError> {
    imp::chat_get_all(handle).await
}

pub async fn chat_get(handle: &DbHandle, id: &str) -> Result<Option<ChatRecord>, StorageError> {
    imp::chat_get(handle, id).await
}

pub async fn chat_get_by_url_id(
    handle: &DbHandle,
    url_id: &str,
) -> Result<Option<ChatRecord>, StorageError> {
    imp::chat_get_by_url_id(handle, url_id).await
}

pub async fn chat_put(handle: &DbHandle, record: &ChatRecord) -> Result<(), StorageError> {
    imp::chat_put(handle, record).await
}

pub async fn chat_delete(handle: &DbHandle, id: &str) -> Result<(), StorageError> {
    imp::chat_delete(handle, id).await
}

pub async fn chat_keys(handle: &DbHandle) -> Result<Vec<String>, StorageError> {
    imp::chat_keys(handle).await
}

pub async fn chat_url_ids(handle: &DbHandle) -> Result<Vec<String>, StorageError> {
    imp::chat_url_ids(handle).await
}
