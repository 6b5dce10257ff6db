use super::*;

#[derive(Debug, Clone)]
/// Uninhabited on targets without IndexedDB; no handle can ever be produced.
pub enum DbHandle {}

pub async fn open_chat_database(_name: &str, _version: u32) -> Result<DbHandle, String> {
    Err(StorageError::Unsupported.to_string())
}

pub async fn chat_get_all(handle: &DbHandle) -> Result<Vec<ChatRecord>, StorageError> {
    match *handle {}
}

pub async fn chat_get(handle: &DbHandle, _id: &str) -> Result<Option<ChatRecord>, StorageError> {
    match *handle {}
}

pub async fn chat_get_by_url_id(
    handle: &DbHandle,
    _url_id: &str,
) -> Result<Option<ChatRecord>, StorageError> {
    match *handle {}
}

pub async fn chat_put(handle: &DbHandle, _record: &ChatRecord) -> Result<(), StorageError> {
    match *handle {}
}

pub async fn chat_delete(handle: &DbHandle, _id: &str) -> Result<(), StorageError> {
    match *handle {}
}

pub async fn chat_keys(handle: &DbHandle) -> Result<Vec<String>, StorageError> {
    match *handle {}
}

pub async fn chat_url_ids(handle: &DbHandle) -> Result<Vec<String>, StorageError> {
    match *handle {}
}
