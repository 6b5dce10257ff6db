//! IndexedDB-backed chat store and its opener.

use chat_history_host::{
    ChatHistoryConfig, ChatRecord, ChatStore, ChatStoreFuture, ChatStoreOpener, GuardedOpener,
    StorageError,
};
use leptos::logging;

use crate::bridge::{self, DbHandle};

#[derive(Debug, Clone)]
/// Connected chat store backed by an open IndexedDB database.
pub struct WebChatStore {
    handle: DbHandle,
}

impl ChatStore for WebChatStore {
    fn get_all<'a>(&'a self) -> ChatStoreFuture<'a, Result<Vec<ChatRecord>, StorageError>> {
        Box::pin(async move { bridge::chat_get_all(&self.handle).await })
    }

    fn get<'a>(
        &'a self,
        id: &'a str,
    ) -> ChatStoreFuture<'a, Result<Option<ChatRecord>, StorageError>> {
        Box::pin(async move { bridge::chat_get(&self.handle, id).await })
    }

    fn get_by_url_id<'a>(
        &'a self,
        url_id: &'a str,
    ) -> ChatStoreFuture<'a, Result<Option<ChatRecord>, StorageError>> {
        Box::pin(async move { bridge::chat_get_by_url_id(&self.handle, url_id).await })
    }

    fn put<'a>(&'a self, record: &'a ChatRecord) -> ChatStoreFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let stamped = record.stamped();
            bridge::chat_put(&self.handle, &stamped).await
        })
    }

    fn delete<'a>(&'a self, id: &'a str) -> ChatStoreFuture<'a, Result<(), StorageError>> {
        Box::pin(async move { bridge::chat_delete(&self.handle, id).await })
    }

    fn list_ids<'a>(&'a self) -> ChatStoreFuture<'a, Result<Vec<String>, StorageError>> {
        Box::pin(async move { bridge::chat_keys(&self.handle).await })
    }

    fn list_url_ids<'a>(&'a self) -> ChatStoreFuture<'a, Result<Vec<String>, StorageError>> {
        Box::pin(async move { bridge::chat_url_ids(&self.handle).await })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Opens the chat database named by a [`ChatHistoryConfig`].
///
/// Each call performs a full probe/open/connectivity cycle; wrap it with
/// [`chat_store_opener`] to get the process-wide single attempt.
pub struct IndexedDbOpener {
    database_name: String,
    database_version: u32,
}

impl IndexedDbOpener {
    /// Builds an opener for the configured database.
    pub fn new(config: &ChatHistoryConfig) -> Self {
        Self {
            database_name: config.database_name.clone(),
            database_version: config.database_version,
        }
    }
}

impl ChatStoreOpener for IndexedDbOpener {
    type Store = WebChatStore;

    fn open(&self) -> ChatStoreFuture<'_, Option<Self::Store>> {
        Box::pin(async move {
            match bridge::open_chat_database(&self.database_name, self.database_version).await {
                Ok(handle) => {
                    logging::log!("chat history database `{}` opened", self.database_name);
                    Some(WebChatStore { handle })
                }
                Err(reason) => {
                    logging::warn!("chat history persistence unavailable: {reason}");
                    None
                }
            }
        })
    }
}

/// Returns the guarded opener: only its first `open` reaches IndexedDB.
pub fn chat_store_opener(config: &ChatHistoryConfig) -> GuardedOpener<IndexedDbOpener> {
    GuardedOpener::new(IndexedDbOpener::new(config))
}
