//! Chat-store service contract and the in-memory implementation.

use std::{cell::RefCell, collections::BTreeMap, future::Future, pin::Pin, rc::Rc};

use crate::{ChatRecord, StorageError};

/// Object-safe boxed future used by [`ChatStore`] async methods.
pub type ChatStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Record-level operations over the `chats` collection.
///
/// A value implementing this trait is a connected handle; an unavailable environment is modelled
/// by not having one.
pub trait ChatStore {
    /// Loads every record in storage iteration order.
    fn get_all<'a>(&'a self) -> ChatStoreFuture<'a, Result<Vec<ChatRecord>, StorageError>>;

    /// Loads a record by primary key.
    fn get<'a>(&'a self, id: &'a str)
        -> ChatStoreFuture<'a, Result<Option<ChatRecord>, StorageError>>;

    /// Loads the record whose slug equals `url_id`.
    fn get_by_url_id<'a>(
        &'a self,
        url_id: &'a str,
    ) -> ChatStoreFuture<'a, Result<Option<ChatRecord>, StorageError>>;

    /// Upserts a full record by primary key, stamping its timestamp with the write time.
    fn put<'a>(&'a self, record: &'a ChatRecord) -> ChatStoreFuture<'a, Result<(), StorageError>>;

    /// Removes a record by primary key. Missing records are not an error.
    fn delete<'a>(&'a self, id: &'a str) -> ChatStoreFuture<'a, Result<(), StorageError>>;

    /// Lists every primary key.
    fn list_ids<'a>(&'a self) -> ChatStoreFuture<'a, Result<Vec<String>, StorageError>>;

    /// Lists every assigned slug by walking the secondary index.
    fn list_url_ids<'a>(&'a self) -> ChatStoreFuture<'a, Result<Vec<String>, StorageError>>;
}

#[derive(Debug, Clone, Default)]
/// In-memory chat store keyed by primary key, enforcing slug uniqueness like the unique index.
pub struct MemoryChatStore {
    inner: Rc<RefCell<BTreeMap<String, ChatRecord>>>,
}

impl MemoryChatStore {
    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl ChatStore for MemoryChatStore {
    fn get_all<'a>(&'a self) -> ChatStoreFuture<'a, Result<Vec<ChatRecord>, StorageError>> {
        Box::pin(async move { Ok(self.inner.borrow().values().cloned().collect()) })
    }

    fn get<'a>(
        &'a self,
        id: &'a str,
    ) -> ChatStoreFuture<'a, Result<Option<ChatRecord>, StorageError>> {
        Box::pin(async move { Ok(self.inner.borrow().get(id).cloned()) })
    }

    fn get_by_url_id<'a>(
        &'a self,
        url_id: &'a str,
    ) -> ChatStoreFuture<'a, Result<Option<ChatRecord>, StorageError>> {
        Box::pin(async move {
            Ok(self
                .inner
                .borrow()
                .values()
                .find(|record| record.url_id.as_deref() == Some(url_id))
                .cloned())
        })
    }

    fn put<'a>(&'a self, record: &'a ChatRecord) -> ChatStoreFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            if let Some(url_id) = record.url_id.as_deref() {
                let clash = inner
                    .values()
                    .any(|other| other.id != record.id && other.url_id.as_deref() == Some(url_id));
                if clash {
                    return Err(StorageError::Request(format!(
                        "unique index `{}` already contains `{url_id}`",
                        crate::URL_ID_INDEX
                    )));
                }
            }
            inner.insert(record.id.clone(), record.stamped());
            Ok(())
        })
    }

    fn delete<'a>(&'a self, id: &'a str) -> ChatStoreFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            self.inner.borrow_mut().remove(id);
            Ok(())
        })
    }

    fn list_ids<'a>(&'a self) -> ChatStoreFuture<'a, Result<Vec<String>, StorageError>> {
        Box::pin(async move { Ok(self.inner.borrow().keys().cloned().collect()) })
    }

    fn list_url_ids<'a>(&'a self) -> ChatStoreFuture<'a, Result<Vec<String>, StorageError>> {
        Box::pin(async move {
            let mut slugs = self
                .inner
                .borrow()
                .values()
                .filter_map(|record| record.url_id.clone())
                .collect::<Vec<_>>();
            slugs.sort();
            Ok(slugs)
        })
    }
}
