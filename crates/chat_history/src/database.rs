//! Once-resolved chat database capability owned by the composition root.

use std::cell::{Cell, OnceCell};

use chat_history_host::{ChatHistoryConfig, ChatStoreOpener};

/// Explicit chat-database capability shared by every view of one application instance.
///
/// The first [`resolve`](Self::resolve) performs the open attempt; its outcome (a store or
/// absence) is cached and handed to every later caller. While that attempt is still in flight,
/// other callers see the store as unavailable without caching that answer.
pub struct ChatDatabase<O: ChatStoreOpener> {
    persistence_available: bool,
    route_prefix: String,
    opener: O,
    opening: Cell<bool>,
    resolved: OnceCell<Option<O::Store>>,
}

impl<O: ChatStoreOpener> ChatDatabase<O> {
    /// Builds the capability from configuration and an opener.
    pub fn new(config: &ChatHistoryConfig, opener: O) -> Self {
        Self {
            persistence_available: config.persistence_available,
            route_prefix: config.chat_route_prefix.clone(),
            opener,
            opening: Cell::new(false),
            resolved: OnceCell::new(),
        }
    }

    /// Route prefix chats are addressed under.
    pub fn route_prefix(&self) -> &str {
        &self.route_prefix
    }

    /// Whether resolution has finished, successfully or not.
    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    /// Returns the opener.
    pub fn opener(&self) -> &O {
        &self.opener
    }

    /// Resolves the store, opening it on first use.
    pub async fn resolve(&self) -> Option<O::Store> {
        if let Some(resolved) = self.resolved.get() {
            return resolved.clone();
        }
        if !self.persistence_available {
            let _ = self.resolved.set(None);
            return None;
        }
        if self.opening.replace(true) {
            return None;
        }

        let store = self.opener.open().await;
        let _ = self.resolved.set(store);
        self.opening.set(false);
        self.resolved.get().cloned().flatten()
    }
}
