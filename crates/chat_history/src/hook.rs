//! Leptos hook binding a [`HistorySession`] to reactive view state.

use std::rc::Rc;

use chat_history_host::{ChatMessage, ChatStore, ChatStoreOpener};
use leptos::{create_rw_signal, spawn_local, RwSignal, SignalGetUntracked, SignalSet};

use crate::{ArtifactSummary, ChatDatabase, HistorySession, Navigator, WorkspaceContext};

impl WorkspaceContext for RwSignal<Option<ArtifactSummary>> {
    fn first_artifact(&self) -> Option<ArtifactSummary> {
        self.get_untracked()
    }
}

/// Reactive handle returned by [`use_chat_history`].
pub struct ChatHistoryHandle<S, N, W> {
    session: Rc<HistorySession<S, N, W>>,
    /// `true` once the session has mounted (loaded or started empty).
    pub ready: RwSignal<bool>,
    /// Messages restored from storage for a resumed chat.
    pub initial_messages: RwSignal<Vec<ChatMessage>>,
    /// Primary key of the active chat.
    pub chat_id: RwSignal<Option<String>>,
    /// Display title of the active chat.
    pub description: RwSignal<Option<String>>,
}

impl<S, N, W> Clone for ChatHistoryHandle<S, N, W> {
    fn clone(&self) -> Self {
        Self {
            session: Rc::clone(&self.session),
            ready: self.ready,
            initial_messages: self.initial_messages,
            chat_id: self.chat_id,
            description: self.description,
        }
    }
}

impl<S, N, W> ChatHistoryHandle<S, N, W>
where
    S: ChatStore + Clone + 'static,
    N: Navigator + 'static,
    W: WorkspaceContext + 'static,
{
    fn new(session: HistorySession<S, N, W>) -> Self {
        Self {
            session: Rc::new(session),
            ready: create_rw_signal(false),
            initial_messages: create_rw_signal(Vec::new()),
            chat_id: create_rw_signal(None),
            description: create_rw_signal(None),
        }
    }

    /// Mounts the session and publishes the loaded state. `ready` is written only here.
    pub async fn mount<O>(&self, database: &ChatDatabase<O>, route_id: Option<&str>)
    where
        O: ChatStoreOpener<Store = S>,
    {
        self.session.mount(database, route_id).await;
        let snapshot = self.session.snapshot();
        self.initial_messages.set(snapshot.initial_messages);
        self.publish_identity();
        self.ready.set(self.session.is_ready());
    }

    /// Persists `messages` and publishes the assigned id and title.
    pub async fn save(&self, messages: &[ChatMessage]) {
        self.session.store_message_history(messages).await;
        self.publish_identity();
    }

    /// Persists `messages` in the background; failures only reach the log.
    pub fn store_message_history(&self, messages: Vec<ChatMessage>) {
        let handle = self.clone();
        spawn_local(async move {
            handle.save(&messages).await;
        });
    }

    /// Renames the active chat; written on the next save.
    pub fn set_description(&self, description: Option<String>) {
        self.session.set_description(description.clone());
        self.description.set(description);
    }

    /// Underlying session.
    pub fn session(&self) -> &HistorySession<S, N, W> {
        &self.session
    }

    fn publish_identity(&self) {
        let chat_id = self.session.chat_id();
        if self.chat_id.get_untracked() != chat_id {
            self.chat_id.set(chat_id);
        }
        let description = self.session.description();
        if self.description.get_untracked() != description {
            self.description.set(description);
        }
    }
}

/// Creates a session for the current view and mounts it against the shared database.
pub fn use_chat_history<O, N, W>(
    database: Rc<ChatDatabase<O>>,
    route_id: Option<String>,
    navigator: N,
    workspace: W,
) -> ChatHistoryHandle<O::Store, N, W>
where
    O: ChatStoreOpener + 'static,
    O::Store: 'static,
    N: Navigator + 'static,
    W: WorkspaceContext + 'static,
{
    let handle = ChatHistoryHandle::new(HistorySession::new(
        navigator,
        workspace,
        database.route_prefix(),
    ));

    let mounting = handle.clone();
    spawn_local(async move {
        mounting.mount(&database, route_id.as_deref()).await;
    });

    handle
}
