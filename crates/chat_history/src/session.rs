//! Per-view chat session: resume from a route parameter and persist incrementally.

use std::cell::RefCell;

use chat_history_host::{
    get_by_either_key, next_primary_key, unique_slug, ChatMessage, ChatRecord, ChatStore,
    ChatStoreOpener, StorageError,
};
use leptos::logging;
use serde::{Deserialize, Serialize};

use crate::ChatDatabase;

/// Location updates issued by a session.
pub trait Navigator {
    /// Replaces the visible location without adding a history entry or re-routing.
    fn navigate_replace(&self, path: &str);

    /// Redirects to the root view.
    fn navigate_root(&self);
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Identity of the first artifact in the current workspace.
pub struct ArtifactSummary {
    /// Artifact id; the slug candidate for a new chat.
    pub id: String,
    /// Artifact title; the description for a new chat.
    pub title: String,
}

/// Read-only view of the workspace a chat is attached to.
pub trait WorkspaceContext {
    /// First artifact produced in the workspace, if any.
    fn first_artifact(&self) -> Option<ArtifactSummary>;
}

impl WorkspaceContext for Option<ArtifactSummary> {
    fn first_artifact(&self) -> Option<ArtifactSummary> {
        self.clone()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Lifecycle phase of a [`HistorySession`].
pub enum SessionPhase {
    /// Not mounted yet.
    #[default]
    Init,
    /// Resolving a route id against storage.
    Loading,
    /// Usable; either hydrated or starting empty.
    Ready,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// In-memory working copy of the active chat.
pub struct SessionSnapshot {
    /// Current lifecycle phase.
    pub phase: SessionPhase,
    /// Messages loaded when the chat was resumed.
    pub initial_messages: Vec<ChatMessage>,
    /// Assigned slug.
    pub url_id: Option<String>,
    /// Assigned display title.
    pub description: Option<String>,
    /// Assigned primary key.
    pub chat_id: Option<String>,
}

/// Binds one chat record to one active view.
///
/// State lives behind a `RefCell` that is never borrowed across an await, so the session can be
/// shared through an `Rc` with spawned persistence tasks.
pub struct HistorySession<S, N, W> {
    store: RefCell<Option<S>>,
    navigator: N,
    workspace: W,
    route_prefix: String,
    state: RefCell<SessionSnapshot>,
}

impl<S, N, W> HistorySession<S, N, W>
where
    S: ChatStore + Clone,
    N: Navigator,
    W: WorkspaceContext,
{
    /// Creates an unmounted session.
    pub fn new(navigator: N, workspace: W, route_prefix: impl Into<String>) -> Self {
        Self {
            store: RefCell::new(None),
            navigator,
            workspace,
            route_prefix: route_prefix.into(),
            state: RefCell::new(SessionSnapshot::default()),
        }
    }

    /// Resolves the shared database and loads `route_id` when present.
    pub async fn mount<O>(&self, database: &ChatDatabase<O>, route_id: Option<&str>)
    where
        O: ChatStoreOpener<Store = S>,
    {
        let store = database.resolve().await;
        self.attach(store, route_id).await;
    }

    /// Attaches an already-resolved store (or its absence) and loads `route_id` when present.
    pub async fn attach(&self, store: Option<S>, route_id: Option<&str>) {
        *self.store.borrow_mut() = store.clone();

        let Some(route_id) = route_id.filter(|id| !id.is_empty()) else {
            self.set_phase(SessionPhase::Ready);
            return;
        };
        let Some(store) = store else {
            self.navigator.navigate_root();
            self.set_phase(SessionPhase::Ready);
            return;
        };

        self.set_phase(SessionPhase::Loading);
        match get_by_either_key(&store, route_id).await {
            Ok(Some(record)) if record.has_messages() => self.hydrate(record),
            Ok(_) => self.navigator.navigate_root(),
            Err(err) => {
                logging::warn!("chat history load for `{route_id}` failed: {err}");
                self.navigator.navigate_root();
            }
        }
        self.set_phase(SessionPhase::Ready);
    }

    /// Persists the full message sequence. Failures are logged and never surfaced.
    pub async fn store_message_history(&self, messages: &[ChatMessage]) {
        let Some(store) = self.store.borrow().clone() else {
            return;
        };
        if messages.is_empty() {
            return;
        }
        if let Err(err) = self.persist(&store, messages).await {
            logging::warn!("chat history persist failed: {err}");
        }
    }

    async fn persist(&self, store: &S, messages: &[ChatMessage]) -> Result<(), StorageError> {
        let artifact = self
            .workspace
            .first_artifact()
            .filter(|artifact| !artifact.id.is_empty() || !artifact.title.is_empty());

        if self.url_id().is_none() {
            if let Some(artifact) = artifact.as_ref().filter(|a| !a.id.is_empty()) {
                let url_id = unique_slug(store, &artifact.id).await?;
                self.navigator.navigate_replace(&self.chat_path(&url_id));
                self.state.borrow_mut().url_id = Some(url_id);
            }
        }

        if self.description().is_none() {
            if let Some(artifact) = artifact.as_ref().filter(|a| !a.title.is_empty()) {
                self.state.borrow_mut().description = Some(artifact.title.clone());
            }
        }

        let brand_new = {
            let state = self.state.borrow();
            state.initial_messages.is_empty() && state.chat_id.is_none()
        };
        if brand_new {
            let id = next_primary_key(store).await?;
            self.state.borrow_mut().chat_id = Some(id.clone());
            if self.url_id().is_none() {
                self.navigator.navigate_replace(&self.chat_path(&id));
            }
        }

        let record = {
            let state = self.state.borrow();
            let id = state.chat_id.clone().ok_or_else(|| {
                StorageError::InvalidInput("session has no chat id assigned".to_string())
            })?;
            ChatRecord::new(id, messages.to_vec())
                .with_url_id(state.url_id.clone())
                .with_description(state.description.clone())
        };
        store.put(&record).await
    }

    fn hydrate(&self, record: ChatRecord) {
        let mut state = self.state.borrow_mut();
        state.initial_messages = record.messages;
        state.url_id = record.url_id;
        state.description = record.description;
        state.chat_id = Some(record.id);
    }

    fn set_phase(&self, phase: SessionPhase) {
        self.state.borrow_mut().phase = phase;
    }

    fn chat_path(&self, key: &str) -> String {
        format!("{}/{key}", self.route_prefix)
    }

    /// Whether a connected store is attached.
    pub fn persistence_enabled(&self) -> bool {
        self.store.borrow().is_some()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.state.borrow().phase
    }

    /// Whether the session finished mounting.
    pub fn is_ready(&self) -> bool {
        self.phase() == SessionPhase::Ready
    }

    /// Messages loaded on resume; empty for a new chat.
    pub fn initial_messages(&self) -> Vec<ChatMessage> {
        self.state.borrow().initial_messages.clone()
    }

    /// Assigned slug.
    pub fn url_id(&self) -> Option<String> {
        self.state.borrow().url_id.clone()
    }

    /// Assigned primary key.
    pub fn chat_id(&self) -> Option<String> {
        self.state.borrow().chat_id.clone()
    }

    /// Overrides the primary key the next save writes to.
    pub fn set_chat_id(&self, chat_id: Option<String>) {
        self.state.borrow_mut().chat_id = chat_id;
    }

    /// Assigned display title.
    pub fn description(&self) -> Option<String> {
        self.state.borrow().description.clone()
    }

    /// Sets the display title written by the next save.
    pub fn set_description(&self, description: Option<String>) {
        self.state.borrow_mut().description = description;
    }

    /// Copy of the whole working state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use chat_history_host::{
        ChatHistoryConfig, ChatStoreFuture, GuardedOpener, MemoryChatStore,
    };
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Nav {
        Replace(String),
        Root,
    }

    #[derive(Clone, Default)]
    struct RecordingNavigator {
        calls: Rc<RefCell<Vec<Nav>>>,
    }

    impl RecordingNavigator {
        fn calls(&self) -> Vec<Nav> {
            self.calls.borrow().clone()
        }
    }

    impl Navigator for RecordingNavigator {
        fn navigate_replace(&self, path: &str) {
            self.calls.borrow_mut().push(Nav::Replace(path.to_string()));
        }

        fn navigate_root(&self) {
            self.calls.borrow_mut().push(Nav::Root);
        }
    }

    #[derive(Clone)]
    struct FailingStore;

    impl ChatStore for FailingStore {
        fn get_all<'a>(&'a self) -> ChatStoreFuture<'a, Result<Vec<ChatRecord>, StorageError>> {
            Box::pin(async { Err(StorageError::Request("boom".to_string())) })
        }

        fn get<'a>(
            &'a self,
            _id: &'a str,
        ) -> ChatStoreFuture<'a, Result<Option<ChatRecord>, StorageError>> {
            Box::pin(async { Err(StorageError::Request("boom".to_string())) })
        }

        fn get_by_url_id<'a>(
            &'a self,
            _url_id: &'a str,
        ) -> ChatStoreFuture<'a, Result<Option<ChatRecord>, StorageError>> {
            Box::pin(async { Err(StorageError::Request("boom".to_string())) })
        }

        fn put<'a>(
            &'a self,
            _record: &'a ChatRecord,
        ) -> ChatStoreFuture<'a, Result<(), StorageError>> {
            Box::pin(async { Err(StorageError::Request("boom".to_string())) })
        }

        fn delete<'a>(&'a self, _id: &'a str) -> ChatStoreFuture<'a, Result<(), StorageError>> {
            Box::pin(async { Err(StorageError::Request("boom".to_string())) })
        }

        fn list_ids<'a>(&'a self) -> ChatStoreFuture<'a, Result<Vec<String>, StorageError>> {
            Box::pin(async { Err(StorageError::Request("boom".to_string())) })
        }

        fn list_url_ids<'a>(&'a self) -> ChatStoreFuture<'a, Result<Vec<String>, StorageError>> {
            Box::pin(async { Err(StorageError::Request("boom".to_string())) })
        }
    }

    type TestSession<S> = HistorySession<S, RecordingNavigator, Option<ArtifactSummary>>;

    fn new_session<S: ChatStore + Clone>(
        artifact: Option<(&str, &str)>,
    ) -> (TestSession<S>, RecordingNavigator) {
        let navigator = RecordingNavigator::default();
        let artifact = artifact.map(|(id, title)| ArtifactSummary {
            id: id.to_string(),
            title: title.to_string(),
        });
        (
            HistorySession::new(navigator.clone(), artifact, "/chat"),
            navigator,
        )
    }

    fn seed(store: &MemoryChatStore, id: &str, url_id: Option<&str>, messages: usize) {
        let messages = (0..messages).map(|n| json!({"n": n})).collect();
        let record = ChatRecord::new(id, messages)
            .with_url_id(url_id.map(str::to_string))
            .with_description(Some(format!("chat {id}")));
        block_on(store.put(&record)).expect("seed");
    }

    #[test]
    fn first_save_without_artifact_creates_numeric_id() {
        let store = MemoryChatStore::default();
        let (session, navigator) = new_session::<MemoryChatStore>(None);
        block_on(session.attach(Some(store.clone()), None));
        assert!(session.is_ready());

        block_on(session.store_message_history(&[json!("m1")]));

        let saved = block_on(store.get("1")).expect("get").expect("created");
        assert_eq!(saved.url_id, None);
        assert_eq!(saved.description, None);
        assert_eq!(saved.messages, vec![json!("m1")]);
        assert_eq!(session.chat_id().as_deref(), Some("1"));
        assert_eq!(navigator.calls(), vec![Nav::Replace("/chat/1".to_string())]);
    }

    #[test]
    fn first_save_with_taken_artifact_slug_probes_suffix() {
        let store = MemoryChatStore::default();
        seed(&store, "1", Some("todo-app"), 1);
        let (session, navigator) = new_session::<MemoryChatStore>(Some(("todo-app", "Todo App")));
        block_on(session.attach(Some(store.clone()), None));

        block_on(session.store_message_history(&[json!("m1")]));

        assert_eq!(session.url_id().as_deref(), Some("todo-app-2"));
        assert_eq!(session.description().as_deref(), Some("Todo App"));
        assert_eq!(
            navigator.calls(),
            vec![Nav::Replace("/chat/todo-app-2".to_string())]
        );
        let saved = block_on(store.get("2")).expect("get").expect("created");
        assert_eq!(saved.url_id.as_deref(), Some("todo-app-2"));
        assert_eq!(saved.description.as_deref(), Some("Todo App"));
    }

    #[test]
    fn later_saves_overwrite_the_same_record() {
        let store = MemoryChatStore::default();
        let (session, navigator) = new_session::<MemoryChatStore>(Some(("todo-app", "Todo App")));
        block_on(session.attach(Some(store.clone()), None));

        block_on(session.store_message_history(&[json!("m1")]));
        block_on(session.store_message_history(&[json!("m1"), json!("m2")]));

        assert_eq!(store.len(), 1);
        let saved = block_on(store.get("1")).expect("get").expect("present");
        assert_eq!(saved.messages.len(), 2);
        assert_eq!(saved.url_id.as_deref(), Some("todo-app"));
        assert_eq!(navigator.calls().len(), 1);
    }

    #[test]
    fn resume_by_slug_hydrates_session() {
        let store = MemoryChatStore::default();
        seed(&store, "1", Some("todo-app"), 1);
        seed(&store, "2", Some("todo-app-2"), 3);
        let (session, navigator) = new_session::<MemoryChatStore>(None);

        block_on(session.attach(Some(store.clone()), Some("todo-app-2")));

        assert!(session.is_ready());
        assert_eq!(session.chat_id().as_deref(), Some("2"));
        assert_eq!(session.url_id().as_deref(), Some("todo-app-2"));
        assert_eq!(session.description().as_deref(), Some("chat 2"));
        assert_eq!(session.initial_messages().len(), 3);
        assert!(navigator.calls().is_empty());

        block_on(session.store_message_history(&[json!("a"), json!("b"), json!("c"), json!("d")]));
        assert_eq!(store.len(), 2);
        let saved = block_on(store.get("2")).expect("get").expect("present");
        assert_eq!(saved.messages.len(), 4);
        assert!(navigator.calls().is_empty());
    }

    #[test]
    fn resume_of_missing_or_empty_chat_redirects_to_root() {
        let store = MemoryChatStore::default();
        seed(&store, "1", None, 0);

        let (session, navigator) = new_session::<MemoryChatStore>(None);
        block_on(session.attach(Some(store.clone()), Some("1")));
        assert!(session.is_ready());
        assert_eq!(session.chat_id(), None);
        assert_eq!(navigator.calls(), vec![Nav::Root]);

        let (session, navigator) = new_session::<MemoryChatStore>(None);
        block_on(session.attach(Some(store), Some("nope")));
        assert!(session.is_ready());
        assert_eq!(navigator.calls(), vec![Nav::Root]);
    }

    #[test]
    fn route_id_without_store_redirects_and_saves_are_noops() {
        let (session, navigator) = new_session::<MemoryChatStore>(Some(("todo-app", "Todo")));
        block_on(session.attach(None, Some("3")));

        assert!(session.is_ready());
        assert!(!session.persistence_enabled());
        assert_eq!(navigator.calls(), vec![Nav::Root]);

        block_on(session.store_message_history(&[json!("m1")]));
        assert_eq!(session.snapshot().url_id, None);
        assert_eq!(navigator.calls(), vec![Nav::Root]);
    }

    #[test]
    fn empty_message_list_is_not_persisted() {
        let store = MemoryChatStore::default();
        let (session, navigator) = new_session::<MemoryChatStore>(Some(("todo-app", "Todo")));
        block_on(session.attach(Some(store.clone()), None));

        block_on(session.store_message_history(&[]));
        assert!(store.is_empty());
        assert!(navigator.calls().is_empty());
    }

    #[test]
    fn storage_failures_are_swallowed() {
        let (session, navigator) = new_session::<FailingStore>(None);
        block_on(session.attach(Some(FailingStore), Some("1")));
        assert!(session.is_ready());
        assert_eq!(navigator.calls(), vec![Nav::Root]);

        block_on(session.store_message_history(&[json!("m1")]));
        assert_eq!(session.chat_id(), None);
    }

    #[test]
    fn explicit_description_is_kept_over_artifact_title() {
        let store = MemoryChatStore::default();
        let (session, _navigator) = new_session::<MemoryChatStore>(Some(("todo-app", "Todo")));
        block_on(session.attach(Some(store.clone()), None));
        session.set_description(Some("Mine".to_string()));

        block_on(session.store_message_history(&[json!("m1")]));
        let saved = block_on(store.get("1")).expect("get").expect("present");
        assert_eq!(saved.description.as_deref(), Some("Mine"));
    }

    #[test]
    fn mount_resolves_the_shared_database_once() {
        struct SharedOpener(MemoryChatStore);

        impl ChatStoreOpener for SharedOpener {
            type Store = MemoryChatStore;

            fn open(&self) -> ChatStoreFuture<'_, Option<Self::Store>> {
                let store = self.0.clone();
                Box::pin(async move { Some(store) })
            }
        }

        let store = MemoryChatStore::default();
        seed(&store, "1", Some("todo-app"), 2);
        let database = ChatDatabase::new(
            &ChatHistoryConfig::default(),
            GuardedOpener::new(SharedOpener(store)),
        );

        let (first, _) = new_session::<MemoryChatStore>(None);
        block_on(first.mount(&database, Some("todo-app")));
        let (second, _) = new_session::<MemoryChatStore>(None);
        block_on(second.mount(&database, Some("1")));

        assert_eq!(first.chat_id().as_deref(), Some("1"));
        assert_eq!(second.initial_messages().len(), 2);
        assert!(second.persistence_enabled());
    }
}
