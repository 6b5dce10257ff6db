//! Chat-history session runtime for the browser front-end.
//!
//! A [`ChatDatabase`] is created once by the composition root and shared by every chat view.
//! Each view owns one [`HistorySession`], which resumes a chat from its route parameter and
//! writes the conversation back as it grows. [`use_chat_history`] exposes the session as Leptos
//! signals.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod database;
mod hook;
mod navigation;
mod session;

pub use chat_history_host::{
    ChatHistoryConfig, ChatHistoryItem, ChatMessage, ChatRecord, ChatStore, ChatStoreOpener,
    StorageError,
};
pub use database::ChatDatabase;
pub use hook::{use_chat_history, ChatHistoryHandle};
pub use navigation::RouterNavigator;
pub use session::{
    ArtifactSummary, HistorySession, Navigator, SessionPhase, SessionSnapshot, WorkspaceContext,
};
