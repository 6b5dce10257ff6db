//! Browser (`wasm32`) IndexedDB gateway for chat history.
//!
//! This crate is the concrete storage gateway behind [`chat_history_host::ChatStore`]: it detects
//! whether IndexedDB actually works in the current context, opens the `chats` collection with
//! its `id` and `urlId` indexes, and serves record-level requests over the open connection.
//! Non-wasm builds compile the same API but can never produce a connection.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod bridge;
pub mod storage;

pub use storage::indexed_db::{chat_store_opener, IndexedDbOpener, WebChatStore};
pub use storage::local_config::{load_chat_history_config, save_chat_history_config};
