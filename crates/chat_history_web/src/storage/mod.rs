//! Browser storage adapters for chat history.

pub mod indexed_db;
pub mod local_config;
