//! Derived queries and helpers composed from [`ChatStore`] primitives.

use std::collections::HashSet;

use crate::{
    keys::{next_primary_key_from, unique_slug_from},
    ChatHistoryItem, ChatMessage, ChatRecord, ChatStore, StorageError,
};

/// Looks a chat up by primary key, falling back to the slug index on a miss.
///
/// Route parameters may carry either form, so a primary-key hit always wins over a record whose
/// slug happens to equal the same string.
///
/// # Errors
///
/// Returns an error when either lookup fails.
pub async fn get_by_either_key<S: ChatStore + ?Sized>(
    store: &S,
    id: &str,
) -> Result<Option<ChatRecord>, StorageError> {
    if let Some(record) = store.get(id).await? {
        return Ok(Some(record));
    }
    store.get_by_url_id(id).await
}

/// Allocates the next numeric primary key from a full key scan.
///
/// # Errors
///
/// Returns an error when the key scan fails.
pub async fn next_primary_key<S: ChatStore + ?Sized>(store: &S) -> Result<String, StorageError> {
    let ids = store.list_ids().await?;
    Ok(next_primary_key_from(ids))
}

/// Returns `candidate` or the first unused `candidate-N` slug.
///
/// # Errors
///
/// Returns an error when the slug index scan fails.
pub async fn unique_slug<S: ChatStore + ?Sized>(
    store: &S,
    candidate: &str,
) -> Result<String, StorageError> {
    let taken = store
        .list_url_ids()
        .await?
        .into_iter()
        .collect::<HashSet<_>>();
    Ok(unique_slug_from(candidate, &taken))
}

/// Lists chats newest first for history navigation.
///
/// # Errors
///
/// Returns an error when the full read fails.
pub async fn list_history_items<S: ChatStore + ?Sized>(
    store: &S,
) -> Result<Vec<ChatHistoryItem>, StorageError> {
    let mut items = store
        .get_all()
        .await?
        .iter()
        .map(ChatHistoryItem::from)
        .collect::<Vec<_>>();
    items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.id.cmp(&b.id)));
    Ok(items)
}

/// Replaces the description of an existing chat.
///
/// # Errors
///
/// Returns [`StorageError::InvalidInput`] for a blank description, [`StorageError::NotFound`]
/// when no chat has `id`, or the underlying storage error.
pub async fn update_description<S: ChatStore + ?Sized>(
    store: &S,
    id: &str,
    description: &str,
) -> Result<(), StorageError> {
    let description = description.trim();
    if description.is_empty() {
        return Err(StorageError::InvalidInput(
            "description cannot be empty".to_string(),
        ));
    }

    let record = store
        .get(id)
        .await?
        .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
    store
        .put(&record.with_description(Some(description.to_string())))
        .await
}

/// Writes a new chat holding `messages` and returns the slug it is reachable under.
///
/// The freshly allocated id doubles as the slug candidate.
///
/// # Errors
///
/// Returns an error when key allocation, slug probing, or the write fails.
pub async fn create_chat_from_messages<S: ChatStore + ?Sized>(
    store: &S,
    description: &str,
    messages: Vec<ChatMessage>,
) -> Result<String, StorageError> {
    let id = next_primary_key(store).await?;
    let url_id = unique_slug(store, &id).await?;
    let record = ChatRecord::new(id, messages)
        .with_url_id(Some(url_id.clone()))
        .with_description(Some(description.to_string()));
    store.put(&record).await?;
    Ok(url_id)
}

/// Copies an existing chat (found by id or slug) and returns the copy's slug.
///
/// # Errors
///
/// Returns [`StorageError::NotFound`] when the source chat is missing, or the underlying storage
/// error.
pub async fn duplicate_chat<S: ChatStore + ?Sized>(
    store: &S,
    id: &str,
) -> Result<String, StorageError> {
    let source = get_by_either_key(store, id)
        .await?
        .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
    let description = format!(
        "{} (copy)",
        source.description.as_deref().unwrap_or("Chat")
    );
    create_chat_from_messages(store, &description, source.messages).await
}
