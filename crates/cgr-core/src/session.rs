//! Per-chat conversation continuity store.
//!
//! Continuity identifiers are keyed by chat so concurrent chats cannot
//! overwrite each other's thread. Nothing is persisted; a restart starts
//! every chat fresh.

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::domain::{ChatId, ConversationState};

#[derive(Debug, Default)]
pub struct SessionStore {
    inner: Mutex<HashMap<ChatId, ConversationState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state for a chat; empty for a chat that has never completed
    /// an exchange.
    pub async fn get(&self, chat_id: ChatId) -> ConversationState {
        self.inner
            .lock()
            .await
            .get(&chat_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Overwrite a chat's state. Called only after a successful exchange.
    pub async fn update(&self, chat_id: ChatId, state: ConversationState) {
        self.inner.lock().await.insert(chat_id, state);
    }

    /// Drop a chat's continuity (the `/reset` path).
    pub async fn reset(&self, chat_id: ChatId) {
        self.inner.lock().await.remove(&chat_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(conv: &str, parent: &str) -> ConversationState {
        ConversationState {
            conversation_id: Some(conv.to_string()),
            parent_message_id: Some(parent.to_string()),
        }
    }

    #[tokio::test]
    async fn starts_empty_per_chat() {
        let store = SessionStore::new();
        assert!(store.get(ChatId(1)).await.is_empty());
    }

    #[tokio::test]
    async fn updates_are_isolated_per_chat() {
        let store = SessionStore::new();
        store.update(ChatId(1), state("c1", "m1")).await;
        store.update(ChatId(2), state("c2", "m2")).await;

        assert_eq!(store.get(ChatId(1)).await, state("c1", "m1"));
        assert_eq!(store.get(ChatId(2)).await, state("c2", "m2"));
    }

    #[tokio::test]
    async fn reset_clears_only_the_target_chat() {
        let store = SessionStore::new();
        store.update(ChatId(1), state("c1", "m1")).await;
        store.update(ChatId(2), state("c2", "m2")).await;

        store.reset(ChatId(1)).await;

        assert!(store.get(ChatId(1)).await.is_empty());
        assert_eq!(store.get(ChatId(2)).await, state("c2", "m2"));
    }
}
