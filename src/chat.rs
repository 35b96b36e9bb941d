//! Direct chat with therapists.
//!
//! Each (user, therapist) pair has its own append-only transcript. A separate
//! per-user list keeps one summary row per therapist, rebuilt from the full
//! transcript every time a message is sent or a chat is opened.

use std::sync::Arc;
use tracing::debug;

use crate::clock::Clock;
use crate::error::Result;
use crate::keys::{chat_messages_key, user_key, CHAT_MESSAGES, CHAT_SESSIONS};
use crate::models::{ChatMessage, ChatSession, SenderType, SCHEMA_VERSION};
use crate::repository::JsonCollection;
use crate::store::KeyValueStore;
use crate::utils::generate_id;
use crate::validation::InputValidator;

const ID_PREFIX: &str = "msg";

/// Derivation of chat summary rows from transcripts
#[derive(Debug, Clone, Copy)]
pub struct ChatSessionIndex;

impl ChatSessionIndex {
    /// Summary row for one transcript; `messages` need not be sorted
    #[must_use]
    pub fn summarize(therapist_id: &str, therapist_name: &str, messages: &[ChatMessage]) -> ChatSession {
        let mut ordered: Vec<&ChatMessage> = messages.iter().collect();
        ordered.sort_by_key(|m| m.timestamp);
        let last = ordered.last();

        ChatSession {
            schema_version: SCHEMA_VERSION,
            therapist_id: therapist_id.to_string(),
            therapist_name: therapist_name.to_string(),
            last_message: last.map(|m| m.message.clone()),
            last_message_time: last.map(|m| m.timestamp),
            unread_count: 0,
        }
    }

    /// Replace the row for the same therapist in place, or append it
    pub fn upsert(rows: &mut Vec<ChatSession>, row: ChatSession) {
        match rows.iter_mut().find(|r| r.therapist_id == row.therapist_id) {
            Some(existing) => *existing = row,
            None => rows.push(row),
        }
    }
}

/// Therapist chat transcripts and the per-user session index
#[derive(Clone)]
pub struct ChatRepository {
    messages: JsonCollection<ChatMessage>,
    sessions: JsonCollection<ChatSession>,
    clock: Arc<dyn Clock>,
}

impl ChatRepository {
    /// Repository over `store`, timestamping with `clock`
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            messages: JsonCollection::new(Arc::clone(&store), CHAT_MESSAGES),
            sessions: JsonCollection::new(store, CHAT_SESSIONS),
            clock,
        }
    }

    /// Transcript with one therapist, oldest first
    pub async fn get_chat_messages(&self, user_id: &str, therapist_id: &str) -> Result<Vec<ChatMessage>> {
        let mut messages = self.messages.load_all(&chat_messages_key(user_id, therapist_id)).await?;
        messages.sort_by_key(|m| m.timestamp);
        Ok(messages)
    }

    /// One summary row per therapist, in the order chats were first opened
    pub async fn get_chat_sessions(&self, user_id: &str) -> Result<Vec<ChatSession>> {
        self.sessions.load_all(&user_key(CHAT_SESSIONS, user_id)).await
    }

    /// Make sure a summary row exists for this therapist and reflects the transcript
    pub async fn initialize_chat(&self, user_id: &str, therapist_id: &str, therapist_name: &str) -> Result<ChatSession> {
        InputValidator::validate_user_id(user_id)?;
        InputValidator::validate_counterpart_id(therapist_id)?;
        self.refresh_session(user_id, therapist_id, therapist_name).await
    }

    /// Append a message to the transcript and refresh the summary row
    pub async fn send_message(
        &self,
        user_id: &str,
        therapist_id: &str,
        therapist_name: &str,
        sender_type: SenderType,
        text: &str,
    ) -> Result<ChatMessage> {
        InputValidator::validate_user_id(user_id)?;
        InputValidator::validate_counterpart_id(therapist_id)?;
        InputValidator::validate_message(text)?;

        let now = self.clock.now();
        let sender_id = match sender_type {
            SenderType::User => user_id,
            SenderType::Therapist => therapist_id,
        };
        let message = ChatMessage {
            schema_version: SCHEMA_VERSION,
            id: generate_id(ID_PREFIX, now),
            therapist_id: therapist_id.to_string(),
            sender_id: sender_id.to_string(),
            sender_type,
            message: text.to_string(),
            timestamp: now,
        };

        debug!(user_id = %user_id, therapist_id = %therapist_id, id = %message.id, "Sending chat message");
        let message = self
            .messages
            .insert(&chat_messages_key(user_id, therapist_id), message)
            .await?;
        self.refresh_session(user_id, therapist_id, therapist_name).await?;
        Ok(message)
    }

    /// Remove the transcript and the summary row. Always `true`.
    pub async fn delete_chat(&self, user_id: &str, therapist_id: &str) -> Result<bool> {
        self.messages.remove_all(&chat_messages_key(user_id, therapist_id)).await?;
        self.sessions.delete(&user_key(CHAT_SESSIONS, user_id), therapist_id).await
    }

    async fn refresh_session(&self, user_id: &str, therapist_id: &str, therapist_name: &str) -> Result<ChatSession> {
        let messages = self.get_chat_messages(user_id, therapist_id).await?;
        let row = ChatSessionIndex::summarize(therapist_id, therapist_name, &messages);

        let key = user_key(CHAT_SESSIONS, user_id);
        let mut rows = self.sessions.load_all(&key).await?;
        ChatSessionIndex::upsert(&mut rows, row.clone());
        self.sessions.save_all(&key, &rows).await?;
        Ok(row)
    }
}
