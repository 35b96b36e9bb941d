//! Shared community channel.
//!
//! One global collection for every user. Ownership (`is_own`) is worked out
//! against whoever is reading, never stored.

use chrono::Duration;
use std::sync::Arc;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::error::Result;
use crate::keys::COMMUNITY_MESSAGES;
use crate::models::{CommunityMessage, CommunityMessageView, SCHEMA_VERSION};
use crate::repository::JsonCollection;
use crate::store::KeyValueStore;
use crate::utils::generate_id;
use crate::validation::InputValidator;

const ID_PREFIX: &str = "community";

/// (id, user id, username, message, minutes before first read)
const WELCOME_MESSAGES: [(&str, &str, &str, &str, i64); 2] = [
    (
        "welcome_1",
        "community_guide",
        "Community Guide",
        "Welcome to the community! This is a safe space to share, listen and support each other.",
        60,
    ),
    (
        "welcome_2",
        "wellness_team",
        "Wellness Team",
        "Be gentle with yourself and with others. Every small step forward counts.",
        30,
    ),
];

/// Global community channel shared by every user
#[derive(Clone)]
pub struct CommunityRepository {
    messages: JsonCollection<CommunityMessage>,
    clock: Arc<dyn Clock>,
    seed_welcome_messages: bool,
}

impl CommunityRepository {
    /// Repository over `store`, timestamping with `clock`
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            messages: JsonCollection::new(store, COMMUNITY_MESSAGES),
            clock,
            seed_welcome_messages: true,
        }
    }

    /// Disable or enable seeding the empty channel with the welcome messages
    #[must_use]
    pub fn with_welcome_messages(mut self, enabled: bool) -> Self {
        self.seed_welcome_messages = enabled;
        self
    }

    fn view(message: CommunityMessage, reader_id: &str) -> CommunityMessageView {
        let is_own = message.user_id == reader_id;
        CommunityMessageView { message, is_own }
    }

    fn welcome_messages(&self) -> Vec<CommunityMessage> {
        let now = self.clock.now();
        WELCOME_MESSAGES
            .iter()
            .map(|(id, user_id, username, message, minutes_ago)| CommunityMessage {
                schema_version: SCHEMA_VERSION,
                id: (*id).to_string(),
                user_id: (*user_id).to_string(),
                username: (*username).to_string(),
                message: (*message).to_string(),
                timestamp: now - Duration::minutes(*minutes_ago),
            })
            .collect()
    }

    /// All messages oldest first, as seen by `reader_id`.
    ///
    /// The first read of an empty channel writes the welcome messages.
    pub async fn get_community_messages(&self, reader_id: &str) -> Result<Vec<CommunityMessageView>> {
        let mut messages = self.messages.load_all(COMMUNITY_MESSAGES).await?;

        if messages.is_empty() && self.seed_welcome_messages {
            messages = self.welcome_messages();
            self.messages.save_all(COMMUNITY_MESSAGES, &messages).await?;
            info!(count = messages.len(), "Seeded community channel");
        }

        messages.sort_by_key(|m| m.timestamp);
        Ok(messages.into_iter().map(|m| Self::view(m, reader_id)).collect())
    }

    /// Append a message from `user_id` to the channel
    pub async fn post_community_message(&self, user_id: &str, username: &str, text: &str) -> Result<CommunityMessageView> {
        InputValidator::validate_user_id(user_id)?;
        InputValidator::validate_message(text)?;

        let now = self.clock.now();
        let message = CommunityMessage {
            schema_version: SCHEMA_VERSION,
            id: generate_id(ID_PREFIX, now),
            user_id: user_id.to_string(),
            username: username.to_string(),
            message: text.to_string(),
            timestamp: now,
        };

        debug!(user_id = %user_id, id = %message.id, "Posting community message");
        let message = self.messages.insert(COMMUNITY_MESSAGES, message).await?;
        Ok(Self::view(message, user_id))
    }

    /// Remove a message written by `user_id`.
    ///
    /// Messages by other users are left alone. Always `true`.
    pub async fn delete_community_message(&self, user_id: &str, id: &str) -> Result<bool> {
        let mut messages = self.messages.load_all(COMMUNITY_MESSAGES).await?;
        messages.retain(|m| !(m.id == id && m.user_id == user_id));
        self.messages.save_all(COMMUNITY_MESSAGES, &messages).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::store::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn repo() -> (CommunityRepository, Arc<FixedClock>, Arc<MemoryStore>) {
        let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 10, 1, 12, 0, 0).unwrap()));
        let store = Arc::new(MemoryStore::new());
        let repo = CommunityRepository::new(store.clone(), clock.clone());
        (repo, clock, store)
    }

    #[tokio::test]
    async fn test_first_read_seeds_welcome_messages() {
        let (repo, _, store) = repo();
        let messages = repo.get_community_messages("u1").await.unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].message.id, "welcome_1");
        assert!(messages.iter().all(|m| !m.is_own));
        assert!(store.get(COMMUNITY_MESSAGES).await.unwrap().is_some());

        assert_eq!(repo.get_community_messages("u1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_seeding_can_be_disabled() {
        let (repo, _, _) = repo();
        let repo = repo.with_welcome_messages(false);
        assert!(repo.get_community_messages("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_is_own_depends_on_reader() {
        let (repo, clock, _) = repo();
        repo.get_community_messages("u1").await.unwrap();
        clock.advance(Duration::minutes(1));
        let posted = repo.post_community_message("u1", "sam", "Had a good day").await.unwrap();
        assert!(posted.is_own);

        let as_author = repo.get_community_messages("u1").await.unwrap();
        let as_other = repo.get_community_messages("u2").await.unwrap();

        assert_eq!(as_author.last().map(|m| m.is_own), Some(true));
        assert_eq!(as_other.last().map(|m| m.is_own), Some(false));
        assert_eq!(as_other.last().map(|m| m.message.id.clone()), Some(posted.message.id));
    }

    #[tokio::test]
    async fn test_only_author_can_delete() {
        let (repo, _, _) = repo();
        let posted = repo.post_community_message("u1", "sam", "hello all").await.unwrap();

        assert!(repo.delete_community_message("u2", &posted.message.id).await.unwrap());
        assert_eq!(repo.get_community_messages("u1").await.unwrap().len(), 1);

        assert!(repo.delete_community_message("u1", &posted.message.id).await.unwrap());
        let remaining = repo.get_community_messages("u1").await.unwrap();
        assert!(remaining.iter().all(|m| m.message.id != posted.message.id));
    }
}
