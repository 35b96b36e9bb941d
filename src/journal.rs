//! Journal entries.
//!
//! Entries are returned in the order they were written; the repository never
//! sorts them. `word_count` is recomputed from `content` on every write that
//! touches the content.

use std::sync::Arc;
use tracing::debug;

use crate::clock::Clock;
use crate::error::Result;
use crate::keys::{user_key, JOURNAL_ENTRIES};
use crate::models::{JournalEntry, JournalEntryPatch, NewJournalEntry, SCHEMA_VERSION};
use crate::repository::JsonCollection;
use crate::search::{filter_entries, JournalFilter};
use crate::store::KeyValueStore;
use crate::utils::{count_words, generate_id};
use crate::validation::InputValidator;

const ID_PREFIX: &str = "journal";

/// Per-user journal entries
#[derive(Clone)]
pub struct JournalRepository {
    entries: JsonCollection<JournalEntry>,
    clock: Arc<dyn Clock>,
}

impl JournalRepository {
    /// Repository over `store`, timestamping with `clock`
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: JsonCollection::new(store, JOURNAL_ENTRIES),
            clock,
        }
    }

    fn key(user_id: &str) -> String {
        user_key(JOURNAL_ENTRIES, user_id)
    }

    /// All entries in storage order
    pub async fn get_all_journal_entries(&self, user_id: &str) -> Result<Vec<JournalEntry>> {
        self.entries.load_all(&Self::key(user_id)).await
    }

    /// Entry with `id`, if any
    pub async fn get_journal_entry_by_id(&self, user_id: &str, id: &str) -> Result<Option<JournalEntry>> {
        self.entries.load_by_id(&Self::key(user_id), id).await
    }

    /// Store a new entry with its word count, dated now unless a date is given
    pub async fn create_journal_entry(&self, user_id: &str, input: NewJournalEntry) -> Result<JournalEntry> {
        InputValidator::validate_user_id(user_id)?;
        InputValidator::validate_title(&input.title)?;

        let now = self.clock.now();
        let entry = JournalEntry {
            schema_version: SCHEMA_VERSION,
            id: generate_id(ID_PREFIX, now),
            user_id: user_id.to_string(),
            word_count: count_words(&input.content),
            title: input.title,
            content: input.content,
            date: input.date.unwrap_or(now),
            tags: input.tags,
            mood: input.mood,
            is_favorite: input.is_favorite,
            created_at: now,
            updated_at: now,
        };

        debug!(user_id = %user_id, id = %entry.id, words = entry.word_count, "Creating journal entry");
        self.entries.insert(&Self::key(user_id), entry).await
    }

    /// Shallow-merge `patch`; a new `tags` list replaces the old one outright
    pub async fn update_journal_entry(
        &self,
        user_id: &str,
        id: &str,
        patch: JournalEntryPatch,
    ) -> Result<Option<JournalEntry>> {
        if let Some(title) = &patch.title {
            InputValidator::validate_title(title)?;
        }

        let now = self.clock.now();
        self.entries
            .update(&Self::key(user_id), id, |entry| {
                if let Some(title) = patch.title {
                    entry.title = title;
                }
                if let Some(content) = patch.content {
                    entry.word_count = count_words(&content);
                    entry.content = content;
                }
                if let Some(date) = patch.date {
                    entry.date = date;
                }
                if let Some(tags) = patch.tags {
                    entry.tags = tags;
                }
                if let Some(mood) = patch.mood {
                    entry.mood = mood;
                }
                if let Some(is_favorite) = patch.is_favorite {
                    entry.is_favorite = is_favorite;
                }
                entry.updated_at = now;
            })
            .await
    }

    /// Flip `is_favorite`; `None` if there is no such entry
    pub async fn toggle_favorite(&self, user_id: &str, id: &str) -> Result<Option<JournalEntry>> {
        let now = self.clock.now();
        self.entries
            .update(&Self::key(user_id), id, |entry| {
                entry.is_favorite = !entry.is_favorite;
                entry.updated_at = now;
            })
            .await
    }

    /// Always `true`, even when nothing was removed
    pub async fn delete_journal_entry(&self, user_id: &str, id: &str) -> Result<bool> {
        self.entries.delete(&Self::key(user_id), id).await
    }

    /// Entries matching every set field of `filter`. A reversed date range matches nothing.
    pub async fn search_journal(&self, user_id: &str, filter: &JournalFilter) -> Result<Vec<JournalEntry>> {
        let entries = self.get_all_journal_entries(user_id).await?;
        Ok(filter_entries(entries, filter))
    }

    /// Distinct tags across all entries, in first-seen order
    pub async fn get_all_tags(&self, user_id: &str) -> Result<Vec<String>> {
        let entries = self.get_all_journal_entries(user_id).await?;
        let mut tags: Vec<String> = Vec::new();
        for tag in entries.into_iter().flat_map(|e| e.tags) {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::Mood;
    use crate::store::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn repo() -> JournalRepository {
        let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 8, 20, 21, 0, 0).unwrap()));
        JournalRepository::new(Arc::new(MemoryStore::new()), clock)
    }

    fn new_entry(title: &str, content: &str, tags: &[&str]) -> NewJournalEntry {
        NewJournalEntry {
            title: title.to_string(),
            content: content.to_string(),
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
            ..NewJournalEntry::default()
        }
    }

    #[tokio::test]
    async fn test_word_count_follows_content() {
        let repo = repo();
        let entry = repo
            .create_journal_entry("u1", new_entry("Evening", "long walk by the river", &[]))
            .await
            .unwrap();
        assert_eq!(entry.word_count, 5);

        let retitled = repo
            .update_journal_entry(
                "u1",
                &entry.id,
                JournalEntryPatch {
                    title: Some("A much longer evening title".to_string()),
                    ..JournalEntryPatch::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(retitled.word_count, 5);

        let rewritten = repo
            .update_journal_entry(
                "u1",
                &entry.id,
                JournalEntryPatch {
                    content: Some("short".to_string()),
                    ..JournalEntryPatch::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(rewritten.word_count, 1);
    }

    #[tokio::test]
    async fn test_tags_are_replaced_not_merged() {
        let repo = repo();
        let entry = repo
            .create_journal_entry("u1", new_entry("Tags", "body", &["sleep", "work"]))
            .await
            .unwrap();

        let updated = repo
            .update_journal_entry(
                "u1",
                &entry.id,
                JournalEntryPatch {
                    tags: Some(vec!["family".to_string()]),
                    ..JournalEntryPatch::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.tags, vec!["family".to_string()]);
    }

    #[tokio::test]
    async fn test_insertion_order_is_kept() {
        let repo = repo();
        for title in ["one", "two", "three"] {
            repo.create_journal_entry("u1", new_entry(title, "same date", &[])).await.unwrap();
        }

        let titles = |entries: Vec<JournalEntry>| entries.into_iter().map(|e| e.title).collect::<Vec<_>>();
        let first = titles(repo.get_all_journal_entries("u1").await.unwrap());
        let second = titles(repo.get_all_journal_entries("u1").await.unwrap());

        assert_eq!(first, vec!["one", "two", "three"]);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_toggle_favorite_and_search() {
        let repo = repo();
        let entry = repo
            .create_journal_entry(
                "u1",
                NewJournalEntry {
                    mood: Some(Mood::Calm),
                    ..new_entry("Quiet Sunday", "Read in the garden", &["rest"])
                },
            )
            .await
            .unwrap();
        repo.create_journal_entry("u1", new_entry("Busy Monday", "Meetings", &["work"]))
            .await
            .unwrap();

        let toggled = repo.toggle_favorite("u1", &entry.id).await.unwrap().unwrap();
        assert!(toggled.is_favorite);
        assert!(repo.toggle_favorite("u1", "missing").await.unwrap().is_none());

        let favorites = repo
            .search_journal(
                "u1",
                &JournalFilter {
                    favorites_only: true,
                    search_text: Some("garden".to_string()),
                    ..JournalFilter::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id, entry.id);
    }

    #[tokio::test]
    async fn test_get_all_tags_is_distinct() {
        let repo = repo();
        repo.create_journal_entry("u1", new_entry("a", "x", &["sleep", "work"])).await.unwrap();
        repo.create_journal_entry("u1", new_entry("b", "y", &["work", "family"])).await.unwrap();

        assert_eq!(repo.get_all_tags("u1").await.unwrap(), vec!["sleep", "work", "family"]);
    }

    #[tokio::test]
    async fn test_empty_title_rejected() {
        let repo = repo();
        assert!(repo.create_journal_entry("u1", new_entry("  ", "body", &[])).await.is_err());
    }
}
