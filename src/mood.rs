//! Mood entries and mood statistics.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

use crate::analytics::{mood_statistics, MoodStatistics};
use crate::clock::Clock;
use crate::error::Result;
use crate::keys::{user_key, MOOD_ENTRIES};
use crate::models::{MoodEntry, MoodEntryPatch, NewMoodEntry, SCHEMA_VERSION};
use crate::repository::JsonCollection;
use crate::store::KeyValueStore;
use crate::utils::generate_id;
use crate::validation::InputValidator;

const ID_PREFIX: &str = "mood";

/// Per-user mood history. Reads are always newest first by `date`.
#[derive(Clone)]
pub struct MoodRepository {
    entries: JsonCollection<MoodEntry>,
    clock: Arc<dyn Clock>,
}

impl MoodRepository {
    /// Repository over `store`, timestamping with `clock`
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: JsonCollection::new(store, MOOD_ENTRIES),
            clock,
        }
    }

    fn key(user_id: &str) -> String {
        user_key(MOOD_ENTRIES, user_id)
    }

    /// All entries, newest first
    pub async fn get_all_mood_entries(&self, user_id: &str) -> Result<Vec<MoodEntry>> {
        let mut entries = self.entries.load_all(&Self::key(user_id)).await?;
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(entries)
    }

    /// Entry with `id`, if any
    pub async fn get_mood_entry_by_id(&self, user_id: &str, id: &str) -> Result<Option<MoodEntry>> {
        self.entries.load_by_id(&Self::key(user_id), id).await
    }

    /// Entries whose `date` falls within `[from, to]`, newest first.
    ///
    /// A reversed range matches nothing.
    pub async fn get_mood_entries_in_range(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<MoodEntry>> {
        let entries = self.get_all_mood_entries(user_id).await?;
        Ok(entries.into_iter().filter(|e| e.date >= from && e.date <= to).collect())
    }

    /// Store a new entry, dated now unless `date` is given
    pub async fn create_mood_entry(&self, user_id: &str, input: NewMoodEntry) -> Result<MoodEntry> {
        InputValidator::validate_user_id(user_id)?;
        InputValidator::validate_intensity(input.intensity)?;

        let now = self.clock.now();
        let entry = MoodEntry {
            schema_version: SCHEMA_VERSION,
            id: generate_id(ID_PREFIX, now),
            user_id: user_id.to_string(),
            mood: input.mood,
            intensity: input.intensity,
            date: input.date.unwrap_or(now),
            notes: input.notes,
            created_at: now,
            updated_at: now,
        };

        debug!(user_id = %user_id, id = %entry.id, mood = entry.mood.as_str(), "Creating mood entry");
        self.entries.insert(&Self::key(user_id), entry).await
    }

    /// Shallow-merge `patch` into the entry; `None` if there is no such entry
    pub async fn update_mood_entry(&self, user_id: &str, id: &str, patch: MoodEntryPatch) -> Result<Option<MoodEntry>> {
        if let Some(intensity) = patch.intensity {
            InputValidator::validate_intensity(intensity)?;
        }

        let now = self.clock.now();
        self.entries
            .update(&Self::key(user_id), id, |entry| {
                if let Some(mood) = patch.mood {
                    entry.mood = mood;
                }
                if let Some(intensity) = patch.intensity {
                    entry.intensity = intensity;
                }
                if let Some(date) = patch.date {
                    entry.date = date;
                }
                if let Some(notes) = patch.notes {
                    entry.notes = notes;
                }
                entry.updated_at = now;
            })
            .await
    }

    /// Always `true`, even when nothing was removed
    pub async fn delete_mood_entry(&self, user_id: &str, id: &str) -> Result<bool> {
        self.entries.delete(&Self::key(user_id), id).await
    }

    /// Entry count, latest mood and average intensity
    pub async fn get_mood_statistics(&self, user_id: &str) -> Result<MoodStatistics> {
        let entries = self.get_all_mood_entries(user_id).await?;
        Ok(mood_statistics(&entries))
    }
}
