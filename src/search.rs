//! Journal search and filtering.

use chrono::{DateTime, Utc};

use crate::models::{JournalEntry, Mood};

/// Constraints for a journal search. Every field that is set must match;
/// unset fields do not constrain anything.
#[derive(Debug, Clone, Default)]
pub struct JournalFilter {
    /// Entry must carry every one of these tags
    pub tags: Option<Vec<String>>,
    /// Inclusive lower bound on `date`
    pub date_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `date`
    pub date_to: Option<DateTime<Utc>>,
    /// Exact mood match
    pub mood: Option<Mood>,
    /// Case-insensitive substring of the title or the content
    pub search_text: Option<String>,
    /// Only entries marked favorite
    pub favorites_only: bool,
}

impl JournalFilter {
    /// True when no field narrows the result
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
            && self.mood.is_none()
            && self.search_text.is_none()
            && !self.favorites_only
    }

    /// Whether `entry` satisfies every constraint
    #[must_use]
    pub fn matches(&self, entry: &JournalEntry) -> bool {
        if let Some(tags) = &self.tags {
            if !tags.iter().all(|tag| entry.tags.contains(tag)) {
                return false;
            }
        }

        if self.date_from.is_some_and(|from| entry.date < from) {
            return false;
        }

        if self.date_to.is_some_and(|to| entry.date > to) {
            return false;
        }

        if let Some(mood) = self.mood {
            if entry.mood != Some(mood) {
                return false;
            }
        }

        if let Some(text) = &self.search_text {
            let needle = text.to_lowercase();
            if !entry.title.to_lowercase().contains(&needle) && !entry.content.to_lowercase().contains(&needle) {
                return false;
            }
        }

        !self.favorites_only || entry.is_favorite
    }
}

/// Entries matching `filter`, in their original order
#[must_use]
pub fn filter_entries(entries: Vec<JournalEntry>, filter: &JournalFilter) -> Vec<JournalEntry> {
    if filter.is_empty() {
        return entries;
    }
    entries.into_iter().filter(|entry| filter.matches(entry)).collect()
}
