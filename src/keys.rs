//! Persisted key layout.
//!
//! Per-user collections live under `{prefix}:{user_id}`; direct chat
//! transcripts add the counterpart as a third segment. Community messages and
//! the app-level settings use fixed keys with no user segment.

/// Mood entries, one collection per user
pub const MOOD_ENTRIES: &str = "mood_entries";
/// Journal entries, one collection per user
pub const JOURNAL_ENTRIES: &str = "journal_entries";
/// User-created activities, one collection per user
pub const CUSTOM_ACTIVITIES: &str = "custom_activities";
/// Activity sessions, one collection per user
pub const ACTIVITY_SESSIONS: &str = "activity_sessions";
/// Chat transcripts, one collection per user and therapist
pub const CHAT_MESSAGES: &str = "chat_messages";
/// Chat summary rows, one collection per user
pub const CHAT_SESSIONS: &str = "chat_sessions";
/// Shared community channel
pub const COMMUNITY_MESSAGES: &str = "community_messages";

/// Signed-in user profile
pub const CURRENT_USER: &str = "current_user";
/// Whether onboarding has been completed
pub const ONBOARDING_COMPLETE: &str = "onboarding_complete";
/// Light/dark/system theme preference
pub const THEME_PREFERENCE: &str = "theme_preference";

/// Key for a per-user collection
#[must_use]
pub fn user_key(prefix: &str, user_id: &str) -> String {
    format!("{prefix}:{user_id}")
}

/// Key for the transcript between a user and one therapist
#[must_use]
pub fn chat_messages_key(user_id: &str, therapist_id: &str) -> String {
    format!("{CHAT_MESSAGES}:{user_id}:{therapist_id}")
}
