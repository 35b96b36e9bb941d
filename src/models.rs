//! Data models for every persisted entity family
//!
//! Records are stored as JSON arrays with camelCase field names. Decoding is
//! lenient per field: a missing field takes its default instead of failing the
//! whole collection, and every record carries a `schemaVersion`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version written into every record created by this crate
pub const SCHEMA_VERSION: u32 = 1;

const fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// The ten mood categories a user can log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    /// Happy
    Happy,
    /// Excited
    Excited,
    /// Grateful
    Grateful,
    /// Calm
    Calm,
    /// Neither good nor bad
    #[default]
    Neutral,
    /// Tired
    Tired,
    /// Anxious
    Anxious,
    /// Stressed
    Stressed,
    /// Sad
    Sad,
    /// Angry
    Angry,
}

impl Mood {
    /// Every mood, in display order
    pub const ALL: [Self; 10] = [
        Self::Happy,
        Self::Excited,
        Self::Grateful,
        Self::Calm,
        Self::Neutral,
        Self::Tired,
        Self::Anxious,
        Self::Stressed,
        Self::Sad,
        Self::Angry,
    ];

    /// Lowercase name as stored
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Excited => "excited",
            Self::Grateful => "grateful",
            Self::Calm => "calm",
            Self::Neutral => "neutral",
            Self::Tired => "tired",
            Self::Anxious => "anxious",
            Self::Stressed => "stressed",
            Self::Sad => "sad",
            Self::Angry => "angry",
        }
    }
}

impl std::str::FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mood| mood.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown mood: {s}"))
    }
}

/// A single logged mood
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MoodEntry {
    /// Record format version
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Unique id, `{prefix}_{millis}_{random}`
    pub id: String,
    /// Owner of the record
    pub user_id: String,
    /// Logged mood
    pub mood: Mood,
    /// 1 (barely) to 10 (overwhelmingly)
    pub intensity: u8,
    /// When the mood was felt; the sort key for reads
    pub date: DateTime<Utc>,
    /// Free-form notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Input for logging a mood
#[derive(Debug, Clone)]
pub struct NewMoodEntry {
    /// Mood
    pub mood: Mood,
    /// 1 to 10
    pub intensity: u8,
    /// Defaults to the current time
    pub date: Option<DateTime<Utc>>,
    /// Free-form notes
    pub notes: Option<String>,
}

/// Partial update of a mood entry; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct MoodEntryPatch {
    /// Mood
    pub mood: Option<Mood>,
    /// 1 to 10
    pub intensity: Option<u8>,
    /// When the entry applies
    pub date: Option<DateTime<Utc>>,
    /// `Some(None)` clears the notes
    pub notes: Option<Option<String>>,
}

/// A journal entry
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JournalEntry {
    /// Record format version
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Unique id, `{prefix}_{millis}_{random}`
    pub id: String,
    /// Owner of the record
    pub user_id: String,
    /// Title
    pub title: String,
    /// Body text
    pub content: String,
    /// Day the entry is about
    pub date: DateTime<Utc>,
    /// Display order is preserved; matching ignores order
    pub tags: Vec<String>,
    /// Mood at the time of writing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    /// Marked as favorite
    pub is_favorite: bool,
    /// Derived from `content` whenever it is written
    pub word_count: usize,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Input for a new journal entry
#[derive(Debug, Clone, Default)]
pub struct NewJournalEntry {
    /// Title
    pub title: String,
    /// Body text
    pub content: String,
    /// Defaults to the current time
    pub date: Option<DateTime<Utc>>,
    /// Free-form tags
    pub tags: Vec<String>,
    /// Mood at the time of writing
    pub mood: Option<Mood>,
    /// Marked as favorite
    pub is_favorite: bool,
}

/// Partial update of a journal entry.
///
/// `tags` replaces the whole list; it is never merged with the stored one.
#[derive(Debug, Clone, Default)]
pub struct JournalEntryPatch {
    /// Title
    pub title: Option<String>,
    /// Body text
    pub content: Option<String>,
    /// When the entry applies
    pub date: Option<DateTime<Utc>>,
    /// Free-form tags
    pub tags: Option<Vec<String>>,
    /// `Some(None)` clears the mood
    pub mood: Option<Option<Mood>>,
    /// Marked as favorite
    pub is_favorite: Option<bool>,
}

/// Activity categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityCategory {
    /// Meditation and awareness
    #[default]
    Mindfulness,
    /// Breathing exercises
    Breathing,
    /// Physical activity
    Movement,
    /// Writing prompts
    Journaling,
    /// Gratitude practice
    Gratitude,
    /// Relaxation techniques
    Relaxation,
    /// Connecting with others
    Social,
    /// Creative expression
    Creative,
}

impl std::str::FromStr for ActivityCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.trim().to_lowercase()))
            .map_err(|_| format!("Unknown activity category: {s}"))
    }
}

/// How demanding an activity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// For beginners
    #[default]
    Easy,
    /// Some practice needed
    Medium,
    /// For experienced users
    Hard,
}

/// A wellbeing activity, either built in or created by the user
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Activity {
    /// Record format version
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// `builtin_*` for the catalogue, generated for custom activities
    pub id: String,
    /// Title
    pub title: String,
    /// Short description
    pub description: String,
    /// Activity category
    pub category: ActivityCategory,
    /// Suggested length in minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    /// Steps shown while practising
    pub instructions: Vec<String>,
    /// Benefits listed to the user
    pub benefits: Vec<String>,
    /// How demanding the activity is
    pub difficulty: Difficulty,
    /// Icon name for the client
    pub icon: String,
    /// `false` for the built-in catalogue
    pub is_custom: bool,
    /// Creator of a custom activity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Input for a custom activity
#[derive(Debug, Clone, Default)]
pub struct NewActivity {
    /// Title
    pub title: String,
    /// Short description
    pub description: String,
    /// Activity category
    pub category: ActivityCategory,
    /// Suggested length in minutes
    pub duration: Option<u32>,
    /// Steps shown while practising
    pub instructions: Vec<String>,
    /// Benefits listed to the user
    pub benefits: Vec<String>,
    /// How demanding the activity is
    pub difficulty: Difficulty,
    /// Icon name for the client
    pub icon: String,
}

/// Partial update of a custom activity; list fields are replaced wholesale
#[derive(Debug, Clone, Default)]
pub struct ActivityPatch {
    /// Title
    pub title: Option<String>,
    /// Short description
    pub description: Option<String>,
    /// Activity category
    pub category: Option<ActivityCategory>,
    /// `Some(None)` clears the duration
    pub duration: Option<Option<u32>>,
    /// Steps shown while practising
    pub instructions: Option<Vec<String>>,
    /// Benefits listed to the user
    pub benefits: Option<Vec<String>>,
    /// How demanding the activity is
    pub difficulty: Option<Difficulty>,
    /// Icon name for the client
    pub icon: Option<String>,
}

/// One attempt at an activity
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActivitySession {
    /// Record format version
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Unique id, `{prefix}_{millis}_{random}`
    pub id: String,
    /// Not checked against the activity catalogue
    pub activity_id: String,
    /// Owner of the record
    pub user_id: String,
    /// When the session started
    pub start_time: DateTime<Utc>,
    /// When the session ended
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Whether the session was finished
    pub completed: bool,
    /// Minutes, fixed the first time `end_time` is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    /// 1 to 5
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

/// Partial update of a session
#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    /// When the session started
    pub start_time: Option<DateTime<Utc>>,
    /// When the session ended
    pub end_time: Option<DateTime<Utc>>,
    /// Whether the session was finished
    pub completed: Option<bool>,
    /// 1 to 5
    pub rating: Option<u8>,
}

/// Who wrote a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderType {
    /// The app user
    #[default]
    User,
    /// The therapist
    Therapist,
}

/// One message in a direct chat with a therapist
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChatMessage {
    /// Record format version
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Unique id, `{prefix}_{millis}_{random}`
    pub id: String,
    /// Therapist on the other side of the conversation
    pub therapist_id: String,
    /// User or therapist id of the author
    pub sender_id: String,
    /// Which side wrote the message
    pub sender_type: SenderType,
    /// Message text
    pub message: String,
    /// When the message was sent
    pub timestamp: DateTime<Utc>,
}

/// Summary row for one therapist conversation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChatSession {
    /// Record format version
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Therapist on the other side of the conversation
    pub therapist_id: String,
    /// Therapist display name
    pub therapist_name: String,
    /// Text of the newest message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    /// Time of the newest message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message_time: Option<DateTime<Utc>>,
    /// Read tracking is not implemented; always 0
    pub unread_count: u32,
}

/// A message in the shared community channel, as stored
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommunityMessage {
    /// Record format version
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Generated id; welcome messages use fixed ids
    pub id: String,
    /// Author
    pub user_id: String,
    /// Author display name at posting time
    pub username: String,
    /// Message text
    pub message: String,
    /// When the message was sent
    pub timestamp: DateTime<Utc>,
}

/// A community message as seen by one reader
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityMessageView {
    /// Stored message
    #[serde(flatten)]
    pub message: CommunityMessage,
    /// Whether the reader wrote this message
    pub is_own: bool,
}

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    /// Record format version
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// User id
    pub id: String,
    /// Display name
    pub name: String,
    /// Contact address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Client color scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light theme
    Light,
    /// Dark theme
    Dark,
    /// Follow the system setting
    #[default]
    System,
}
