//! Integration tests for the per-user collections on top of a key-value store

use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;
use wellbeing_store::keys::{JOURNAL_ENTRIES, MOOD_ENTRIES};
use wellbeing_store::models::{
    ActivityCategory, ActivityPatch, JournalEntryPatch, Mood, MoodEntryPatch, NewActivity, NewJournalEntry, NewMoodEntry,
    SenderType,
};
use wellbeing_store::search::JournalFilter;
use wellbeing_store::{Clock, FixedClock, KeyValueStore, MemoryStore, SledStore, WellbeingService};

fn service() -> (WellbeingService, Arc<MemoryStore>, Arc<FixedClock>) {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()));
    let service = WellbeingService::new(store.clone(), clock.clone());
    (service, store, clock)
}

fn mood(mood: Mood, intensity: u8) -> NewMoodEntry {
    NewMoodEntry {
        mood,
        intensity,
        date: None,
        notes: None,
    }
}

fn journal(title: &str, content: &str, tags: &[&str]) -> NewJournalEntry {
    NewJournalEntry {
        title: title.to_string(),
        content: content.to_string(),
        tags: tags.iter().map(ToString::to_string).collect(),
        ..NewJournalEntry::default()
    }
}

#[tokio::test]
async fn test_create_then_read_back() {
    let (service, _, _) = service();
    let created = service.moods.create_mood_entry("u1", mood(Mood::Grateful, 8)).await.unwrap();

    let fetched = service.moods.get_mood_entry_by_id("u1", &created.id).await.unwrap();
    assert_eq!(fetched, Some(created.clone()));
    assert!(created.id.starts_with("mood_"));
    assert_eq!(created.user_id, "u1");
}

#[tokio::test]
async fn test_users_are_isolated() {
    let (service, store, _) = service();
    service.moods.create_mood_entry("u1", mood(Mood::Calm, 4)).await.unwrap();
    service.journal.create_journal_entry("u2", journal("t", "c", &[])).await.unwrap();

    assert!(service.moods.get_all_mood_entries("u2").await.unwrap().is_empty());
    assert!(service.journal.get_all_journal_entries("u1").await.unwrap().is_empty());

    let mut keys = store.list_keys().await.unwrap();
    keys.sort();
    assert_eq!(keys, vec![format!("{JOURNAL_ENTRIES}:u2"), format!("{MOOD_ENTRIES}:u1")]);
}

#[tokio::test]
async fn test_mood_reads_are_newest_first() {
    let (service, _, clock) = service();
    let base = clock.now();
    for (offset, m) in [(2, Mood::Sad), (0, Mood::Happy), (1, Mood::Tired)] {
        service
            .moods
            .create_mood_entry(
                "u1",
                NewMoodEntry {
                    date: Some(base - Duration::days(offset)),
                    ..mood(m, 5)
                },
            )
            .await
            .unwrap();
    }

    let moods: Vec<Mood> = service
        .moods
        .get_all_mood_entries("u1")
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.mood)
        .collect();
    assert_eq!(moods, vec![Mood::Happy, Mood::Tired, Mood::Sad]);

    let stats = service.moods.get_mood_statistics("u1").await.unwrap();
    assert_eq!(stats.total_entries, 3);
    assert_eq!(stats.last_mood, Some(Mood::Happy));
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let (service, _, _) = service();
    let entry = service.moods.create_mood_entry("u1", mood(Mood::Anxious, 6)).await.unwrap();

    assert!(service.moods.delete_mood_entry("u1", &entry.id).await.unwrap());
    assert!(service.moods.delete_mood_entry("u1", &entry.id).await.unwrap());
    assert!(service.moods.delete_mood_entry("u1", "mood_0_nothing").await.unwrap());
    assert!(service.moods.get_all_mood_entries("u1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_missing_leaves_store_untouched() {
    let (service, store, _) = service();
    service.moods.create_mood_entry("u1", mood(Mood::Calm, 3)).await.unwrap();
    let before = store.get("mood_entries:u1").await.unwrap();

    let patch = MoodEntryPatch {
        intensity: Some(9),
        ..MoodEntryPatch::default()
    };
    let result = service.moods.update_mood_entry("u1", "mood_0_missing", patch).await.unwrap();

    assert!(result.is_none());
    assert_eq!(store.get("mood_entries:u1").await.unwrap(), before);
}

#[tokio::test]
async fn test_update_preserves_identity() {
    let (service, _, clock) = service();
    let entry = service.moods.create_mood_entry("u1", mood(Mood::Neutral, 5)).await.unwrap();
    clock.advance(Duration::minutes(10));

    let updated = service
        .moods
        .update_mood_entry(
            "u1",
            &entry.id,
            MoodEntryPatch {
                mood: Some(Mood::Excited),
                notes: Some(Some("went for a run".to_string())),
                ..MoodEntryPatch::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.id, entry.id);
    assert_eq!(updated.user_id, entry.user_id);
    assert_eq!(updated.created_at, entry.created_at);
    assert_eq!(updated.intensity, 5);
    assert_eq!(updated.mood, Mood::Excited);
}

#[tokio::test]
async fn test_journal_keeps_insertion_order_after_updates() {
    let (service, _, clock) = service();
    let first = service.journal.create_journal_entry("u1", journal("one", "a", &[])).await.unwrap();
    clock.advance(Duration::minutes(1));
    let second = service.journal.create_journal_entry("u1", journal("two", "b", &[])).await.unwrap();

    service
        .journal
        .update_journal_entry(
            "u1",
            &first.id,
            JournalEntryPatch {
                content: Some("now with more words in it".to_string()),
                ..JournalEntryPatch::default()
            },
        )
        .await
        .unwrap();

    let entries = service.journal.get_all_journal_entries("u1").await.unwrap();
    let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec![first.id.as_str(), second.id.as_str()]);
    assert_eq!(entries[0].word_count, 6);
}

#[tokio::test]
async fn test_journal_search_and_tags() {
    let (service, _, _) = service();
    service
        .journal
        .create_journal_entry("u1", journal("Morning pages", "Slept well", &["sleep", "morning"]))
        .await
        .unwrap();
    let work = service
        .journal
        .create_journal_entry("u1", journal("Work", "Deadline stress", &["work"]))
        .await
        .unwrap();
    service.journal.toggle_favorite("u1", &work.id).await.unwrap();

    let by_text = JournalFilter {
        search_text: Some("STRESS".to_string()),
        ..JournalFilter::default()
    };
    let found = service.journal.search_journal("u1", &by_text).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, work.id);

    let favorites = JournalFilter {
        favorites_only: true,
        ..JournalFilter::default()
    };
    assert_eq!(service.journal.search_journal("u1", &favorites).await.unwrap().len(), 1);

    let mut tags = service.journal.get_all_tags("u1").await.unwrap();
    tags.sort();
    assert_eq!(tags, vec!["morning", "sleep", "work"]);
}

#[tokio::test]
async fn test_custom_activities_alongside_builtins() {
    let (service, _, _) = service();
    let builtins = service.activities.get_all_activities("u1").await.unwrap().len();

    let custom = service
        .activities
        .create_custom_activity(
            "u1",
            NewActivity {
                title: "Cold shower".to_string(),
                description: "Two minutes".to_string(),
                category: ActivityCategory::Movement,
                ..NewActivity::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(service.activities.get_all_activities("u1").await.unwrap().len(), builtins + 1);
    let movement = service
        .activities
        .get_activities_by_category("u1", ActivityCategory::Movement)
        .await
        .unwrap();
    assert!(movement.iter().any(|a| a.id == custom.id));

    let renamed = service
        .activities
        .update_custom_activity(
            "u1",
            &custom.id,
            ActivityPatch {
                title: Some("Cold plunge".to_string()),
                ..ActivityPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.map(|a| a.title), Some("Cold plunge".to_string()));

    assert!(service.activities.delete_custom_activity("u1", &custom.id).await.unwrap());
    assert_eq!(service.activities.get_all_activities("u1").await.unwrap().len(), builtins);
}

#[tokio::test]
async fn test_session_lifecycle_feeds_progress() {
    let (service, _, clock) = service();
    let session = service
        .sessions
        .start_activity_session("u1", "builtin_box_breathing")
        .await
        .unwrap();
    clock.advance(Duration::minutes(10));
    service
        .sessions
        .complete_activity_session("u1", &session.id, Some(5))
        .await
        .unwrap();

    let progress = service
        .sessions
        .get_activity_progress("u1", "builtin_box_breathing")
        .await
        .unwrap();
    assert_eq!(progress.total_sessions, 1);
    assert_eq!(progress.total_duration, 10);
    assert_eq!(progress.average_rating, Some(5.0));
    assert_eq!(progress.streak, 1);
}

#[tokio::test]
async fn test_chat_and_community_flow() {
    let (service, store, _) = service();
    service
        .chat
        .send_message("u1", "t1", "Dr. Rivera", SenderType::User, "Hello")
        .await
        .unwrap();

    assert!(store.get("chat_messages:u1:t1").await.unwrap().is_some());
    assert!(store.get("chat_sessions:u1").await.unwrap().is_some());

    let posted = service
        .community
        .post_community_message("u1", "sam", "Small wins today")
        .await
        .unwrap();
    let seen_by_other = service.community.get_community_messages("u2").await.unwrap();
    assert!(seen_by_other.iter().any(|m| m.message.id == posted.message.id && !m.is_own));
}

#[tokio::test]
async fn test_service_over_sled_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SledStore::open(&dir.path().join("db"), true).unwrap());
    let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()));
    let service = WellbeingService::new(store.clone(), clock);

    let id = service.moods.create_mood_entry("u1", mood(Mood::Calm, 2)).await.unwrap().id;
    let entry = service.moods.get_mood_entry_by_id("u1", &id).await.unwrap();
    assert_eq!(entry.map(|e| e.mood), Some(Mood::Calm));

    let raw = store.get("mood_entries:u1").await.unwrap().unwrap();
    assert!(raw.contains("\"mood\":\"calm\""));
}

#[tokio::test]
async fn test_reversed_date_range_matches_nothing() {
    let (service, _, clock) = service();
    let now = clock.now();
    service
        .journal
        .create_journal_entry("u1", journal("Today", "A quiet day", &[]))
        .await
        .unwrap();
    service.moods.create_mood_entry("u1", mood(Mood::Calm, 4)).await.unwrap();

    let reversed = JournalFilter {
        date_from: Some(now + Duration::days(1)),
        date_to: Some(now - Duration::days(1)),
        ..JournalFilter::default()
    };
    let found = service.journal.search_journal("u1", &reversed).await.unwrap();
    assert!(found.is_empty());

    let moods = service
        .moods
        .get_mood_entries_in_range("u1", now + Duration::days(1), now - Duration::days(1))
        .await
        .unwrap();
    assert!(moods.is_empty());
}
