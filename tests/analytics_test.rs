//! Progress and mood statistics, including property-based checks

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use std::collections::HashSet;
use wellbeing_store::analytics::{activity_progress_in, mood_statistics, streak_from, STREAK_LOOKBACK_DAYS};
use wellbeing_store::models::{ActivitySession, Mood, MoodEntry};

fn noon(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap()
}

fn completed(activity_id: &str, end: DateTime<Utc>, duration: i64, rating: Option<u8>) -> ActivitySession {
    ActivitySession {
        activity_id: activity_id.to_string(),
        start_time: end - Duration::minutes(duration),
        end_time: Some(end),
        completed: true,
        duration: Some(duration),
        rating,
        ..ActivitySession::default()
    }
}

#[test]
fn test_progress_ignores_unfinished_and_other_activities() {
    let sessions = vec![
        completed("a", noon(10), 10, Some(4)),
        completed("a", noon(9), 20, None),
        completed("b", noon(10), 99, Some(1)),
        ActivitySession {
            activity_id: "a".to_string(),
            start_time: noon(10),
            ..ActivitySession::default()
        },
    ];

    let progress = activity_progress_in(&sessions, "a", noon(10), &Utc);
    assert_eq!(progress.total_sessions, 2);
    assert_eq!(progress.total_duration, 30);
    assert_eq!(progress.average_rating, Some(4.0));
    assert_eq!(progress.last_completed, Some(noon(10)));
    assert_eq!(progress.streak, 2);
}

#[test]
fn test_progress_for_unknown_activity() {
    let progress = activity_progress_in(&[], "nothing", noon(1), &Utc);
    assert_eq!(progress.total_sessions, 0);
    assert_eq!(progress.total_duration, 0);
    assert_eq!(progress.average_rating, None);
    assert_eq!(progress.last_completed, None);
    assert_eq!(progress.streak, 0);
}

#[test]
fn test_streak_gap_after_today_breaks() {
    let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
    let days: HashSet<NaiveDate> = [today, today - Duration::days(2)].into_iter().collect();
    assert_eq!(streak_from(&days, today), 1);
}

#[test]
fn test_streak_before_practising_today() {
    let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
    let days: HashSet<NaiveDate> = (1..=3).map(|d| today - Duration::days(d)).collect();
    assert_eq!(streak_from(&days, today), 3);
}

#[test]
fn test_mood_statistics_average_rounded() {
    let entries: Vec<MoodEntry> = [(Mood::Happy, 7), (Mood::Sad, 2), (Mood::Calm, 2)]
        .into_iter()
        .map(|(mood, intensity)| MoodEntry {
            mood,
            intensity,
            ..MoodEntry::default()
        })
        .collect();

    let stats = mood_statistics(&entries);
    assert_eq!(stats.total_entries, 3);
    assert_eq!(stats.last_mood, Some(Mood::Happy));
    assert_eq!(stats.average_intensity, Some(3.7));
}

proptest! {
    #[test]
    fn prop_total_duration_is_sum_of_completed(durations in prop::collection::vec((0i64..240, any::<bool>()), 0..30)) {
        let sessions: Vec<ActivitySession> = durations
            .iter()
            .enumerate()
            .map(|(i, (minutes, done))| ActivitySession {
                completed: *done,
                ..completed("a", noon(1) + Duration::hours(i64::try_from(i).unwrap_or(0)), *minutes, None)
            })
            .collect();

        let expected: i64 = durations.iter().filter(|(_, done)| *done).map(|(m, _)| m).sum();
        let expected_count = durations.iter().filter(|(_, done)| *done).count();

        let progress = activity_progress_in(&sessions, "a", noon(28), &Utc);
        prop_assert_eq!(progress.total_duration, expected);
        prop_assert_eq!(progress.total_sessions, expected_count);
    }

    #[test]
    fn prop_streak_never_exceeds_lookback(offsets in prop::collection::hash_set(0i64..30, 0..30)) {
        let today = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();
        let days: HashSet<NaiveDate> = offsets.iter().map(|d| today - Duration::days(*d)).collect();

        let streak = streak_from(&days, today);
        prop_assert!(streak <= STREAK_LOOKBACK_DAYS);
        prop_assert!(streak as usize <= days.len());
    }

    #[test]
    fn prop_average_rating_within_bounds(ratings in prop::collection::vec(1u8..=5, 1..20)) {
        let sessions: Vec<ActivitySession> = ratings
            .iter()
            .map(|r| completed("a", noon(3), 5, Some(*r)))
            .collect();

        let average = activity_progress_in(&sessions, "a", noon(3), &Utc).average_rating;
        prop_assert!(average.is_some_and(|a| (1.0..=5.0).contains(&a)));
    }
}
