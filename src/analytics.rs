//! Derived views over materialized collections.
//!
//! Nothing here is cached or persisted; every figure is recomputed from the
//! records handed in.

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use std::collections::HashSet;

use crate::models::{ActivitySession, Mood, MoodEntry};
use crate::utils::round_to_tenth;

/// How many calendar days, counting today, a streak can look back
pub const STREAK_LOOKBACK_DAYS: u32 = 7;

/// Progress figures for one activity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityProgress {
    /// Activity these figures cover
    pub activity_id: String,
    /// Completed sessions only
    pub total_sessions: usize,
    /// Minutes; sessions without a duration count as 0
    pub total_duration: i64,
    /// `None` when no completed session has a rating
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    /// End time of the latest completed session
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_completed: Option<DateTime<Utc>>,
    /// Consecutive practice days, see [`streak_from`]
    pub streak: u32,
}

/// Progress for `activity_id`, with calendar days taken in the local timezone
#[must_use]
pub fn activity_progress(sessions: &[ActivitySession], activity_id: &str, now: DateTime<Utc>) -> ActivityProgress {
    activity_progress_in(sessions, activity_id, now, &Local)
}

/// Progress for `activity_id`, with calendar days taken in `tz`
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn activity_progress_in<Tz: TimeZone>(
    sessions: &[ActivitySession],
    activity_id: &str,
    now: DateTime<Utc>,
    tz: &Tz,
) -> ActivityProgress {
    let completed: Vec<&ActivitySession> = sessions
        .iter()
        .filter(|s| s.activity_id == activity_id && s.completed)
        .collect();

    let total_duration = completed.iter().map(|s| s.duration.unwrap_or(0)).sum();

    let ratings: Vec<u8> = completed.iter().filter_map(|s| s.rating).collect();
    let average_rating = if ratings.is_empty() {
        None
    } else {
        Some(ratings.iter().map(|&r| f64::from(r)).sum::<f64>() / ratings.len() as f64)
    };

    let last_completed = completed.iter().filter_map(|s| s.end_time).max();

    let today = now.with_timezone(tz).date_naive();
    let completed_days: HashSet<NaiveDate> = completed
        .iter()
        .filter_map(|s| s.end_time)
        .map(|t| t.with_timezone(tz).date_naive())
        .collect();

    ActivityProgress {
        activity_id: activity_id.to_string(),
        total_sessions: completed.len(),
        total_duration,
        average_rating,
        last_completed,
        streak: streak_from(&completed_days, today),
    }
}

/// Count consecutive days with a completion, walking back from `today`.
///
/// A missing `today` does not end the walk (the user may simply not have
/// practised yet), but any later gap does. The walk never goes further back
/// than [`STREAK_LOOKBACK_DAYS`].
#[must_use]
pub fn streak_from(completed_days: &HashSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0;

    for offset in 0..STREAK_LOOKBACK_DAYS {
        let day = today - Duration::days(i64::from(offset));
        if completed_days.contains(&day) {
            streak += 1;
        } else if offset > 0 {
            break;
        }
    }

    streak
}

/// Aggregate mood figures.
///
/// An empty history carries only `total_entries`; the other fields are left
/// out entirely rather than zeroed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodStatistics {
    /// Number of entries
    pub total_entries: usize,
    /// Mood of the newest entry by `date`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_mood: Option<Mood>,
    /// Date of the newest entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_mood_date: Option<DateTime<Utc>>,
    /// Mean intensity to one decimal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_intensity: Option<f64>,
}

/// Statistics over `entries`, which must already be sorted newest first
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mood_statistics(entries: &[MoodEntry]) -> MoodStatistics {
    let Some(latest) = entries.first() else {
        return MoodStatistics {
            total_entries: 0,
            last_mood: None,
            last_mood_date: None,
            average_intensity: None,
        };
    };

    let total: f64 = entries.iter().map(|e| f64::from(e.intensity)).sum();

    MoodStatistics {
        total_entries: entries.len(),
        last_mood: Some(latest.mood),
        last_mood_date: Some(latest.date),
        average_intensity: Some(round_to_tenth(total / entries.len() as f64)),
    }
}
