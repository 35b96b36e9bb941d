//! Activity sessions and per-activity progress.
//!
//! A session's `duration` is fixed the first time an update sets `end_time`.
//! Later edits to either timestamp leave it alone; call
//! [`SessionRepository::recompute_session_duration`] to refresh it.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

use crate::analytics::{activity_progress, ActivityProgress};
use crate::clock::Clock;
use crate::error::Result;
use crate::keys::{user_key, ACTIVITY_SESSIONS};
use crate::models::{ActivitySession, SessionPatch, SCHEMA_VERSION};
use crate::repository::JsonCollection;
use crate::store::KeyValueStore;
use crate::utils::generate_id;
use crate::validation::InputValidator;

const ID_PREFIX: &str = "session";

/// Whole minutes between two instants, rounded to nearest.
///
/// Halves round up toward positive infinity, so an end 90 seconds before the
/// start gives -1 rather than -2.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn minutes_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let millis = (end - start).num_milliseconds();
    (millis as f64 / 60_000.0 + 0.5).floor() as i64
}

/// Per-user session log. Reads are always newest first by `start_time`.
#[derive(Clone)]
pub struct SessionRepository {
    sessions: JsonCollection<ActivitySession>,
    clock: Arc<dyn Clock>,
}

impl SessionRepository {
    /// Repository over `store`, timestamping with `clock`
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: JsonCollection::new(store, ACTIVITY_SESSIONS),
            clock,
        }
    }

    fn key(user_id: &str) -> String {
        user_key(ACTIVITY_SESSIONS, user_id)
    }

    /// All sessions, newest first
    pub async fn get_all_sessions(&self, user_id: &str) -> Result<Vec<ActivitySession>> {
        let mut sessions = self.sessions.load_all(&Self::key(user_id)).await?;
        sessions.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(sessions)
    }

    /// Session with `id`, if any
    pub async fn get_session_by_id(&self, user_id: &str, id: &str) -> Result<Option<ActivitySession>> {
        self.sessions.load_by_id(&Self::key(user_id), id).await
    }

    /// Sessions of one activity, newest first
    pub async fn get_sessions_for_activity(&self, user_id: &str, activity_id: &str) -> Result<Vec<ActivitySession>> {
        let sessions = self.get_all_sessions(user_id).await?;
        Ok(sessions.into_iter().filter(|s| s.activity_id == activity_id).collect())
    }

    /// Open a new, not yet completed session starting now
    pub async fn start_activity_session(&self, user_id: &str, activity_id: &str) -> Result<ActivitySession> {
        InputValidator::validate_user_id(user_id)?;

        let now = self.clock.now();
        let session = ActivitySession {
            schema_version: SCHEMA_VERSION,
            id: generate_id(ID_PREFIX, now),
            activity_id: activity_id.to_string(),
            user_id: user_id.to_string(),
            start_time: now,
            end_time: None,
            completed: false,
            duration: None,
            rating: None,
        };

        debug!(user_id = %user_id, id = %session.id, activity_id = %activity_id, "Starting activity session");
        self.sessions.insert(&Self::key(user_id), session).await
    }

    /// Shallow-merge `patch`.
    ///
    /// When this update is the one that first gives the session an
    /// `end_time`, `duration` is derived from the merged start and end.
    pub async fn update_session(&self, user_id: &str, id: &str, patch: SessionPatch) -> Result<Option<ActivitySession>> {
        if let Some(rating) = patch.rating {
            InputValidator::validate_rating(rating)?;
        }

        self.sessions
            .update(&Self::key(user_id), id, |session| {
                let first_end = session.end_time.is_none() && patch.end_time.is_some();

                if let Some(start_time) = patch.start_time {
                    session.start_time = start_time;
                }
                if let Some(end_time) = patch.end_time {
                    session.end_time = Some(end_time);
                }
                if let Some(completed) = patch.completed {
                    session.completed = completed;
                }
                if let Some(rating) = patch.rating {
                    session.rating = Some(rating);
                }

                if first_end {
                    if let Some(end_time) = session.end_time {
                        session.duration = Some(minutes_between(session.start_time, end_time));
                    }
                }
            })
            .await
    }

    /// End the session now, mark it completed and attach an optional rating
    pub async fn complete_activity_session(
        &self,
        user_id: &str,
        id: &str,
        rating: Option<u8>,
    ) -> Result<Option<ActivitySession>> {
        let patch = SessionPatch {
            end_time: Some(self.clock.now()),
            completed: Some(true),
            rating,
            ..SessionPatch::default()
        };
        self.update_session(user_id, id, patch).await
    }

    /// Re-derive `duration` from the current timestamps.
    ///
    /// Sessions without an `end_time` are returned unchanged.
    pub async fn recompute_session_duration(&self, user_id: &str, id: &str) -> Result<Option<ActivitySession>> {
        self.sessions
            .update(&Self::key(user_id), id, |session| {
                if let Some(end_time) = session.end_time {
                    session.duration = Some(minutes_between(session.start_time, end_time));
                }
            })
            .await
    }

    /// Always `true`, even when nothing was removed
    pub async fn delete_session(&self, user_id: &str, id: &str) -> Result<bool> {
        self.sessions.delete(&Self::key(user_id), id).await
    }

    /// Totals, rating and streak for one activity
    pub async fn get_activity_progress(&self, user_id: &str, activity_id: &str) -> Result<ActivityProgress> {
        let sessions = self.get_all_sessions(user_id).await?;
        Ok(activity_progress(&sessions, activity_id, self.clock.now()))
    }
}
