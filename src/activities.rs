//! Activity catalogue: a fixed built-in set plus per-user custom activities.
//!
//! Built-ins are never persisted and can't be changed. Reads always list the
//! built-ins first, then the user's custom activities in creation order.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

use crate::clock::Clock;
use crate::error::Result;
use crate::keys::{user_key, CUSTOM_ACTIVITIES};
use crate::models::{Activity, ActivityCategory, ActivityPatch, Difficulty, NewActivity, SCHEMA_VERSION};
use crate::repository::JsonCollection;
use crate::store::KeyValueStore;
use crate::utils::generate_id;
use crate::validation::InputValidator;

const ID_PREFIX: &str = "activity";

// 2024-01-01T00:00:00Z
const BUILTIN_CREATED_AT_SECS: i64 = 1_704_067_200;

struct Seed {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    category: ActivityCategory,
    duration: u32,
    difficulty: Difficulty,
    icon: &'static str,
    instructions: &'static [&'static str],
    benefits: &'static [&'static str],
}

const SEEDS: &[Seed] = &[
    Seed {
        id: "builtin_box_breathing",
        title: "Box Breathing",
        description: "A steady four-count breathing pattern to settle the nervous system.",
        category: ActivityCategory::Breathing,
        duration: 5,
        difficulty: Difficulty::Easy,
        icon: "wind",
        instructions: &[
            "Sit upright and relax your shoulders",
            "Breathe in through your nose for a count of four",
            "Hold your breath for a count of four",
            "Breathe out slowly for a count of four",
            "Hold empty for a count of four and repeat",
        ],
        benefits: &["Reduces stress", "Improves focus", "Slows the heart rate"],
    },
    Seed {
        id: "builtin_body_scan",
        title: "Body Scan",
        description: "Move attention slowly through the body, noticing sensation without judgement.",
        category: ActivityCategory::Mindfulness,
        duration: 15,
        difficulty: Difficulty::Medium,
        icon: "scan",
        instructions: &[
            "Lie down somewhere comfortable and close your eyes",
            "Bring attention to your toes and notice any sensation",
            "Move slowly up through each part of the body",
            "When the mind wanders, gently return to where you were",
        ],
        benefits: &["Releases physical tension", "Builds body awareness", "Helps with sleep"],
    },
    Seed {
        id: "builtin_gratitude_list",
        title: "Three Good Things",
        description: "Write down three things that went well today and why.",
        category: ActivityCategory::Gratitude,
        duration: 10,
        difficulty: Difficulty::Easy,
        icon: "heart",
        instructions: &[
            "Find a quiet moment at the end of the day",
            "Write down three things that went well",
            "For each one, note why it happened",
        ],
        benefits: &["Lifts mood", "Shifts attention to the positive", "Improves sleep quality"],
    },
    Seed {
        id: "builtin_mindful_walk",
        title: "Mindful Walk",
        description: "A slow walk paying full attention to each step and your surroundings.",
        category: ActivityCategory::Movement,
        duration: 20,
        difficulty: Difficulty::Easy,
        icon: "footprints",
        instructions: &[
            "Walk at a slower pace than usual",
            "Notice the feeling of each foot meeting the ground",
            "Take in the sounds, smells and colours around you",
        ],
        benefits: &["Gentle exercise", "Grounds you in the present", "Clears the mind"],
    },
    Seed {
        id: "builtin_progressive_relaxation",
        title: "Progressive Muscle Relaxation",
        description: "Tense and release each muscle group in turn.",
        category: ActivityCategory::Relaxation,
        duration: 15,
        difficulty: Difficulty::Medium,
        icon: "moon",
        instructions: &[
            "Start with your feet and tense the muscles for five seconds",
            "Release and notice the difference for ten seconds",
            "Work upwards through legs, stomach, hands, arms, shoulders and face",
        ],
        benefits: &["Eases muscle tension", "Reduces anxiety", "Prepares the body for sleep"],
    },
    Seed {
        id: "builtin_free_writing",
        title: "Free Writing",
        description: "Write continuously for ten minutes without stopping to edit.",
        category: ActivityCategory::Journaling,
        duration: 10,
        difficulty: Difficulty::Hard,
        icon: "pen",
        instructions: &[
            "Set a timer for ten minutes",
            "Write whatever comes to mind without pausing",
            "Don't correct spelling or reread until the timer ends",
        ],
        benefits: &["Untangles racing thoughts", "Surfaces hidden feelings", "Builds a writing habit"],
    },
];

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// The built-in catalogue, in display order
#[must_use]
pub fn builtin_activities() -> Vec<Activity> {
    let created_at = DateTime::<Utc>::from_timestamp(BUILTIN_CREATED_AT_SECS, 0).unwrap_or_default();

    SEEDS
        .iter()
        .map(|seed| Activity {
            schema_version: SCHEMA_VERSION,
            id: seed.id.to_string(),
            title: seed.title.to_string(),
            description: seed.description.to_string(),
            category: seed.category,
            duration: Some(seed.duration),
            instructions: to_strings(seed.instructions),
            benefits: to_strings(seed.benefits),
            difficulty: seed.difficulty,
            icon: seed.icon.to_string(),
            is_custom: false,
            created_by: None,
            created_at,
        })
        .collect()
}

/// Whether `id` names a built-in activity
#[must_use]
pub fn is_builtin(id: &str) -> bool {
    SEEDS.iter().any(|seed| seed.id == id)
}

/// Built-in catalogue plus per-user custom activities
#[derive(Clone)]
pub struct ActivityRepository {
    custom: JsonCollection<Activity>,
    clock: Arc<dyn Clock>,
}

impl ActivityRepository {
    /// Repository over `store`, timestamping with `clock`
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            custom: JsonCollection::new(store, CUSTOM_ACTIVITIES),
            clock,
        }
    }

    fn key(user_id: &str) -> String {
        user_key(CUSTOM_ACTIVITIES, user_id)
    }

    /// Built-ins followed by the user's custom activities
    pub async fn get_all_activities(&self, user_id: &str) -> Result<Vec<Activity>> {
        let mut activities = builtin_activities();
        activities.extend(self.get_custom_activities(user_id).await?);
        Ok(activities)
    }

    /// Only the user's own activities, in storage order
    pub async fn get_custom_activities(&self, user_id: &str) -> Result<Vec<Activity>> {
        self.custom.load_all(&Self::key(user_id)).await
    }

    /// Built-ins are checked before the user's custom activities
    pub async fn get_activity_by_id(&self, user_id: &str, id: &str) -> Result<Option<Activity>> {
        if let Some(builtin) = builtin_activities().into_iter().find(|a| a.id == id) {
            return Ok(Some(builtin));
        }
        self.custom.load_by_id(&Self::key(user_id), id).await
    }

    /// Built-ins and custom activities in `category`
    pub async fn get_activities_by_category(&self, user_id: &str, category: ActivityCategory) -> Result<Vec<Activity>> {
        let activities = self.get_all_activities(user_id).await?;
        Ok(activities.into_iter().filter(|a| a.category == category).collect())
    }

    /// Store a new custom activity owned by `user_id`
    pub async fn create_custom_activity(&self, user_id: &str, input: NewActivity) -> Result<Activity> {
        InputValidator::validate_user_id(user_id)?;
        InputValidator::validate_title(&input.title)?;

        let now = self.clock.now();
        let activity = Activity {
            schema_version: SCHEMA_VERSION,
            id: generate_id(ID_PREFIX, now),
            title: input.title,
            description: input.description,
            category: input.category,
            duration: input.duration,
            instructions: input.instructions,
            benefits: input.benefits,
            difficulty: input.difficulty,
            icon: input.icon,
            is_custom: true,
            created_by: Some(user_id.to_string()),
            created_at: now,
        };

        debug!(user_id = %user_id, id = %activity.id, "Creating custom activity");
        self.custom.insert(&Self::key(user_id), activity).await
    }

    /// Shallow-merge `patch` into a custom activity.
    ///
    /// Built-in ids never match, so they come back as `None`.
    pub async fn update_custom_activity(
        &self,
        user_id: &str,
        id: &str,
        patch: ActivityPatch,
    ) -> Result<Option<Activity>> {
        if is_builtin(id) {
            return Ok(None);
        }
        if let Some(title) = &patch.title {
            InputValidator::validate_title(title)?;
        }

        self.custom
            .update(&Self::key(user_id), id, |activity| {
                if let Some(title) = patch.title {
                    activity.title = title;
                }
                if let Some(description) = patch.description {
                    activity.description = description;
                }
                if let Some(category) = patch.category {
                    activity.category = category;
                }
                if let Some(duration) = patch.duration {
                    activity.duration = duration;
                }
                if let Some(instructions) = patch.instructions {
                    activity.instructions = instructions;
                }
                if let Some(benefits) = patch.benefits {
                    activity.benefits = benefits;
                }
                if let Some(difficulty) = patch.difficulty {
                    activity.difficulty = difficulty;
                }
                if let Some(icon) = patch.icon {
                    activity.icon = icon;
                }
            })
            .await
    }

    /// Always `true`. Built-in ids are simply not found among the custom set.
    pub async fn delete_custom_activity(&self, user_id: &str, id: &str) -> Result<bool> {
        self.custom.delete(&Self::key(user_id), id).await
    }
}
