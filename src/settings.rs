//! App-level settings stored under fixed, user-independent keys, plus the
//! "clear all local data" switch.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::Result;
use crate::keys::{CURRENT_USER, ONBOARDING_COMPLETE, THEME_PREFERENCE};
use crate::models::{Theme, UserProfile};
use crate::store::KeyValueStore;
use crate::validation::InputValidator;

/// Device-wide settings stored outside any user's namespace
#[derive(Clone)]
pub struct SettingsRepository {
    store: Arc<dyn KeyValueStore>,
}

impl SettingsRepository {
    /// Settings over `store`
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key = %key, error = %e, "Malformed setting, ignoring");
                Ok(None)
            },
        }
    }

    async fn write<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, &raw).await
    }

    /// Profile of the signed-in user, if any
    pub async fn get_current_user(&self) -> Result<Option<UserProfile>> {
        self.read(CURRENT_USER).await
    }

    /// Replace the signed-in user's profile
    pub async fn set_current_user(&self, profile: &UserProfile) -> Result<()> {
        InputValidator::validate_user_id(&profile.id)?;
        self.write(CURRENT_USER, profile).await
    }

    /// Sign out; user data stays on the device
    pub async fn clear_current_user(&self) -> Result<()> {
        self.store.remove(CURRENT_USER).await
    }

    /// `false` until set
    pub async fn is_onboarding_complete(&self) -> Result<bool> {
        Ok(self.read::<bool>(ONBOARDING_COMPLETE).await?.unwrap_or(false))
    }

    /// Record whether onboarding has finished
    pub async fn set_onboarding_complete(&self, complete: bool) -> Result<()> {
        self.write(ONBOARDING_COMPLETE, &complete).await
    }

    /// Saved theme, `Theme::System` if none
    pub async fn get_theme(&self) -> Result<Theme> {
        Ok(self.read::<Theme>(THEME_PREFERENCE).await?.unwrap_or_default())
    }

    /// Persist the selected theme
    pub async fn set_theme(&self, theme: Theme) -> Result<()> {
        self.write(THEME_PREFERENCE, &theme).await
    }

    /// Every key currently on the device
    pub async fn list_keys(&self) -> Result<Vec<String>> {
        self.store.list_keys().await
    }

    /// Wipe every collection and setting for every user
    pub async fn clear_all_local_data(&self) -> Result<()> {
        let count = self.store.list_keys().await?.len();
        self.store.clear().await?;
        info!(keys = count, "Cleared all local data");
        Ok(())
    }
}
