use std::sync::Arc;
use tracing::info;

use crate::activities::ActivityRepository;
use crate::chat::ChatRepository;
use crate::clock::{Clock, SystemClock};
use crate::community::CommunityRepository;
use crate::config::AppConfig;
use crate::error::Result;
use crate::journal::JournalRepository;
use crate::mood::MoodRepository;
use crate::sessions::SessionRepository;
use crate::settings::SettingsRepository;
use crate::store::{KeyValueStore, SledStore};

/// Every repository wired to one store and one clock
#[derive(Clone)]
pub struct WellbeingService {
    /// Mood log
    pub moods: MoodRepository,
    /// Journal entries
    pub journal: JournalRepository,
    /// Activity catalogue
    pub activities: ActivityRepository,
    /// Activity sessions and progress
    pub sessions: SessionRepository,
    /// Therapist chats
    pub chat: ChatRepository,
    /// Community channel
    pub community: CommunityRepository,
    /// Device-wide settings
    pub settings: SettingsRepository,
    store: Arc<dyn KeyValueStore>,
}

impl WellbeingService {
    /// Wire every repository to one store and clock
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            moods: MoodRepository::new(Arc::clone(&store), Arc::clone(&clock)),
            journal: JournalRepository::new(Arc::clone(&store), Arc::clone(&clock)),
            activities: ActivityRepository::new(Arc::clone(&store), Arc::clone(&clock)),
            sessions: SessionRepository::new(Arc::clone(&store), Arc::clone(&clock)),
            chat: ChatRepository::new(Arc::clone(&store), Arc::clone(&clock)),
            community: CommunityRepository::new(Arc::clone(&store), clock),
            settings: SettingsRepository::new(Arc::clone(&store)),
            store,
        }
    }

    /// Open the configured sled store with the system clock
    pub fn open(config: &AppConfig) -> Result<Self> {
        config.validate()?;

        let store = if config.storage.temporary {
            info!("Opening temporary store");
            SledStore::temporary()?
        } else {
            let path = config.storage_path();
            info!(path = %path.display(), "Opening store");
            SledStore::open(&path, config.storage.flush_on_write)?
        };

        let mut service = Self::new(Arc::new(store), Arc::new(SystemClock));
        service.community = service
            .community
            .with_welcome_messages(config.community.seed_welcome_messages);
        Ok(service)
    }

    /// The underlying store
    #[must_use]
    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.store)
    }
}
