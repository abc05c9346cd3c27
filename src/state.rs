//! Application state shared by all handlers.

use std::sync::Arc;

use crate::audio::AudioService;
use crate::catalog::CatalogCache;
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub catalog: Arc<CatalogCache>,
    pub sessions: Arc<SessionStore>,
    pub audio: Arc<AudioService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire up state from a resolved config and an open database
    pub fn new(config: AppConfig, db: DbPool) -> Self {
        Self::with_audio(db, AudioService::new(&config.audio), config)
    }

    /// Same as `new`, with a caller-supplied audio service
    pub fn with_audio(db: DbPool, audio: AudioService, config: AppConfig) -> Self {
        let catalog = CatalogCache::new(config.words_path.clone(), config.group_count);
        Self {
            db,
            catalog: Arc::new(catalog),
            sessions: Arc::new(SessionStore::new()),
            audio: Arc::new(audio),
            config: Arc::new(config),
        }
    }

    pub fn daily_goal(&self) -> u32 {
        self.config.daily_goal
    }
}
