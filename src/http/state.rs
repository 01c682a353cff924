use super::dto::RowsQuery;
use crate::config::AppConfig;
use crate::error::Result;
use crate::lifecycle::{SessionRegistry, TransformationEngine};
use crate::ops::DroppedColumnCache;
use std::sync::Arc;

/// Shared handler state. Cloning shares the underlying stores.
#[derive(Clone)]
pub struct AppState {
    pub engine: TransformationEngine,
    pub drops: DroppedColumnCache,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// In-memory session and drop stores sized by `config.storage`.
    pub fn new(config: AppConfig) -> Self {
        let sessions = SessionRegistry::in_memory(&config.storage);
        let drops = DroppedColumnCache::in_memory(&config.storage);
        Self::from_parts(TransformationEngine::new(sessions), drops, config)
    }

    pub fn from_parts(
        engine: TransformationEngine,
        drops: DroppedColumnCache,
        config: AppConfig,
    ) -> Self {
        Self {
            engine,
            drops,
            config: Arc::new(config),
        }
    }

    pub fn sessions(&self) -> &SessionRegistry {
        self.engine.sessions()
    }

    /// Preview length for a request.
    pub fn rows(&self, query: RowsQuery) -> usize {
        query.rows.unwrap_or(self.config.preview.default_rows)
    }

    /// Sweep idle sessions and cached drops; returns how many of each went.
    pub fn purge_expired(&self) -> Result<(usize, usize)> {
        Ok((
            self.sessions().purge_expired()?,
            self.drops.purge_expired()?,
        ))
    }
}
