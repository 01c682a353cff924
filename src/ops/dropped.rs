//! Dropped-column cache: drop columns now, restore them later by operation id

use super::columns::drop_columns;
use crate::config::StorageConfig;
use crate::error::{PrepError, Result};
use crate::frame;
use crate::lifecycle::storage::{KeyedStore, MemoryStore};
use polars::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

/// Columns removed by one drop, in the order they were named.
pub type DroppedColumns = Vec<Series>;

#[derive(Clone)]
pub struct DroppedColumnCache {
    store: Arc<dyn KeyedStore<DroppedColumns>>,
}

impl DroppedColumnCache {
    pub fn new(store: Arc<dyn KeyedStore<DroppedColumns>>) -> Self {
        Self { store }
    }

    pub fn in_memory(config: &StorageConfig) -> Self {
        Self::new(Arc::new(MemoryStore::new(
            Some(config.max_cached_drops),
            Some(config.drop_cache_ttl()),
        )))
    }

    /// Drop `columns` from `df`, keeping their full values under a new
    /// operation id.
    pub fn drop_columns(&self, df: &DataFrame, columns: &[String]) -> Result<(DataFrame, String)> {
        frame::ensure_columns(df, columns)?;
        let saved = columns
            .iter()
            .map(|name| frame::column(df, name).cloned())
            .collect::<Result<DroppedColumns>>()?;

        let out = drop_columns(df, columns)?;
        let operation_id = Uuid::new_v4().to_string();
        self.store.insert(operation_id.clone(), saved)?;

        tracing::info!("Cached {} dropped column(s) under operation {}", columns.len(), operation_id);
        Ok((out, operation_id))
    }

    /// Put the columns cached under `operation_id` back into `df`.
    ///
    /// A column still present is overwritten, a missing one is appended.
    /// The entry stays cached, so the same id can be restored again.
    ///
    /// # Errors
    ///
    /// `UnknownOperation` if nothing is cached under the id and
    /// `RowCountMismatch` if `df` no longer has the cached row count. Columns
    /// are restored in drop order onto a copy, so a failure returns no
    /// partially restored table.
    pub fn restore(&self, df: &DataFrame, operation_id: &str) -> Result<DataFrame> {
        let saved = self
            .store
            .get(operation_id)?
            .filter(|columns| !columns.is_empty())
            .ok_or_else(|| PrepError::UnknownOperation(operation_id.to_owned()))?;

        let mut out = df.clone();
        for series in saved {
            if series.len() != out.height() {
                return Err(PrepError::RowCountMismatch {
                    column: series.name().to_string(),
                });
            }
            out.with_column(series)?;
        }

        tracing::info!("Restored dropped columns of operation {}", operation_id);
        Ok(out)
    }

    /// Forget a cached drop. Returns whether it existed.
    pub fn forget(&self, operation_id: &str) -> Result<bool> {
        Ok(self.store.remove(operation_id)?.is_some())
    }

    pub fn len(&self) -> Result<usize> {
        self.store.len()
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.store.is_empty()
    }

    pub fn purge_expired(&self) -> Result<usize> {
        self.store.purge_expired()
    }
}
