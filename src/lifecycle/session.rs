//! Session registry: session ids mapped to histories of table snapshots

use super::storage::{KeyedStore, MemoryStore};
use crate::config::StorageConfig;
use crate::error::{PrepError, Result};
use crate::frame;
use chrono::Utc;
use polars::prelude::DataFrame;
use sha2::{Digest as _, Sha256};
use std::io::{Read, Seek, SeekFrom};
use std::sync::{Arc, Mutex};

/// Bytes of an upload that feed the session id digest.
pub const SESSION_HEAD_BYTES: usize = 1024 * 1024;

/// Snapshot stack of one session, oldest first. The mutex serializes
/// mutations of that session.
pub type History = Arc<Mutex<Vec<DataFrame>>>;

/// Session id for an upload head at a given unix time (seconds).
pub fn session_id_at(head: &[u8], timestamp: i64) -> String {
    let head = head.get(..SESSION_HEAD_BYTES).unwrap_or(head);
    let mut hasher = Sha256::new();
    hasher.update(head);
    let hash = hasher.finalize();
    format!("{hash:x}_{timestamp}")
}

/// SHA-256 of the first MiB of the upload, `_`, then the current unix time.
pub fn derive_session_id(head: &[u8]) -> String {
    session_id_at(head, Utc::now().timestamp())
}

/// Like [`derive_session_id`], reading the head from a stream and seeking
/// back to where it started.
pub fn derive_session_id_from_reader<R: Read + Seek>(reader: &mut R) -> Result<String> {
    let start = reader.stream_position()?;
    let mut head = Vec::new();
    reader
        .by_ref()
        .take(SESSION_HEAD_BYTES as u64)
        .read_to_end(&mut head)?;
    reader.seek(SeekFrom::Start(start))?;
    Ok(derive_session_id(&head))
}

/// Owner of every session history.
#[derive(Clone)]
pub struct SessionRegistry {
    store: Arc<dyn KeyedStore<History>>,
}

impl SessionRegistry {
    pub fn new(store: Arc<dyn KeyedStore<History>>) -> Self {
        Self { store }
    }

    /// Registry over a [`MemoryStore`] sized by `config`.
    pub fn in_memory(config: &StorageConfig) -> Self {
        Self::new(Arc::new(MemoryStore::new(
            Some(config.max_sessions),
            Some(config.session_ttl()),
        )))
    }

    /// Decode `bytes` and start a session whose history holds that table.
    ///
    /// # Errors
    ///
    /// `Parse` if the upload is not a readable table.
    pub fn create(&self, bytes: &[u8]) -> Result<String> {
        let df = frame::decode(bytes)?;
        let session_id = derive_session_id(bytes);
        tracing::info!(
            "Created session {} ({} rows x {} columns)",
            session_id,
            df.height(),
            df.width()
        );
        self.store
            .insert(session_id.clone(), Arc::new(Mutex::new(vec![df])))?;
        Ok(session_id)
    }

    /// Most recent snapshot of a session.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id or an empty history.
    pub fn get_top(&self, session_id: &str) -> Result<DataFrame> {
        let not_found = || PrepError::NotFound(session_id.to_owned());
        let history = self.store.get(session_id)?.ok_or_else(not_found)?;
        let stack = history.lock().map_err(PrepError::lock_poisoned)?;
        stack.last().cloned().ok_or_else(not_found)
    }

    pub fn history(&self, session_id: &str) -> Result<Option<History>> {
        self.store.get(session_id)
    }

    /// History of `session_id`, registering an empty one if unknown.
    pub fn history_or_create(&self, session_id: &str) -> Result<History> {
        self.store
            .get_or_insert_with(session_id, &|| Arc::new(Mutex::new(Vec::new())))
    }

    /// Number of snapshots held for a session; 0 when unknown.
    pub fn depth(&self, session_id: &str) -> Result<usize> {
        let Some(history) = self.store.get(session_id)? else {
            return Ok(0);
        };
        let depth = history.lock().map_err(PrepError::lock_poisoned)?.len();
        Ok(depth)
    }

    /// Delete a session. Returns whether it existed.
    pub fn close(&self, session_id: &str) -> Result<bool> {
        let existed = self.store.remove(session_id)?.is_some();
        if existed {
            tracing::info!("Closed session {}", session_id);
        }
        Ok(existed)
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn registry() -> SessionRegistry {
        SessionRegistry::new(Arc::new(MemoryStore::unbounded()))
    }

    #[test]
    fn test_session_id_depends_on_content_and_time() {
        let a = session_id_at(b"a,b\n1,2\n", 1_700_000_000);
        assert_eq!(a, session_id_at(b"a,b\n1,2\n", 1_700_000_000));
        assert_ne!(a, session_id_at(b"a,b\n1,3\n", 1_700_000_000));
        assert_ne!(a, session_id_at(b"a,b\n1,2\n", 1_700_000_001));
        assert!(a.ends_with("_1700000000"));
        assert_eq!(a.find('_'), Some(64));
    }

    #[test]
    fn test_session_id_only_reads_first_mebibyte() {
        let mut long = vec![b'x'; SESSION_HEAD_BYTES];
        let head = session_id_at(&long, 1);
        long.extend_from_slice(b"tail");
        assert_eq!(session_id_at(&long, 1), head);
    }

    #[test]
    fn test_reader_position_is_restored() -> Result<()> {
        let mut reader = Cursor::new(b"a,b\n1,2\n".to_vec());
        reader.set_position(2);
        derive_session_id_from_reader(&mut reader)?;
        assert_eq!(reader.position(), 2);
        Ok(())
    }

    #[test]
    fn test_create_seeds_history() -> Result<()> {
        let registry = registry();
        let session_id = registry.create(b"a,b\n1,2\n3,4\n")?;
        assert_eq!(registry.depth(&session_id)?, 1);
        assert_eq!(registry.get_top(&session_id)?.shape(), (2, 2));
        Ok(())
    }

    #[test]
    fn test_create_rejects_unreadable_upload() {
        assert!(matches!(registry().create(b""), Err(PrepError::Parse(_))));
    }

    #[test]
    fn test_get_top_not_found() -> Result<()> {
        let registry = registry();
        assert!(matches!(registry.get_top("nope"), Err(PrepError::NotFound(_))));

        registry.history_or_create("empty")?;
        assert!(matches!(registry.get_top("empty"), Err(PrepError::NotFound(_))));
        assert_eq!(registry.depth("nope")?, 0);
        Ok(())
    }

    #[test]
    fn test_close_removes_session() -> Result<()> {
        let registry = registry();
        let session_id = registry.create(b"a\n1\n")?;
        assert!(registry.close(&session_id)?);
        assert!(!registry.close(&session_id)?);
        assert!(registry.is_empty()?);
        Ok(())
    }
}
