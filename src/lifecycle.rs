//! Session lifecycle: undoable editing over an uploaded table.
//!
//! - [`storage`]: the pluggable [`KeyedStore`] and its in-memory
//!   implementation with capacity and TTL eviction
//! - [`session`]: [`SessionRegistry`], owner of every snapshot history
//! - [`transforms`]: the [`Transform`] trait and [`TransformationEngine`]
//!
//! A session's history is a stack of `DataFrame` snapshots. `apply`
//! transforms the top and pushes the result; `undo` pops it. Snapshots are
//! immutable values, so no step re-parses text.
//!
//! ```
//! use dataprepper::lifecycle::{ActionParams, MemoryStore, SessionRegistry, TransformationEngine};
//! use std::sync::Arc;
//!
//! # fn main() -> dataprepper::error::Result<()> {
//! let upload = b"age,city\n30,Oslo\n,Bergen\n50,Oslo\n";
//! let sessions = SessionRegistry::new(Arc::new(MemoryStore::unbounded()));
//! let engine = TransformationEngine::new(sessions.clone());
//!
//! let session_id = sessions.create(upload)?;
//! let applied = engine.apply(
//!     &session_id,
//!     "impute",
//!     vec!["age".to_owned()],
//!     &ActionParams::from_json(r#"{"method": "median"}"#)?,
//!     upload,
//!     5,
//! )?;
//! assert_eq!(applied.preview.data.len(), 3);
//!
//! let undone = engine.undo(&session_id, upload, 5)?;
//! assert!(undone.can_undo);
//! assert_eq!(sessions.depth(&session_id)?, 1);
//! # Ok(())
//! # }
//! ```

pub mod session;
pub mod storage;
pub mod transforms;

pub use session::{History, SessionRegistry, derive_session_id, derive_session_id_from_reader};
pub use storage::{KeyedStore, MemoryStore};
pub use transforms::{
    Action, ActionParams, Applied, DropTransform, ImputeTransform, Transform,
    TransformationEngine, instantiate_transform,
};
