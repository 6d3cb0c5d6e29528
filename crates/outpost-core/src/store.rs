//! Persistence seam for the universe document.
//!
//! The engine only ever loads and overwrites one document plus the wall
//! time it was last written. [`UniverseStore`] abstracts where that lives;
//! `outpost-db` provides the `PostgreSQL` implementation and
//! [`MemoryStore`] serves tests and tools.

use core::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use outpost_types::UniverseState;
use tokio::sync::Mutex;

/// Errors raised by a [`UniverseStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The document row does not exist.
    #[error("universe document is missing")]
    Missing,

    /// The stored value could not be converted to or from a document.
    #[error("universe document is malformed: {source}")]
    Document {
        /// The underlying serde error.
        #[from]
        source: serde_json::Error,
    },

    /// The backing store failed. The backend's own error is the source.
    #[error("store backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A loaded document and the wall time it was last saved.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredUniverse {
    /// The document.
    pub state: UniverseState,
    /// Wall-clock time of the last save.
    pub last_update: DateTime<Utc>,
}

/// Durable home of the universe document.
pub trait UniverseStore: Send + Sync + 'static {
    /// Read the document and its last-update time.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Missing`] if no document exists; the engine
    /// treats that as fatal.
    fn load(&self) -> impl Future<Output = Result<StoredUniverse, StoreError>> + Send;

    /// Overwrite the document and stamp it with `at`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails. Callers do not retry.
    fn save(
        &self,
        state: &UniverseState,
        at: DateTime<Utc>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

#[derive(Debug, Clone)]
struct Row {
    document: serde_json::Value,
    last_update: DateTime<Utc>,
}

/// In-memory store that keeps the document as JSON and counts saves.
///
/// Going through `serde_json::Value` keeps it faithful to the storage
/// contract: whatever survives here survives a JSONB column.
#[derive(Debug, Default)]
pub struct MemoryStore {
    row: Mutex<Option<Row>>,
    saves: AtomicU64,
}

impl MemoryStore {
    /// A store holding an empty universe last saved at `at`.
    pub fn empty(at: DateTime<Utc>) -> Result<Self, StoreError> {
        Self::with_state(&UniverseState::default(), at)
    }

    /// A store holding `state` last saved at `at`.
    pub fn with_state(state: &UniverseState, at: DateTime<Utc>) -> Result<Self, StoreError> {
        Ok(Self {
            row: Mutex::new(Some(Row {
                document: serde_json::to_value(state)?,
                last_update: at,
            })),
            saves: AtomicU64::new(0),
        })
    }

    /// A store holding a raw JSON document, which may not decode.
    pub fn with_document(document: serde_json::Value, at: DateTime<Utc>) -> Self {
        Self {
            row: Mutex::new(Some(Row {
                document,
                last_update: at,
            })),
            saves: AtomicU64::new(0),
        }
    }

    /// A store with no document; [`load`](UniverseStore::load) fails.
    pub fn missing() -> Self {
        Self::default()
    }

    /// Number of successful saves so far.
    pub fn saves(&self) -> u64 {
        self.saves.load(Ordering::Relaxed)
    }

    /// The stored document, decoded.
    pub async fn stored(&self) -> Result<StoredUniverse, StoreError> {
        self.load().await
    }

    /// The stored document exactly as it would sit in a JSON column.
    pub async fn raw(&self) -> Option<serde_json::Value> {
        self.row.lock().await.as_ref().map(|row| row.document.clone())
    }
}

impl UniverseStore for MemoryStore {
    async fn load(&self) -> Result<StoredUniverse, StoreError> {
        let guard = self.row.lock().await;
        let row = guard.as_ref().ok_or(StoreError::Missing)?;
        Ok(StoredUniverse {
            state: serde_json::from_value(row.document.clone())?,
            last_update: row.last_update,
        })
    }

    async fn save(&self, state: &UniverseState, at: DateTime<Utc>) -> Result<(), StoreError> {
        let document = serde_json::to_value(state)?;
        *self.row.lock().await = Some(Row {
            document,
            last_update: at,
        });
        self.saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
