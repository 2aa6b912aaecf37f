//! In-memory store for tests and hosts without durable storage

use crate::error::PlayerResult;
use crate::snapshot::Snapshot;
use crate::store::{PlayHistory, SnapshotStore};
use reads_core::{BookId, Timestamp};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Inner {
    snapshot_json: Option<String>,
    last_played: HashMap<BookId, Timestamp>,
    saves: usize,
}

/// Snapshot store and play history backed by shared memory
///
/// Clones share the same contents, so a test can hand one clone to the
/// worker and inspect another. Snapshots are kept as encoded JSON and
/// decoded on load, the same path a durable store takes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Stored JSON exactly as written
    pub fn raw_snapshot(&self) -> Option<String> {
        self.lock().snapshot_json.clone()
    }

    /// Replaces the stored JSON, bypassing encoding
    pub fn set_raw_snapshot(&self, json: impl Into<String>) {
        self.lock().snapshot_json = Some(json.into());
    }

    /// Decoded snapshot, `None` if absent or unreadable
    pub fn snapshot(&self) -> Option<Snapshot> {
        let json = self.raw_snapshot()?;
        Snapshot::from_json(&json).ok()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    pub fn last_played(&self, book_id: &BookId) -> Option<Timestamp> {
        self.lock().last_played.get(book_id).copied()
    }
}

impl SnapshotStore for MemoryStore {
    fn save(&mut self, snapshot: &Snapshot) -> PlayerResult<()> {
        let json = snapshot.to_json()?;
        let mut inner = self.lock();
        inner.snapshot_json = Some(json);
        inner.saves += 1;
        Ok(())
    }

    fn load(&mut self) -> PlayerResult<Option<Snapshot>> {
        match self.raw_snapshot() {
            Some(json) => Ok(Some(Snapshot::from_json(&json)?)),
            None => Ok(None),
        }
    }
}

impl PlayHistory for MemoryStore {
    fn record_last_played(&mut self, book_id: &BookId, at: Timestamp) -> PlayerResult<()> {
        self.lock().last_played.insert(book_id.clone(), at);
        Ok(())
    }
}
