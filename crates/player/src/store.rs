//! Collaborator seams for durable storage

use crate::error::PlayerResult;
use crate::snapshot::Snapshot;
use reads_core::{BookId, Library, Timestamp};
use std::sync::{Arc, Mutex};

/// Durable home of the latest session snapshot
///
/// Every save is a full snapshot, so saving the same value twice is
/// harmless. `load` returns `Ok(None)` when nothing was ever saved.
pub trait SnapshotStore: Send {
    fn save(&mut self, snapshot: &Snapshot) -> PlayerResult<()>;

    fn load(&mut self) -> PlayerResult<Option<Snapshot>>;
}

/// Receives "book was started at" notifications
pub trait PlayHistory: Send {
    fn record_last_played(&mut self, book_id: &BookId, at: Timestamp) -> PlayerResult<()>;
}

/// Keeps a shared library's last-played shelf current
impl PlayHistory for Arc<Mutex<Library>> {
    fn record_last_played(&mut self, book_id: &BookId, at: Timestamp) -> PlayerResult<()> {
        let mut library = self
            .lock()
            .map_err(|_| reads_core::AppError::StorageUnavailable {
                operation: "record last played".to_string(),
            })?;
        library.record_last_played(book_id, at);
        Ok(())
    }
}

/// Discards every notification
impl PlayHistory for () {
    fn record_last_played(&mut self, _book_id: &BookId, _at: Timestamp) -> PlayerResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reads_core::{Book, Chapter, Duration};

    #[test]
    fn test_shared_library_records_last_played() {
        let id = BookId::parse("dune").unwrap();
        let book = Book::new(id.clone(), "Dune", "Frank Herbert", 1965)
            .with_chapters(vec![Chapter::new(1, "One", Duration::from_seconds(60))]);
        let library = Arc::new(Mutex::new(Library::from_books([book])));

        let mut history = Arc::clone(&library);
        history
            .record_last_played(&id, Timestamp::from_seconds(1_700_000_000))
            .unwrap();

        let last = library.lock().unwrap().last_played(&id);
        assert_eq!(last, Some(Timestamp::from_seconds(1_700_000_000)));
    }
}
