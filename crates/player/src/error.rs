//! Error types for the playback core

use reads_core::AppError;
use thiserror::Error;

/// Errors surfaced by the playback core
///
/// Only `ChapterOutOfRange` and `EmptyBook` ever reach a caller of the
/// controller; the rest are produced by stores and the persistence worker
/// and end up in the log.
#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("Chapter {index} is out of range for book {book_id} ({chapter_count} chapters)")]
    ChapterOutOfRange {
        book_id: String,
        index: usize,
        chapter_count: usize,
    },

    #[error("Book {book_id} has no chapters")]
    EmptyBook { book_id: String },

    #[error("Invalid player snapshot: {0}")]
    SnapshotDecode(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(#[from] AppError),

    #[error("Persistence worker unavailable: {0}")]
    WorkerUnavailable(String),

    #[error("Persistence worker did not answer within {0:?}")]
    LoadTimedOut(std::time::Duration),
}

pub type PlayerResult<T> = Result<T, PlayerError>;

impl PlayerError {
    /// True for caller mistakes, as opposed to collaborator failures
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::ChapterOutOfRange { .. } | Self::EmptyBook { .. })
    }
}
