//! Serializable copy of the session

use crate::error::PlayerResult;
use crate::progress::ProgressMap;
use crate::state::PlaybackState;
use reads_core::BookId;
use serde::{Deserialize, Serialize};

/// Everything needed to rebuild a `PlaybackState`
///
/// JSON shape:
///
/// ```json
/// {
///   "bookId": "dune",
///   "currentChapterIndex": 1,
///   "progressSeconds": 198,
///   "volume": 80,
///   "progressMap": { "dune_0": 40, "dune_1": 198 }
/// }
/// ```
///
/// Decoding is strict: unknown fields, negative or fractional numbers and
/// malformed progress keys are rejected. A missing `progressMap` decodes
/// as an empty map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Snapshot {
    #[serde(default)]
    pub book_id: Option<BookId>,
    pub current_chapter_index: usize,
    pub progress_seconds: u64,
    pub volume: u8,
    #[serde(default)]
    pub progress_map: ProgressMap,
}

impl Snapshot {
    /// Captures the current field values of `state`
    pub fn capture(state: &PlaybackState) -> Self {
        Self {
            book_id: state.active_book_id().cloned(),
            current_chapter_index: state.active_chapter_index(),
            progress_seconds: state.progress_secs(),
            volume: state.volume(),
            progress_map: state.progress_map().clone(),
        }
    }

    pub fn to_json(&self) -> PlayerResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> PlayerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
