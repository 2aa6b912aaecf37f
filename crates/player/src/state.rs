//! Session state of the player

use crate::progress::ProgressMap;
use reads_core::{Book, BookId, Chapter, Timestamp};
use std::collections::HashMap;
use std::sync::Arc;

/// Volume of a fresh session when no configuration is supplied
pub const DEFAULT_VOLUME: u8 = 80;

/// Everything the player knows about the current session
///
/// Read-only from the outside; `PlaybackController` owns all transitions.
/// While `is_playing()` is true there is always an active book, and the
/// active chapter index addresses one of its chapters.
#[derive(Debug, Clone)]
pub struct PlaybackState {
    pub(crate) active_book: Option<Arc<Book>>,
    pub(crate) active_chapter_index: usize,
    pub(crate) is_playing: bool,
    pub(crate) progress_secs: u64,
    pub(crate) volume: u8,
    pub(crate) progress_map: ProgressMap,
    pub(crate) last_played_at: HashMap<BookId, Timestamp>,
}

impl PlaybackState {
    /// An idle session at the given volume (clamped to 100)
    pub fn new(volume: u8) -> Self {
        Self {
            active_book: None,
            active_chapter_index: 0,
            is_playing: false,
            progress_secs: 0,
            volume: volume.min(100),
            progress_map: ProgressMap::new(),
            last_played_at: HashMap::new(),
        }
    }

    pub fn active_book(&self) -> Option<&Arc<Book>> {
        self.active_book.as_ref()
    }

    pub fn active_chapter_index(&self) -> usize {
        self.active_chapter_index
    }

    /// The chapter under the playhead, if a book is loaded
    pub fn active_chapter(&self) -> Option<&Chapter> {
        self.active_book
            .as_ref()
            .and_then(|book| book.chapter(self.active_chapter_index))
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Seconds into the active chapter
    pub fn progress_secs(&self) -> u64 {
        self.progress_secs
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn progress_map(&self) -> &ProgressMap {
        &self.progress_map
    }

    /// Offset stored for a chapter, for progress bars on other books
    ///
    /// For the active chapter this is the value mirrored by the last
    /// progress update, which equals `progress_secs()`.
    pub fn saved_offset(&self, book_id: &BookId, chapter_index: usize) -> u64 {
        self.progress_map.get(book_id, chapter_index)
    }

    /// When a book was last started in this session
    pub fn last_played_at(&self, book_id: &BookId) -> Option<Timestamp> {
        self.last_played_at.get(book_id).copied()
    }

    pub(crate) fn active_book_id(&self) -> Option<&BookId> {
        self.active_book.as_ref().map(|book| &book.id)
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(DEFAULT_VOLUME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reads_core::Duration;

    #[test]
    fn test_new_state_is_idle() {
        let state = PlaybackState::default();
        assert!(state.active_book().is_none());
        assert!(state.active_chapter().is_none());
        assert!(!state.is_playing());
        assert_eq!(state.progress_secs(), 0);
        assert_eq!(state.volume(), DEFAULT_VOLUME);
        assert!(state.progress_map().is_empty());
    }

    #[test]
    fn test_volume_is_clamped() {
        assert_eq!(PlaybackState::new(250).volume(), 100);
    }

    #[test]
    fn test_active_chapter_follows_index() {
        let book = Book::new(BookId::parse("dune").unwrap(), "Dune", "Frank Herbert", 1965)
            .with_chapters(vec![
                Chapter::new(1, "One", Duration::from_seconds(100)),
                Chapter::new(2, "Two", Duration::from_seconds(200)),
            ]);
        let mut state = PlaybackState::default();
        state.active_book = Some(Arc::new(book));
        state.active_chapter_index = 1;

        assert_eq!(state.active_chapter().map(|c| c.title.as_str()), Some("Two"));
        assert_eq!(state.active_book_id().map(|id| id.as_str()), Some("dune"));
    }
}
