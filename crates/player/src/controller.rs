//! Playback transitions
//!
//! `PlaybackController` is the only code that mutates a `PlaybackState`.
//! Before the active chapter changes, the current offset is written into
//! the progress map, so switching away and back never loses a position.
//! Storage goes through a `PersistenceHandle` and never fails a
//! transition.

use crate::error::{PlayerError, PlayerResult};
use crate::resume::PlaybackOptions;
use crate::snapshot::Snapshot;
use crate::state::PlaybackState;
use crate::worker::PersistenceHandle;
use reads_core::{Book, Catalog, Chapter, Timestamp};
use std::sync::Arc;

/// Drives a `PlaybackState` in response to user actions and clock ticks
///
/// Not thread-safe by itself; hosts with several threads keep the
/// controller on one of them and route events to it.
pub struct PlaybackController {
    state: PlaybackState,
    persistence: PersistenceHandle,
    options: PlaybackOptions,
    clock: fn() -> Timestamp,
    autosave_mark: u64,
}

impl PlaybackController {
    pub fn new(
        state: PlaybackState,
        persistence: PersistenceHandle,
        options: PlaybackOptions,
    ) -> Self {
        Self {
            state,
            persistence,
            options,
            clock: Timestamp::now,
            autosave_mark: 0,
        }
    }

    /// Replaces the wall clock used for last-played timestamps
    pub fn with_clock(mut self, clock: fn() -> Timestamp) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn into_state(self) -> PlaybackState {
        self.state
    }

    pub fn options(&self) -> &PlaybackOptions {
        &self.options
    }

    pub fn current_chapter(&self) -> Option<&Chapter> {
        self.state.active_chapter()
    }

    /// Makes `book` active at chapter `index` and starts playing
    ///
    /// The offset comes from the progress map through the resume policy.
    /// An invalid index is rejected before anything changes.
    pub fn play_chapter(&mut self, book: Arc<Book>, index: usize) -> PlayerResult<()> {
        if book.chapters.is_empty() {
            return Err(PlayerError::EmptyBook {
                book_id: book.id.to_string(),
            });
        }
        if index >= book.chapter_count() {
            return Err(PlayerError::ChapterOutOfRange {
                book_id: book.id.to_string(),
                index,
                chapter_count: book.chapter_count(),
            });
        }

        self.flush();

        let book_id = book.id.clone();
        self.state.active_book = Some(book);
        self.state.active_chapter_index = index;
        self.state.progress_secs = self.resume_offset();
        self.state.is_playing = true;
        self.autosave_mark = self.state.progress_secs;

        let now = (self.clock)();
        self.state.last_played_at.insert(book_id.clone(), now);
        log::debug!(
            "Playing {} chapter {} from {}s",
            book_id,
            index,
            self.state.progress_secs
        );
        self.persistence.record_last_played(book_id, now);

        Ok(())
    }

    /// Flips play/pause; does nothing without an active book
    pub fn toggle_play(&mut self) {
        if self.state.active_book.is_none() {
            log::debug!("Ignoring toggle with no active book");
            return;
        }
        self.state.is_playing = !self.state.is_playing;
    }

    /// Records the media clock position of the active chapter
    pub fn update_progress(&mut self, seconds: u64) {
        let Some(book_id) = self.state.active_book_id().cloned() else {
            return;
        };

        self.state.progress_secs = seconds;
        self.state
            .progress_map
            .set(&book_id, self.state.active_chapter_index, seconds);

        let interval = self.options.autosave_interval_secs;
        if interval > 0 && seconds.abs_diff(self.autosave_mark) >= interval {
            self.autosave_mark = seconds;
            self.persist();
        }
    }

    /// Restarts the chapter, or goes to the previous one near its start
    pub fn skip_prev(&mut self) {
        let Some(book_id) = self.state.active_book_id().cloned() else {
            return;
        };
        self.flush();

        let index = self.state.active_chapter_index;
        if self.state.progress_secs > self.options.restart_threshold_secs {
            self.state.progress_secs = 0;
            self.state.progress_map.set(&book_id, index, 0);
        } else if index > 0 {
            self.state.active_chapter_index = index - 1;
            self.state.progress_secs = self.resume_offset();
        }
        self.autosave_mark = self.state.progress_secs;
    }

    /// Goes to the next chapter; at the last one, stops at the book's end
    pub fn skip_next(&mut self) {
        let Some(chapter_count) = self.state.active_book.as_ref().map(|b| b.chapter_count()) else {
            return;
        };
        self.flush();

        let index = self.state.active_chapter_index;
        if index + 1 < chapter_count {
            self.state.active_chapter_index = index + 1;
            self.state.progress_secs = self.resume_offset();
        } else {
            log::debug!("Reached the end of the book");
            self.state.is_playing = false;
            self.state.progress_secs = 0;
        }
        self.autosave_mark = self.state.progress_secs;
    }

    /// Sets the volume, clamped to 0..=100
    pub fn set_volume(&mut self, volume: u8) {
        self.state.volume = volume.min(100);
    }

    /// Queues a snapshot of the current state for saving
    pub fn persist(&self) {
        self.persistence.save(Snapshot::capture(&self.state));
    }

    /// Reloads the last saved session
    ///
    /// Returns true if a session was restored. A missing or unreadable
    /// snapshot, or one whose book is no longer in `catalog`, leaves the
    /// state untouched. A restored session is always left playing.
    pub fn restore<C: Catalog + ?Sized>(&mut self, catalog: &C) -> bool {
        let snapshot = match self.persistence.load() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                log::debug!("No saved player session");
                return false;
            }
            Err(e) => {
                log::warn!("Could not load player session: {}", e);
                return false;
            }
        };

        let Some(book_id) = snapshot.book_id.as_ref() else {
            log::debug!("Saved player session has no book");
            return false;
        };
        let Some(book) = catalog.resolve(book_id) else {
            log::debug!("Discarding saved session for missing book {}", book_id);
            return false;
        };
        if book.chapters.is_empty() {
            log::warn!("Discarding saved session for book {} without chapters", book_id);
            return false;
        }

        let index = snapshot
            .current_chapter_index
            .min(book.chapter_count() - 1);

        self.state.progress_map = snapshot.progress_map;
        self.state.active_book = Some(book);
        self.state.active_chapter_index = index;
        self.state.progress_secs = snapshot.progress_seconds;
        self.state.volume = snapshot.volume.min(100);
        self.state.is_playing = true;
        self.autosave_mark = self.state.progress_secs;

        log::info!("Restored player session at chapter {}", index);
        true
    }

    /// Mirrors the current offset into the progress map
    fn flush(&mut self) {
        if let Some(book_id) = self.state.active_book_id().cloned() {
            self.state.progress_map.set(
                &book_id,
                self.state.active_chapter_index,
                self.state.progress_secs,
            );
        }
    }

    fn resume_offset(&self) -> u64 {
        let Some(book) = self.state.active_book.as_ref() else {
            return 0;
        };
        let index = self.state.active_chapter_index;
        let saved = self.state.progress_map.get(&book.id, index);
        match book.chapter(index) {
            Some(chapter) => self.options.resume.resume_offset(saved, chapter.duration),
            None => saved,
        }
    }
}
