//! Reads player: playback position tracking
//!
//! Tracks which chapter of which book is active, remembers an offset for
//! every chapter ever played and decides where a chapter resumes. Audio
//! output is the host's job; it reports the media clock through
//! `PlaybackController::update_progress`.
//!
//! # Example
//!
//! ```rust,no_run
//! use reads_core::{Book, Library};
//! use reads_player::{
//!     MemoryStore, PersistenceWorker, PlaybackController, PlaybackOptions, PlaybackState,
//! };
//! use std::sync::Arc;
//!
//! # fn run(library: Library, book: Arc<Book>) -> reads_player::PlayerResult<()> {
//! let store = MemoryStore::new();
//! let worker = PersistenceWorker::spawn(store.clone(), store)?;
//!
//! let mut player = PlaybackController::new(
//!     PlaybackState::default(),
//!     worker.handle(),
//!     PlaybackOptions::default(),
//! );
//! player.restore(&library);
//! player.play_chapter(book, 0)?;
//! player.update_progress(42);
//! player.persist();
//!
//! worker.shutdown();
//! # Ok(())
//! # }
//! ```

mod controller;
mod error;
mod memory;
mod progress;
mod resume;
mod snapshot;
mod state;
mod store;
mod worker;

pub use controller::PlaybackController;
pub use error::{PlayerError, PlayerResult};
pub use memory::MemoryStore;
pub use progress::{ProgressKey, ProgressMap};
pub use resume::{PlaybackOptions, ResumePolicy};
pub use snapshot::Snapshot;
pub use state::{PlaybackState, DEFAULT_VOLUME};
pub use store::{PlayHistory, SnapshotStore};
pub use worker::{PersistenceHandle, PersistenceWorker, DEFAULT_LOAD_TIMEOUT};
