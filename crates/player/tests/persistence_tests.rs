//! Persistence behavior: failing collaborators, autosave, last-played

use reads_config::PlayerConfig;
use reads_core::{AppError, Book, BookId, Chapter, Duration, Library, Timestamp};
use reads_player::{
    MemoryStore, PersistenceWorker, PlayHistory, PlaybackController, PlaybackOptions,
    PlaybackState, PlayerResult, Snapshot, SnapshotStore,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn book(id: &str) -> Book {
    Book::new(BookId::parse(id).expect("valid id"), "Title", "Author", 2010).with_chapters(vec![
        Chapter::new(1, "One", Duration::from_seconds(600)),
        Chapter::new(2, "Two", Duration::from_seconds(600)),
    ])
}

/// Store that fails every call and counts attempts
#[derive(Clone, Default)]
struct BrokenStore {
    attempts: Arc<AtomicUsize>,
}

impl SnapshotStore for BrokenStore {
    fn save(&mut self, _snapshot: &Snapshot) -> PlayerResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(AppError::StorageUnavailable {
            operation: "save snapshot".to_string(),
        }
        .into())
    }

    fn load(&mut self) -> PlayerResult<Option<Snapshot>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(AppError::storage(
            "disk gone",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        )
        .into())
    }
}

impl PlayHistory for BrokenStore {
    fn record_last_played(&mut self, _book_id: &BookId, _at: Timestamp) -> PlayerResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(AppError::StorageUnavailable {
            operation: "record last played".to_string(),
        }
        .into())
    }
}

#[test]
fn test_failing_store_never_reaches_the_caller() {
    init_logging();
    let broken = BrokenStore::default();
    let worker = PersistenceWorker::spawn(broken.clone(), broken.clone()).expect("spawn");
    let library = Library::from_books([book("a")]);
    let a = library.get(&BookId::parse("a").expect("valid id")).expect("book");

    let mut player = PlaybackController::new(
        PlaybackState::default(),
        worker.handle(),
        PlaybackOptions::default(),
    );

    assert!(!player.restore(&library));
    player.play_chapter(Arc::clone(&a), 1).expect("play");
    player.update_progress(90);
    player.persist();
    worker.shutdown();

    assert_eq!(player.state().progress_secs(), 90);
    assert!(player.state().is_playing());
    // load, record_last_played, save
    assert_eq!(broken.attempts.load(Ordering::SeqCst), 3);
}

#[test]
fn test_persist_after_worker_stopped_is_silent() {
    init_logging();
    let worker = PersistenceWorker::spawn(MemoryStore::new(), ()).expect("spawn");
    let handle = worker.handle();
    worker.shutdown();

    let mut player =
        PlaybackController::new(PlaybackState::default(), handle, PlaybackOptions::default());
    player.play_chapter(Arc::new(book("a")), 0).expect("play");
    player.persist();

    assert!(!player.restore(&Library::new()));
    assert!(player.state().is_playing());
}

#[test]
fn test_persist_captures_current_values() {
    init_logging();
    let store = MemoryStore::new();
    let worker = PersistenceWorker::spawn(store.clone(), ()).expect("spawn");
    let a = Arc::new(book("a"));

    let mut player = PlaybackController::new(
        PlaybackState::default(),
        worker.handle(),
        PlaybackOptions::default(),
    );
    player.play_chapter(Arc::clone(&a), 0).expect("play");
    player.update_progress(10);
    player.persist();
    player.update_progress(20);
    player.set_volume(33);
    player.persist();
    worker.shutdown();

    let saved = store.snapshot().expect("saved snapshot");
    assert_eq!(saved, Snapshot::capture(player.state()));
    assert_eq!(saved.progress_seconds, 20);
    assert_eq!(saved.volume, 33);
    assert_eq!(store.save_count(), 2);
}

#[test]
fn test_autosave_follows_interval() {
    init_logging();
    let store = MemoryStore::new();
    let worker = PersistenceWorker::spawn(store.clone(), ()).expect("spawn");
    let config = PlayerConfig {
        autosave_interval_secs: 10,
        ..PlayerConfig::default()
    };

    let mut player = PlaybackController::new(
        PlaybackState::new(config.default_volume),
        worker.handle(),
        PlaybackOptions::from(&config),
    );
    player.play_chapter(Arc::new(book("a")), 0).expect("play");
    for second in 1..=25 {
        player.update_progress(second);
    }
    worker.shutdown();

    // Saves at 10 and 20.
    assert_eq!(store.save_count(), 2);
    assert_eq!(store.snapshot().expect("saved").progress_seconds, 20);
}

#[test]
fn test_autosave_disabled_by_default() {
    init_logging();
    let store = MemoryStore::new();
    let worker = PersistenceWorker::spawn(store.clone(), ()).expect("spawn");

    let mut player = PlaybackController::new(
        PlaybackState::default(),
        worker.handle(),
        PlaybackOptions::default(),
    );
    player.play_chapter(Arc::new(book("a")), 0).expect("play");
    for second in 1..=100 {
        player.update_progress(second);
    }
    worker.shutdown();

    assert_eq!(store.save_count(), 0);
}

#[test]
fn test_last_played_reaches_shared_library() {
    init_logging();
    let library = Arc::new(Mutex::new(Library::from_books([book("a"), book("b")])));
    let worker = PersistenceWorker::spawn(MemoryStore::new(), Arc::clone(&library)).expect("spawn");
    let (a, b) = {
        let lib = library.lock().expect("lock");
        (
            lib.get(&BookId::parse("a").expect("valid id")).expect("a"),
            lib.get(&BookId::parse("b").expect("valid id")).expect("b"),
        )
    };

    let mut player = PlaybackController::new(
        PlaybackState::default(),
        worker.handle(),
        PlaybackOptions::default(),
    )
    .with_clock(|| Timestamp::from_seconds(500));
    player.play_chapter(Arc::clone(&a), 0).expect("play a");
    player = player.with_clock(|| Timestamp::from_seconds(900));
    player.play_chapter(Arc::clone(&b), 0).expect("play b");
    worker.shutdown();

    let lib = library.lock().expect("lock");
    assert_eq!(lib.last_played(&a.id), Some(Timestamp::from_seconds(500)));
    let recent: Vec<_> = lib.recently_played(5).iter().map(|b| b.id.to_string()).collect();
    assert_eq!(recent, vec!["b", "a"]);
}

#[test]
fn test_restore_from_shared_library_catalog() {
    init_logging();
    let library = Arc::new(Mutex::new(Library::from_books([book("a")])));
    let store = MemoryStore::new();
    store.set_raw_snapshot(
        r#"{"bookId":"a","currentChapterIndex":1,"progressSeconds":44,"volume":90}"#,
    );
    let worker = PersistenceWorker::spawn(store, ()).expect("spawn");

    let mut player = PlaybackController::new(
        PlaybackState::default(),
        worker.handle(),
        PlaybackOptions::default(),
    );
    let restored = {
        let lib = library.lock().expect("lock");
        player.restore(&*lib)
    };

    assert!(restored);
    assert_eq!(player.state().progress_secs(), 44);
    assert!(player.state().progress_map().is_empty());
}

#[test]
fn test_restore_while_holding_library_lock_returns() {
    init_logging();
    let library = Arc::new(Mutex::new(Library::from_books([book("a")])));
    let store = MemoryStore::new();
    let worker = PersistenceWorker::spawn(store.clone(), Arc::clone(&library)).expect("spawn");
    let handle = worker
        .handle()
        .with_load_timeout(std::time::Duration::from_millis(200));
    let mut player = PlaybackController::new(PlaybackState::default(), handle, Default::default())
        .with_clock(|| Timestamp::from_seconds(77));

    let restored = {
        let guard = library.lock().expect("lock");
        let a = guard.get(&BookId::parse("a").expect("valid id")).expect("a");
        player.play_chapter(a, 1).expect("play");
        player.update_progress(30);
        player.persist();
        // The worker is stuck on the library lock until the guard drops.
        player.restore(&*guard)
    };

    assert!(!restored);
    assert_eq!(player.state().progress_secs(), 30);
    assert!(player.state().is_playing());

    worker.shutdown();
    let lib = library.lock().expect("lock");
    assert_eq!(
        lib.last_played(&BookId::parse("a").expect("valid id")),
        Some(Timestamp::from_seconds(77))
    );
    assert_eq!(store.snapshot().expect("saved").progress_seconds, 30);
}
