//! Background persistence worker
//!
//! The controller never waits on storage for writes. Saves and last-played
//! notifications are queued on a channel and applied in order by a
//! dedicated thread that owns the store. Collaborator failures stop at
//! this thread and are logged. Loads wait for the worker, but only up to
//! a timeout: a store stuck behind a lock costs the saved session, not
//! the caller's thread.

use crate::error::{PlayerError, PlayerResult};
use crate::snapshot::Snapshot;
use crate::store::{PlayHistory, SnapshotStore};
use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use reads_core::{BookId, Timestamp};
use std::thread;
use std::time::Duration;

/// How long `PersistenceHandle::load` waits before giving up
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(5);

/// Commands sent to the persistence thread
#[derive(Debug)]
enum PersistenceCommand {
    Save(Snapshot),
    RecordLastPlayed(BookId, Timestamp),
    Load(Sender<Option<Snapshot>>),
    Shutdown,
}

/// Owns the persistence thread
pub struct PersistenceWorker {
    handle: Option<thread::JoinHandle<()>>,
    command_tx: Sender<PersistenceCommand>,
}

impl PersistenceWorker {
    /// Starts a worker that owns `store` and `history`
    pub fn spawn<S, H>(store: S, history: H) -> PlayerResult<Self>
    where
        S: SnapshotStore + 'static,
        H: PlayHistory + 'static,
    {
        let (command_tx, command_rx) = unbounded();

        let handle = thread::Builder::new()
            .name("reads-persistence".to_string())
            .spawn(move || persistence_loop(store, history, command_rx))
            .map_err(|e| PlayerError::WorkerUnavailable(format!("Failed to spawn: {}", e)))?;

        log::info!("Persistence worker started");

        Ok(Self {
            handle: Some(handle),
            command_tx,
        })
    }

    /// A sending handle for a controller
    pub fn handle(&self) -> PersistenceHandle {
        PersistenceHandle {
            command_tx: Some(self.command_tx.clone()),
            load_timeout: DEFAULT_LOAD_TIMEOUT,
        }
    }

    /// Applies everything queued so far, then stops the thread
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.command_tx.send(PersistenceCommand::Shutdown);
            if handle.join().is_err() {
                log::error!("Persistence worker panicked");
            }
            log::info!("Persistence worker stopped");
        }
    }
}

impl Drop for PersistenceWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn persistence_loop<S, H>(
    mut store: S,
    mut history: H,
    command_rx: Receiver<PersistenceCommand>,
) where
    S: SnapshotStore,
    H: PlayHistory,
{
    // Ends on Shutdown or once every handle is gone.
    while let Ok(command) = command_rx.recv() {
        match command {
            PersistenceCommand::Save(snapshot) => {
                if let Err(e) = store.save(&snapshot) {
                    log_store_failure("save player snapshot", &e);
                }
            }
            PersistenceCommand::RecordLastPlayed(book_id, at) => {
                if let Err(e) = history.record_last_played(&book_id, at) {
                    log_store_failure("record last played", &e);
                }
            }
            PersistenceCommand::Load(reply_tx) => {
                let snapshot = match store.load() {
                    Ok(snapshot) => snapshot,
                    Err(e) => {
                        log::warn!("Ignoring unreadable player snapshot: {}", e);
                        None
                    }
                };
                // The caller may have timed out already.
                let _ = reply_tx.send(snapshot);
            }
            PersistenceCommand::Shutdown => break,
        }
    }
}

fn log_store_failure(operation: &str, error: &PlayerError) {
    match error {
        PlayerError::Store(e) if e.is_retryable() => {
            log::warn!("Could not {} (store busy, next write retries): {}", operation, e)
        }
        _ => log::error!("Could not {}: {}", operation, error),
    }
}

/// Sending side of the persistence worker
///
/// Cheap to clone. A detached handle has no worker behind it: writes are
/// dropped and loads find nothing.
#[derive(Debug, Clone)]
pub struct PersistenceHandle {
    command_tx: Option<Sender<PersistenceCommand>>,
    load_timeout: Duration,
}

impl PersistenceHandle {
    /// A handle that persists nothing
    pub fn detached() -> Self {
        Self {
            command_tx: None,
            load_timeout: DEFAULT_LOAD_TIMEOUT,
        }
    }

    /// Sets how long `load` waits for the worker
    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = timeout;
        self
    }

    pub fn is_detached(&self) -> bool {
        self.command_tx.is_none()
    }

    /// Queues a snapshot write; never blocks
    pub fn save(&self, snapshot: Snapshot) {
        self.send(PersistenceCommand::Save(snapshot));
    }

    /// Queues a last-played notification; never blocks
    pub fn record_last_played(&self, book_id: BookId, at: Timestamp) {
        self.send(PersistenceCommand::RecordLastPlayed(book_id, at));
    }

    /// Reads the stored snapshot, after every write queued before it
    ///
    /// Unreadable snapshots come back as `Ok(None)`. If the worker does not
    /// answer within the load timeout, returns `PlayerError::LoadTimedOut`.
    pub fn load(&self) -> PlayerResult<Option<Snapshot>> {
        let Some(command_tx) = &self.command_tx else {
            return Ok(None);
        };

        let (reply_tx, reply_rx) = bounded(1);
        command_tx
            .send(PersistenceCommand::Load(reply_tx))
            .map_err(|_| PlayerError::WorkerUnavailable("worker has stopped".to_string()))?;
        reply_rx
            .recv_timeout(self.load_timeout)
            .map_err(|e| match e {
                RecvTimeoutError::Timeout => PlayerError::LoadTimedOut(self.load_timeout),
                RecvTimeoutError::Disconnected => {
                    PlayerError::WorkerUnavailable("worker stopped before replying".to_string())
                }
            })
    }

    fn send(&self, command: PersistenceCommand) {
        if let Some(command_tx) = &self.command_tx {
            if command_tx.send(command).is_err() {
                log::warn!("Persistence worker has stopped, dropping write");
            }
        }
    }
}
