//! Supervision of independently cancellable workers
//!
//! Each worker is a named thread holding a [`CancelToken`]. Shutting a
//! supervisor down cancels every worker first and then joins them all, so
//! one slow worker never delays the others' cancellation. Workers are
//! expected to check their token at least every [`POLL_INTERVAL`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, error};

use crate::error::{FoldError, FoldResult};

/// Upper bound on how long a worker may block before re-checking its token
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Shared cancellation flag. Once set it stays set.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
struct Worker {
    name: String,
    cancel: CancelToken,
    handle: JoinHandle<()>,
}

/// Owns a set of workers and their shutdown
#[derive(Debug, Default)]
pub struct Supervisor {
    workers: Vec<Worker>,
}

impl Supervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a worker thread running `task` with a fresh token
    pub fn spawn<F>(&mut self, name: impl Into<String>, task: F) -> FoldResult<()>
    where
        F: FnOnce(CancelToken) + Send + 'static,
    {
        let name = name.into();
        let cancel = CancelToken::new();
        let token = cancel.clone();

        let handle = std::thread::Builder::new()
            .name(name.clone())
            .spawn(move || task(token))
            .map_err(|source| FoldError::Spawn {
                name: name.clone(),
                source,
            })?;

        debug!(worker = %name, "worker started");
        self.workers.push(Worker {
            name,
            cancel,
            handle,
        });
        Ok(())
    }

    /// Number of workers currently owned
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Names of owned workers, in start order
    pub fn names(&self) -> Vec<String> {
        self.workers.iter().map(|w| w.name.clone()).collect()
    }

    /// Cancel every worker, then wait for all of them to exit.
    ///
    /// Safe to call repeatedly; the supervisor is empty afterwards.
    pub fn shutdown(&mut self) {
        for worker in &self.workers {
            worker.cancel.cancel();
        }
        for worker in self.workers.drain(..) {
            if worker.handle.join().is_err() {
                error!(worker = %worker.name, "worker panicked");
            } else {
                debug!(worker = %worker.name, "worker stopped");
            }
        }
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
