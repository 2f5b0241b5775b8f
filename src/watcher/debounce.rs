//! Per-group debounce scheduling
//!
//! A burst of `schedule()` calls collapses into one callback that fires once
//! the configured delay has passed since the last call. The callback runs on
//! the debouncer's own thread, so the group keeps receiving events (and
//! arming the next round) while a merge is in progress.

use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{FoldError, FoldResult};
use crate::supervisor::{CancelToken, POLL_INTERVAL};

/// Coalesces bursts of events into single callback invocations
#[derive(Debug)]
pub struct Debouncer {
    tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Debouncer {
    /// Start a debouncer thread that calls `on_fire` after each quiet period.
    ///
    /// The thread exits when `cancel` is set or the debouncer is dropped. A
    /// pending round is abandoned on cancellation.
    pub fn spawn<F>(name: &str, delay: Duration, cancel: CancelToken, mut on_fire: F) -> FoldResult<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let (tx, rx) = channel::<()>();
        let thread_name = format!("{name}-debounce");

        let handle = std::thread::Builder::new()
            .name(thread_name.clone())
            .spawn(move || {
                let mut deadline: Option<Instant> = None;
                loop {
                    if cancel.is_cancelled() {
                        return;
                    }

                    let wait = match deadline {
                        Some(at) => at.saturating_duration_since(Instant::now()).min(POLL_INTERVAL),
                        None => POLL_INTERVAL,
                    };

                    match rx.recv_timeout(wait) {
                        Ok(()) => {
                            if deadline.is_some() {
                                debug!("debounce timer reset");
                            }
                            deadline = Some(Instant::now() + delay);
                        }
                        Err(RecvTimeoutError::Timeout) => {}
                        Err(RecvTimeoutError::Disconnected) => return,
                    }

                    if let Some(at) = deadline {
                        if Instant::now() >= at {
                            deadline = None;
                            if cancel.is_cancelled() {
                                return;
                            }
                            on_fire();
                        }
                    }
                }
            })
            .map_err(|source| FoldError::Spawn {
                name: thread_name,
                source,
            })?;

        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    /// Arm (or re-arm) the timer
    pub fn schedule(&self) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(());
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
