//! Periodic title refresh
//!
//! Runs a callback on a fixed cadence in a background thread until stopped.
//! The controller uses it to keep the ACTIVE spinner glyph moving.

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Default refresh cadence
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(100);

/// Cancellable periodic task
pub struct Spinner {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Spinner {
    /// Start ticking every `interval`.
    ///
    /// The task ends when [`Spinner::stop`] is called, when the spinner is
    /// dropped, or when `tick` returns `false`.
    pub fn start<F>(interval: Duration, mut tick: F) -> std::io::Result<Self>
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let (stop_tx, stop_rx) = bounded::<()>(1);

        let handle = thread::Builder::new()
            .name("wizard-spinner".to_string())
            .spawn(move || {
                tracing::debug!("Spinner thread started ({:?} interval)", interval);

                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            if !tick() {
                                break;
                            }
                        }
                        // Stop requested or the owner went away
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }

                tracing::debug!("Spinner thread stopped");
            })?;

        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Check if the background thread is still alive
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map_or(false, |handle| !handle.is_finished())
    }

    /// Stop the task and wait for the thread to exit
    pub fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.try_send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("Spinner thread panicked");
            }
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.stop();
    }
}
