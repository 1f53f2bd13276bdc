//! Periodic vitals polling for the currently watched worker.
//!
//! Each `VitalsPoll` owns one background thread that fetches a fresh
//! sample every `interval` and sends it, tagged with the worker id it was
//! issued for, over an `mpsc` channel. Cancelling (or dropping) the poll
//! closes its stop channel; the thread exits at its next wake-up.
//!
//! In-flight accessor calls cannot be interrupted, so a result for a worker
//! that is no longer selected may still arrive after cancellation. The
//! receiving view must compare `PollUpdate::worker_id` with its current
//! selection and discard mismatches.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::feed::DataFeed;
use crate::logging::{self, Component};
use crate::model::{HelmetError, VitalSample};

/// One poll result, keyed by the worker it was requested for.
#[derive(Debug, Clone, PartialEq)]
pub struct PollUpdate {
    pub worker_id: String,
    pub result: Result<VitalSample, HelmetError>,
}

pub struct VitalsPoll {
    worker_id: String,
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl VitalsPoll {
    /// Starts polling `worker_id`. The first fetch happens one `interval`
    /// after start; callers load the initial sample themselves.
    pub fn start(
        feed: Arc<dyn DataFeed>,
        worker_id: &str,
        interval: Duration,
        updates: Sender<PollUpdate>,
    ) -> Self {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let id = worker_id.to_string();

        let handle = thread::spawn(move || {
            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {}
                    // Explicit stop or the owning poll was dropped.
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }

                let result = feed.current_vital(&id);
                let update = PollUpdate {
                    worker_id: id.clone(),
                    result,
                };
                if updates.send(update).is_err() {
                    // Receiver gone: the view was torn down.
                    break;
                }
            }
            logging::debug(Component::Monitor, Some(&id), "Vitals poll stopped");
        });

        logging::debug(
            Component::Monitor,
            Some(worker_id),
            &format!("Vitals poll started every {}s", interval.as_secs_f64()),
        );

        VitalsPoll {
            worker_id: worker_id.to_string(),
            stop: Some(stop_tx),
            handle: Some(handle),
        }
    }

    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    /// Signals the thread to stop without waiting for an in-flight fetch.
    pub fn cancel(mut self) {
        self.signal_stop();
    }

    /// Signals the thread to stop and waits for it to exit.
    pub fn cancel_and_wait(mut self) {
        self.signal_stop();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn signal_stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

impl Drop for VitalsPoll {
    fn drop(&mut self) {
        self.signal_stop();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
