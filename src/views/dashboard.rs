//! Dashboard view-model: one watched worker with live vitals.
//!
//! The dashboard owns its selection, the last-known-good sample and history,
//! and at most one `VitalsPoll`. Poll results arrive on an `mpsc` channel and
//! are applied with `apply`, which discards anything issued for a worker
//! other than the current selection or older than the displayed sample.

use std::fmt::Write as _;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::alert::{classify_motion, classify_sample, evaluate, stalenesses, Alert, Classification, SignalKind};
use crate::analysis::chart::{chart_series, ChartPoint};
use crate::feed::DataFeed;
use crate::logging::{self, Component};
use crate::model::{HelmetError, VitalSample, Worker};
use crate::monitor::{PollUpdate, VitalsPoll};

/// Seconds without a fresh sample before the display is flagged stale.
pub const DEFAULT_STALE_AFTER_SECS: u64 = 60;

pub struct Dashboard {
    feed: Arc<dyn DataFeed>,
    interval: Duration,
    stale_after_secs: u64,
    workers: Vec<Worker>,
    selected: Option<Worker>,
    vitals: Option<VitalSample>,
    history: Vec<VitalSample>,
    poll: Option<VitalsPoll>,
    updates_tx: Sender<PollUpdate>,
    updates_rx: Receiver<PollUpdate>,
    discarded: usize,
}

impl Dashboard {
    pub fn new(feed: Arc<dyn DataFeed>, interval: Duration) -> Self {
        let (updates_tx, updates_rx) = mpsc::channel();
        Dashboard {
            feed,
            interval,
            stale_after_secs: DEFAULT_STALE_AFTER_SECS,
            workers: Vec::new(),
            selected: None,
            vitals: None,
            history: Vec::new(),
            poll: None,
            updates_tx,
            updates_rx,
            discarded: 0,
        }
    }

    pub fn with_stale_after(mut self, secs: u64) -> Self {
        self.stale_after_secs = secs;
        self
    }

    /// Loads the worker directory and selects the first worker.
    pub fn open(&mut self) {
        match self.feed.list_workers() {
            Ok(workers) => self.workers = workers,
            Err(e) => {
                logging::log_failure(Component::Feed, None, "list_workers", &e);
                return;
            }
        }

        let Some(first) = self.workers.first().map(|w| w.id.clone()) else {
            logging::warn(Component::Monitor, None, "Worker directory is empty; nothing to watch");
            return;
        };
        if let Err(e) = self.select_worker(&first) {
            logging::log_failure(Component::Monitor, Some(&first), "select_worker", &e);
        }
    }

    /// Switches the watched worker: cancels the running poll, loads the new
    /// worker's sample and history, and starts a fresh poll.
    ///
    /// Fails with `WorkerNotFound` if `worker_id` is not in the loaded
    /// directory, leaving the current selection untouched.
    pub fn select_worker(&mut self, worker_id: &str) -> Result<(), HelmetError> {
        let worker = self
            .workers
            .iter()
            .find(|w| w.id == worker_id)
            .cloned()
            .ok_or_else(|| HelmetError::WorkerNotFound(worker_id.to_string()))?;

        if let Some(poll) = self.poll.take() {
            poll.cancel();
        }
        self.selected = Some(worker);
        self.vitals = None;
        self.history.clear();

        match self.feed.current_vital(worker_id) {
            Ok(sample) => self.vitals = Some(sample),
            Err(e) => logging::log_failure(Component::Feed, Some(worker_id), "current_vital", &e),
        }
        match self.feed.vital_history(worker_id) {
            Ok(history) => self.history = history,
            Err(e) => logging::log_failure(Component::Feed, Some(worker_id), "vital_history", &e),
        }

        self.poll = Some(VitalsPoll::start(
            Arc::clone(&self.feed),
            worker_id,
            self.interval,
            self.updates_tx.clone(),
        ));
        Ok(())
    }

    /// Applies one poll result. Returns `true` if it replaced the displayed
    /// sample; results for another worker, readings older than the one
    /// shown, and failures return `false`.
    pub fn apply(&mut self, update: PollUpdate) -> bool {
        let current = self.selected.as_ref().map(|w| w.id.as_str());
        if current != Some(update.worker_id.as_str()) {
            self.discarded += 1;
            logging::debug(
                Component::Monitor,
                Some(&update.worker_id),
                "Discarding late poll result for a worker no longer selected",
            );
            return false;
        }

        match update.result {
            Ok(sample) => {
                if self.vitals.as_ref().is_some_and(|shown| sample.timestamp < shown.timestamp) {
                    self.discarded += 1;
                    logging::debug(
                        Component::Monitor,
                        Some(&update.worker_id),
                        "Discarding poll result older than the displayed sample",
                    );
                    return false;
                }
                self.vitals = Some(sample);
                true
            }
            Err(e) => {
                logging::log_failure(Component::Feed, Some(&update.worker_id), "poll current_vital", &e);
                false
            }
        }
    }

    /// Applies every result already waiting. Returns how many were accepted.
    pub fn pump(&mut self) -> usize {
        let mut accepted = 0;
        while let Ok(update) = self.updates_rx.try_recv() {
            if self.apply(update) {
                accepted += 1;
            }
        }
        accepted
    }

    /// Blocks up to `timeout` for the next result and applies it.
    pub fn wait_for_update(&mut self, timeout: Duration) -> bool {
        match self.updates_rx.recv_timeout(timeout) {
            Ok(update) => self.apply(update),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    /// Tears the view down: the poll stops and no further results apply.
    pub fn close(&mut self) {
        if let Some(poll) = self.poll.take() {
            poll.cancel();
        }
        self.selected = None;
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn selected(&self) -> Option<&Worker> {
        self.selected.as_ref()
    }

    pub fn vitals(&self) -> Option<&VitalSample> {
        self.vitals.as_ref()
    }

    pub fn history(&self) -> &[VitalSample] {
        &self.history
    }

    /// True when the displayed sample is older than the stale threshold,
    /// i.e. polls have been failing or the helmet stopped reporting.
    pub fn vitals_stale_at(&self, now: DateTime<Utc>) -> bool {
        self.vitals
            .as_ref()
            .is_some_and(|s| stalenesses::is_stale_at(s, self.stale_after_secs, now))
    }

    pub fn is_polling(&self) -> bool {
        self.poll.is_some()
    }

    /// Poll results dropped because the selection had moved on or the
    /// reading was older than the one shown.
    pub fn discarded_updates(&self) -> usize {
        self.discarded
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.vitals.as_ref().map(evaluate).unwrap_or_default()
    }

    pub fn badges(&self) -> Vec<(SignalKind, Classification)> {
        self.vitals.as_ref().map(classify_sample).unwrap_or_default()
    }

    pub fn motion_badge(&self) -> Option<Classification> {
        self.vitals
            .as_ref()
            .map(|s| classify_motion(s.accelerometer.motion_status))
    }

    pub fn chart(&self) -> Vec<ChartPoint> {
        chart_series(&self.history)
    }

    /// Plain-text rendering of the current state.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let Some(worker) = &self.selected else {
            out.push_str("No worker selected\n");
            return out;
        };
        let _ = writeln!(
            out,
            "{} ({}, {}) helmet {}",
            worker.name, worker.position, worker.department, worker.helmet_id
        );

        let Some(sample) = &self.vitals else {
            out.push_str("  waiting for vitals...\n");
            return out;
        };
        let stale = if stalenesses::is_stale(sample, self.stale_after_secs) {
            " (stale)"
        } else {
            ""
        };
        let _ = writeln!(out, "  as of {}{}", sample.timestamp.format("%Y-%m-%d %H:%M:%S UTC"), stale);

        for (kind, badge) in self.badges() {
            let _ = writeln!(
                out,
                "  {:<12} {:>7.1} {:<4} [{} / {}]",
                kind.title(),
                kind.value_of(sample),
                kind.unit(),
                badge.label,
                badge.level.color()
            );
        }
        if let Some(motion) = self.motion_badge() {
            let _ = writeln!(out, "  {:<12} {:>12} [{} / {}]", "Motion", "", motion.label, motion.level.color());
        }

        for alert in self.alerts() {
            let _ = writeln!(
                out,
                "  ! {} [{}] {}",
                alert.kind.title(),
                alert.severity.label(),
                alert.description
            );
        }
        out
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.close();
    }
}
