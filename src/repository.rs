//! In-memory repository backing both accessors.
//!
//! Constructed once at start-up with seed data and passed around
//! explicitly; there is no ambient global store. Worker directory, helmets
//! and vital histories are fixed after construction. Events are the only
//! mutable state and live behind a `Mutex` so the repository can be shared
//! with poll threads.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use crate::analysis::filter::{filter_events, EventFilter};
use crate::config::MonitorConfig;
use crate::feed::simulated::VitalGenerator;
use crate::feed::{DataFeed, EventStore};
use crate::logging::{self, Component};
use crate::model::{Event, EventStatus, Helmet, HelmetError, VitalSample, Worker};
use crate::workers;

pub struct Repository {
    workers: Vec<Worker>,
    helmets: Vec<Helmet>,
    history: HashMap<String, Vec<VitalSample>>,
    events: Mutex<Vec<Event>>,
    generator: Mutex<VitalGenerator>,
    latency: Duration,
}

impl Repository {
    /// Seeds from the worker registry with simulated helmets, histories and
    /// events, as of the current time.
    pub fn seeded(config: &MonitorConfig) -> Self {
        Self::seeded_at(config, Utc::now())
    }

    /// As `seeded`, with an explicit clock.
    pub fn seeded_at(config: &MonitorConfig, now: DateTime<Utc>) -> Self {
        let mut generator = match config.seed {
            Some(seed) => VitalGenerator::seeded(seed),
            None => VitalGenerator::from_entropy(),
        };
        let directory = workers::all_workers();
        let events = generator.events(&directory, config.seed_event_count, now, &config.supervisor_name);
        Self::new(directory, events, generator, config, now)
    }

    /// Builds a repository around an explicit worker directory and event
    /// log. Helmets and histories are drawn from `generator`.
    pub fn new(
        directory: Vec<Worker>,
        mut events: Vec<Event>,
        mut generator: VitalGenerator,
        config: &MonitorConfig,
        now: DateTime<Utc>,
    ) -> Self {
        let helmets = directory.iter().map(|w| generator.helmet(w, now)).collect();
        let history = directory
            .iter()
            .map(|w| (w.id.clone(), generator.history(&w.id, config.history_window, now)))
            .collect();
        events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        logging::debug(
            Component::System,
            None,
            &format!(
                "Repository seeded: {} workers, {} events, {}-sample histories",
                directory.len(),
                events.len(),
                config.history_window
            ),
        );

        Repository {
            workers: directory,
            helmets,
            history,
            events: Mutex::new(events),
            generator: Mutex::new(generator),
            latency: config.simulated_latency(),
        }
    }

    /// Status transition with an injected clock; see `EventStore`.
    ///
    /// Resolving stamps `resolved_at`/`resolved_by` unless the event is
    /// already resolved. Any other status clears both.
    pub fn update_event_status_at(
        &self,
        id: &str,
        status: EventStatus,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<Event, HelmetError> {
        self.pause();
        let mut events = self.lock_events()?;
        let event = events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| HelmetError::EventNotFound(id.to_string()))?;

        if !event.status.can_advance_to(status) && event.status != status {
            logging::warn(
                Component::Events,
                Some(&event.worker_id),
                &format!(
                    "Event {} moved backward: {} -> {}",
                    id,
                    event.status.code(),
                    status.code()
                ),
            );
        }

        match status {
            EventStatus::Resolved => {
                if event.status != EventStatus::Resolved {
                    event.resolved_at = Some(now);
                    event.resolved_by = Some(actor.to_string());
                }
            }
            EventStatus::New | EventStatus::Acknowledged => {
                event.resolved_at = None;
                event.resolved_by = None;
            }
        }
        event.status = status;

        logging::info(
            Component::Events,
            Some(&event.worker_id),
            &format!("Event {} marked {} by {}", id, status.code(), actor),
        );
        Ok(event.clone())
    }

    fn pause(&self) {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
    }

    fn require_worker(&self, id: &str) -> Result<&Worker, HelmetError> {
        self.workers
            .iter()
            .find(|w| w.id == id)
            .ok_or_else(|| HelmetError::WorkerNotFound(id.to_string()))
    }

    fn lock_events(&self) -> Result<MutexGuard<'_, Vec<Event>>, HelmetError> {
        self.events
            .lock()
            .map_err(|_| HelmetError::FeedUnavailable("event log lock poisoned".to_string()))
    }
}

impl DataFeed for Repository {
    fn list_workers(&self) -> Result<Vec<Worker>, HelmetError> {
        self.pause();
        Ok(self.workers.clone())
    }

    fn get_worker(&self, id: &str) -> Result<Option<Worker>, HelmetError> {
        self.pause();
        Ok(self.workers.iter().find(|w| w.id == id).cloned())
    }

    fn get_helmet(&self, helmet_id: &str) -> Result<Option<Helmet>, HelmetError> {
        self.pause();
        Ok(self.helmets.iter().find(|h| h.id == helmet_id).cloned())
    }

    fn current_vital(&self, worker_id: &str) -> Result<VitalSample, HelmetError> {
        self.pause();
        self.require_worker(worker_id)?;
        let mut generator = self
            .generator
            .lock()
            .map_err(|_| HelmetError::FeedUnavailable("generator lock poisoned".to_string()))?;
        Ok(generator.sample(worker_id, Utc::now()))
    }

    fn vital_history(&self, worker_id: &str) -> Result<Vec<VitalSample>, HelmetError> {
        self.pause();
        self.require_worker(worker_id)?;
        Ok(self.history.get(worker_id).cloned().unwrap_or_default())
    }
}

impl EventStore for Repository {
    fn list_events(&self, filter: Option<&EventFilter>) -> Result<Vec<Event>, HelmetError> {
        self.pause();
        let events = self.lock_events()?;
        Ok(match filter {
            Some(filter) => filter_events(&events, filter, &self.workers)
                .into_iter()
                .cloned()
                .collect(),
            None => events.clone(),
        })
    }

    fn update_event_status(
        &self,
        id: &str,
        status: EventStatus,
        actor: &str,
    ) -> Result<Event, HelmetError> {
        self.update_event_status_at(id, status, actor, Utc::now())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
