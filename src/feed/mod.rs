//! Accessor contracts the monitoring core consumes.
//!
//! The views only ever see these traits. The in-process `Repository`
//! implements both on top of the `simulated` generator; a real helmet
//! gateway or HTTP client would implement the same traits and drop in
//! without touching classification, alerting or the views.
//!
//! All accessors are `Send + Sync` so a poll thread can share them.

pub mod simulated;

use crate::analysis::filter::EventFilter;
use crate::model::{Event, EventStatus, Helmet, HelmetError, VitalSample, Worker};

/// Worker directory and live vital signs.
pub trait DataFeed: Send + Sync {
    fn list_workers(&self) -> Result<Vec<Worker>, HelmetError>;

    /// `Ok(None)` when the id is not in the directory.
    fn get_worker(&self, id: &str) -> Result<Option<Worker>, HelmetError>;

    fn get_helmet(&self, helmet_id: &str) -> Result<Option<Helmet>, HelmetError>;

    /// A fresh sample for the worker, stamped now.
    fn current_vital(&self, worker_id: &str) -> Result<VitalSample, HelmetError>;

    /// Fixed-size window, ordered oldest to newest.
    fn vital_history(&self, worker_id: &str) -> Result<Vec<VitalSample>, HelmetError>;
}

/// Persisted safety events and their supervisor workflow.
pub trait EventStore: Send + Sync {
    /// Events newest first, narrowed by `filter` if given.
    fn list_events(&self, filter: Option<&EventFilter>) -> Result<Vec<Event>, HelmetError>;

    /// Sets `status` on event `id`, recording `actor` as resolver when the
    /// new status is `Resolved`. Fails with `EventNotFound` for unknown ids.
    fn update_event_status(
        &self,
        id: &str,
        status: EventStatus,
        actor: &str,
    ) -> Result<Event, HelmetError>;
}
