//! Worker profile: one worker's helmet, vitals and most recent events.

use chrono::{DateTime, Utc};

use crate::alert::{classify_sample, evaluate, stalenesses, Alert, Classification, SignalKind};
use crate::analysis::chart::{summarize, SignalSummary};
use crate::analysis::filter::EventFilter;
use crate::feed::{DataFeed, EventStore};
use crate::logging::{self, Component};
use crate::model::{Event, Helmet, VitalSample, Worker};
use crate::views::Route;

#[derive(Debug, Clone)]
pub struct WorkerProfile {
    pub worker: Worker,
    pub helmet: Option<Helmet>,
    pub vitals: Option<VitalSample>,
    pub history: Vec<VitalSample>,
    /// Newest first.
    pub recent_events: Vec<Event>,
}

#[derive(Debug, Clone)]
pub enum ProfileOutcome {
    Loaded(WorkerProfile),
    Redirect(Route),
}

/// Loads a profile. An unknown worker id (or a directory that cannot be
/// read) redirects to the dashboard; failures on the other pieces leave
/// them empty.
pub fn load_profile(
    feed: &dyn DataFeed,
    store: &dyn EventStore,
    worker_id: &str,
    recent: usize,
) -> ProfileOutcome {
    let worker = match feed.get_worker(worker_id) {
        Ok(Some(worker)) => worker,
        Ok(None) => {
            logging::warn(Component::Feed, Some(worker_id), "Unknown worker; redirecting to dashboard");
            return ProfileOutcome::Redirect(Route::Dashboard);
        }
        Err(e) => {
            logging::log_failure(Component::Feed, Some(worker_id), "get_worker", &e);
            return ProfileOutcome::Redirect(Route::Dashboard);
        }
    };

    let helmet = feed.get_helmet(&worker.helmet_id).unwrap_or_else(|e| {
        logging::log_failure(Component::Feed, Some(worker_id), "get_helmet", &e);
        None
    });
    let vitals = feed
        .current_vital(worker_id)
        .map_err(|e| logging::log_failure(Component::Feed, Some(worker_id), "current_vital", &e))
        .ok();
    let history = feed.vital_history(worker_id).unwrap_or_else(|e| {
        logging::log_failure(Component::Feed, Some(worker_id), "vital_history", &e);
        Vec::new()
    });

    let mut recent_events = store
        .list_events(Some(&EventFilter::for_worker(worker_id)))
        .unwrap_or_else(|e| {
            logging::log_failure(Component::Events, Some(worker_id), "list_events", &e);
            Vec::new()
        });
    recent_events.truncate(recent);

    ProfileOutcome::Loaded(WorkerProfile {
        worker,
        helmet,
        vitals,
        history,
        recent_events,
    })
}

impl WorkerProfile {
    pub fn badges(&self) -> Vec<(SignalKind, Classification)> {
        self.vitals.as_ref().map(classify_sample).unwrap_or_default()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.vitals.as_ref().map(evaluate).unwrap_or_default()
    }

    /// Heart-rate spread over the history window, for the profile summary.
    pub fn heart_rate_summary(&self) -> Option<SignalSummary> {
        summarize(&self.history, SignalKind::HeartRate)
    }

    /// True when the helmet has not connected within `max_age_secs`.
    /// A helmet the feed does not know is treated as disconnected.
    pub fn helmet_disconnected_at(&self, max_age_secs: u64, now: DateTime<Utc>) -> bool {
        match &self.helmet {
            Some(helmet) => stalenesses::helmet_is_disconnected_at(helmet, max_age_secs, now),
            None => true,
        }
    }
}
