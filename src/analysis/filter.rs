//! Event filtering.
//!
//! Every field that is set narrows the result (logical AND). Date bounds are
//! inclusive. Free-text search is case-insensitive and runs over a synthetic
//! string of event id, resolved worker name, helmet id, event type code and
//! description.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::model::{Event, EventStatus, EventType, HelmetError, Severity, Worker};

/// Filter specification for the event log. `Default` matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub worker_id: Option<String>,
    pub event_type: Option<EventType>,
    pub status: Option<EventStatus>,
    pub severity: Option<Severity>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub search: Option<String>,
}

impl EventFilter {
    pub fn for_worker(worker_id: &str) -> Self {
        EventFilter {
            worker_id: Some(worker_id.to_string()),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: EventStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_event_type(mut self, event_type: EventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_search(mut self, term: &str) -> Self {
        self.search = Some(term.to_string());
        self
    }

    /// Lower bound at the start (00:00:00 UTC) of `day`.
    pub fn from_day(mut self, day: NaiveDate) -> Self {
        self.from = Some(start_of_day(day));
        self
    }

    /// Upper bound at the last millisecond of `day`, so the whole calendar
    /// day is included.
    pub fn to_day(mut self, day: NaiveDate) -> Self {
        self.to = Some(start_of_day(day) + Duration::days(1) - Duration::milliseconds(1));
        self
    }

    /// True when no field narrows the result.
    pub fn is_empty(&self) -> bool {
        *self == EventFilter::default()
    }

    /// Checks one event. `worker_name` is the directory name for the
    /// event's worker, if it resolves; it only feeds the search text.
    pub fn matches(&self, event: &Event, worker_name: Option<&str>) -> bool {
        if let Some(worker_id) = &self.worker_id {
            if &event.worker_id != worker_id {
                return false;
            }
        }
        if self.event_type.is_some_and(|t| t != event.event_type) {
            return false;
        }
        if self.status.is_some_and(|s| s != event.status) {
            return false;
        }
        if self.severity.is_some_and(|s| s != event.severity) {
            return false;
        }
        if self.from.is_some_and(|from| event.timestamp < from) {
            return false;
        }
        if self.to.is_some_and(|to| event.timestamp > to) {
            return false;
        }
        match self.search.as_deref() {
            Some(term) if !term.is_empty() => {
                search_text(event, worker_name).contains(&term.to_lowercase())
            }
            _ => true,
        }
    }
}

fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Parses a `YYYY-MM-DD` calendar date from a filter form.
pub fn parse_day(value: &str) -> Result<NaiveDate, HelmetError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| HelmetError::InvalidFilter(format!("date '{}': {}", value, e)))
}

/// The lowercased haystack free-text search runs against.
pub fn search_text(event: &Event, worker_name: Option<&str>) -> String {
    format!(
        "{} {} {} {} {}",
        event.id,
        worker_name.unwrap_or(""),
        event.helmet_id,
        event.event_type.code(),
        event.description
    )
    .to_lowercase()
}

/// Applies `filter` to `events`, resolving worker names from `workers`.
/// Input order is preserved.
pub fn filter_events<'a>(events: &'a [Event], filter: &EventFilter, workers: &[Worker]) -> Vec<&'a Event> {
    events
        .iter()
        .filter(|event| {
            let name = workers
                .iter()
                .find(|w| w.id == event.worker_id)
                .map(|w| w.name.as_str());
            filter.matches(event, name)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
