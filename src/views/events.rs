//! Event history view-model.
//!
//! Structured filters (worker, type, status, severity, date range) go to
//! the event store; the free-text search runs locally over what the store
//! returned. Both changes send the pager back to page 1.

use std::fmt::Write as _;
use std::sync::Arc;

use crate::analysis::filter::{filter_events, EventFilter};
use crate::analysis::pager::Pager;
use crate::feed::{DataFeed, EventStore};
use crate::logging::{self, Component};
use crate::model::{Event, EventStatus, HelmetError, Worker};
use crate::views::{Navigation, Route};

pub struct EventHistory {
    store: Arc<dyn EventStore>,
    feed: Arc<dyn DataFeed>,
    workers: Vec<Worker>,
    events: Vec<Event>,
    filter: EventFilter,
    search: String,
    pager: Pager,
}

impl EventHistory {
    pub fn new(store: Arc<dyn EventStore>, feed: Arc<dyn DataFeed>, per_page: usize) -> Self {
        EventHistory {
            store,
            feed,
            workers: Vec::new(),
            events: Vec::new(),
            filter: EventFilter::default(),
            search: String::new(),
            pager: Pager::new(0, per_page),
        }
    }

    /// Loads all events and the worker directory used for names.
    pub fn open(&mut self) {
        match self.feed.list_workers() {
            Ok(workers) => self.workers = workers,
            Err(e) => logging::log_failure(Component::Feed, None, "list_workers", &e),
        }
        self.reload(EventFilter::default());
    }

    /// Replaces the structured filter and refetches. Any search term in
    /// `filter` is ignored; use `set_search`.
    pub fn apply_filters(&mut self, filter: EventFilter) {
        self.reload(EventFilter { search: None, ..filter });
    }

    pub fn reset_filters(&mut self) {
        self.search.clear();
        self.reload(EventFilter::default());
    }

    /// Sets the local search term. The term is matched as typed,
    /// surrounding whitespace included.
    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
        let visible = self.visible().len();
        self.pager.reset(visible);
    }

    fn reload(&mut self, filter: EventFilter) {
        match self.store.list_events(Some(&filter)) {
            Ok(events) => {
                self.events = events;
                self.filter = filter;
            }
            // Keep the previous list and filter.
            Err(e) => logging::log_failure(Component::Events, None, "list_events", &e),
        }
        let visible = self.visible().len();
        self.pager.reset(visible);
    }

    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Events after the local search, newest first.
    pub fn visible(&self) -> Vec<&Event> {
        if self.search.is_empty() {
            return self.events.iter().collect();
        }
        let search = EventFilter::default().with_search(&self.search);
        filter_events(&self.events, &search, &self.workers)
    }

    pub fn current_page(&self) -> Vec<&Event> {
        self.pager.page_of(&self.visible()).to_vec()
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn next_page(&mut self) -> bool {
        self.pager.next()
    }

    pub fn previous_page(&mut self) -> bool {
        self.pager.previous()
    }

    pub fn go_to_page(&mut self, page: usize) -> bool {
        self.pager.go_to(page)
    }

    pub fn worker_name(&self, worker_id: &str) -> &str {
        self.workers
            .iter()
            .find(|w| w.id == worker_id)
            .map(|w| w.name.as_str())
            .unwrap_or("Unknown")
    }

    /// Looks up a loaded event by id, ignoring filters and search.
    pub fn event(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Whether moving event `id` to `status` is offered. Unknown ids are
    /// offered so the store can report them.
    pub fn offers(&self, id: &str, status: EventStatus) -> bool {
        self.event(id).is_none_or(|e| e.status.can_advance_to(status))
    }

    /// Offered only for new events.
    pub fn acknowledge(&mut self, id: &str, actor: &str) -> Navigation {
        self.advance(id, EventStatus::Acknowledged, actor)
    }

    /// Offered for new and acknowledged events.
    pub fn resolve(&mut self, id: &str, actor: &str) -> Navigation {
        self.advance(id, EventStatus::Resolved, actor)
    }

    fn advance(&mut self, id: &str, status: EventStatus, actor: &str) -> Navigation {
        if !self.offers(id, status) {
            if let Some(event) = self.event(id) {
                logging::debug(
                    Component::Events,
                    Some(&event.worker_id),
                    &format!("Event {} is {}; {} not offered", id, event.status.code(), status.code()),
                );
            }
            return Navigation::Stay;
        }
        self.set_status(id, status, actor)
    }

    /// Writes `status` through the store and patches the local copy.
    /// An id the store does not know redirects back to the event list.
    pub fn set_status(&mut self, id: &str, status: EventStatus, actor: &str) -> Navigation {
        match self.store.update_event_status(id, status, actor) {
            Ok(updated) => {
                if let Some(local) = self.events.iter_mut().find(|e| e.id == updated.id) {
                    *local = updated;
                }
                Navigation::Stay
            }
            Err(e @ HelmetError::EventNotFound(_)) => {
                logging::warn(Component::Events, None, &format!("{}; returning to event list", e));
                self.events.retain(|event| event.id != id);
                let visible = self.visible().len();
                self.pager.reset(visible);
                Navigation::Redirect(Route::Events)
            }
            Err(e) => {
                logging::log_failure(Component::Events, None, "update_event_status", &e);
                Navigation::Stay
            }
        }
    }

    /// Plain-text table of the current page.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let page = self.current_page();
        if page.is_empty() {
            out.push_str("No events match the current filters\n");
            return out;
        }

        for event in page {
            let _ = writeln!(
                out,
                "{:<5} {:<16} {:<17} {:<9} {:<13} {}",
                event.id,
                self.worker_name(&event.worker_id),
                event.event_type.label(),
                event.severity.label(),
                event.status.label(),
                event.timestamp.format("%Y-%m-%d %H:%M")
            );
        }
        if let Some((first, last, total)) = self.pager.showing() {
            let _ = writeln!(
                out,
                "Showing {} to {} of {} (page {}/{}){}",
                first,
                last,
                total,
                self.pager.current(),
                self.pager.total_pages(),
                if self.filter.is_empty() && self.search.is_empty() { "" } else { " filtered" }
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MonitorConfig;
    use crate::repository::Repository;

    fn history() -> EventHistory {
        let config = MonitorConfig {
            seed: Some(8),
            ..MonitorConfig::default()
        };
        let repo = Arc::new(Repository::seeded(&config));
        let mut view = EventHistory::new(repo.clone(), repo, 10);
        view.open();
        view
    }

    #[test]
    fn test_open_loads_all_seed_events() {
        let view = history();
        assert_eq!(view.visible().len(), 20);
        assert_eq!(view.pager().total_pages(), 2);
        assert_eq!(view.current_page().len(), 10);
    }

    #[test]
    fn test_search_resets_to_first_page() {
        let mut view = history();
        assert!(view.next_page());
        assert_eq!(view.pager().current(), 2);

        view.set_search("E1");
        assert_eq!(view.pager().current(), 1);
        // E1 and E10..E19; no name, helmet, type code or description contains "e1".
        assert_eq!(view.visible().len(), 11);
        assert!(view.visible().iter().all(|e| e.id.starts_with("E1")));
    }

    #[test]
    fn test_search_term_is_matched_as_typed() {
        let mut view = history();
        view.set_search(" ");
        assert_eq!(view.search(), " ");
        // Every search haystack has separating spaces.
        assert_eq!(view.visible().len(), 20);
        assert!(view.render().contains(" filtered"));

        view.set_search(" E1 ");
        assert!(view.visible().is_empty(), "ids start the haystack, no leading space");
    }

    #[test]
    fn test_status_filter_goes_through_store() {
        let mut view = history();
        view.apply_filters(EventFilter::default().with_status(EventStatus::New));
        assert!(view.visible().iter().all(|e| e.status == EventStatus::New));
        assert_eq!(view.filter().status, Some(EventStatus::New));

        view.reset_filters();
        assert_eq!(view.visible().len(), 20);
    }

    #[test]
    fn test_unknown_event_redirects_to_list() {
        let mut view = history();
        assert_eq!(view.resolve("E999", "John Supervisor"), Navigation::Redirect(Route::Events));
    }

    #[test]
    fn test_resolve_patches_local_copy() {
        let mut view = history();
        let open_id = view
            .visible()
            .iter()
            .find(|e| e.status != EventStatus::Resolved)
            .map(|e| e.id.clone())
            .expect("seed has an open event");

        assert_eq!(view.resolve(&open_id, "Dana Shift Lead"), Navigation::Stay);
        let resolved = view.visible().into_iter().find(|e| e.id == open_id).cloned().unwrap();
        assert_eq!(resolved.status, EventStatus::Resolved);
        assert_eq!(resolved.resolved_by.as_deref(), Some("Dana Shift Lead"));
        assert!(resolved.resolved_at.is_some());
    }

    #[test]
    fn test_offers_only_forward_moves() {
        let mut view = history();
        let new_id = view
            .visible()
            .iter()
            .find(|e| e.status == EventStatus::New)
            .map(|e| e.id.clone())
            .expect("seed has a new event");

        assert!(view.offers(&new_id, EventStatus::Acknowledged));
        assert_eq!(view.acknowledge(&new_id, "John Supervisor"), Navigation::Stay);
        assert_eq!(view.event(&new_id).map(|e| e.status), Some(EventStatus::Acknowledged));

        // A second acknowledge is not offered and leaves the event alone.
        assert!(!view.offers(&new_id, EventStatus::Acknowledged));
        assert_eq!(view.acknowledge(&new_id, "John Supervisor"), Navigation::Stay);
        assert_eq!(view.event(&new_id).map(|e| e.status), Some(EventStatus::Acknowledged));
        assert!(view.offers(&new_id, EventStatus::Resolved));

        assert!(view.offers("E999", EventStatus::Resolved));
    }

    #[test]
    fn test_acknowledge_not_offered_for_resolved() {
        let mut view = history();
        let Some(resolved_id) = view
            .visible()
            .iter()
            .find(|e| e.status == EventStatus::Resolved)
            .map(|e| e.id.clone())
        else {
            return;
        };
        assert_eq!(view.acknowledge(&resolved_id, "John Supervisor"), Navigation::Stay);
        let event = view.visible().into_iter().find(|e| e.id == resolved_id).cloned().unwrap();
        assert_eq!(event.status, EventStatus::Resolved);
    }
}
