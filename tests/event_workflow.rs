//! Integration tests for the event log workflow
//!
//! These tests verify:
//! 1. Pagination over a 23-event log (10 per page, last page partial)
//! 2. Structured filters through the store combined with local search
//! 3. Acknowledge / resolve transitions and the resolved-fields invariant
//! 4. Unknown event ids redirect back to the event list
//!
//! Run with: cargo test --test event_workflow

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use helmet_monitor::analysis::filter::{parse_day, EventFilter};
use helmet_monitor::config::MonitorConfig;
use helmet_monitor::feed::simulated::{event_description, VitalGenerator};
use helmet_monitor::feed::EventStore;
use helmet_monitor::model::{Event, EventStatus, EventType, Severity};
use helmet_monitor::repository::Repository;
use helmet_monitor::views::{EventHistory, Navigation, Route};
use helmet_monitor::workers::all_workers;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
}

/// 23 events, E1 newest, one every 6 hours going back, cycling through
/// workers, types and statuses.
fn log_of_23() -> Vec<Event> {
    let workers = all_workers();
    (0..23)
        .map(|i| {
            let worker = &workers[i % workers.len()];
            let event_type = EventType::ALL[i % EventType::ALL.len()];
            let status = EventStatus::ALL[i % EventStatus::ALL.len()];
            let timestamp = fixed_now() - Duration::hours(6 * i as i64);
            let resolved = status == EventStatus::Resolved;
            Event {
                id: format!("E{}", i + 1),
                worker_id: worker.id.clone(),
                helmet_id: worker.helmet_id.clone(),
                event_type,
                severity: Severity::ALL[i % Severity::ALL.len()],
                status,
                timestamp,
                description: event_description(event_type).to_string(),
                resolved_at: resolved.then(|| timestamp + Duration::minutes(30)),
                resolved_by: resolved.then(|| "John Supervisor".to_string()),
            }
        })
        .collect()
}

fn repo() -> Arc<Repository> {
    Arc::new(Repository::new(
        all_workers(),
        log_of_23(),
        VitalGenerator::seeded(2),
        &MonitorConfig::default(),
        fixed_now(),
    ))
}

fn open_history(repo: &Arc<Repository>) -> EventHistory {
    let mut history = EventHistory::new(repo.clone(), repo.clone(), 10);
    history.open();
    history
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

#[test]
fn test_twenty_three_events_paginate_into_three_pages() {
    let repo = repo();
    let mut history = open_history(&repo);

    assert_eq!(history.pager().total_pages(), 3);
    assert_eq!(history.current_page().len(), 10);
    assert_eq!(history.current_page()[0].id, "E1", "newest first");

    assert!(history.go_to_page(3));
    let last = history.current_page();
    assert_eq!(last.len(), 3);
    assert_eq!(last.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(), ["E21", "E22", "E23"]);
    assert_eq!(history.pager().showing(), Some((21, 23, 23)));

    assert!(!history.go_to_page(4), "page 4 does not exist");
    assert!(!history.next_page());
    assert_eq!(history.pager().current(), 3);
}

#[test]
fn test_render_shows_range_line() {
    let repo = repo();
    let mut history = open_history(&repo);
    assert!(history.next_page());
    let text = history.render();
    assert!(text.contains("Showing 11 to 20 of 23 (page 2/3)"), "got:\n{}", text);
}

// ---------------------------------------------------------------------------
// Filtering and search
// ---------------------------------------------------------------------------

#[test]
fn test_worker_and_date_filters_through_store() {
    let repo = repo();
    let mut history = open_history(&repo);

    // E1..E7 fall on 2024-06-09 and 2024-06-10; worker 1 owns E1 and E5.
    let filter = EventFilter::for_worker("1")
        .from_day(parse_day("2024-06-09").unwrap())
        .to_day(parse_day("2024-06-10").unwrap());
    history.apply_filters(filter);

    let ids: Vec<&str> = history.visible().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["E1", "E5"]);
}

#[test]
fn test_search_matches_worker_name_case_insensitively() {
    let repo = repo();
    let mut history = open_history(&repo);
    history.set_search("MARIA");

    let visible = history.visible();
    assert_eq!(visible.len(), 6, "worker 2 owns E2, E6, E10, E14, E18, E22");
    assert!(visible.iter().all(|e| e.worker_id == "2"));
    assert_eq!(history.pager().total_pages(), 1);
}

#[test]
fn test_search_and_status_filter_combine() {
    let repo = repo();
    let mut history = open_history(&repo);
    history.apply_filters(EventFilter::default().with_status(EventStatus::New));
    history.set_search("fall");

    assert!(history
        .visible()
        .iter()
        .all(|e| e.status == EventStatus::New && e.event_type == EventType::FallDetected));
    assert!(!history.visible().is_empty());
}

#[test]
fn test_empty_result_renders_message() {
    let repo = repo();
    let mut history = open_history(&repo);
    history.set_search("no such thing");
    assert_eq!(history.pager().total_pages(), 0);
    assert_eq!(history.render(), "No events match the current filters\n");
}

// ---------------------------------------------------------------------------
// Status workflow
// ---------------------------------------------------------------------------

#[test]
fn test_acknowledge_then_resolve() {
    let repo = repo();
    let mut history = open_history(&repo);

    // E1 is new (index 0).
    assert_eq!(history.acknowledge("E1", "Dana Shift Lead"), Navigation::Stay);
    assert_eq!(history.resolve("E1", "Dana Shift Lead"), Navigation::Stay);

    let stored = repo.list_events(None).unwrap();
    let e1 = stored.iter().find(|e| e.id == "E1").unwrap();
    assert_eq!(e1.status, EventStatus::Resolved);
    assert_eq!(e1.resolved_by.as_deref(), Some("Dana Shift Lead"));
    assert!(e1.resolved_at.is_some());
}

#[test]
fn test_resolved_fields_present_iff_resolved() {
    let repo = repo();
    let mut history = open_history(&repo);
    history.set_status("E3", EventStatus::New, "John Supervisor");
    history.set_status("E4", EventStatus::Resolved, "John Supervisor");

    for event in repo.list_events(None).unwrap() {
        let resolved = event.status == EventStatus::Resolved;
        assert_eq!(event.resolved_at.is_some(), resolved, "{}", event.id);
        assert_eq!(event.resolved_by.is_some(), resolved, "{}", event.id);
    }
}

#[test]
fn test_unknown_event_redirects_to_event_list() {
    let repo = repo();
    let mut history = open_history(&repo);
    assert_eq!(
        history.set_status("E404", EventStatus::Acknowledged, "John Supervisor"),
        Navigation::Redirect(Route::Events)
    );
    assert_eq!(history.visible().len(), 23);
}
