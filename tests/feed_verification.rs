//! Integration tests for the feed self-check
//!
//! These tests verify:
//! 1. The seeded repository passes every per-worker check
//! 2. Short or unordered histories and unknown helmets are partial
//! 3. A feed that cannot produce vitals fails per worker
//! 4. An unreadable directory fails the whole run
//!
//! Run with: cargo test --test feed_verification

use helmet_monitor::config::MonitorConfig;
use helmet_monitor::feed::DataFeed;
use helmet_monitor::model::{Helmet, HelmetError, VitalSample, Worker};
use helmet_monitor::repository::Repository;
use helmet_monitor::verify::{run_full_verification, verify_worker, VerificationStatus};
use helmet_monitor::workers::all_workers;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn seeded_repo() -> Repository {
    let config = MonitorConfig {
        seed: Some(5),
        ..MonitorConfig::default()
    };
    Repository::seeded(&config)
}

#[derive(Clone, Copy)]
enum Fault {
    ShortHistory,
    ReversedHistory,
    NoHelmets,
    NoVitals,
    NoDirectory,
}

/// Wraps the repository and injects one fault.
struct FaultyFeed {
    inner: Repository,
    fault: Fault,
}

impl DataFeed for FaultyFeed {
    fn list_workers(&self) -> Result<Vec<Worker>, HelmetError> {
        match self.fault {
            Fault::NoDirectory => Err(HelmetError::FeedUnavailable("directory offline".to_string())),
            _ => self.inner.list_workers(),
        }
    }
    fn get_worker(&self, id: &str) -> Result<Option<Worker>, HelmetError> {
        self.inner.get_worker(id)
    }
    fn get_helmet(&self, helmet_id: &str) -> Result<Option<Helmet>, HelmetError> {
        match self.fault {
            Fault::NoHelmets => Ok(None),
            _ => self.inner.get_helmet(helmet_id),
        }
    }
    fn current_vital(&self, worker_id: &str) -> Result<VitalSample, HelmetError> {
        match self.fault {
            Fault::NoVitals => Err(HelmetError::FeedUnavailable("sensor bus down".to_string())),
            _ => self.inner.current_vital(worker_id),
        }
    }
    fn vital_history(&self, worker_id: &str) -> Result<Vec<VitalSample>, HelmetError> {
        let mut history = self.inner.vital_history(worker_id)?;
        match self.fault {
            Fault::ShortHistory => history.truncate(12),
            Fault::ReversedHistory => history.reverse(),
            _ => {}
        }
        Ok(history)
    }
}

fn faulty(fault: Fault) -> FaultyFeed {
    FaultyFeed {
        inner: seeded_repo(),
        fault,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn test_seeded_repository_verifies_cleanly() {
    let repo = seeded_repo();
    let report = run_full_verification(&repo, 24).expect("directory readable");

    assert_eq!(report.summary.total, 4);
    assert_eq!(report.summary.working, 4);
    assert_eq!(report.summary.failed, 0);
    assert!(report
        .results
        .iter()
        .all(|r| r.status == VerificationStatus::Success));
}

#[test]
fn test_history_defects_are_partial() {
    let worker = &all_workers()[0];

    let short = verify_worker(&faulty(Fault::ShortHistory), worker, 24);
    assert_eq!(short.status, VerificationStatus::PartialSuccess);
    assert_eq!(short.history_len, 12);

    let reversed = verify_worker(&faulty(Fault::ReversedHistory), worker, 24);
    assert_eq!(reversed.status, VerificationStatus::PartialSuccess);
    assert!(!reversed.history_ordered);
}

#[test]
fn test_unknown_helmet_is_partial() {
    let worker = &all_workers()[1];
    let result = verify_worker(&faulty(Fault::NoHelmets), worker, 24);
    assert_eq!(result.status, VerificationStatus::PartialSuccess);
    assert!(!result.helmet_known);
}

#[test]
fn test_missing_vitals_fail_every_worker() {
    let report = run_full_verification(&faulty(Fault::NoVitals), 24).unwrap();
    assert_eq!(report.summary.failed, 4);
    assert_eq!(report.summary.working, 0);
    let message = report.results[0].error_message.as_deref().unwrap_or("");
    assert!(message.contains("sensor bus down"), "got {}", message);
}

#[test]
fn test_unreadable_directory_fails_run() {
    let err = run_full_verification(&faulty(Fault::NoDirectory), 24).unwrap_err();
    assert!(matches!(err, HelmetError::FeedUnavailable(_)));
}

#[test]
fn test_report_serializes_to_json() {
    let report = run_full_verification(&seeded_repo(), 24).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["summary"]["total"], 4);
    assert_eq!(json["results"][0]["worker_id"], "1");
    assert_eq!(json["results"][0]["status"], "Success");
}
