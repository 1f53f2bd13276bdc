//! Data Feed Verification Module
//!
//! Walks every worker in the directory and checks that the configured data
//! feed answers each accessor sensibly: the worker resolves by id, the
//! helmet is known, a current sample can be read and the history window has
//! the expected length and ordering.
//!
//! Use this before pointing the monitor at a new feed implementation.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::feed::DataFeed;
use crate::logging;
use crate::model::{HelmetError, Worker};

// ============================================================================
// Verification Results
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub timestamp: String,
    pub results: Vec<WorkerVerification>,
    pub summary: VerificationSummary,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationSummary {
    pub total: usize,
    pub working: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerVerification {
    pub worker_id: String,
    pub name: String,
    pub status: VerificationStatus,
    pub worker_resolvable: bool,
    pub helmet_known: bool,
    pub current_sample_ok: bool,
    pub history_len: usize,
    pub history_expected: usize,
    pub history_ordered: bool,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum VerificationStatus {
    Success,
    PartialSuccess,
    Failed,
}

// ============================================================================
// Per-worker Verification
// ============================================================================

pub fn verify_worker(feed: &dyn DataFeed, worker: &Worker, expected_window: usize) -> WorkerVerification {
    let mut result = WorkerVerification {
        worker_id: worker.id.clone(),
        name: worker.name.clone(),
        status: VerificationStatus::Failed,
        worker_resolvable: false,
        helmet_known: false,
        current_sample_ok: false,
        history_len: 0,
        history_expected: expected_window,
        history_ordered: false,
        error_message: None,
    };

    // Test 1: worker resolves by id
    match feed.get_worker(&worker.id) {
        Ok(Some(found)) => result.worker_resolvable = found == *worker,
        Ok(None) => result.error_message = Some(format!("get_worker({}) returned nothing", worker.id)),
        Err(e) => result.error_message = Some(format!("get_worker failed: {}", e)),
    }

    // Test 2: helmet is issued and points back at the worker
    match feed.get_helmet(&worker.helmet_id) {
        Ok(Some(helmet)) => result.helmet_known = helmet.worker_id == worker.id,
        Ok(None) => {}
        Err(e) => {
            result.error_message.get_or_insert(format!("get_helmet failed: {}", e));
        }
    }

    // Test 3: current sample belongs to this worker
    match feed.current_vital(&worker.id) {
        Ok(sample) => result.current_sample_ok = sample.worker_id == worker.id,
        Err(e) => {
            result.error_message.get_or_insert(format!("current_vital failed: {}", e));
        }
    }

    // Test 4: history window length and ordering
    match feed.vital_history(&worker.id) {
        Ok(history) => {
            result.history_len = history.len();
            result.history_ordered = history.windows(2).all(|w| w[0].timestamp <= w[1].timestamp);
        }
        Err(e) => {
            result.error_message.get_or_insert(format!("vital_history failed: {}", e));
        }
    }

    // Determine status
    if result.worker_resolvable && result.current_sample_ok {
        let history_ok = result.history_len == expected_window && result.history_ordered;
        result.status = if result.helmet_known && history_ok {
            VerificationStatus::Success
        } else {
            VerificationStatus::PartialSuccess
        };
    }

    result
}

// ============================================================================
// Full Verification Runner
// ============================================================================

/// Verifies every worker the feed lists. Fails only if the directory itself
/// cannot be read.
pub fn run_full_verification(
    feed: &dyn DataFeed,
    expected_window: usize,
) -> Result<VerificationReport, HelmetError> {
    let workers = feed.list_workers()?;

    let mut report = VerificationReport {
        timestamp: Utc::now().to_rfc3339(),
        results: Vec::new(),
        summary: VerificationSummary {
            total: workers.len(),
            ..VerificationSummary::default()
        },
    };

    for worker in &workers {
        let result = verify_worker(feed, worker, expected_window);
        match result.status {
            VerificationStatus::Success | VerificationStatus::PartialSuccess => report.summary.working += 1,
            VerificationStatus::Failed => report.summary.failed += 1,
        }
        report.results.push(result);
    }

    logging::log_verification_summary(report.summary.total, report.summary.working, report.summary.failed);
    Ok(report)
}

pub fn print_summary(report: &VerificationReport) {
    println!("\n═══════════════════════════════════════════════════════════");
    println!("VERIFICATION SUMMARY");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for result in &report.results {
        match result.status {
            VerificationStatus::Success => {
                println!("  ✓ {} ({}) OK, {} history samples", result.worker_id, result.name, result.history_len);
            }
            VerificationStatus::PartialSuccess => {
                println!(
                    "  ⚠ {} ({}) partial: helmet known={}, history {}/{} ordered={}",
                    result.worker_id,
                    result.name,
                    result.helmet_known,
                    result.history_len,
                    result.history_expected,
                    result.history_ordered
                );
            }
            VerificationStatus::Failed => {
                println!(
                    "  ✗ {} ({}) FAILED: {}",
                    result.worker_id,
                    result.name,
                    result.error_message.as_deref().unwrap_or("Unknown")
                );
            }
        }
    }

    println!();
    let success_rate = if report.summary.total > 0 {
        (report.summary.working as f64 / report.summary.total as f64) * 100.0
    } else {
        0.0
    };
    println!(
        "Workers: {}/{} working ({} failed), {:.1}%",
        report.summary.working, report.summary.total, report.summary.failed, success_rate
    );
    println!("═══════════════════════════════════════════════════════════");
}
