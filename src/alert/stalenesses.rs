//! Helmet data staleness detection.
//!
//! Helmets push a fresh sample on every poll under normal conditions. A
//! helmet that stops reporting (flat battery, out of range) keeps showing
//! its last sample on the dashboard, which is dangerous because it looks
//! healthy. This module flags those gaps.
//!
//! # Clock injection
//! All functions accept a `now: DateTime<Utc>` parameter rather than calling
//! `Utc::now()` internally. This makes staleness purely deterministic in
//! tests without mocking or time manipulation.

use chrono::{DateTime, Utc};

use crate::model::{Helmet, VitalSample};

// ---------------------------------------------------------------------------
// Staleness check
// ---------------------------------------------------------------------------

/// Age of an instant relative to `now`, in whole seconds.
///
/// Negative when the instant lies in the future (clock skew on the helmet).
pub fn age_seconds(at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - at).num_seconds()
}

/// Returns `true` if the sample is older than `max_age_secs` relative to
/// `now`.
///
/// Staleness is defined as strictly greater than the threshold:
///   age > max_age_secs  →  stale
///   age == max_age_secs →  not stale
///
/// Samples stamped in the future are never stale.
pub fn is_stale_at(sample: &VitalSample, max_age_secs: u64, now: DateTime<Utc>) -> bool {
    exceeds(age_seconds(sample.timestamp, now), max_age_secs)
}

/// Convenience wrapper that uses the real current time.
/// Use `is_stale_at` in tests to keep them deterministic.
pub fn is_stale(sample: &VitalSample, max_age_secs: u64) -> bool {
    is_stale_at(sample, max_age_secs, Utc::now())
}

/// Whether the helmet's last connection is older than `max_age_secs`.
pub fn helmet_is_disconnected_at(helmet: &Helmet, max_age_secs: u64, now: DateTime<Utc>) -> bool {
    exceeds(age_seconds(helmet.last_connected, now), max_age_secs)
}

fn exceeds(age: i64, max_age_secs: u64) -> bool {
    age > 0 && age as u64 > max_age_secs
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
