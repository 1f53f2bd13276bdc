//! Threshold logic for helmet readings.
//!
//! Submodules:
//! - `classify`:    per-signal status badges (normal / warning / critical).
//! - `evaluate`:    cross-signal alert banners for a single sample.
//! - `stalenesses`: detects helmets that have stopped reporting.
//!
//! `classify` and `evaluate` keep separate threshold tables on purpose;
//! alerts only fire on the dangerous side of a subset of signals.

pub mod classify;
pub mod evaluate;
pub mod stalenesses;

pub use classify::{classify, classify_motion, classify_sample, Classification, SignalKind, StatusLevel};
pub use evaluate::{evaluate, Alert, AlertKind};
