//! Safety helmet monitoring core.
//!
//! Classifies worker vital signs, raises threshold alerts, and manages the
//! safety-event log behind accessor traits so the simulated feed can be
//! swapped for a real helmet integration.

pub mod alert;
pub mod analysis;
pub mod config;
pub mod feed;
pub mod logging;
pub mod model;
pub mod monitor;
pub mod repository;
pub mod session;
pub mod verify;
pub mod views;
pub mod workers;
