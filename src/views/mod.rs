//! Screen-level state for the monitor.
//!
//! Submodules:
//! - `dashboard`: watched worker, live vitals, badges, alerts, trend chart.
//! - `profile`:   one worker's helmet, vitals and recent events.
//! - `events`:    filterable, searchable, paged event log with the
//!                 acknowledge/resolve workflow.
//! - `workers`:   worker directory with name or id search.
//!
//! Views hold no business rules of their own; they combine accessor data
//! with `alert` and `analysis` and decide where to navigate on failure.

pub mod dashboard;
pub mod events;
pub mod profile;
pub mod workers;

pub use dashboard::Dashboard;
pub use events::EventHistory;
pub use profile::{load_profile, ProfileOutcome, WorkerProfile};
pub use workers::WorkerDirectory;

use crate::session::User;

/// Navigation targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Events,
    Workers,
    WorkerProfile(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Events => "/events".to_string(),
            Route::Workers => "/workers".to_string(),
            Route::WorkerProfile(id) => format!("/workers/{}", id),
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

/// Where a navigation actually lands: protected routes need a session.
pub fn authorize(route: Route, user: Option<&User>) -> Route {
    if route.is_protected() && user.is_none() {
        Route::Login
    } else {
        route
    }
}

/// Result of a view action that may navigate away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    Redirect(Route),
}
