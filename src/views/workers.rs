//! Worker directory: every worker with their helmet, searchable by name
//! or id.

use std::fmt::Write as _;
use std::sync::Arc;

use crate::feed::DataFeed;
use crate::logging::{self, Component};
use crate::model::{Helmet, Worker};
use crate::views::Route;

pub struct WorkerDirectory {
    feed: Arc<dyn DataFeed>,
    workers: Vec<Worker>,
    helmets: Vec<Helmet>,
    search: String,
}

impl WorkerDirectory {
    pub fn new(feed: Arc<dyn DataFeed>) -> Self {
        WorkerDirectory {
            feed,
            workers: Vec::new(),
            helmets: Vec::new(),
            search: String::new(),
        }
    }

    /// Loads the directory and each worker's helmet. A helmet that cannot
    /// be read shows as "unknown".
    pub fn open(&mut self) {
        match self.feed.list_workers() {
            Ok(workers) => self.workers = workers,
            Err(e) => {
                logging::log_failure(Component::Feed, None, "list_workers", &e);
                return;
            }
        }

        self.helmets = self
            .workers
            .iter()
            .filter_map(|w| match self.feed.get_helmet(&w.helmet_id) {
                Ok(helmet) => helmet,
                Err(e) => {
                    logging::log_failure(Component::Feed, Some(&w.id), "get_helmet", &e);
                    None
                }
            })
            .collect();
    }

    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Workers whose name or id contains the search term, ignoring case.
    /// Directory order is preserved.
    pub fn visible(&self) -> Vec<&Worker> {
        let term = self.search.to_lowercase();
        self.workers
            .iter()
            .filter(|w| w.name.to_lowercase().contains(&term) || w.id.to_lowercase().contains(&term))
            .collect()
    }

    pub fn helmet_of(&self, worker: &Worker) -> Option<&Helmet> {
        self.helmets.iter().find(|h| h.id == worker.helmet_id)
    }

    /// Plain-text table with each worker's profile route.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let visible = self.visible();
        if visible.is_empty() {
            out.push_str("No workers match the search\n");
            return out;
        }

        for worker in &visible {
            let status = self
                .helmet_of(worker)
                .map(|h| format!("{:?}", h.status).to_lowercase())
                .unwrap_or_else(|| "unknown".to_string());
            let _ = writeln!(
                out,
                "{:<16} {:<4} {:<12} {:<9} {:<5} {}",
                worker.name,
                worker.id,
                worker.department,
                status,
                worker.helmet_id,
                Route::WorkerProfile(worker.id.clone()).path()
            );
        }
        let _ = writeln!(out, "{} of {} workers", visible.len(), self.workers.len());
        out
    }
}
