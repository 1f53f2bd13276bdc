//! Data organization utilities for the helmet monitoring service.
//!
//! This module provides the client-side shaping the views apply to data
//! they have already fetched. Nothing here talks to an accessor.
//!
//! Submodules:
//! - `filter`: AND-combined event filters and free-text search.
//! - `pager`:  fixed-size, 1-indexed pagination.
//! - `chart`:  vital history reshaped into chart series and summaries.

pub mod chart;
pub mod filter;
pub mod pager;
