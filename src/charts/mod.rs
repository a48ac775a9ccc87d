//! Aggregated chart data for the expense tracker.
//!
//! This module contains:
//! - The aggregation functions that fold expenses into totals, category
//!   breakdowns, and timeline breakdowns
//! - The route handler that serves the chart data endpoint

pub(crate) mod aggregation;
mod chart_data_endpoint;

pub use chart_data_endpoint::chart_data_endpoint;
