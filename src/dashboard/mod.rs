//! Dashboard module
//!
//! Provides an overview page showing the current balance, income and
//! expense totals and a spending-patterns chart, with a button to re-read
//! the backend on demand.

pub(crate) mod aggregation;
mod charts;
mod handlers;

pub use handlers::{DashboardState, get_dashboard_page, post_refresh};
