//! The dashboard: an overview of one month of the ledger.

mod aggregation;
mod cards;
mod charts;
mod handlers;
mod tables;

pub use aggregation::{CategoryTotal, category_breakdown};
pub use handlers::{DashboardState, get_dashboard_page};
