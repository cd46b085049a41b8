//! Reports: monthly totals for a year, the trend of a category over the last
//! six months and a comparison of a month with the month before.

mod aggregation;
mod charts;
mod handlers;
mod tables;

pub use handlers::{ReportsState, get_reports_page};
