//! GUI module - User interface components

mod app;
mod charts;
mod dashboard;
mod sidebar;

pub use app::HometricsApp;
pub use dashboard::Dashboard;
pub use sidebar::{FilterAction, FilterPanel};
