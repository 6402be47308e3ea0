//! Data module - dataset loading and filtering

pub mod filter;
pub mod loader;

pub use filter::{apply, ConstraintSet, FilterOptions};
pub use loader::{load_cached, LoadError};
