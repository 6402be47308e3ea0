//! Stats module - aggregations over the filtered dataset

pub mod summary;

pub use summary::CorrelationMatrix;
