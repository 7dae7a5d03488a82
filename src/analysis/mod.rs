// src/analysis/mod.rs
pub mod filters;
pub mod outliers;
pub mod rfm;
pub mod stats;
pub mod trends;
pub mod views;

// Re-export the aggregation entry points for convenience
pub use filters::filter_by_range;
pub use outliers::remove_outliers;
pub use rfm::compute_rfm;
pub use trends::compute_monthly_trends;
