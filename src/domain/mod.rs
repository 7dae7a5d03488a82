// src/domain/mod.rs
pub mod errors;
pub mod models;

// Re-export common types for convenience
pub use errors::{
    AnalysisError, AnalysisResult, AppError, AppResult, DatasetError, DatasetResult,
};
pub use models::{
    AnalysisView, DateRange, DeliveryStats, MonthlyStat, Order, PaymentTypeAverage,
    PaymentTypeCount, RfmRecord, RfmSummary, TrendSummary, WeekdayCount,
};
