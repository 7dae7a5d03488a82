// src/domain/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Implement From for common error types
impl From<String> for AppError {
    fn from(s: String) -> Self {
        AppError::Unknown(s)
    }
}

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read dataset file: {0}")]
    Read(String),

    #[error("Malformed CSV record: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid timestamp in column {column}: {value}")]
    InvalidTimestamp { column: String, value: String },

    #[error("Invalid amount in column {column}: {value}")]
    InvalidAmount { column: String, value: String },

    #[error("Dataset is empty: {0}")]
    Empty(String),
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: String, end: String },

    #[error("No data in selected range: {0}")]
    NoData(String),

    #[error("Insufficient data for analysis: {0}")]
    InsufficientData(String),
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
pub type DatasetResult<T> = Result<T, DatasetError>;
pub type AnalysisResult<T> = Result<T, AnalysisError>;
