use crate::domain::errors::{AnalysisError, AnalysisResult};

/// Arithmetic mean. None for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Percentile with linear interpolation between closest ranks.
///
/// `p` is a fraction in [0, 1]; None for an empty slice.
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;

    if lo == hi {
        return Some(sorted[lo]);
    }

    let weight = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * weight)
}

/// First and third quartiles. None for an empty slice.
pub fn quartiles(values: &[f64]) -> Option<(f64, f64)> {
    Some((percentile(values, 0.25)?, percentile(values, 0.75)?))
}

/// Mean as a fallible operation for callers that must report empty input.
pub fn mean_checked(values: &[f64], context: &str) -> AnalysisResult<f64> {
    mean(values).ok_or_else(|| AnalysisError::InsufficientData(context.to_string()))
}
