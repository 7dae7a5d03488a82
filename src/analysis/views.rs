use chrono::{Datelike, Weekday};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::analysis::outliers::remove_outliers;
use crate::analysis::stats;
use crate::domain::errors::{AnalysisError, AnalysisResult};
use crate::domain::models::{
    DeliveryStats, Order, PaymentTypeAverage, PaymentTypeCount, WeekdayCount,
};

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Payment-row counts per payment method, most used first.
pub fn payment_type_distribution(orders: &[Order]) -> Vec<PaymentTypeCount> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for order in orders {
        *counts.entry(order.payment_type.as_str()).or_default() += 1;
    }

    let mut result: Vec<PaymentTypeCount> = counts
        .into_iter()
        .map(|(payment_type, rows)| PaymentTypeCount {
            payment_type: payment_type.to_string(),
            rows,
        })
        .collect();

    // Stable sort; ties stay in name order.
    result.sort_by(|a, b| b.rows.cmp(&a.rows));
    result
}

/// Mean payment value per payment method, sorted by method name.
pub fn avg_transaction_by_payment_type(orders: &[Order]) -> Vec<PaymentTypeAverage> {
    let mut groups: BTreeMap<&str, (Decimal, u64)> = BTreeMap::new();
    for order in orders {
        let (sum, n) = groups.entry(order.payment_type.as_str()).or_default();
        *sum += order.payment_value;
        *n += 1;
    }

    groups
        .into_iter()
        .map(|(payment_type, (sum, n))| PaymentTypeAverage {
            payment_type: payment_type.to_string(),
            avg_value: sum / Decimal::from(n),
        })
        .collect()
}

/// Payment-row counts per purchase weekday, Monday first. Every weekday is
/// present even when its count is zero.
pub fn orders_by_weekday(orders: &[Order]) -> Vec<WeekdayCount> {
    let mut counts = [0u64; 7];
    for order in orders {
        counts[order.purchase_ts.weekday().num_days_from_monday() as usize] += 1;
    }

    WEEK.iter()
        .map(|&weekday| WeekdayCount {
            weekday,
            rows: counts[weekday.num_days_from_monday() as usize],
        })
        .collect()
}

/// Delivery durations in whole days, IQR-trimmed, with their mean.
///
/// Orders without a delivery timestamp are excluded by filtering, never
/// zero-filled.
pub fn delivery_time_stats(orders: &[Order]) -> AnalysisResult<DeliveryStats> {
    let durations: Vec<i64> = orders
        .iter()
        .filter_map(|order| order.delivery_days())
        .collect();

    if durations.is_empty() {
        return Err(AnalysisError::NoData(
            "no delivered orders in range".to_string(),
        ));
    }

    let trimmed = remove_outliers(&durations, |days| *days as f64);
    let values: Vec<f64> = trimmed.iter().map(|days| *days as f64).collect();
    let avg_days = stats::mean_checked(&values, "delivery durations after trimming")?;

    Ok(DeliveryStats {
        durations_days: trimmed,
        avg_days,
    })
}
