use chrono::Datelike;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};

use crate::analysis::filters::filter_by_range;
use crate::domain::errors::{AnalysisError, AnalysisResult};
use crate::domain::models::{DateRange, MonthlyStat, Order, TrendSummary};

#[derive(Default)]
struct MonthAcc {
    revenue: Decimal,
    order_ids: HashSet<String>,
}

/// Order count and revenue per calendar month, with month-over-month
/// percentage changes.
///
/// Months are keyed and sorted numerically by (year, month), never by the
/// rendered label. Order counts are distinct order ids, so multi-payment
/// orders count once. The first month of the result has no predecessor and
/// carries no percentage change.
pub fn compute_monthly_trends(
    orders: &[Order],
    range: &DateRange,
) -> AnalysisResult<Vec<MonthlyStat>> {
    let in_range = filter_by_range(orders, range);
    if in_range.is_empty() {
        return Err(AnalysisError::NoData(format!("no orders in {}", range)));
    }

    let mut months: BTreeMap<(i32, u32), MonthAcc> = BTreeMap::new();
    for order in in_range {
        let key = (order.purchase_ts.year(), order.purchase_ts.month());
        let acc = months.entry(key).or_default();
        acc.revenue += order.payment_value;
        acc.order_ids.insert(order.order_id);
    }

    let mut result = Vec::with_capacity(months.len());
    let mut prev: Option<(Decimal, u64)> = None;

    for ((year, month), acc) in months {
        let total_orders = acc.order_ids.len() as u64;

        let (revenue_pct_change, orders_pct_change) = match prev {
            Some((prev_revenue, prev_orders)) => (
                Some(pct_change(
                    prev_revenue.to_f64().unwrap_or_default(),
                    acc.revenue.to_f64().unwrap_or_default(),
                )),
                Some(pct_change(prev_orders as f64, total_orders as f64)),
            ),
            None => (None, None),
        };

        prev = Some((acc.revenue, total_orders));
        result.push(MonthlyStat {
            year,
            month,
            total_orders,
            total_revenue: acc.revenue,
            revenue_pct_change,
            orders_pct_change,
        });
    }

    Ok(result)
}

fn pct_change(prev: f64, curr: f64) -> f64 {
    (curr - prev) / prev * 100.0
}

/// Headline figures over a monthly trend result.
pub fn summarize(stats: &[MonthlyStat]) -> AnalysisResult<TrendSummary> {
    if stats.is_empty() {
        return Err(AnalysisError::InsufficientData(
            "trend summary over an empty result".to_string(),
        ));
    }

    // max_by_key keeps the last maximum; reverse iteration resolves ties
    // to the earliest month.
    let peak_revenue = stats
        .iter()
        .rev()
        .max_by_key(|s| s.total_revenue)
        .expect("non-empty result");
    let peak_orders = stats
        .iter()
        .rev()
        .max_by_key(|s| s.total_orders)
        .expect("non-empty result");

    let total_revenue: Decimal = stats.iter().map(|s| s.total_revenue).sum();
    let total_orders: u64 = stats.iter().map(|s| s.total_orders).sum();

    Ok(TrendSummary {
        peak_revenue_month: peak_revenue.label(),
        peak_revenue: peak_revenue.total_revenue,
        peak_orders_month: peak_orders.label(),
        peak_orders: peak_orders.total_orders,
        avg_revenue_per_order: total_revenue / Decimal::from(total_orders),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn order(order_id: &str, year: i32, month: u32, day: u32, value: Decimal) -> Order {
        Order {
            order_id: order_id.to_string(),
            customer_id: "c1".to_string(),
            purchase_ts: NaiveDate::from_ymd_opt(year, month, day)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            delivered_ts: None,
            payment_type: "boleto".to_string(),
            payment_value: value,
        }
    }

    fn range(start: (i32, u32, u32), end: (i32, u32, u32)) -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn aggregates_revenue_and_distinct_orders_per_month() {
        let orders = vec![
            order("o1", 2021, 1, 5, dec!(600.00)),
            order("o1", 2021, 1, 5, dec!(400.00)),
            order("o2", 2021, 2, 10, dec!(1500.00)),
        ];

        let stats =
            compute_monthly_trends(&orders, &range((2021, 1, 1), (2021, 2, 28))).unwrap();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].label(), "2021-01");
        assert_eq!(stats[0].total_orders, 1);
        assert_eq!(stats[0].total_revenue, dec!(1000.00));
        assert_eq!(stats[1].total_orders, 1);
        assert_eq!(stats[1].total_revenue, dec!(1500.00));
    }

    #[test]
    fn first_month_has_no_pct_change() {
        let orders = vec![order("o1", 2021, 1, 5, dec!(100.00))];
        let stats =
            compute_monthly_trends(&orders, &range((2021, 1, 1), (2021, 1, 31))).unwrap();

        assert_eq!(stats[0].revenue_pct_change, None);
        assert_eq!(stats[0].orders_pct_change, None);
    }

    #[test]
    fn pct_change_is_relative_to_previous_month() {
        let orders = vec![
            order("o1", 2021, 1, 5, dec!(1000.00)),
            order("o2", 2021, 2, 5, dec!(750.00)),
            order("o3", 2021, 2, 6, dec!(750.00)),
        ];

        let stats =
            compute_monthly_trends(&orders, &range((2021, 1, 1), (2021, 2, 28))).unwrap();

        assert_eq!(stats[1].revenue_pct_change, Some(50.0));
        assert_eq!(stats[1].orders_pct_change, Some(100.0));
    }

    #[test]
    fn months_sort_numerically_across_the_year() {
        let orders = vec![
            order("o1", 2021, 10, 1, dec!(10.00)),
            order("o2", 2021, 2, 1, dec!(10.00)),
            order("o3", 2022, 1, 1, dec!(10.00)),
        ];

        let stats =
            compute_monthly_trends(&orders, &range((2021, 1, 1), (2022, 12, 31))).unwrap();

        let labels: Vec<String> = stats.iter().map(|s| s.label()).collect();
        assert_eq!(labels, vec!["2021-02", "2021-10", "2022-01"]);
    }

    #[test]
    fn empty_range_is_an_explicit_no_data_error() {
        let orders = vec![order("o1", 2021, 1, 5, dec!(10.00))];
        let result = compute_monthly_trends(&orders, &range((2019, 1, 1), (2019, 12, 31)));

        assert!(matches!(result, Err(AnalysisError::NoData(_))));
    }

    #[test]
    fn summary_reports_peaks_and_revenue_per_order() {
        let orders = vec![
            order("o1", 2021, 1, 5, dec!(1000.00)),
            order("o2", 2021, 2, 5, dec!(200.00)),
            order("o3", 2021, 2, 6, dec!(300.00)),
        ];

        let stats =
            compute_monthly_trends(&orders, &range((2021, 1, 1), (2021, 2, 28))).unwrap();
        let summary = summarize(&stats).unwrap();

        assert_eq!(summary.peak_revenue_month, "2021-01");
        assert_eq!(summary.peak_revenue, dec!(1000.00));
        assert_eq!(summary.peak_orders_month, "2021-02");
        assert_eq!(summary.peak_orders, 2);
        assert_eq!(summary.avg_revenue_per_order, dec!(500.00));
    }
}
