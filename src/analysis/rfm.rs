use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};

use crate::analysis::filters::filter_by_range;
use crate::domain::errors::{AnalysisError, AnalysisResult};
use crate::domain::models::{DateRange, Order, RfmRecord, RfmSummary};

struct CustomerAcc {
    last_purchase: NaiveDateTime,
    order_ids: HashSet<String>,
    monetary: Decimal,
}

/// RFM (Recency, Frequency, Monetary) per customer over the selected range.
///
/// Recency counts whole days from the customer's latest purchase to the
/// range end, which serves as the reference date so a re-run over the same
/// historical range reproduces the same numbers. Frequency counts distinct
/// order ids, so orders paid in several line-items count once. Customers
/// with no orders in range are absent from the result.
pub fn compute_rfm(orders: &[Order], range: &DateRange) -> AnalysisResult<Vec<RfmRecord>> {
    let in_range = filter_by_range(orders, range);
    if in_range.is_empty() {
        return Err(AnalysisError::NoData(format!("no orders in {}", range)));
    }

    let mut groups: BTreeMap<String, CustomerAcc> = BTreeMap::new();
    for order in in_range {
        let acc = groups
            .entry(order.customer_id.clone())
            .or_insert_with(|| CustomerAcc {
                last_purchase: order.purchase_ts,
                order_ids: HashSet::new(),
                monetary: Decimal::ZERO,
            });
        acc.last_purchase = acc.last_purchase.max(order.purchase_ts);
        acc.order_ids.insert(order.order_id);
        acc.monetary += order.payment_value;
    }

    // BTreeMap iteration keeps the output sorted by customer id.
    Ok(groups
        .into_iter()
        .map(|(customer_id, acc)| RfmRecord {
            customer_id,
            recency_days: (range.end() - acc.last_purchase).num_days(),
            frequency: acc.order_ids.len() as u64,
            monetary: acc.monetary,
        })
        .collect())
}

/// Metric means over an RFM result set.
pub fn summarize(records: &[RfmRecord]) -> AnalysisResult<RfmSummary> {
    if records.is_empty() {
        return Err(AnalysisError::InsufficientData(
            "RFM summary over an empty result".to_string(),
        ));
    }

    let customers = records.len();
    let avg_recency_days =
        records.iter().map(|r| r.recency_days as f64).sum::<f64>() / customers as f64;
    let avg_frequency = records.iter().map(|r| r.frequency as f64).sum::<f64>() / customers as f64;
    let total_monetary: Decimal = records.iter().map(|r| r.monetary).sum();

    Ok(RfmSummary {
        customers,
        avg_recency_days,
        avg_frequency,
        avg_monetary: total_monetary / Decimal::from(customers as u64),
    })
}

/// Customers with the highest recency (longest since their last purchase).
pub fn top_by_recency(records: &[RfmRecord], n: usize) -> Vec<RfmRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.recency_days.cmp(&a.recency_days));
    sorted.truncate(n);
    sorted
}

/// Customers with the most orders in range.
pub fn top_by_frequency(records: &[RfmRecord], n: usize) -> Vec<RfmRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    sorted.truncate(n);
    sorted
}

/// Customers with the highest spend in range.
pub fn top_by_monetary(records: &[RfmRecord], n: usize) -> Vec<RfmRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.monetary.cmp(&a.monetary));
    sorted.truncate(n);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn order(customer: &str, order_id: &str, day: u32, value: Decimal) -> Order {
        Order {
            order_id: order_id.to_string(),
            customer_id: customer.to_string(),
            purchase_ts: NaiveDate::from_ymd_opt(2021, 1, day)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            delivered_ts: None,
            payment_type: "credit_card".to_string(),
            payment_value: value,
        }
    }

    fn january() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2021, 1, 31).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn computes_rfm_per_customer() {
        let orders = vec![
            order("A", "o1", 5, dec!(100.00)),
            order("A", "o2", 20, dec!(50.00)),
            order("B", "o3", 10, dec!(200.00)),
        ];

        let records = compute_rfm(&orders, &january()).unwrap();
        assert_eq!(records.len(), 2);

        let a = &records[0];
        assert_eq!(a.customer_id, "A");
        assert_eq!(a.recency_days, 11);
        assert_eq!(a.frequency, 2);
        assert_eq!(a.monetary, dec!(150.00));

        let b = &records[1];
        assert_eq!(b.customer_id, "B");
        assert_eq!(b.recency_days, 21);
        assert_eq!(b.frequency, 1);
        assert_eq!(b.monetary, dec!(200.00));
    }

    #[test]
    fn purchase_on_end_date_has_zero_recency() {
        let orders = vec![order("A", "o1", 31, dec!(10.00))];
        let records = compute_rfm(&orders, &january()).unwrap();
        assert_eq!(records[0].recency_days, 0);
    }

    #[test]
    fn frequency_counts_distinct_orders_not_payment_rows() {
        // One order paid in three installments.
        let orders = vec![
            order("A", "o1", 5, dec!(30.00)),
            order("A", "o1", 5, dec!(30.00)),
            order("A", "o1", 5, dec!(40.00)),
            order("A", "o2", 8, dec!(15.00)),
        ];

        let records = compute_rfm(&orders, &january()).unwrap();
        assert_eq!(records[0].frequency, 2);
        assert_eq!(records[0].monetary, dec!(100.00));
    }

    #[test]
    fn frequency_sum_matches_distinct_orders_in_range() {
        let orders = vec![
            order("A", "o1", 3, dec!(10.00)),
            order("A", "o1", 3, dec!(10.00)),
            order("B", "o2", 7, dec!(20.00)),
            order("C", "o3", 9, dec!(30.00)),
        ];

        let records = compute_rfm(&orders, &january()).unwrap();
        let total_frequency: u64 = records.iter().map(|r| r.frequency).sum();
        assert_eq!(total_frequency, 3);
    }

    #[test]
    fn metrics_are_non_negative() {
        let orders = vec![
            order("A", "o1", 1, dec!(0.00)),
            order("B", "o2", 31, dec!(12.34)),
        ];

        for record in compute_rfm(&orders, &january()).unwrap() {
            assert!(record.recency_days >= 0);
            assert!(record.frequency >= 1);
            assert!(record.monetary >= dec!(0));
        }
    }

    #[test]
    fn empty_range_is_an_explicit_no_data_error() {
        let orders = vec![order("A", "o1", 5, dec!(10.00))];
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2022, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2022, 6, 30).unwrap(),
        )
        .unwrap();

        assert!(matches!(
            compute_rfm(&orders, &range),
            Err(AnalysisError::NoData(_))
        ));
    }

    #[test]
    fn summary_averages_the_metrics() {
        let orders = vec![
            order("A", "o1", 20, dec!(100.00)),
            order("B", "o2", 10, dec!(200.00)),
        ];

        let records = compute_rfm(&orders, &january()).unwrap();
        let summary = summarize(&records).unwrap();

        assert_eq!(summary.customers, 2);
        assert_eq!(summary.avg_recency_days, 16.0);
        assert_eq!(summary.avg_frequency, 1.0);
        assert_eq!(summary.avg_monetary, dec!(150.00));
    }

    #[test]
    fn top_by_monetary_sorts_descending() {
        let orders = vec![
            order("A", "o1", 5, dec!(10.00)),
            order("B", "o2", 5, dec!(30.00)),
            order("C", "o3", 5, dec!(20.00)),
        ];

        let records = compute_rfm(&orders, &january()).unwrap();
        let top = top_by_monetary(&records, 2);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].customer_id, "B");
        assert_eq!(top[1].customer_id, "C");
    }
}
