// src/domain/models.rs
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

use crate::domain::errors::{AnalysisError, AnalysisResult};

/// Core Dataset Records
///
/// One payment line-item of an order. An order id repeats across rows when
/// an order was paid in several installments or with several methods; the
/// customer id repeats across the customer's orders.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub order_id: String,
    pub customer_id: String,
    pub purchase_ts: NaiveDateTime,
    pub delivered_ts: Option<NaiveDateTime>,
    pub payment_type: String,
    pub payment_value: Decimal,
}

impl Order {
    /// Whole days between purchase and delivery, if the order was delivered.
    pub fn delivery_days(&self) -> Option<i64> {
        self.delivered_ts
            .map(|delivered| (delivered - self.purchase_ts).num_days())
    }
}

/// Closed calendar-date interval used to filter orders by purchase timestamp.
///
/// The end bound covers the last instant of its calendar day, so a range
/// built from equal start and end dates still spans one full day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DateRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> AnalysisResult<Self> {
        if start > end {
            return Err(AnalysisError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        Ok(Self {
            start: start.and_time(NaiveTime::MIN),
            end: end
                .and_time(NaiveTime::from_hms_opt(23, 59, 59).expect("valid wall-clock time")),
        })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Last instant of the range; also the reference date for recency.
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        self.start <= ts && ts <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} .. {}", self.start.date(), self.end.date())
    }
}

/// Analysis views selectable from the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisView {
    PaymentPatterns,
    DeliveryTimes,
    OrdersByWeekday,
    AvgTransactionValue,
    Rfm,
    MonthlyTrends,
}

impl AnalysisView {
    pub const ALL: [AnalysisView; 6] = [
        AnalysisView::PaymentPatterns,
        AnalysisView::DeliveryTimes,
        AnalysisView::OrdersByWeekday,
        AnalysisView::AvgTransactionValue,
        AnalysisView::Rfm,
        AnalysisView::MonthlyTrends,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            AnalysisView::PaymentPatterns => "Payment patterns",
            AnalysisView::DeliveryTimes => "Delivery times",
            AnalysisView::OrdersByWeekday => "Orders by weekday",
            AnalysisView::AvgTransactionValue => "Average transaction value",
            AnalysisView::Rfm => "RFM analysis",
            AnalysisView::MonthlyTrends => "Monthly trends",
        }
    }
}

impl fmt::Display for AnalysisView {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Derived Records

/// Per-customer RFM metrics within a selected range.
#[derive(Debug, Clone, Serialize)]
pub struct RfmRecord {
    pub customer_id: String,
    /// Whole days between the range end and the customer's latest purchase.
    pub recency_days: i64,
    /// Distinct orders placed in range.
    pub frequency: u64,
    /// Sum of payment values in range.
    pub monetary: Decimal,
}

/// Metric means over an RFM result set.
#[derive(Debug, Clone, Serialize)]
pub struct RfmSummary {
    pub customers: usize,
    pub avg_recency_days: f64,
    pub avg_frequency: f64,
    pub avg_monetary: Decimal,
}

/// One calendar month of order activity.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyStat {
    pub year: i32,
    pub month: u32,
    /// Distinct orders that month.
    pub total_orders: u64,
    pub total_revenue: Decimal,
    /// Change vs the previous month in the result; None for the first month.
    pub revenue_pct_change: Option<f64>,
    pub orders_pct_change: Option<f64>,
}

impl MonthlyStat {
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Headline figures over a monthly trend result set.
#[derive(Debug, Clone, Serialize)]
pub struct TrendSummary {
    pub peak_revenue_month: String,
    pub peak_revenue: Decimal,
    pub peak_orders_month: String,
    pub peak_orders: u64,
    pub avg_revenue_per_order: Decimal,
}

/// Payment rows per payment method.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentTypeCount {
    pub payment_type: String,
    pub rows: u64,
}

/// Mean payment value per payment method.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentTypeAverage {
    pub payment_type: String,
    pub avg_value: Decimal,
}

/// Payment rows per weekday of purchase.
#[derive(Debug, Clone, Serialize)]
pub struct WeekdayCount {
    pub weekday: Weekday,
    pub rows: u64,
}

/// Delivery durations (days) after outlier trimming.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryStats {
    pub durations_days: Vec<i64>,
    pub avg_days: f64,
}
