// src/report/mod.rs
// Text-table rendering of analysis results. All formatting (column widths,
// rounding, percentage signs) lives here, never in the aggregators.

use chrono::Weekday;

use crate::analysis::rfm;
use crate::domain::models::{
    DeliveryStats, MonthlyStat, PaymentTypeAverage, PaymentTypeCount, RfmRecord, RfmSummary,
    TrendSummary, WeekdayCount,
};

pub fn render_payment_counts(counts: &[PaymentTypeCount]) {
    println!();
    println!("{:<20} {:>12}", "payment type", "payments");
    for count in counts {
        println!("{:<20} {:>12}", count.payment_type, count.rows);
    }
}

pub fn render_payment_averages(averages: &[PaymentTypeAverage]) {
    println!();
    println!("{:<20} {:>12}", "payment type", "avg value");
    for average in averages {
        println!(
            "{:<20} {:>12}",
            average.payment_type,
            average.avg_value.round_dp(2)
        );
    }
}

pub fn render_weekday_counts(counts: &[WeekdayCount]) {
    println!();
    println!("{:<12} {:>12}", "weekday", "orders");
    for count in counts {
        println!("{:<12} {:>12}", weekday_name(count.weekday), count.rows);
    }
}

const HISTOGRAM_WIDTH: usize = 50;

pub fn render_delivery_stats(stats: &DeliveryStats) {
    println!();
    println!(
        "Average delivery time over {} orders: {:.2} days",
        stats.durations_days.len(),
        stats.avg_days
    );

    let buckets = duration_histogram(&stats.durations_days);
    let max_count = buckets.iter().map(|(_, count)| *count).max().unwrap_or(1);

    for (days, count) in buckets {
        // Bars are scaled to the busiest bucket; non-empty buckets always
        // show at least one mark.
        let bar = (count * HISTOGRAM_WIDTH / max_count).max(1);
        println!("{:>4} days {:<width$} {}", days, "#".repeat(bar), count, width = HISTOGRAM_WIDTH);
    }
}

pub fn render_rfm(records: &[RfmRecord], summary: &RfmSummary, top_n: usize) {
    println!();
    println!("Customers in range: {}", summary.customers);
    println!("Average recency:   {:.1} days", summary.avg_recency_days);
    println!("Average frequency: {:.1} orders", summary.avg_frequency);
    println!("Average monetary:  {}", summary.avg_monetary.round_dp(2));

    render_rfm_table(
        "Longest-inactive customers",
        &rfm::top_by_recency(records, top_n),
    );
    render_rfm_table(
        "Most frequent customers",
        &rfm::top_by_frequency(records, top_n),
    );
    render_rfm_table(
        "Highest-spending customers",
        &rfm::top_by_monetary(records, top_n),
    );
}

fn render_rfm_table(title: &str, records: &[RfmRecord]) {
    println!();
    println!("{}", title);
    println!(
        "{:<36} {:>8} {:>10} {:>12}",
        "customer", "recency", "frequency", "monetary"
    );
    for record in records {
        println!(
            "{:<36} {:>8} {:>10} {:>12}",
            record.customer_id,
            record.recency_days,
            record.frequency,
            record.monetary.round_dp(2)
        );
    }
}

pub fn render_monthly_trends(stats: &[MonthlyStat], summary: &TrendSummary) {
    println!();
    println!(
        "{:<10} {:>8} {:>14} {:>10} {:>10}",
        "month", "orders", "revenue", "rev %", "orders %"
    );
    for stat in stats {
        println!(
            "{:<10} {:>8} {:>14} {:>10} {:>10}",
            stat.label(),
            stat.total_orders,
            stat.total_revenue.round_dp(2),
            render_pct(stat.revenue_pct_change),
            render_pct(stat.orders_pct_change),
        );
    }

    println!();
    println!(
        "Peak revenue: {} ({})",
        summary.peak_revenue_month,
        summary.peak_revenue.round_dp(2)
    );
    println!(
        "Peak orders:  {} ({} orders)",
        summary.peak_orders_month, summary.peak_orders
    );
    println!(
        "Average revenue per order: {}",
        summary.avg_revenue_per_order.round_dp(2)
    );
}

fn render_pct(change: Option<f64>) -> String {
    match change {
        Some(pct) => format!("{:+.1}%", pct),
        None => "-".to_string(),
    }
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn duration_histogram(durations: &[i64]) -> Vec<(i64, usize)> {
    let mut buckets: std::collections::BTreeMap<i64, usize> = std::collections::BTreeMap::new();
    for days in durations {
        *buckets.entry(*days).or_default() += 1;
    }
    buckets.into_iter().collect()
}
