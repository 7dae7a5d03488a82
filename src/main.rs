// src/main.rs
use std::env;
use std::io::{self, BufRead, Write};

use chrono::NaiveDate;

use shop_metrics::analysis::{filters, rfm, trends, views};
use shop_metrics::config::Config;
use shop_metrics::dataset::Dataset;
use shop_metrics::domain::errors::{AnalysisError, AnalysisResult, AppResult};
use shop_metrics::domain::models::{AnalysisView, DateRange, Order};
use shop_metrics::report;

const TOP_CUSTOMERS: usize = 5;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> AppResult<()> {
    // A config file takes precedence over plain environment variables.
    let config = match env::var("CONFIG_FILE") {
        Ok(path) => Config::from_file(path)?,
        Err(_) => Config::from_env()?,
    };
    config.init_logging()?;

    log::info!("Starting shop_metrics v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Loading dataset from {}", config.data.path);

    let dataset = Dataset::load(&config.data.path)?;
    let (min_date, max_date) = dataset
        .date_span()
        .expect("loaded dataset is never empty");

    log::info!(
        "Loaded {} payment records spanning {} to {}",
        dataset.len(),
        min_date,
        max_date
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!();
        println!("E-Commerce Dashboard ({} .. {})", min_date, max_date);
        for (i, view) in AnalysisView::ALL.iter().enumerate() {
            println!("  {}. {}", i + 1, view);
        }
        println!("  q. Quit");

        let choice = match prompt(&mut lines, "Select analysis")? {
            Some(choice) => choice,
            None => break,
        };
        if choice.eq_ignore_ascii_case("q") {
            break;
        }

        let view = match choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| AnalysisView::ALL.get(i))
        {
            Some(view) => *view,
            None => {
                println!("Unknown selection: {}", choice);
                continue;
            }
        };

        let range = match read_range(&mut lines, min_date, max_date)? {
            Some(range) => range,
            None => break,
        };

        println!();
        println!("{} for {}", view, range);
        if let Err(e) = show_view(&dataset, view, &range) {
            // "No data in range" is an answer, not a failure.
            println!("{}", e);
        }
    }

    log::info!("Shutting down");
    Ok(())
}

/// Compute the selected view over the dataset and render it.
fn show_view(dataset: &Dataset, view: AnalysisView, range: &DateRange) -> AnalysisResult<()> {
    match view {
        AnalysisView::PaymentPatterns => {
            let in_range = require_rows(dataset, range)?;
            report::render_payment_counts(&views::payment_type_distribution(&in_range));
        }
        AnalysisView::DeliveryTimes => {
            let in_range = require_rows(dataset, range)?;
            report::render_delivery_stats(&views::delivery_time_stats(&in_range)?);
        }
        AnalysisView::OrdersByWeekday => {
            let in_range = require_rows(dataset, range)?;
            report::render_weekday_counts(&views::orders_by_weekday(&in_range));
        }
        AnalysisView::AvgTransactionValue => {
            let in_range = require_rows(dataset, range)?;
            report::render_payment_averages(&views::avg_transaction_by_payment_type(&in_range));
        }
        AnalysisView::Rfm => {
            let records = rfm::compute_rfm(dataset.orders(), range)?;
            let summary = rfm::summarize(&records)?;
            report::render_rfm(&records, &summary, TOP_CUSTOMERS);
        }
        AnalysisView::MonthlyTrends => {
            let stats = trends::compute_monthly_trends(dataset.orders(), range)?;
            let summary = trends::summarize(&stats)?;
            report::render_monthly_trends(&stats, &summary);
        }
    }

    Ok(())
}

/// One range filter per interaction, shared by the views that take the
/// filtered slice directly.
fn require_rows(dataset: &Dataset, range: &DateRange) -> AnalysisResult<Vec<Order>> {
    let in_range = filters::filter_by_range(dataset.orders(), range);
    if in_range.is_empty() {
        return Err(AnalysisError::NoData(format!("no orders in {}", range)));
    }

    Ok(in_range)
}

fn prompt(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    label: &str,
) -> AppResult<Option<String>> {
    print!("{}: ", label);
    io::stdout().flush()?;

    match lines.next() {
        Some(line) => Ok(Some(line?.trim().to_string())),
        None => Ok(None),
    }
}

fn read_range(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    min_date: NaiveDate,
    max_date: NaiveDate,
) -> AppResult<Option<DateRange>> {
    loop {
        let start = match read_date(lines, "Start date", min_date)? {
            Some(date) => date,
            None => return Ok(None),
        };
        let end = match read_date(lines, "End date", max_date)? {
            Some(date) => date,
            None => return Ok(None),
        };

        // An inverted range is caller input, so re-prompt instead of
        // treating it like an empty result.
        match DateRange::new(start, end) {
            Ok(range) => return Ok(Some(range)),
            Err(e) => println!("{}", e),
        }
    }
}

fn read_date(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    label: &str,
    default: NaiveDate,
) -> AppResult<Option<NaiveDate>> {
    loop {
        let line = match prompt(lines, &format!("{} [{}]", label, default))? {
            Some(line) => line,
            None => return Ok(None),
        };
        if line.is_empty() {
            return Ok(Some(default));
        }

        match NaiveDate::parse_from_str(&line, "%Y-%m-%d") {
            Ok(date) => return Ok(Some(date)),
            Err(_) => println!("Unrecognized date (expected YYYY-MM-DD): {}", line),
        }
    }
}
