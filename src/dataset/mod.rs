// src/dataset/mod.rs
// CSV dataset loading and the immutable in-memory dataset

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use crate::domain::errors::{DatasetError, DatasetResult};
use crate::domain::models::Order;

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Raw CSV row before type coercion. Extra columns in the source file are
/// ignored; a missing required column fails the whole load.
#[derive(Debug, Deserialize)]
struct OrderRow {
    order_id: String,
    customer_id: String,
    order_purchase_timestamp: String,
    #[serde(default)]
    order_delivered_customer_date: Option<String>,
    payment_type: String,
    payment_value: String,
}

impl OrderRow {
    fn into_order(self) -> DatasetResult<Order> {
        let purchase_ts =
            parse_timestamp("order_purchase_timestamp", &self.order_purchase_timestamp)?;

        // An absent delivery date means the order never reached the
        // customer; it is excluded from delivery computations, not defaulted.
        let delivered_ts = match self.order_delivered_customer_date.as_deref() {
            None | Some("") => None,
            Some(value) => Some(parse_timestamp("order_delivered_customer_date", value)?),
        };

        let payment_value = Decimal::from_str(self.payment_value.trim()).map_err(|_| {
            DatasetError::InvalidAmount {
                column: "payment_value".to_string(),
                value: self.payment_value.clone(),
            }
        })?;
        if payment_value.is_sign_negative() {
            return Err(DatasetError::InvalidAmount {
                column: "payment_value".to_string(),
                value: self.payment_value,
            });
        }

        Ok(Order {
            order_id: self.order_id,
            customer_id: self.customer_id,
            purchase_ts,
            delivered_ts,
            payment_type: self.payment_type,
            payment_value,
        })
    }
}

fn parse_timestamp(column: &str, value: &str) -> DatasetResult<NaiveDateTime> {
    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value.trim(), format) {
            return Ok(ts);
        }
    }

    Err(DatasetError::InvalidTimestamp {
        column: column.to_string(),
        value: value.to_string(),
    })
}

/// The full transaction dataset, loaded once at startup and immutable for
/// the process lifetime.
#[derive(Debug, Clone)]
pub struct Dataset {
    orders: Vec<Order>,
}

impl Dataset {
    /// Load every payment record from a CSV file. Any unparseable row
    /// aborts the load; aggregates over partially parsed data would not be
    /// trustworthy.
    pub fn load<P: AsRef<Path>>(path: P) -> DatasetResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| DatasetError::Read(format!("{}: {}", path.display(), e)))?;

        let orders = read_orders(BufReader::new(file))?;
        if orders.is_empty() {
            return Err(DatasetError::Empty(path.display().to_string()));
        }

        Ok(Self { orders })
    }

    pub fn from_orders(orders: Vec<Order>) -> Self {
        Self { orders }
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Earliest and latest purchase dates, used to seed the default range.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.orders.first()?.purchase_ts.date();
        let span = self.orders.iter().fold((first, first), |(min, max), order| {
            let date = order.purchase_ts.date();
            (min.min(date), max.max(date))
        });
        Some(span)
    }
}

fn read_orders<R: Read>(reader: R) -> DatasetResult<Vec<Order>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut orders = Vec::new();

    for result in csv_reader.deserialize() {
        let row: OrderRow = result?;
        orders.push(row.into_order()?);
    }

    Ok(orders)
}
