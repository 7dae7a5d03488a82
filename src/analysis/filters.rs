use crate::domain::models::{DateRange, Order};

/// Orders whose purchase timestamp falls inside the range, source order
/// preserved. Range validity is guaranteed by `DateRange` construction.
pub fn filter_by_range(orders: &[Order], range: &DateRange) -> Vec<Order> {
    orders
        .iter()
        .filter(|order| range.contains(order.purchase_ts))
        .cloned()
        .collect()
}
