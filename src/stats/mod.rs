//! Dashboard statistics over enriched order lines
//!
//! Every function here takes the lines by shared reference and returns
//! fresh values. Ratios with an empty denominator are `0.0`, never an error.

pub mod customers;
pub mod delivery;
pub mod returns;
pub mod revenue;

use std::collections::{BTreeMap, HashSet};
use std::fmt::Display;

use serde::Serialize;

use crate::core::records::EnrichedOrderLine;

// Re-export commonly used items
pub use self::customers::{customers_by_segment, repeat_customer_rate, CustomerSummary};
pub use self::delivery::{
    delay_reasons, delays_by_zone, delivery_rates, hub_performance, partner_performance,
    status_distribution, DeliveryHealth, DeliveryRates, HubPerformance, PartnerPerformance,
    DEFAULT_TOP_REASONS,
};
pub use self::returns::{
    refund_status_breakdown, return_rate, returns_by_category, returns_by_city, ReturnsSummary,
};
pub use self::revenue::{
    discount_by_category, period_over_period, revenue_by_category, revenue_by_channel,
    revenue_by_city, revenue_by_segment, revenue_summary, revenue_trend, Granularity,
    GrowthSummary, RevenueSummary,
};

/// One labelled value of a breakdown chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdown {
    pub label: String,
    pub value: f64,
}

impl Breakdown {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Breakdown {
            label: label.into(),
            value,
        }
    }
}

/// `numerator / denominator`, or `0.0` for an empty denominator
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// [`ratio`] scaled to a percentage
pub fn percent(numerator: f64, denominator: f64) -> f64 {
    ratio(numerator, denominator) * 100.0
}

/// Breakdown sorted by value descending, ties by label ascending
pub fn ranked<K, V>(values: BTreeMap<K, V>) -> Vec<Breakdown>
where
    K: Display,
    V: Into<f64>,
{
    let mut rows: Vec<Breakdown> = values
        .into_iter()
        .map(|(k, v)| Breakdown::new(k.to_string(), v.into()))
        .collect();

    rows.sort_by(|a, b| b.value.total_cmp(&a.value).then_with(|| a.label.cmp(&b.label)));
    rows
}

/// Breakdown in ascending key order, for time series
pub fn chronological<K, V>(values: BTreeMap<K, V>) -> Vec<Breakdown>
where
    K: Display,
    V: Into<f64>,
{
    values
        .into_iter()
        .map(|(k, v)| Breakdown::new(k.to_string(), v.into()))
        .collect()
}

/// usize counts as chart values
pub(crate) fn counts<K: Ord>(values: BTreeMap<K, usize>) -> BTreeMap<K, f64> {
    values.into_iter().map(|(k, v)| (k, v as f64)).collect()
}

/// First line of every distinct order, in input order
///
/// Order-level amounts repeat on each item line of an order, so they are
/// summed over this view only.
pub fn unique_orders(lines: &[EnrichedOrderLine]) -> Vec<&EnrichedOrderLine> {
    let mut seen = HashSet::new();
    lines
        .iter()
        .filter(|line| seen.insert(line.order_id.as_str()))
        .collect()
}

/// Distinct order ids present in `lines`
pub fn order_ids(lines: &[EnrichedOrderLine]) -> HashSet<&str> {
    lines.iter().map(|line| line.order_id.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_of_empty_denominator_is_zero() {
        assert_eq!(ratio(5.0, 0.0), 0.0);
        assert_eq!(ratio(1.0, 4.0), 0.25);
        assert_eq!(percent(1.0, 4.0), 25.0);
    }

    #[test]
    fn ranked_breaks_ties_by_label() {
        let mut values = BTreeMap::new();
        values.insert("b", 2.0);
        values.insert("c", 5.0);
        values.insert("a", 2.0);

        let labels: Vec<String> = ranked(values).into_iter().map(|b| b.label).collect();
        assert_eq!(labels, vec!["c", "a", "b"]);
    }
}
