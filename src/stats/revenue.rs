//! Revenue statistics
//!
//! `net_amount`, `discount_amount` and `refund_amount` are order-level and
//! repeat on every item line of an order; they are summed once per order.
//! Category figures are item-level and use every line.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{chronological, percent, ranked, ratio, unique_orders, Breakdown};
use crate::core::records::EnrichedOrderLine;
use crate::dataframe::FilterSpec;
use crate::error::Result;
use crate::groupby::GroupBy;
use crate::temporal::DateRange;

/// Headline revenue figures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueSummary {
    pub total_revenue: f64,
    pub order_count: usize,
    /// Average order value
    pub average_order_value: f64,
    pub total_discount: f64,
    pub total_refund: f64,
}

pub fn revenue_summary(lines: &[EnrichedOrderLine]) -> RevenueSummary {
    let orders = unique_orders(lines);

    let total_revenue: f64 = orders.iter().map(|line| line.net_amount).sum();
    let total_discount: f64 = orders.iter().map(|line| line.discount_amount).sum();
    let total_refund: f64 = orders.iter().map(|line| line.refund_amount).sum();

    RevenueSummary {
        total_revenue,
        order_count: orders.len(),
        average_order_value: ratio(total_revenue, orders.len() as f64),
        total_discount,
        total_refund,
    }
}

fn order_revenue_by<F>(lines: &[EnrichedOrderLine], key: F) -> Vec<Breakdown>
where
    F: Fn(&EnrichedOrderLine) -> Option<&str>,
{
    let orders = unique_orders(lines);
    let groups = GroupBy::new(&orders, |line| key(line).map(str::to_string));
    ranked(groups.sum(|line| Some(line.net_amount)))
}

pub fn revenue_by_city(lines: &[EnrichedOrderLine]) -> Vec<Breakdown> {
    order_revenue_by(lines, |line| line.city.as_deref())
}

pub fn revenue_by_channel(lines: &[EnrichedOrderLine]) -> Vec<Breakdown> {
    order_revenue_by(lines, |line| line.order_channel.as_deref())
}

pub fn revenue_by_segment(lines: &[EnrichedOrderLine]) -> Vec<Breakdown> {
    order_revenue_by(lines, |line| line.customer_segment.as_deref())
}

/// Sum of `item_total` per product category
pub fn revenue_by_category(lines: &[EnrichedOrderLine]) -> Vec<Breakdown> {
    let groups = GroupBy::new(lines, |line| line.product_category.clone());
    ranked(groups.sum(|line| line.item_total))
}

/// Discount as a share of reconstructed gross per category, in percent
///
/// `Σdiscount / (Σnet + Σdiscount) × 100` over the category's lines.
pub fn discount_by_category(lines: &[EnrichedOrderLine]) -> Vec<Breakdown> {
    let groups = GroupBy::new(lines, |line| line.product_category.clone());
    let discounts = groups.sum(|line| Some(line.discount_amount));
    let nets = groups.sum(|line| Some(line.net_amount));

    let shares: BTreeMap<String, f64> = discounts
        .into_iter()
        .map(|(category, discount)| {
            let net = nets.get(&category).copied().unwrap_or(0.0);
            (category, percent(discount, net + discount))
        })
        .collect();

    ranked(shares)
}

/// Time bucket of a revenue trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl Granularity {
    /// Bucket label of a line; zero-padded ISO labels sort chronologically
    fn bucket(&self, line: &EnrichedOrderLine) -> String {
        match self {
            Granularity::Day => line.day.format("%Y-%m-%d").to_string(),
            Granularity::Week => line.week_start.format("%Y-%m-%d").to_string(),
            Granularity::Month => line.month.clone(),
        }
    }
}

/// Order revenue per time bucket, oldest first
///
/// Buckets are labelled by their first day (`YYYY-MM-DD`), or by `YYYY-MM`
/// for months.
pub fn revenue_trend(lines: &[EnrichedOrderLine], granularity: Granularity) -> Vec<Breakdown> {
    let orders = unique_orders(lines);
    let groups = GroupBy::new(&orders, |line| Some(granularity.bucket(line)));
    chronological(groups.sum(|line| Some(line.net_amount)))
}

/// Revenue of a period compared with the period just before it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthSummary {
    pub current: DateRange,
    pub previous: DateRange,
    pub current_revenue: f64,
    pub previous_revenue: f64,
    /// `(current - previous) / previous × 100`, `0.0` without previous revenue
    pub growth_pct: f64,
}

/// Compare `range` with the equally long period right before it
///
/// Both periods are cut from `all_lines` with the categorical filters of
/// `spec`; the date range of `spec` is ignored in favour of `range`.
pub fn period_over_period(
    all_lines: &[EnrichedOrderLine],
    spec: &FilterSpec,
    range: DateRange,
) -> Result<GrowthSummary> {
    let previous = range.previous()?;
    let categorical = spec.without_date_range();

    let revenue_in = |period: DateRange| -> f64 {
        let lines = categorical.clone().with_date_range(period).apply(all_lines);
        revenue_summary(&lines).total_revenue
    };

    let current_revenue = revenue_in(range);
    let previous_revenue = revenue_in(previous);

    Ok(GrowthSummary {
        current: range,
        previous,
        current_revenue,
        previous_revenue,
        growth_pct: percent(current_revenue - previous_revenue, previous_revenue),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::line;

    #[test]
    fn order_amounts_are_counted_once() {
        let mut a = line("O1", "2024-02-05");
        a.net_amount = 100.0;
        a.discount_amount = 10.0;
        let b = a.clone();
        let mut c = line("O2", "2024-02-06");
        c.net_amount = 50.0;

        let summary = revenue_summary(&[a, b, c]);
        assert_eq!(summary.total_revenue, 150.0);
        assert_eq!(summary.order_count, 2);
        assert_eq!(summary.average_order_value, 75.0);
        assert_eq!(summary.total_discount, 10.0);
    }

    #[test]
    fn empty_input_has_zero_aov() {
        let summary = revenue_summary(&[]);
        assert_eq!(summary.order_count, 0);
        assert_eq!(summary.average_order_value, 0.0);
    }

    #[test]
    fn monthly_trend_uses_month_labels() {
        let mut a = line("O1", "2024-01-30");
        a.net_amount = 10.0;
        let mut b = line("O2", "2024-02-02");
        b.net_amount = 20.0;
        let mut c = line("O3", "2024-02-20");
        c.net_amount = 5.0;

        let trend = revenue_trend(&[c, a, b], Granularity::Month);
        assert_eq!(
            trend,
            vec![Breakdown::new("2024-01", 10.0), Breakdown::new("2024-02", 25.0)]
        );
    }

    #[test]
    fn weekly_buckets_cross_month_boundaries() {
        let mut a = line("O1", "2024-01-30");
        a.net_amount = 10.0;
        let mut b = line("O2", "2024-02-02");
        b.net_amount = 20.0;

        // Both fall in the week of Monday 2024-01-29
        let trend = revenue_trend(&[a, b], Granularity::Week);
        assert_eq!(trend, vec![Breakdown::new("2024-01-29", 30.0)]);
    }
}
