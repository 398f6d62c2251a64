//! Return statistics

use serde::Serialize;

use super::{counts, order_ids, ranked, ratio, Breakdown};
use crate::core::records::{EnrichedOrderLine, ReturnRecord};
use crate::groupby::GroupBy;

/// Headline return figures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnsSummary {
    pub returned_lines: usize,
    pub total_lines: usize,
    /// `returned_lines / total_lines`, a fraction
    pub return_rate: f64,
    /// Return rate above 10%
    pub high: bool,
}

/// Share of lines carrying a refund
pub fn return_rate(lines: &[EnrichedOrderLine]) -> ReturnsSummary {
    let returned_lines = lines.iter().filter(|line| line.is_returned()).count();
    let return_rate = ratio(returned_lines as f64, lines.len() as f64);

    ReturnsSummary {
        returned_lines,
        total_lines: lines.len(),
        return_rate,
        high: return_rate > 0.10,
    }
}

fn returned_count_by<F>(lines: &[EnrichedOrderLine], key: F) -> Vec<Breakdown>
where
    F: Fn(&EnrichedOrderLine) -> Option<String>,
{
    let returned: Vec<&EnrichedOrderLine> = lines.iter().filter(|line| line.is_returned()).collect();
    let groups = GroupBy::new(&returned, |line| key(line));
    ranked(counts(groups.size()))
}

/// Returned line count per product category
pub fn returns_by_category(lines: &[EnrichedOrderLine]) -> Vec<Breakdown> {
    returned_count_by(lines, |line| line.product_category.clone())
}

/// Returned line count per customer city
pub fn returns_by_city(lines: &[EnrichedOrderLine]) -> Vec<Breakdown> {
    returned_count_by(lines, |line| line.city.clone())
}

/// Return records per refund status, for orders present in `lines`
pub fn refund_status_breakdown(lines: &[EnrichedOrderLine], returns: &[ReturnRecord]) -> Vec<Breakdown> {
    let orders = order_ids(lines);
    let records: Vec<&ReturnRecord> = returns
        .iter()
        .filter(|record| orders.contains(record.order_id.as_str()))
        .collect();

    let groups = GroupBy::new(&records, |record| record.status().map(|s| s.label().to_string()));
    ranked(counts(groups.size()))
}
