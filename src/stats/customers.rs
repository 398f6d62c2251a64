//! Customer statistics

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::{counts, ranked, ratio, Breakdown};
use crate::core::records::EnrichedOrderLine;
use crate::groupby::GroupBy;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerSummary {
    pub customers: usize,
    pub repeat_customers: usize,
    /// Fraction of customers with more than one distinct order
    pub repeat_rate: f64,
}

pub fn repeat_customer_rate(lines: &[EnrichedOrderLine]) -> CustomerSummary {
    let mut orders_per_customer: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for line in lines {
        orders_per_customer
            .entry(line.customer_id.as_str())
            .or_default()
            .insert(line.order_id.as_str());
    }

    let customers = orders_per_customer.len();
    let repeat_customers = orders_per_customer.values().filter(|orders| orders.len() > 1).count();

    CustomerSummary {
        customers,
        repeat_customers,
        repeat_rate: ratio(repeat_customers as f64, customers as f64),
    }
}

/// Distinct customers per segment
pub fn customers_by_segment(lines: &[EnrichedOrderLine]) -> Vec<Breakdown> {
    let groups = GroupBy::new(lines, |line| line.customer_segment.clone());
    ranked(counts(groups.count_distinct(|line| line.customer_id.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::line;

    fn bought(customer: &str, order: &str, segment: &str) -> EnrichedOrderLine {
        let mut l = line(order, "2024-03-01");
        l.customer_id = customer.to_string();
        l.customer_segment = Some(segment.to_string());
        l
    }

    #[test]
    fn repeat_needs_two_distinct_orders() {
        let lines = vec![
            bought("C1", "O1", "Premium"),
            bought("C1", "O1", "Premium"),
            bought("C2", "O2", "Regular"),
            bought("C2", "O3", "Regular"),
        ];

        let summary = repeat_customer_rate(&lines);
        assert_eq!(summary.customers, 2);
        assert_eq!(summary.repeat_customers, 1);
        assert_eq!(summary.repeat_rate, 0.5);
        assert_eq!(repeat_customer_rate(&[]).repeat_rate, 0.0);
    }

    #[test]
    fn segments_count_distinct_customers() {
        let lines = vec![
            bought("C1", "O1", "Premium"),
            bought("C1", "O2", "Premium"),
            bought("C2", "O3", "Regular"),
            bought("C3", "O4", "Regular"),
        ];

        assert_eq!(
            customers_by_segment(&lines),
            vec![Breakdown::new("Regular", 2.0), Breakdown::new("Premium", 1.0)]
        );
    }
}
