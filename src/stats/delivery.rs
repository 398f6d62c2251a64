//! Fulfillment statistics

use serde::Serialize;

use super::{counts, order_ids, ranked, ratio, Breakdown};
use crate::core::records::{DeliveryStatus, EnrichedOrderLine, FulfillmentRecord};
use crate::config::StatusVocabulary;
use crate::groupby::GroupBy;

/// Number of delay reasons reported by default
pub const DEFAULT_TOP_REASONS: usize = 10;

/// Share of lines per delivery outcome, as fractions of lines with a status
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryRates {
    /// Lines with any delivery status
    pub deliveries: usize,
    pub on_time: f64,
    pub delayed: f64,
    pub failed: f64,
    pub pending: f64,
}

impl DeliveryRates {
    /// Dashboard health reading of the rates
    pub fn health(&self) -> DeliveryHealth {
        DeliveryHealth {
            on_time_ok: self.on_time >= 0.80,
            delayed_high: self.delayed > 0.15,
            failed_critical: self.failed > 0.05,
        }
    }
}

/// Threshold flags shown next to the delivery KPIs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeliveryHealth {
    /// On-time rate at least 80%
    pub on_time_ok: bool,
    /// Delayed rate above 15%
    pub delayed_high: bool,
    /// Failed rate above 5%
    pub failed_critical: bool,
}

pub fn delivery_rates(lines: &[EnrichedOrderLine]) -> DeliveryRates {
    let statuses: Vec<&DeliveryStatus> = lines.iter().filter_map(|l| l.delivery_status.as_ref()).collect();
    let total = statuses.len() as f64;
    let share = |wanted: DeliveryStatus| {
        let n = statuses.iter().filter(|s| ***s == wanted).count();
        ratio(n as f64, total)
    };

    DeliveryRates {
        deliveries: statuses.len(),
        on_time: share(DeliveryStatus::OnTime),
        delayed: share(DeliveryStatus::Delayed),
        failed: share(DeliveryStatus::Failed),
        pending: share(DeliveryStatus::Pending),
    }
}

/// Line count per delivery status label
pub fn status_distribution(lines: &[EnrichedOrderLine]) -> Vec<Breakdown> {
    let groups = GroupBy::new(lines, |line| line.delivery_status.as_ref().map(|s| s.label().to_string()));
    ranked(counts(groups.size()))
}

/// On-time and delayed line counts of one warehouse hub
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HubPerformance {
    pub hub: String,
    pub on_time: usize,
    pub delayed: usize,
}

/// Per hub, ordered by hub name; hubs with neither outcome are left out
pub fn hub_performance(lines: &[EnrichedOrderLine]) -> Vec<HubPerformance> {
    let groups = GroupBy::new(lines, |line| match line.delivery_status {
        Some(DeliveryStatus::OnTime) | Some(DeliveryStatus::Delayed) => line.warehouse_hub.clone(),
        _ => None,
    });

    let on_time = groups.count_where(|line| line.delivery_status == Some(DeliveryStatus::OnTime));
    let delayed = groups.count_where(|line| line.delivery_status == Some(DeliveryStatus::Delayed));

    on_time
        .into_iter()
        .map(|(hub, on_time)| {
            let delayed = delayed.get(&hub).copied().unwrap_or(0);
            HubPerformance { hub, on_time, delayed }
        })
        .collect()
}

fn delayed_lines(lines: &[EnrichedOrderLine]) -> Vec<&EnrichedOrderLine> {
    lines
        .iter()
        .filter(|line| line.delivery_status == Some(DeliveryStatus::Delayed))
        .collect()
}

/// Delayed line count per delivery zone
pub fn delays_by_zone(lines: &[EnrichedOrderLine]) -> Vec<Breakdown> {
    let delayed = delayed_lines(lines);
    let groups = GroupBy::new(&delayed, |line| line.delivery_zone.clone());
    ranked(counts(groups.size()))
}

/// The `limit` most frequent reasons among delayed lines
pub fn delay_reasons(lines: &[EnrichedOrderLine], limit: usize) -> Vec<Breakdown> {
    let delayed = delayed_lines(lines);
    let groups = GroupBy::new(&delayed, |line| Some(line.delay_reason.clone()));
    let mut reasons = ranked(counts(groups.size()));
    reasons.truncate(limit);
    reasons
}

/// Delivery volume and on-time rate of one delivery partner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartnerPerformance {
    pub partner: String,
    pub deliveries: usize,
    /// Fraction of the partner's deliveries that were on time
    pub on_time_rate: f64,
}

/// Partner figures from the raw fulfillment table
///
/// Only records of orders present in `lines` count, so the breakdown
/// follows the active filters. Sorted by delivery count, then name.
pub fn partner_performance(
    lines: &[EnrichedOrderLine],
    fulfillment: &[FulfillmentRecord],
    vocabulary: &StatusVocabulary,
) -> Vec<PartnerPerformance> {
    let orders = order_ids(lines);
    let records: Vec<&FulfillmentRecord> = fulfillment
        .iter()
        .filter(|record| orders.contains(record.order_id.as_str()))
        .collect();

    let groups = GroupBy::new(&records, |record| record.delivery_partner.clone());
    let on_time = groups.count_where(|record| record.status(vocabulary) == Some(DeliveryStatus::OnTime));

    let mut partners: Vec<PartnerPerformance> = groups
        .size()
        .into_iter()
        .map(|(partner, deliveries)| {
            let on_time = on_time.get(&partner).copied().unwrap_or(0);
            PartnerPerformance {
                partner,
                deliveries,
                on_time_rate: ratio(on_time as f64, deliveries as f64),
            }
        })
        .collect();

    partners.sort_by(|a, b| b.deliveries.cmp(&a.deliveries).then_with(|| a.partner.cmp(&b.partner)));
    partners
}
