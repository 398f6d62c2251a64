//! Dashboard views over a built dataset
//!
//! [`Dashboard`] turns user filter choices into a [`FilterSpec`] and computes
//! the executive and operations figures for the filtered lines.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::DashboardConfig;
use crate::dataframe::{apply_filters, FilterOptions, FilterSpec, Selection};
use crate::error::Result;
use crate::format::{format_count, format_currency, format_percentage};
use crate::pipeline::Dataset;
use crate::stats::{
    self, Breakdown, CustomerSummary, DeliveryHealth, DeliveryRates, GrowthSummary, HubPerformance,
    PartnerPerformance, ReturnsSummary, RevenueSummary,
};
use crate::temporal::DateRange;

/// What the filtered view contains
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSummary {
    /// Inclusive order date range shown, if the data has any dates
    pub date_range: Option<DateRange>,
    /// Order lines after filtering
    pub lines: usize,
    /// Distinct orders after filtering
    pub orders: usize,
}

/// Revenue, growth and customer figures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutiveSummary {
    pub revenue: RevenueSummary,
    pub growth: Option<GrowthSummary>,
    pub daily_revenue: Vec<Breakdown>,
    pub weekly_revenue: Vec<Breakdown>,
    pub monthly_revenue: Vec<Breakdown>,
    pub revenue_by_city: Vec<Breakdown>,
    pub revenue_by_channel: Vec<Breakdown>,
    pub revenue_by_segment: Vec<Breakdown>,
    pub revenue_by_category: Vec<Breakdown>,
    /// Percent of reconstructed gross given away as discount
    pub discount_by_category: Vec<Breakdown>,
    pub customers: CustomerSummary,
    pub customers_by_segment: Vec<Breakdown>,
}

/// Fulfillment and returns figures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationsSummary {
    pub delivery: DeliveryRates,
    pub health: DeliveryHealth,
    pub status_distribution: Vec<Breakdown>,
    pub hub_performance: Vec<HubPerformance>,
    pub delays_by_zone: Vec<Breakdown>,
    pub delay_reasons: Vec<Breakdown>,
    pub partners: Vec<PartnerPerformance>,
    pub returns: ReturnsSummary,
    pub returns_by_category: Vec<Breakdown>,
    pub returns_by_city: Vec<Breakdown>,
    pub refund_statuses: Vec<Breakdown>,
}

/// Everything the dashboard shows for one filter selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub filters: FilterSummary,
    pub executive: ExecutiveSummary,
    pub operations: OperationsSummary,
}

/// A built dataset together with the settings used to present it
#[derive(Debug, Clone)]
pub struct Dashboard {
    dataset: Arc<Dataset>,
    config: DashboardConfig,
}

impl Dashboard {
    pub fn new(dataset: Arc<Dataset>, config: DashboardConfig) -> Self {
        Dashboard { dataset, config }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Choices offered for each filter
    pub fn options(&self) -> FilterOptions {
        self.dataset.filter_options(&self.config.filters.all_sentinel)
    }

    /// Build a filter from raw user choices
    ///
    /// A missing `start` or `end` falls back to the earliest or latest order
    /// date in the data. Lists that are empty or contain the "all" sentinel
    /// do not restrict.
    pub fn filter_spec(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        cities: &[String],
        channels: &[String],
        segments: &[String],
    ) -> Result<FilterSpec> {
        let sentinel = self.config.filters.all_sentinel.as_str();
        let options = self.options();

        let mut spec = FilterSpec::new()
            .with_cities(Selection::from_values(cities.iter().cloned(), sentinel))
            .with_channels(Selection::from_values(channels.iter().cloned(), sentinel))
            .with_segments(Selection::from_values(segments.iter().cloned(), sentinel));

        if let (Some(start), Some(end)) = (start.or(options.min_date), end.or(options.max_date)) {
            spec = spec.with_date_range(DateRange::new(start, end)?);
        }

        Ok(spec)
    }

    /// Compute every figure for `spec`
    pub fn summarize(&self, spec: &FilterSpec) -> Result<DashboardSummary> {
        let all_lines = &self.dataset.lines;
        let lines = apply_filters(all_lines, spec);

        let date_range = spec.date_range.or_else(|| self.options().date_range());
        let growth = match date_range {
            Some(range) => Some(stats::period_over_period(all_lines, spec, range)?),
            None => None,
        };

        let filters = FilterSummary {
            date_range,
            lines: lines.len(),
            orders: stats::order_ids(&lines).len(),
        };

        let executive = ExecutiveSummary {
            revenue: stats::revenue_summary(&lines),
            growth,
            daily_revenue: stats::revenue_trend(&lines, stats::Granularity::Day),
            weekly_revenue: stats::revenue_trend(&lines, stats::Granularity::Week),
            monthly_revenue: stats::revenue_trend(&lines, stats::Granularity::Month),
            revenue_by_city: stats::revenue_by_city(&lines),
            revenue_by_channel: stats::revenue_by_channel(&lines),
            revenue_by_segment: stats::revenue_by_segment(&lines),
            revenue_by_category: stats::revenue_by_category(&lines),
            discount_by_category: stats::discount_by_category(&lines),
            customers: stats::repeat_customer_rate(&lines),
            customers_by_segment: stats::customers_by_segment(&lines),
        };

        let delivery = stats::delivery_rates(&lines);
        let operations = OperationsSummary {
            health: delivery.health(),
            delivery,
            status_distribution: stats::status_distribution(&lines),
            hub_performance: stats::hub_performance(&lines),
            delays_by_zone: stats::delays_by_zone(&lines),
            delay_reasons: stats::delay_reasons(&lines, self.config.display.top_delay_reasons),
            partners: stats::partner_performance(
                &lines,
                &self.dataset.tables.fulfillment,
                &self.config.vocabulary,
            ),
            returns: stats::return_rate(&lines),
            returns_by_category: stats::returns_by_category(&lines),
            returns_by_city: stats::returns_by_city(&lines),
            refund_statuses: stats::refund_status_breakdown(&lines, &self.dataset.tables.returns),
        };

        log::info!(
            "summarized {} lines ({} orders) for {:?}",
            filters.lines,
            filters.orders,
            filters.date_range
        );

        Ok(DashboardSummary {
            filters,
            executive,
            operations,
        })
    }
}

fn section(out: &mut String, title: &str, rows: &[Breakdown], value: impl Fn(f64) -> String) {
    if rows.is_empty() {
        return;
    }
    out.push_str(&format!("\n{}\n", title));
    for row in rows {
        out.push_str(&format!("  {:<28} {:>16}\n", row.label, value(row.value)));
    }
}

impl DashboardSummary {
    /// Plain-text report, amounts in `currency`
    pub fn render_text(&self, currency: &str) -> String {
        let money = |v: f64| format_currency(v, currency);
        let count = |v: f64| format_count(v as usize);
        let share = |v: f64| format_percentage(v * 100.0);

        let mut out = String::new();

        match self.filters.date_range {
            Some(range) => out.push_str(&format!(
                "Showing data from {} to {} | {} order items | {} unique orders\n",
                range.start(),
                range.end(),
                format_count(self.filters.lines),
                format_count(self.filters.orders)
            )),
            None => out.push_str("No order data\n"),
        }

        let exec = &self.executive;
        out.push_str("\nExecutive view\n");
        out.push_str(&format!("  Total revenue          {}\n", money(exec.revenue.total_revenue)));
        out.push_str(&format!("  Total orders           {}\n", format_count(exec.revenue.order_count)));
        out.push_str(&format!("  Average order value    {}\n", money(exec.revenue.average_order_value)));
        out.push_str(&format!("  Total discount given   {}\n", money(exec.revenue.total_discount)));
        out.push_str(&format!("  Total refund amount    {}\n", money(exec.revenue.total_refund)));
        if let Some(growth) = &exec.growth {
            out.push_str(&format!(
                "  Growth vs {} to {}  {}\n",
                growth.previous.start(),
                growth.previous.end(),
                format_percentage(growth.growth_pct)
            ));
        }
        out.push_str(&format!("  Repeat customer rate   {}\n", share(exec.customers.repeat_rate)));

        section(&mut out, "Monthly revenue", &exec.monthly_revenue, money);
        section(&mut out, "Revenue by city", &exec.revenue_by_city, money);
        section(&mut out, "Revenue by channel", &exec.revenue_by_channel, money);
        section(&mut out, "Revenue by segment", &exec.revenue_by_segment, money);
        section(&mut out, "Revenue by category", &exec.revenue_by_category, money);
        section(&mut out, "Discount % by category", &exec.discount_by_category, format_percentage);
        section(&mut out, "Customers by segment", &exec.customers_by_segment, count);

        let ops = &self.operations;
        out.push_str("\nOperations view\n");
        out.push_str(&format!(
            "  On-time delivery       {}{}\n",
            share(ops.delivery.on_time),
            if ops.health.on_time_ok { "" } else { "  (needs attention)" }
        ));
        out.push_str(&format!(
            "  Delayed delivery       {}{}\n",
            share(ops.delivery.delayed),
            if ops.health.delayed_high { "  (high)" } else { "" }
        ));
        out.push_str(&format!(
            "  Failed delivery        {}{}\n",
            share(ops.delivery.failed),
            if ops.health.failed_critical { "  (critical)" } else { "" }
        ));
        out.push_str(&format!(
            "  Return rate            {}{}\n",
            share(ops.returns.return_rate),
            if ops.returns.high { "  (high)" } else { "" }
        ));

        section(&mut out, "Delivery status", &ops.status_distribution, count);
        if !ops.hub_performance.is_empty() {
            out.push_str("\nWarehouse hubs (on time / delayed)\n");
            for hub in &ops.hub_performance {
                out.push_str(&format!("  {:<28} {:>7} / {:<7}\n", hub.hub, hub.on_time, hub.delayed));
            }
        }
        section(&mut out, "Delays by zone", &ops.delays_by_zone, count);
        section(&mut out, "Top delay reasons", &ops.delay_reasons, count);
        if !ops.partners.is_empty() {
            out.push_str("\nDelivery partners (deliveries, on time)\n");
            for partner in &ops.partners {
                out.push_str(&format!(
                    "  {:<28} {:>7} {:>8}\n",
                    partner.partner,
                    partner.deliveries,
                    share(partner.on_time_rate)
                ));
            }
        }
        section(&mut out, "Returns by category", &ops.returns_by_category, count);
        section(&mut out, "Returns by city", &ops.returns_by_city, count);
        section(&mut out, "Refund status", &ops.refund_statuses, count);

        out
    }
}
