//! Aggregation tests over the shared fixture


use chrono::NaiveDate;
use pipeline_test_utils::{approx_eq, config_for, write_fixture};
use souqdash::stats::{self, Granularity};
use souqdash::{Breakdown, DateRange, Dataset, FilterSpec, Result, Selection, TableLoader};
use tempfile::tempdir;

fn dataset() -> Result<Dataset> {
    let dir = tempdir()?;
    write_fixture(dir.path())?;
    Dataset::load(&TableLoader::new(config_for(dir.path())))
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_revenue_counts_each_order_once() -> Result<()> {
    let data = dataset()?;
    let summary = stats::revenue_summary(&data.lines);

    assert_eq!(summary.total_revenue, 800.0);
    assert_eq!(summary.order_count, 5);
    assert_eq!(summary.average_order_value, 160.0);
    assert_eq!(summary.total_discount, 50.0);
    assert_eq!(summary.total_refund, 270.0);

    Ok(())
}

#[test]
fn test_revenue_breakdowns() -> Result<()> {
    let data = dataset()?;

    assert_eq!(
        stats::revenue_by_city(&data.lines),
        vec![
            Breakdown::new("Abu Dhabi", 350.0),
            Breakdown::new("Dubai", 300.0),
            Breakdown::new("Sharjah", 150.0),
        ]
    );
    assert_eq!(
        stats::revenue_by_channel(&data.lines),
        vec![Breakdown::new("App", 550.0), Breakdown::new("Web", 250.0)]
    );
    assert_eq!(
        stats::revenue_by_category(&data.lines),
        vec![
            Breakdown::new("Electronics", 420.0),
            Breakdown::new("Home", 230.0),
            Breakdown::new("Fashion", 100.0),
            Breakdown::new("Accessories", 50.0),
        ]
    );

    // Segment-less customer C3 is dropped
    assert_eq!(
        stats::revenue_by_segment(&data.lines),
        vec![Breakdown::new("Regular", 350.0), Breakdown::new("Premium", 300.0)]
    );

    Ok(())
}

#[test]
fn test_discount_share_by_category() -> Result<()> {
    let data = dataset()?;
    let shares = stats::discount_by_category(&data.lines);

    // Electronics lines: O1 (20 off 200 net) and O3 (30 off 270 net)
    let electronics = shares.iter().find(|b| b.label == "Electronics").unwrap();
    assert!(approx_eq(electronics.value, 50.0 / 520.0 * 100.0));

    let fashion = shares.iter().find(|b| b.label == "Fashion").unwrap();
    assert_eq!(fashion.value, 0.0);

    Ok(())
}

#[test]
fn test_trends_are_chronological() -> Result<()> {
    let data = dataset()?;

    let monthly = stats::revenue_trend(&data.lines, Granularity::Month);
    assert_eq!(
        monthly,
        vec![Breakdown::new("2024-01", 300.0), Breakdown::new("2024-02", 500.0)]
    );

    let daily = stats::revenue_trend(&data.lines, Granularity::Day);
    assert_eq!(daily.len(), 5);
    assert_eq!(daily[0], Breakdown::new("2024-01-05", 200.0));

    let weekly = stats::revenue_trend(&data.lines, Granularity::Week);
    let labels: Vec<&str> = weekly.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["2024-01-01", "2024-01-15", "2024-01-29", "2024-02-05", "2024-02-12"]);

    Ok(())
}

#[test]
fn test_period_over_period_growth() -> Result<()> {
    let data = dataset()?;
    let february = DateRange::new(date(2024, 2, 1), date(2024, 2, 29))?;

    let growth = stats::period_over_period(&data.lines, &FilterSpec::new(), february)?;
    assert_eq!(growth.previous, DateRange::new(date(2024, 1, 3), date(2024, 1, 31))?);
    assert_eq!(growth.current_revenue, 500.0);
    assert_eq!(growth.previous_revenue, 300.0);
    assert!(approx_eq(growth.growth_pct, 200.0 / 300.0 * 100.0));

    Ok(())
}

#[test]
fn test_growth_keeps_categorical_filters() -> Result<()> {
    let data = dataset()?;
    let february = DateRange::new(date(2024, 2, 1), date(2024, 2, 29))?;
    let spec = FilterSpec::new().with_cities(Selection::from_values(["Abu Dhabi"], "All"));

    // Abu Dhabi has no January orders
    let growth = stats::period_over_period(&data.lines, &spec, february)?;
    assert_eq!(growth.current_revenue, 350.0);
    assert_eq!(growth.previous_revenue, 0.0);
    assert_eq!(growth.growth_pct, 0.0);

    Ok(())
}

#[test]
fn test_delivery_figures() -> Result<()> {
    let data = dataset()?;
    let rates = stats::delivery_rates(&data.lines);

    // Five lines carry a status: O1 twice, O2, O3, O5
    assert_eq!(rates.deliveries, 5);
    assert!(approx_eq(rates.on_time, 0.4));
    assert!(approx_eq(rates.delayed, 0.4));
    assert!(approx_eq(rates.failed, 0.2));

    assert_eq!(
        stats::status_distribution(&data.lines),
        vec![
            Breakdown::new("Delayed", 2.0),
            Breakdown::new("On Time", 2.0),
            Breakdown::new("Failed", 1.0),
        ]
    );
    assert_eq!(
        stats::delays_by_zone(&data.lines),
        vec![Breakdown::new("Zone B", 1.0), Breakdown::new("Zone C", 1.0)]
    );

    let hubs = stats::hub_performance(&data.lines);
    assert_eq!(hubs.len(), 2);
    assert_eq!((hubs[0].hub.as_str(), hubs[0].on_time, hubs[0].delayed), ("Jebel Ali", 2, 1));
    assert_eq!((hubs[1].hub.as_str(), hubs[1].on_time, hubs[1].delayed), ("Mussafah", 0, 1));

    Ok(())
}

#[test]
fn test_partner_breakdown_follows_filters() -> Result<()> {
    let data = dataset()?;
    let vocabulary = souqdash::DashboardConfig::default().vocabulary;

    let partners = stats::partner_performance(&data.lines, &data.tables.fulfillment, &vocabulary);
    assert_eq!(partners.len(), 2);
    assert_eq!(partners[0].partner, "Aramex");
    assert_eq!(partners[0].deliveries, 2);
    assert_eq!(partners[0].on_time_rate, 0.5);
    assert_eq!(partners[1].on_time_rate, 0.0);

    let dubai_only = FilterSpec::new()
        .with_cities(Selection::from_values(["Dubai"], "All"))
        .apply(&data.lines);
    let partners = stats::partner_performance(&dubai_only, &data.tables.fulfillment, &vocabulary);
    assert_eq!(partners.len(), 1);
    assert_eq!(partners[0].partner, "Aramex");

    Ok(())
}

#[test]
fn test_return_figures() -> Result<()> {
    let data = dataset()?;

    let returns = stats::return_rate(&data.lines);
    assert_eq!(returns.returned_lines, 1);
    assert!(approx_eq(returns.return_rate, 1.0 / 6.0));

    assert_eq!(stats::returns_by_category(&data.lines), vec![Breakdown::new("Electronics", 1.0)]);
    assert_eq!(stats::returns_by_city(&data.lines), vec![Breakdown::new("Abu Dhabi", 1.0)]);
    assert_eq!(
        stats::refund_status_breakdown(&data.lines, &data.tables.returns),
        vec![Breakdown::new("Processed", 1.0)]
    );

    Ok(())
}

#[test]
fn test_customer_figures() -> Result<()> {
    let data = dataset()?;

    let customers = stats::repeat_customer_rate(&data.lines);
    assert_eq!(customers.customers, 3);
    assert_eq!(customers.repeat_customers, 2);

    assert_eq!(
        stats::customers_by_segment(&data.lines),
        vec![Breakdown::new("Premium", 1.0), Breakdown::new("Regular", 1.0)]
    );

    Ok(())
}

#[test]
fn test_empty_input_is_not_an_error() {
    let summary = stats::revenue_summary(&[]);
    assert_eq!(summary.average_order_value, 0.0);
    assert_eq!(stats::delivery_rates(&[]).on_time, 0.0);
    assert_eq!(stats::return_rate(&[]).return_rate, 0.0);
    assert_eq!(stats::repeat_customer_rate(&[]).repeat_rate, 0.0);
    assert!(stats::revenue_by_city(&[]).is_empty());
}
