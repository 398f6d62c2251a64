//! Filter engine tests


use chrono::NaiveDate;
use pipeline_test_utils::{config_for, write_fixture};
use souqdash::dataframe::filter_options;
use souqdash::{apply_filters, DateRange, Dataset, FilterSpec, Result, Selection, TableLoader};
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
fn test_empty_spec_keeps_everything() -> Result<()> {
    let data = dataset()?;
    let filtered = apply_filters(&data.lines, &FilterSpec::new());
    assert_eq!(filtered, data.lines);
    Ok(())
}

#[test]
fn test_city_filter() -> Result<()> {
    let data = dataset()?;
    let spec = FilterSpec::new().with_cities(Selection::from_values(["Abu Dhabi"], "All"));

    let filtered = apply_filters(&data.lines, &spec);
    let ids: Vec<&str> = filtered.iter().map(|l| l.order_id.as_str()).collect();
    assert_eq!(ids, vec!["O3", "O4"]);

    Ok(())
}

#[test]
fn test_sentinel_disables_dimension() -> Result<()> {
    let data = dataset()?;
    let spec = FilterSpec::new().with_cities(Selection::from_values(["Dubai", "All"], "All"));
    assert_eq!(apply_filters(&data.lines, &spec).len(), data.lines.len());
    Ok(())
}

#[test]
fn test_date_range_is_inclusive() -> Result<()> {
    let data = dataset()?;
    let spec = FilterSpec::new().with_date_range(DateRange::new(date(2024, 1, 20), date(2024, 2, 3))?);

    let filtered = apply_filters(&data.lines, &spec);
    let ids: Vec<&str> = filtered.iter().map(|l| l.order_id.as_str()).collect();
    assert_eq!(ids, vec!["O2", "O3"]);

    Ok(())
}

#[test]
fn test_dimensions_are_anded() -> Result<()> {
    let data = dataset()?;
    let spec = FilterSpec::new()
        .with_date_range(DateRange::new(date(2024, 2, 1), date(2024, 2, 29))?)
        .with_channels(Selection::from_values(["App"], "All"));

    let filtered = apply_filters(&data.lines, &spec);
    let ids: Vec<&str> = filtered.iter().map(|l| l.order_id.as_str()).collect();
    assert_eq!(ids, vec!["O3", "O4"]);

    Ok(())
}

#[test]
fn test_null_segment_never_matches() -> Result<()> {
    let data = dataset()?;
    // C3 has no segment
    let spec = FilterSpec::new().with_segments(Selection::from_values(["Premium", "Regular"], "All"));

    let filtered = apply_filters(&data.lines, &spec);
    assert!(filtered.iter().all(|l| l.order_id != "O5"));
    assert_eq!(filtered.len(), 5);

    Ok(())
}

#[test]
fn test_filtering_is_idempotent_and_leaves_input() -> Result<()> {
    let data = dataset()?;
    let before = data.lines.clone();
    let spec = FilterSpec::new().with_channels(Selection::from_values(["Web"], "All"));

    let once = apply_filters(&data.lines, &spec);
    let twice = apply_filters(&once, &spec);

    assert_eq!(once, twice);
    assert_eq!(data.lines, before);

    Ok(())
}

#[test]
fn test_filter_options() -> Result<()> {
    let data = dataset()?;
    let options = filter_options(&data.lines, "All");

    assert_eq!(options.cities, vec!["All", "Abu Dhabi", "Dubai", "Sharjah"]);
    assert_eq!(options.channels, vec!["All", "App", "Web"]);
    assert_eq!(options.segments, vec!["All", "Premium", "Regular"]);
    assert_eq!(options.min_date, Some(date(2024, 1, 5)));
    assert_eq!(options.max_date, Some(date(2024, 2, 15)));

    Ok(())
}
