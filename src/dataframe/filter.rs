//! Row filtering over enriched order lines

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::records::EnrichedOrderLine;
use crate::temporal::DateRange;

/// Sentinel meaning "no restriction" in a selection list
pub const DEFAULT_ALL_SENTINEL: &str = "All";

/// Membership filter on one categorical dimension
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// Does not restrict
    #[default]
    All,
    /// Keep rows whose value is one of these
    Only(BTreeSet<String>),
}

impl Selection {
    /// Build a selection from user-provided values
    ///
    /// An empty list, or one containing `sentinel`, selects everything.
    pub fn from_values<I, S>(values: I, sentinel: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() || values.contains(sentinel) {
            Selection::All
        } else {
            Selection::Only(values)
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    /// Whether a row value passes; a missing value never passes an active filter
    pub fn allows(&self, value: Option<&str>) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(values) => value.map_or(false, |v| values.contains(v)),
        }
    }
}

/// Filter criteria for the dashboard view
///
/// Dimensions are combined with AND, values within one dimension with OR.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSpec {
    /// Inclusive range on the date part of `order_date`
    pub date_range: Option<DateRange>,
    pub cities: Selection,
    pub channels: Selection,
    pub segments: Selection,
}

impl FilterSpec {
    /// A filter that keeps everything
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn with_cities(mut self, cities: Selection) -> Self {
        self.cities = cities;
        self
    }

    pub fn with_channels(mut self, channels: Selection) -> Self {
        self.channels = channels;
        self
    }

    pub fn with_segments(mut self, segments: Selection) -> Self {
        self.segments = segments;
        self
    }

    /// Same categorical filters, no date restriction
    pub fn without_date_range(&self) -> Self {
        FilterSpec {
            date_range: None,
            ..self.clone()
        }
    }

    pub fn matches(&self, line: &EnrichedOrderLine) -> bool {
        if let Some(range) = &self.date_range {
            if !range.contains(line.order_date.date()) {
                return false;
            }
        }

        self.cities.allows(line.city.as_deref())
            && self.channels.allows(line.order_channel.as_deref())
            && self.segments.allows(line.customer_segment.as_deref())
    }

    /// Matching lines as a new vector, in input order
    pub fn apply(&self, lines: &[EnrichedOrderLine]) -> Vec<EnrichedOrderLine> {
        lines.iter().filter(|line| self.matches(line)).cloned().collect()
    }
}

/// Shorthand for [`FilterSpec::apply`]
pub fn apply_filters(lines: &[EnrichedOrderLine], spec: &FilterSpec) -> Vec<EnrichedOrderLine> {
    let filtered = spec.apply(lines);
    log::debug!("filter kept {} of {} lines", filtered.len(), lines.len());
    filtered
}

/// Values a user can pick from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    /// Sentinel first, then sorted distinct values
    pub cities: Vec<String>,
    pub channels: Vec<String>,
    pub segments: Vec<String>,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
}

impl FilterOptions {
    /// Full date range of the data, if any
    pub fn date_range(&self) -> Option<DateRange> {
        match (self.min_date, self.max_date) {
            (Some(start), Some(end)) => DateRange::new(start, end).ok(),
            _ => None,
        }
    }
}

fn options<'a, F>(lines: &'a [EnrichedOrderLine], sentinel: &str, field: F) -> Vec<String>
where
    F: Fn(&'a EnrichedOrderLine) -> Option<&'a str>,
{
    let distinct: BTreeSet<&str> = lines.iter().filter_map(field).collect();

    let mut values = Vec::with_capacity(distinct.len() + 1);
    values.push(sentinel.to_string());
    values.extend(distinct.into_iter().filter(|v| *v != sentinel).map(String::from));
    values
}

/// Collect the choices offered for each filter dimension
pub fn filter_options(lines: &[EnrichedOrderLine], sentinel: &str) -> FilterOptions {
    FilterOptions {
        cities: options(lines, sentinel, |l| l.city.as_deref()),
        channels: options(lines, sentinel, |l| l.order_channel.as_deref()),
        segments: options(lines, sentinel, |l| l.customer_segment.as_deref()),
        min_date: lines.iter().map(|l| l.day).min(),
        max_date: lines.iter().map(|l| l.day).max(),
    }
}
