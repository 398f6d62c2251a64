//! Inclusive calendar date ranges and the comparison period used for growth

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An inclusive `[start, end]` range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a date range; `start` may equal `end` for a single day
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidInput(format!(
                "Start date {} must not be later than end date {}",
                start, end
            )));
        }

        Ok(DateRange { start, end })
    }

    /// A range covering a single day
    pub fn single(day: NaiveDate) -> Self {
        DateRange {
            start: day,
            end: day,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the range, both ends counted
    pub fn len_days(&self) -> u64 {
        (self.end - self.start).num_days() as u64 + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The immediately preceding, non-overlapping range of the same length
    ///
    /// `[s, e]` maps to `[s - (e - s + 1) days, s - 1 day]`.
    pub fn previous(&self) -> Result<Self> {
        let len = Days::new(self.len_days());
        let start = self
            .start
            .checked_sub_days(len)
            .ok_or_else(|| Error::InvalidInput(format!("No period precedes {}", self.start)))?;
        let end = self
            .start
            .checked_sub_days(Days::new(1))
            .ok_or_else(|| Error::InvalidInput(format!("No period precedes {}", self.start)))?;

        DateRange::new(start, end)
    }
}
