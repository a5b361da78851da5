//! Per-date availability.
//!
//! Combines the weekly hours with calendar exceptions into the effective
//! schedule of one calendar date. Closed days are a normal result, only
//! malformed configuration is an error.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::TimeInterval;
use crate::error::Result;

use super::{weekday_index, BusinessHoursStore};

/// Which piece of configuration decided a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilitySource {
    /// The weekday's business hours (or their absence).
    Weekly,
    /// A calendar exception for this exact date.
    Exception,
}

/// Effective schedule of a single date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub is_open: bool,
    /// `[open_time, close_time)` when open.
    pub operating_interval: Option<TimeInterval>,
    /// Window excluded from slot generation.
    pub break_interval: Option<TimeInterval>,
    pub source: AvailabilitySource,
}

impl DayAvailability {
    pub fn closed(date: NaiveDate, source: AvailabilitySource) -> Self {
        Self {
            date,
            is_open: false,
            operating_interval: None,
            break_interval: None,
            source,
        }
    }

    pub fn open(
        date: NaiveDate,
        operating_interval: TimeInterval,
        break_interval: Option<TimeInterval>,
        source: AvailabilitySource,
    ) -> Self {
        Self {
            date,
            is_open: true,
            operating_interval: Some(operating_interval),
            break_interval,
            source,
        }
    }
}

/// Resolves [`DayAvailability`] from a [`BusinessHoursStore`].
pub struct DayAvailabilityResolver<H> {
    hours: H,
}

impl<H: BusinessHoursStore> DayAvailabilityResolver<H> {
    pub fn new(hours: H) -> Self {
        Self { hours }
    }

    /// Effective schedule for `date`.
    ///
    /// # Errors
    /// Returns an error if the store fails or the applicable configuration
    /// (exception or weekday) is malformed.
    pub fn resolve(&self, date: NaiveDate) -> Result<DayAvailability> {
        if let Some(exception) = self.hours.get_exception(date)? {
            return Ok(match exception.windows()? {
                Some((operating, brk)) => {
                    DayAvailability::open(date, operating, brk, AvailabilitySource::Exception)
                }
                None => DayAvailability::closed(date, AvailabilitySource::Exception),
            });
        }

        let day = match self.hours.get_day_config(weekday_index(date))? {
            Some(day) if day.is_active => day,
            _ => return Ok(DayAvailability::closed(date, AvailabilitySource::Weekly)),
        };

        let (operating, brk) = day.windows()?;
        Ok(DayAvailability::open(
            date,
            operating,
            brk,
            AvailabilitySource::Weekly,
        ))
    }
}
