//! Read interface over the business-hours configuration.

use chrono::NaiveDate;

use crate::error::Result;

use super::{BusinessDay, CalendarException};

/// Source of weekly hours and per-date exceptions.
///
/// The scheduling core only reads through this trait. Implementations return
/// `Err` for rows that exist but cannot be decoded; a missing row is `Ok(None)`.
pub trait BusinessHoursStore {
    /// Hours for a weekday, Monday = 0.
    fn get_day_config(&self, weekday: u8) -> Result<Option<BusinessDay>>;

    /// Exception for a specific date, if any.
    fn get_exception(&self, date: NaiveDate) -> Result<Option<CalendarException>>;
}

impl<T: BusinessHoursStore + ?Sized> BusinessHoursStore for &T {
    fn get_day_config(&self, weekday: u8) -> Result<Option<BusinessDay>> {
        (**self).get_day_config(weekday)
    }

    fn get_exception(&self, date: NaiveDate) -> Result<Option<CalendarException>> {
        (**self).get_exception(date)
    }
}
