//! Weekly business-hours configuration.

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::clock::{format_hhmm, hhmm, hhmm_opt, TimeInterval};
use crate::error::HoursError;

/// Weekday names indexed Monday = 0 .. Sunday = 6.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Weekday index of a date, Monday = 0.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_monday() as u8
}

/// Human name for a weekday index. Out-of-range indexes map to `"?"`.
pub fn weekday_name(weekday: u8) -> &'static str {
    WEEKDAY_NAMES.get(weekday as usize).copied().unwrap_or("?")
}

/// Parse a weekday from an index (`0`..`6`) or a name/prefix (`mon`, `Tuesday`).
pub fn parse_weekday(value: &str) -> Result<u8, HoursError> {
    let trimmed = value.trim();
    if let Ok(n) = trimmed.parse::<u8>() {
        return if n <= 6 {
            Ok(n)
        } else {
            Err(HoursError::InvalidWeekday(n))
        };
    }
    let lower = trimmed.to_ascii_lowercase();
    WEEKDAY_NAMES
        .iter()
        .position(|name| lower.len() >= 3 && name.to_ascii_lowercase().starts_with(&lower))
        .map(|i| i as u8)
        .ok_or_else(|| HoursError::UnknownWeekday(trimmed.to_string()))
}

/// Opening hours for one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessDay {
    /// 0 = Monday .. 6 = Sunday
    pub weekday: u8,
    #[serde(with = "hhmm")]
    pub open_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub close_time: NaiveTime,
    #[serde(default, with = "hhmm_opt")]
    pub break_start: Option<NaiveTime>,
    #[serde(default, with = "hhmm_opt")]
    pub break_end: Option<NaiveTime>,
    pub is_active: bool,
}

impl BusinessDay {
    /// An active day without a break.
    pub fn open(weekday: u8, open_time: NaiveTime, close_time: NaiveTime) -> Self {
        Self {
            weekday,
            open_time,
            close_time,
            break_start: None,
            break_end: None,
            is_active: true,
        }
    }

    /// An inactive day. The stored times are placeholders and never used.
    pub fn closed(weekday: u8) -> Self {
        Self {
            is_active: false,
            ..Self::open(weekday, default_open(), default_close())
        }
    }

    pub fn with_break(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.break_start = Some(start);
        self.break_end = Some(end);
        self
    }

    /// Check the invariants of an active day. Inactive days are always valid.
    pub fn validate(&self) -> Result<(), HoursError> {
        if self.weekday > 6 {
            return Err(HoursError::InvalidWeekday(self.weekday));
        }
        if !self.is_active {
            return Ok(());
        }
        validate_window(
            self.open_time,
            self.close_time,
            self.break_start,
            self.break_end,
        )
        .map(|_| ())
    }

    /// Operating interval and optional break, validated.
    pub fn windows(&self) -> Result<(TimeInterval, Option<TimeInterval>), HoursError> {
        validate_window(
            self.open_time,
            self.close_time,
            self.break_start,
            self.break_end,
        )
    }

    /// Monday to Saturday 09:00-18:00, Sunday closed.
    pub fn standard_week() -> Vec<BusinessDay> {
        (0..7u8)
            .map(|weekday| {
                if weekday == 6 {
                    BusinessDay::closed(weekday)
                } else {
                    BusinessDay::open(weekday, default_open(), default_close())
                }
            })
            .collect()
    }
}

fn default_open() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn default_close() -> NaiveTime {
    NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Validate an operating window with an optional break.
///
/// The break must be fully specified, non-empty, and lie within
/// `[open, close]`. Returns the operating interval and the break interval.
pub fn validate_window(
    open: NaiveTime,
    close: NaiveTime,
    break_start: Option<NaiveTime>,
    break_end: Option<NaiveTime>,
) -> Result<(TimeInterval, Option<TimeInterval>), HoursError> {
    if open >= close {
        return Err(HoursError::InvertedHours {
            open: format_hhmm(open),
            close: format_hhmm(close),
        });
    }
    let operating = TimeInterval::new(open, close);

    let break_interval = match (break_start, break_end) {
        (None, None) => None,
        (Some(start), Some(end)) => {
            if start >= end {
                return Err(HoursError::InvertedBreak {
                    start: format_hhmm(start),
                    end: format_hhmm(end),
                });
            }
            let interval = TimeInterval::new(start, end);
            if !operating.contains(&interval) {
                return Err(HoursError::BreakOutsideHours {
                    start: format_hhmm(start),
                    end: format_hhmm(end),
                    open: format_hhmm(open),
                    close: format_hhmm(close),
                });
            }
            Some(interval)
        }
        _ => return Err(HoursError::IncompleteBreak),
    };

    Ok((operating, break_interval))
}
