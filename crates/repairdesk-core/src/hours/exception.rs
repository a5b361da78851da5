//! Date-specific overrides of the weekly hours (holidays, short days).

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::clock::{hhmm, hhmm_opt, TimeInterval};
use crate::error::HoursError;

use super::business_day::validate_window;

/// What a calendar exception does to its date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExceptionKind {
    /// Shop is closed all day.
    Closed,
    /// Shop opens with these hours instead of the weekly ones.
    SpecialHours {
        #[serde(with = "hhmm")]
        open_time: NaiveTime,
        #[serde(with = "hhmm")]
        close_time: NaiveTime,
        #[serde(default, with = "hhmm_opt")]
        break_start: Option<NaiveTime>,
        #[serde(default, with = "hhmm_opt")]
        break_end: Option<NaiveTime>,
    },
}

/// Override for a single calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarException {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub kind: ExceptionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl CalendarException {
    pub fn closed(date: NaiveDate) -> Self {
        Self {
            date,
            kind: ExceptionKind::Closed,
            note: None,
        }
    }

    pub fn special_hours(date: NaiveDate, open_time: NaiveTime, close_time: NaiveTime) -> Self {
        Self {
            date,
            kind: ExceptionKind::SpecialHours {
                open_time,
                close_time,
                break_start: None,
                break_end: None,
            },
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Operating windows for the date, or `None` when the exception closes it.
    pub fn windows(&self) -> Result<Option<(TimeInterval, Option<TimeInterval>)>, HoursError> {
        match &self.kind {
            ExceptionKind::Closed => Ok(None),
            ExceptionKind::SpecialHours {
                open_time,
                close_time,
                break_start,
                break_end,
            } => validate_window(*open_time, *close_time, *break_start, *break_end).map(Some),
        }
    }

    pub fn validate(&self) -> Result<(), HoursError> {
        self.windows().map(|_| ())
    }
}
