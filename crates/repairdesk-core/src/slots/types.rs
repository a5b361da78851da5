//! Slot records, their booking state and the bounded slot length.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::clock::{hhmm, TimeInterval};
use crate::error::ValidationError;

/// Booking state of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Booked,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Available => "available",
            SlotStatus::Booked => "booked",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "available" => Some(SlotStatus::Available),
            "booked" => Some(SlotStatus::Booked),
            _ => None,
        }
    }
}

/// A bookable interval on one date. Identified by `(date, start_time)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub status: SlotStatus,
}

impl Slot {
    pub fn available(date: NaiveDate, interval: TimeInterval) -> Self {
        Self {
            date,
            start_time: interval.start,
            end_time: interval.end,
            status: SlotStatus::Available,
        }
    }

    pub fn interval(&self) -> TimeInterval {
        TimeInterval::new(self.start_time, self.end_time)
    }

    pub fn is_booked(&self) -> bool {
        self.status == SlotStatus::Booked
    }
}

/// Slot length in minutes, bounded to `[MIN, MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SlotDuration(u32);

impl SlotDuration {
    pub const MIN: u32 = 15;
    pub const MAX: u32 = 120;
    pub const DEFAULT: u32 = 30;

    pub fn new(minutes: u32) -> Result<Self, ValidationError> {
        if (Self::MIN..=Self::MAX).contains(&minutes) {
            Ok(Self(minutes))
        } else {
            Err(ValidationError::SlotDurationOutOfRange {
                value: minutes,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }
}

impl Default for SlotDuration {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<u32> for SlotDuration {
    type Error = ValidationError;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        Self::new(minutes)
    }
}

impl From<SlotDuration> for u32 {
    fn from(duration: SlotDuration) -> Self {
        duration.0
    }
}
