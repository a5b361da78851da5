//! Wall-clock helpers.
//!
//! All scheduling arithmetic happens in whole minutes since midnight on the
//! business's civil clock. No timezone conversion is ever applied.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::HoursError;

/// Minutes in a civil day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Minutes elapsed since midnight, ignoring seconds.
pub fn minutes_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Inverse of [`minutes_of_day`]. `None` at or past midnight.
pub fn time_from_minutes(minutes: u32) -> Option<NaiveTime> {
    if minutes >= MINUTES_PER_DAY {
        return None;
    }
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}

/// Parse an `HH:MM` (or `HH:MM:SS`) string. Seconds are truncated.
pub fn parse_hhmm(field: &str, value: &str) -> Result<NaiveTime, HoursError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .ok()
        .and_then(|t| time_from_minutes(minutes_of_day(t)))
        .ok_or_else(|| HoursError::InvalidTime {
            field: field.to_string(),
            value: value.to_string(),
        })
}

/// Format as `HH:MM`.
pub fn format_hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// A half-open wall-clock interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl TimeInterval {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Build from minute offsets. `None` when either bound is not a valid time.
    pub fn from_minutes(start: u32, end: u32) -> Option<Self> {
        Some(Self {
            start: time_from_minutes(start)?,
            end: time_from_minutes(end)?,
        })
    }

    pub fn start_minutes(&self) -> u32 {
        minutes_of_day(self.start)
    }

    pub fn end_minutes(&self) -> u32 {
        minutes_of_day(self.end)
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end_minutes().saturating_sub(self.start_minutes())
    }

    /// True when the two half-open intervals share at least one minute.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start_minutes() < other.end_minutes() && other.start_minutes() < self.end_minutes()
    }

    /// True when `other` lies entirely inside this interval.
    pub fn contains(&self, other: &TimeInterval) -> bool {
        self.start_minutes() <= other.start_minutes() && other.end_minutes() <= self.end_minutes()
    }
}

impl std::fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", format_hhmm(self.start), format_hhmm(self.end))
    }
}

/// Serde adapter storing `NaiveTime` as `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_hhmm(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_hhmm("time", &raw).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter storing `Option<NaiveTime>` as `HH:MM` or null.
pub mod hhmm_opt {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        time: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => serializer.serialize_some(&super::format_hhmm(*t)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|s| super::parse_hhmm("time", &s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn minutes_roundtrip_through_time() {
        assert_eq!(minutes_of_day(t(9, 30)), 570);
        assert_eq!(time_from_minutes(570), Some(t(9, 30)));
        assert_eq!(time_from_minutes(MINUTES_PER_DAY), None);
    }

    #[test]
    fn parse_accepts_seconds_and_rejects_garbage() {
        assert_eq!(parse_hhmm("open_time", "09:00").unwrap(), t(9, 0));
        assert_eq!(parse_hhmm("open_time", "17:45:30").unwrap(), t(17, 45));
        let err = parse_hhmm("open_time", "25:99").unwrap_err();
        assert_eq!(
            err,
            HoursError::InvalidTime {
                field: "open_time".into(),
                value: "25:99".into()
            }
        );
    }

    #[test]
    fn half_open_intervals_touching_do_not_overlap() {
        let morning = TimeInterval::new(t(11, 30), t(12, 0));
        let lunch = TimeInterval::new(t(12, 0), t(13, 0));
        assert!(!morning.overlaps(&lunch));
        assert!(!lunch.overlaps(&morning));
        let straddle = TimeInterval::new(t(11, 45), t(12, 15));
        assert!(straddle.overlaps(&lunch));
    }

    #[test]
    fn interval_serializes_as_hhmm() {
        let iv = TimeInterval::new(t(9, 0), t(18, 0));
        let json = serde_json::to_string(&iv).unwrap();
        assert_eq!(json, r#"{"start":"09:00","end":"18:00"}"#);
        assert_eq!(iv.to_string(), "09:00-18:00");
    }
}
