//! Generate requests and their validation.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::slots::SlotDuration;

/// Bounds on `days_ahead`, also the cap on an explicit range's span.
pub const MIN_DAYS_AHEAD: u32 = 1;
pub const MAX_DAYS_AHEAD: u32 = 90;
pub const DEFAULT_DAYS_AHEAD: u32 = 30;

fn default_days_ahead() -> u32 {
    DEFAULT_DAYS_AHEAD
}

fn default_slot_duration() -> u32 {
    SlotDuration::DEFAULT
}

/// Parameters of a batch generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_days_ahead")]
    pub days_ahead: u32,
    #[serde(default = "default_slot_duration")]
    pub slot_duration_minutes: u32,
    #[serde(default)]
    pub force: bool,
}

impl Default for GenerateRequest {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            days_ahead: default_days_ahead(),
            slot_duration_minutes: default_slot_duration(),
            force: false,
        }
    }
}

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Number of calendar days, both ends included.
    pub fn day_count(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    /// Dates in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..self.day_count() as i64)
            .map_while(move |offset| start.checked_add_signed(Duration::days(offset)))
    }
}

/// A request after validation, ready to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    pub range: DateRange,
    pub duration: SlotDuration,
    pub force: bool,
}

impl GenerateRequest {
    /// Validate the request and anchor any missing dates on `today`.
    ///
    /// - neither date: `[today, today + days_ahead]`
    /// - start only: `[start, start + days_ahead]`
    /// - end only: `[today, end]`
    ///
    /// # Errors
    /// Returns a [`ValidationError`] for out-of-bounds parameters, an inverted
    /// range, a range spanning more than [`MAX_DAYS_AHEAD`] days, or one that
    /// would end past [`NaiveDate::MAX`].
    pub fn plan(&self, today: NaiveDate) -> Result<BatchPlan, ValidationError> {
        let duration = SlotDuration::new(self.slot_duration_minutes)?;
        if !(MIN_DAYS_AHEAD..=MAX_DAYS_AHEAD).contains(&self.days_ahead) {
            return Err(ValidationError::DaysAheadOutOfRange {
                value: self.days_ahead,
                min: MIN_DAYS_AHEAD,
                max: MAX_DAYS_AHEAD,
            });
        }

        let ahead = Duration::days(i64::from(self.days_ahead));
        let extend = |start: NaiveDate| {
            start
                .checked_add_signed(ahead)
                .ok_or(ValidationError::DateOutOfRange {
                    start,
                    days: self.days_ahead,
                })
        };
        let (start, end) = match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => (start, end),
            (Some(start), None) => (start, extend(start)?),
            (None, Some(end)) => (today, end),
            (None, None) => (today, extend(today)?),
        };

        let range = DateRange::new(start, end)?;
        let span = (end - start).num_days();
        if span > i64::from(MAX_DAYS_AHEAD) {
            return Err(ValidationError::RangeTooLarge {
                start,
                end,
                days: span,
                max: MAX_DAYS_AHEAD,
            });
        }

        Ok(BatchPlan {
            range,
            duration,
            force: self.force,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn defaults_anchor_on_today() {
        let plan = GenerateRequest::default().plan(d("2025-03-01")).unwrap();
        assert_eq!(plan.range.start, d("2025-03-01"));
        assert_eq!(plan.range.end, d("2025-03-31"));
        assert_eq!(plan.range.day_count(), 31);
        assert_eq!(plan.duration.minutes(), 30);
        assert!(!plan.force);
    }

    #[test]
    fn explicit_range_wins() {
        let req = GenerateRequest {
            start_date: Some(d("2025-04-01")),
            end_date: Some(d("2025-04-10")),
            ..Default::default()
        };
        let plan = req.plan(d("2025-03-01")).unwrap();
        assert_eq!(plan.range.day_count(), 10);
        let days: Vec<_> = plan.range.days().collect();
        assert_eq!(days.first(), Some(&d("2025-04-01")));
        assert_eq!(days.last(), Some(&d("2025-04-10")));
    }

    #[test]
    fn start_only_extends_by_days_ahead() {
        let req = GenerateRequest {
            start_date: Some(d("2025-04-01")),
            days_ahead: 6,
            ..Default::default()
        };
        let plan = req.plan(d("2025-03-01")).unwrap();
        assert_eq!(plan.range.end, d("2025-04-07"));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let req = GenerateRequest {
            start_date: Some(d("2025-04-10")),
            end_date: Some(d("2025-04-01")),
            ..Default::default()
        };
        assert!(matches!(
            req.plan(d("2025-03-01")),
            Err(ValidationError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn bounds_are_enforced() {
        let today = d("2025-03-01");
        let bad_duration = GenerateRequest {
            slot_duration_minutes: 10,
            ..Default::default()
        };
        assert!(matches!(
            bad_duration.plan(today),
            Err(ValidationError::SlotDurationOutOfRange { value: 10, .. })
        ));

        let bad_days = GenerateRequest {
            days_ahead: 91,
            ..Default::default()
        };
        assert!(matches!(
            bad_days.plan(today),
            Err(ValidationError::DaysAheadOutOfRange { value: 91, .. })
        ));

        let too_long = GenerateRequest {
            start_date: Some(d("2025-01-01")),
            end_date: Some(d("2025-06-01")),
            ..Default::default()
        };
        assert!(matches!(
            too_long.plan(today),
            Err(ValidationError::RangeTooLarge { .. })
        ));
    }

    #[test]
    fn range_past_last_date_is_rejected() {
        let near_end = NaiveDate::MAX - Duration::days(3);
        let start_only = GenerateRequest {
            start_date: Some(near_end),
            ..Default::default()
        };
        assert_eq!(
            start_only.plan(d("2025-03-01")),
            Err(ValidationError::DateOutOfRange {
                start: near_end,
                days: 30
            })
        );
        assert!(matches!(
            GenerateRequest::default().plan(near_end),
            Err(ValidationError::DateOutOfRange { .. })
        ));

        let explicit = GenerateRequest {
            start_date: Some(near_end),
            end_date: Some(NaiveDate::MAX),
            ..Default::default()
        };
        assert_eq!(explicit.plan(near_end).unwrap().range.days().count(), 4);
    }

    #[test]
    fn request_deserializes_with_defaults() {
        let req: GenerateRequest = serde_json::from_str(r#"{"force": true}"#).unwrap();
        assert_eq!(req.days_ahead, 30);
        assert_eq!(req.slot_duration_minutes, 30);
        assert!(req.force);
    }
}
