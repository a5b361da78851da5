//! Read-only overview of upcoming slot inventory.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::hours::{weekday_index, weekday_name, BusinessHoursStore, DayAvailabilityResolver};
use crate::slots::SlotInventoryStore;

/// Default number of days covered by the status query.
pub const DEFAULT_STATUS_WINDOW_DAYS: u32 = 30;
pub const MIN_STATUS_WINDOW_DAYS: u32 = 1;
pub const MAX_STATUS_WINDOW_DAYS: u32 = 366;

/// Check a status window length against the accepted bounds.
pub fn check_window(days: u32) -> Result<u32, ValidationError> {
    if (MIN_STATUS_WINDOW_DAYS..=MAX_STATUS_WINDOW_DAYS).contains(&days) {
        Ok(days)
    } else {
        Err(ValidationError::StatusWindowOutOfRange {
            value: days,
            min: MIN_STATUS_WINDOW_DAYS,
            max: MAX_STATUS_WINDOW_DAYS,
        })
    }
}

/// Inventory state of a single date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStatus {
    pub date: NaiveDate,
    pub weekday: String,
    pub is_open: bool,
    pub has_slots: bool,
    pub slot_count: usize,
    pub booked_count: usize,
    pub needs_generation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Status of a window of dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub open_days: usize,
    pub days_needing_generation: usize,
    pub days: Vec<DayStatus>,
}

/// The window stops early at [`NaiveDate::MAX`].
pub(crate) fn collect<H, S>(
    hours: &H,
    slots: &S,
    today: NaiveDate,
    window_days: u32,
) -> Result<StatusReport, ValidationError>
where
    H: BusinessHoursStore,
    S: SlotInventoryStore,
{
    let window_days = check_window(window_days)?;
    let resolver = DayAvailabilityResolver::new(hours);
    let days: Vec<DayStatus> = (0..i64::from(window_days))
        .map_while(|offset| today.checked_add_signed(Duration::days(offset)))
        .map(|date| {
            let mut errors = Vec::new();

            let is_open = match resolver.resolve(date) {
                Ok(availability) => availability.is_open,
                Err(e) => {
                    errors.push(e.to_string());
                    false
                }
            };
            let (slot_count, booked_count) = match slots.get_slots(date) {
                Ok(list) => (list.len(), list.iter().filter(|s| s.is_booked()).count()),
                Err(e) => {
                    errors.push(e.to_string());
                    (0, 0)
                }
            };

            DayStatus {
                date,
                weekday: weekday_name(weekday_index(date)).to_string(),
                is_open,
                has_slots: slot_count > 0,
                slot_count,
                booked_count,
                needs_generation: is_open && slot_count == 0,
                error: (!errors.is_empty()).then(|| errors.join("; ")),
            }
        })
        .collect();

    Ok(StatusReport {
        start_date: today,
        end_date: days.last().map_or(today, |d| d.date),
        open_days: days.iter().filter(|d| d.is_open).count(),
        days_needing_generation: days.iter().filter(|d| d.needs_generation).count(),
        days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{BatchScheduler, GenerateRequest};
    use crate::hours::BusinessDay;
    use crate::storage::MemoryStore;
    use chrono::NaiveTime;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn reports_thirty_days_and_flags_missing_inventory() {
        let store = MemoryStore::new();
        for day in BusinessDay::standard_week() {
            store.set_day_config(day).unwrap();
        }
        let scheduler = BatchScheduler::new(&store, &store);
        let today = d("2025-03-03"); // Monday

        let before = scheduler.status(today, DEFAULT_STATUS_WINDOW_DAYS).unwrap();
        assert_eq!(before.days.len(), 30);
        assert_eq!(before.end_date, d("2025-04-01"));
        assert_eq!(before.open_days, before.days_needing_generation);

        let req = GenerateRequest {
            start_date: Some(today),
            end_date: Some(today),
            ..Default::default()
        };
        scheduler.run(&req, today).unwrap();

        let after = scheduler.status(today, DEFAULT_STATUS_WINDOW_DAYS).unwrap();
        let monday = &after.days[0];
        assert!(monday.is_open && monday.has_slots);
        assert_eq!(monday.slot_count, 18);
        assert!(!monday.needs_generation);
        let sunday = &after.days[6];
        assert_eq!(sunday.weekday, "Sunday");
        assert!(!sunday.is_open && !sunday.needs_generation);
        assert_eq!(after.days_needing_generation, before.days_needing_generation - 1);
    }

    #[test]
    fn malformed_day_reports_error_and_closed() {
        let store = MemoryStore::new();
        let t = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
        store.set_day_config_unchecked(BusinessDay::open(0, t(18), t(9)));
        let report = BatchScheduler::new(&store, &store).status(d("2025-03-03"), 1).unwrap();
        assert_eq!(report.days.len(), 1);
        assert!(!report.days[0].is_open);
        assert!(report.days[0].error.is_some());
    }

    #[test]
    fn window_bounds_are_enforced() {
        let store = MemoryStore::new();
        let scheduler = BatchScheduler::new(&store, &store);
        for bad in [0, 367] {
            assert_eq!(
                scheduler.status(d("2025-03-03"), bad).unwrap_err(),
                ValidationError::StatusWindowOutOfRange {
                    value: bad,
                    min: 1,
                    max: 366
                }
            );
        }
        assert_eq!(scheduler.status(d("2025-03-03"), 366).unwrap().days.len(), 366);
    }

    #[test]
    fn window_stops_at_last_date() {
        let store = MemoryStore::new();
        let near_end = NaiveDate::MAX - Duration::days(3);
        let report = BatchScheduler::new(&store, &store)
            .status(near_end, DEFAULT_STATUS_WINDOW_DAYS)
            .unwrap();
        assert_eq!(report.days.len(), 4);
        assert_eq!(report.end_date, NaiveDate::MAX);
    }
}
