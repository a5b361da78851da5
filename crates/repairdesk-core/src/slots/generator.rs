//! Slot grid generation for a single date.
//!
//! The generator is pure: it computes the slots a date should have and leaves
//! persistence to the caller, so it can be exercised without a store.

use crate::clock::TimeInterval;
use crate::hours::DayAvailability;

use super::{Slot, SlotDuration};

/// Result of generating one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    /// Fresh slots to persist, ordered by start time.
    Slots(Vec<Slot>),
    /// The date is closed. Nothing to do.
    Closed,
    /// The date already has inventory and regeneration was not forced.
    Existing { count: usize },
}

/// Subdivides a day's operating interval into fixed-length slots.
#[derive(Debug, Clone, Copy)]
pub struct SlotGenerator {
    duration: SlotDuration,
}

impl SlotGenerator {
    pub fn new(duration: SlotDuration) -> Self {
        Self { duration }
    }

    pub fn duration(&self) -> SlotDuration {
        self.duration
    }

    /// Compute the slots for `availability.date`.
    ///
    /// Without `force`, any existing inventory short-circuits to
    /// [`Generation::Existing`]. With `force`, the grid is computed afresh
    /// and candidates overlapping a booked slot are dropped; available
    /// existing slots are expected to be replaced by the caller.
    pub fn generate(
        &self,
        availability: &DayAvailability,
        existing: &[Slot],
        force: bool,
    ) -> Generation {
        let operating = match (availability.is_open, availability.operating_interval) {
            (true, Some(interval)) => interval,
            _ => return Generation::Closed,
        };

        if !existing.is_empty() && !force {
            return Generation::Existing {
                count: existing.len(),
            };
        }

        let booked: Vec<TimeInterval> = existing
            .iter()
            .filter(|s| s.is_booked())
            .map(Slot::interval)
            .collect();

        let slots = self
            .grid(operating, availability.break_interval)
            .into_iter()
            .filter(|candidate| !booked.iter().any(|b| b.overlaps(candidate)))
            .map(|interval| Slot::available(availability.date, interval))
            .collect();

        Generation::Slots(slots)
    }

    /// Consecutive intervals from `open` while they end by `close`, minus any
    /// interval touching the break. Partial trailing intervals are dropped.
    fn grid(&self, operating: TimeInterval, brk: Option<TimeInterval>) -> Vec<TimeInterval> {
        let step = self.duration.minutes();
        let close = operating.end_minutes();
        let mut start = operating.start_minutes();
        let mut out = Vec::new();

        while start + step <= close {
            let Some(candidate) = TimeInterval::from_minutes(start, start + step) else {
                break;
            };
            if !brk.is_some_and(|b| b.overlaps(&candidate)) {
                out.push(candidate);
            }
            start += step;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hours::AvailabilitySource;
    use crate::slots::SlotStatus;
    use chrono::{NaiveDate, NaiveTime};
    use proptest::prelude::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
    }

    fn open_day(
        open: NaiveTime,
        close: NaiveTime,
        brk: Option<(NaiveTime, NaiveTime)>,
    ) -> DayAvailability {
        DayAvailability::open(
            monday(),
            TimeInterval::new(open, close),
            brk.map(|(s, e)| TimeInterval::new(s, e)),
            AvailabilitySource::Weekly,
        )
    }

    fn generator(minutes: u32) -> SlotGenerator {
        SlotGenerator::new(SlotDuration::new(minutes).unwrap())
    }

    fn slots_of(g: Generation) -> Vec<Slot> {
        match g {
            Generation::Slots(slots) => slots,
            other => panic!("expected slots, got {other:?}"),
        }
    }

    #[test]
    fn nine_to_six_in_half_hours_is_eighteen_slots() {
        let slots = slots_of(generator(30).generate(&open_day(t(9, 0), t(18, 0), None), &[], false));
        assert_eq!(slots.len(), 18);
        assert_eq!(slots[0].start_time, t(9, 0));
        assert_eq!(slots[0].end_time, t(9, 30));
        assert_eq!(slots[17].start_time, t(17, 30));
        assert_eq!(slots[17].end_time, t(18, 0));
        assert!(slots.iter().all(|s| s.status == SlotStatus::Available));
    }

    #[test]
    fn lunch_break_slots_are_dropped_whole() {
        let day = open_day(t(9, 0), t(18, 0), Some((t(12, 0), t(13, 0))));
        let slots = slots_of(generator(30).generate(&day, &[], false));
        assert_eq!(slots.len(), 16);
        let lunch = TimeInterval::new(t(12, 0), t(13, 0));
        assert!(slots.iter().all(|s| !s.interval().overlaps(&lunch)));
    }

    #[test]
    fn slots_straddling_break_are_excluded_not_truncated() {
        // 45-minute grid: 11:15-12:00 fits, 12:00-12:45 and 12:45-13:30 touch the break
        let day = open_day(t(9, 0), t(18, 0), Some((t(12, 0), t(13, 0))));
        let slots = slots_of(generator(45).generate(&day, &[], false));
        let starts: Vec<_> = slots.iter().map(|s| s.start_time).collect();
        assert!(starts.contains(&t(11, 15)));
        assert!(!starts.contains(&t(12, 0)));
        assert!(!starts.contains(&t(12, 45)));
        assert!(starts.contains(&t(13, 30)));
        assert!(slots.iter().all(|s| s.interval().duration_minutes() == 45));
    }

    #[test]
    fn trailing_partial_slot_is_dropped() {
        let slots = slots_of(generator(45).generate(&open_day(t(9, 0), t(10, 0), None), &[], false));
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].end_time, t(9, 45));
    }

    #[test]
    fn window_shorter_than_duration_yields_nothing() {
        let slots = slots_of(generator(120).generate(&open_day(t(9, 0), t(10, 0), None), &[], false));
        assert!(slots.is_empty());
    }

    #[test]
    fn closed_day_is_noop() {
        let day = DayAvailability::closed(monday(), AvailabilitySource::Weekly);
        assert_eq!(generator(30).generate(&day, &[], true), Generation::Closed);
    }

    #[test]
    fn existing_inventory_skips_without_force() {
        let day = open_day(t(9, 0), t(18, 0), None);
        let existing = slots_of(generator(30).generate(&day, &[], false));
        assert_eq!(
            generator(30).generate(&day, &existing, false),
            Generation::Existing { count: 18 }
        );
    }

    #[test]
    fn force_keeps_clear_of_booked_slots() {
        let day = open_day(t(9, 0), t(12, 0), None);
        let mut existing = slots_of(generator(30).generate(&day, &[], false));
        existing[1].status = SlotStatus::Booked; // 09:30-10:00

        // Regenerate at 45 minutes: 09:00-09:45 and 09:45-10:30 overlap the booking
        let slots = slots_of(generator(45).generate(&day, &existing, true));
        let starts: Vec<_> = slots.iter().map(|s| s.start_time).collect();
        assert_eq!(starts, vec![t(10, 30), t(11, 15)]);
        let booked = existing[1].interval();
        assert!(slots.iter().all(|s| !s.interval().overlaps(&booked)));
    }

    proptest! {
        #[test]
        fn grid_is_ordered_disjoint_and_full_length(
            open in 0u32..(20 * 60),
            len in 30u32..(12 * 60),
            minutes in SlotDuration::MIN..=SlotDuration::MAX,
            brk_offset in 0u32..(6 * 60),
            brk_len in 15u32..120,
        ) {
            let close = (open + len).min(23 * 60 + 59);
            let brk_start = open + brk_offset.min(len / 2);
            let brk_end = (brk_start + brk_len).min(close);
            prop_assume!(brk_start < brk_end);

            let operating = TimeInterval::from_minutes(open, close).unwrap();
            let brk = TimeInterval::from_minutes(brk_start, brk_end).unwrap();
            let day = DayAvailability::open(monday(), operating, Some(brk), AvailabilitySource::Weekly);

            let slots = slots_of(generator(minutes).generate(&day, &[], false));
            for pair in slots.windows(2) {
                prop_assert!(pair[0].end_time <= pair[1].start_time);
            }
            for slot in &slots {
                prop_assert_eq!(slot.interval().duration_minutes(), minutes);
                prop_assert!(operating.contains(&slot.interval()));
                prop_assert!(!slot.interval().overlaps(&brk));
            }
        }
    }
}
