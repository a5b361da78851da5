//! Batch slot generation across a date range.

use std::sync::{Mutex, PoisonError};

use chrono::NaiveDate;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use crate::error::{Result, ValidationError};
use crate::hours::{BusinessHoursStore, DayAvailabilityResolver};
use crate::slots::{Generation, SlotGenerator, SlotInventoryStore};

use super::status::{self, StatusReport};
use super::{DayOutcome, GenerateRequest, GenerationOutcome, GenerationReport, SkipReason};

/// Drives the slot generator over a range of dates.
///
/// Runs are serialised by an internal lock so that a shared scheduler never
/// interleaves two check-existing/generate/persist sequences. Each date is
/// isolated: its failure is recorded in the report and the batch moves on.
pub struct BatchScheduler<H, S> {
    hours: H,
    slots: S,
    run_lock: Mutex<()>,
}

impl<H: BusinessHoursStore, S: SlotInventoryStore> BatchScheduler<H, S> {
    pub fn new(hours: H, slots: S) -> Self {
        Self {
            hours,
            slots,
            run_lock: Mutex::new(()),
        }
    }

    /// Generate slots for every date the request covers.
    ///
    /// `today` anchors requests without explicit dates.
    ///
    /// # Errors
    /// Only request validation fails the call; per-date problems are reported
    /// as [`DayOutcome::Failed`] entries.
    pub fn run(
        &self,
        request: &GenerateRequest,
        today: NaiveDate,
    ) -> Result<GenerationReport, ValidationError> {
        let plan = request.plan(today)?;
        let _guard = self.run_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let run_id = Uuid::new_v4();
        let span = info_span!(
            "slot_batch",
            %run_id,
            start = %plan.range.start,
            end = %plan.range.end,
            duration = plan.duration.minutes(),
            force = plan.force,
        );
        let _enter = span.enter();

        let generator = SlotGenerator::new(plan.duration);
        let per_day: Vec<GenerationOutcome> = plan
            .range
            .days()
            .map(|date| {
                let outcome = self.process_date(&generator, date, plan.force);
                GenerationOutcome { date, outcome }
            })
            .collect();

        let report = GenerationReport::from_outcomes(run_id, &plan, per_day);
        info!(
            total_days = report.total_days,
            successful = report.successful,
            skipped = report.skipped,
            failed = report.failed,
            slots_created = report.slots_created,
            "slot batch finished"
        );
        Ok(report)
    }

    /// Per-day slot status for `window_days` days starting at `today`.
    ///
    /// # Errors
    /// Returns [`ValidationError::StatusWindowOutOfRange`] unless the window
    /// is between 1 and 366 days.
    pub fn status(
        &self,
        today: NaiveDate,
        window_days: u32,
    ) -> Result<StatusReport, ValidationError> {
        status::collect(&self.hours, &self.slots, today, window_days)
    }

    fn process_date(&self, generator: &SlotGenerator, date: NaiveDate, force: bool) -> DayOutcome {
        match self.try_process_date(generator, date, force) {
            Ok(outcome) => {
                debug!(%date, status = outcome.label(), slots = outcome.slots_created(), "date processed");
                outcome
            }
            Err(e) => {
                warn!(%date, error = %e, "slot generation failed for date");
                DayOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    fn try_process_date(
        &self,
        generator: &SlotGenerator,
        date: NaiveDate,
        force: bool,
    ) -> Result<DayOutcome> {
        let availability = DayAvailabilityResolver::new(&self.hours).resolve(date)?;
        if !availability.is_open {
            return Ok(DayOutcome::Skipped {
                reason: SkipReason::Closed,
                existing_slots: 0,
            });
        }

        let existing = self.slots.get_slots(date)?;
        let slots = match generator.generate(&availability, &existing, force) {
            Generation::Closed => {
                return Ok(DayOutcome::Skipped {
                    reason: SkipReason::Closed,
                    existing_slots: 0,
                })
            }
            Generation::Existing { count } => {
                return Ok(DayOutcome::Skipped {
                    reason: SkipReason::SlotsExist,
                    existing_slots: count,
                })
            }
            Generation::Slots(slots) => slots,
        };

        let (retained, inserted) = if existing.is_empty() {
            (0, self.slots.insert_slots(date, &slots)?)
        } else {
            let booked = existing.iter().filter(|s| s.is_booked()).count();
            (booked, self.slots.replace_available_slots(date, &slots)?)
        };

        // Count what the store actually holds, not what we asked it to write.
        let persisted = self.slots.get_slots(date)?.len();
        let slots_created = persisted.saturating_sub(retained);
        if slots_created != slots.len() || inserted != slots_created {
            warn!(
                %date,
                generated = slots.len(),
                inserted,
                persisted = slots_created,
                "store persisted a different number of slots than generated"
            );
        }

        Ok(DayOutcome::Success { slots_created })
    }
}
