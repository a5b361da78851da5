//! Per-date outcomes and the aggregated batch report.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::BatchPlan;

/// Why a date was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Weekly hours or an exception close the date.
    Closed,
    /// The date already has inventory and `force` was not set.
    SlotsExist,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Closed => "closed",
            SkipReason::SlotsExist => "slots_exist",
        }
    }
}

/// Result of processing one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DayOutcome {
    Success {
        slots_created: usize,
    },
    Skipped {
        reason: SkipReason,
        existing_slots: usize,
    },
    Failed {
        error: String,
    },
}

impl DayOutcome {
    pub fn slots_created(&self) -> usize {
        match self {
            DayOutcome::Success { slots_created } => *slots_created,
            DayOutcome::Skipped { .. } | DayOutcome::Failed { .. } => 0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DayOutcome::Success { .. } => "success",
            DayOutcome::Skipped { .. } => "skipped",
            DayOutcome::Failed { .. } => "failed",
        }
    }
}

/// A dated [`DayOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOutcome {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub outcome: DayOutcome,
}

/// Aggregated result of a batch run. Covers every date of the range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub slot_duration_minutes: u32,
    pub force: bool,
    pub total_days: usize,
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
    pub slots_created: usize,
    /// `"<date>: <message>"` for each failed date.
    pub errors: Vec<String>,
    pub per_day: Vec<GenerationOutcome>,
}

impl GenerationReport {
    pub fn from_outcomes(run_id: Uuid, plan: &BatchPlan, per_day: Vec<GenerationOutcome>) -> Self {
        let mut report = Self {
            run_id,
            start_date: plan.range.start,
            end_date: plan.range.end,
            slot_duration_minutes: plan.duration.minutes(),
            force: plan.force,
            total_days: per_day.len(),
            successful: 0,
            failed: 0,
            skipped: 0,
            slots_created: 0,
            errors: Vec::new(),
            per_day: Vec::new(),
        };

        for entry in &per_day {
            match &entry.outcome {
                DayOutcome::Success { slots_created } => {
                    report.successful += 1;
                    report.slots_created += slots_created;
                }
                DayOutcome::Skipped { .. } => report.skipped += 1,
                DayOutcome::Failed { error } => {
                    report.failed += 1;
                    report.errors.push(format!("{}: {}", entry.date, error));
                }
            }
        }
        report.per_day = per_day;
        report
    }

    /// A batch succeeds when no date failed. Skips don't count against it.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// One-line human-readable summary.
    pub fn summary(&self) -> String {
        let verdict = if self.is_success() {
            "completed"
        } else {
            "completed with errors"
        };
        format!(
            "Slot generation {verdict}: {} slots created across {} days ({} to {}); {} succeeded, {} skipped, {} failed",
            self.slots_created,
            self.total_days,
            self.start_date,
            self.end_date,
            self.successful,
            self.skipped,
            self.failed,
        )
    }
}
