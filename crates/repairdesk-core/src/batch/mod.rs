//! Batch generation: request validation, the per-date driver, the
//! aggregated report, and the inventory status query.

mod report;
mod request;
mod scheduler;
mod status;

pub use report::{DayOutcome, GenerationOutcome, GenerationReport, SkipReason};
pub use request::{
    BatchPlan, DateRange, GenerateRequest, DEFAULT_DAYS_AHEAD, MAX_DAYS_AHEAD, MIN_DAYS_AHEAD,
};
pub use scheduler::BatchScheduler;
pub use status::{
    check_window, DayStatus, StatusReport, DEFAULT_STATUS_WINDOW_DAYS, MAX_STATUS_WINDOW_DAYS,
    MIN_STATUS_WINDOW_DAYS,
};
