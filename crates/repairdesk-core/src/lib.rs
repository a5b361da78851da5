//! # RepairDesk Core Library
//!
//! This library provides the appointment slot scheduling engine of the
//! RepairDesk repair-shop CRM. It turns a shop's declared business hours into a
//! concrete, bookable inventory of time slots per calendar date.
//!
//! ## Architecture
//!
//! - **Hours**: weekly business hours, calendar exceptions, and the per-date
//!   availability resolver
//! - **Slots**: the slot record, the pure slot-grid generator, and the
//!   inventory store interface
//! - **Batch**: range generation with per-date isolation, the aggregated
//!   report, and the status query
//! - **Storage**: SQLite persistence, an in-memory store, and TOML
//!   configuration
//!
//! ## Key Components
//!
//! - [`BatchScheduler`]: drives generation across a date range
//! - [`SlotGenerator`]: subdivides one day into fixed-length slots
//! - [`DayAvailabilityResolver`]: effective hours of a single date
//! - [`Database`]: SQLite implementation of both store traits
//! - [`Config`]: application configuration management

pub mod batch;
pub mod clock;
pub mod error;
pub mod hours;
pub mod slots;
pub mod storage;

pub use batch::{
    BatchScheduler, DayOutcome, DayStatus, GenerateRequest, GenerationOutcome, GenerationReport,
    SkipReason, StatusReport,
};
pub use clock::TimeInterval;
pub use error::{ConfigError, CoreError, DatabaseError, HoursError, ValidationError};
pub use hours::{
    BusinessDay, BusinessHoursStore, CalendarException, DayAvailability, DayAvailabilityResolver,
    ExceptionKind,
};
pub use slots::{Generation, Slot, SlotDuration, SlotGenerator, SlotInventoryStore, SlotStatus};
pub use storage::{Config, Database, MemoryStore};
