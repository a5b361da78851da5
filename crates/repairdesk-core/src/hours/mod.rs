//! Business hours: weekly configuration, calendar exceptions, and the
//! per-date availability resolver.

mod business_day;
mod exception;
mod resolver;
mod store;

pub use business_day::{
    parse_weekday, validate_window, weekday_index, weekday_name, BusinessDay, WEEKDAY_NAMES,
};
pub use exception::{CalendarException, ExceptionKind};
pub use resolver::{AvailabilitySource, DayAvailability, DayAvailabilityResolver};
pub use store::BusinessHoursStore;
