//! Core error types for repairdesk-core.
//!
//! Errors fall into three families that the batch scheduler treats
//! differently:
//! - [`ValidationError`]: a bad request, rejected before any date is touched
//! - [`HoursError`]: malformed business-hours configuration, reported per date
//! - [`DatabaseError`]: a persistence failure, reported per date

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Core error type for repairdesk-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration file errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Business-hours configuration errors
    #[error("Business hours error: {0}")]
    Hours(#[from] HoursError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// A stored row could not be decoded
    #[error("Corrupt row in {table}: {message}")]
    CorruptRow { table: String, message: String },

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration file errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Malformed business-hours or calendar-exception configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HoursError {
    /// Weekday index outside 0..=6
    #[error("Invalid weekday {0}: expected 0 (Monday) to 6 (Sunday)")]
    InvalidWeekday(u8),

    /// Weekday name not recognised
    #[error("Unknown weekday '{0}'")]
    UnknownWeekday(String),

    /// A time field could not be parsed as HH:MM
    #[error("Invalid time for '{field}': '{value}' (expected HH:MM)")]
    InvalidTime { field: String, value: String },

    /// open_time is not before close_time
    #[error("Opening time {open} must be before closing time {close}")]
    InvertedHours { open: String, close: String },

    /// Only one end of the break is configured
    #[error("Break window needs both break_start and break_end")]
    IncompleteBreak,

    /// break_start is not before break_end
    #[error("Break start {start} must be before break end {end}")]
    InvertedBreak { start: String, end: String },

    /// Break does not fit inside the operating hours
    #[error("Break {start}-{end} falls outside operating hours {open}-{close}")]
    BreakOutsideHours {
        start: String,
        end: String,
        open: String,
        close: String,
    },
}

/// Request validation errors. Fatal to the whole request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Slot duration outside the accepted bounds
    #[error("Slot duration must be between {min} and {max} minutes, got {value}")]
    SlotDurationOutOfRange { value: u32, min: u32, max: u32 },

    /// days_ahead outside the accepted bounds
    #[error("days_ahead must be between {min} and {max}, got {value}")]
    DaysAheadOutOfRange { value: u32, min: u32, max: u32 },

    /// start_date after end_date
    #[error("Invalid date range: start_date ({start}) is after end_date ({end})")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// Range longer than the batch cap
    #[error("Date range {start}..{end} spans {days} days; at most {max} days ahead are allowed")]
    RangeTooLarge {
        start: NaiveDate,
        end: NaiveDate,
        days: i64,
        max: u32,
    },

    /// The range would run past the last representable calendar date
    #[error("Date range starting {start} with {days} days ahead runs past the last supported date")]
    DateOutOfRange { start: NaiveDate, days: u32 },

    /// Status window outside the accepted bounds
    #[error("Status window must be between {min} and {max} days, got {value}")]
    StatusWindowOutOfRange { value: u32, min: u32, max: u32 },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked
                    || e.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hours_error_wraps_into_core_error() {
        let err: CoreError = HoursError::IncompleteBreak.into();
        assert!(matches!(err, CoreError::Hours(HoursError::IncompleteBreak)));
        assert_eq!(
            err.to_string(),
            "Business hours error: Break window needs both break_start and break_end"
        );
    }

    #[test]
    fn validation_error_message_names_bounds() {
        let err = ValidationError::SlotDurationOutOfRange {
            value: 5,
            min: 15,
            max: 120,
        };
        assert_eq!(
            err.to_string(),
            "Slot duration must be between 15 and 120 minutes, got 5"
        );
    }

    #[test]
    fn rusqlite_errors_map_to_query_failed() {
        let err: DatabaseError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, DatabaseError::QueryFailed(_)));
    }
}
