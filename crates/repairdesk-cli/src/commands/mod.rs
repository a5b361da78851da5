pub mod config;
pub mod exception;
pub mod hours;
pub mod slots;

use chrono::NaiveDate;
use repairdesk_core::{Config, Database};

/// Open the configured database, creating and migrating it if needed.
pub fn open_database(config: &Config) -> Result<Database, Box<dyn std::error::Error>> {
    let path = config.database_path()?;
    tracing::debug!(path = %path.display(), "opening database");
    Ok(Database::open(&path)?)
}

pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{value}' (expected YYYY-MM-DD)"))
}

/// The local calendar date. Only the CLI reads the clock.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
