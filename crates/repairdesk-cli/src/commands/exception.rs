//! Calendar exception commands (holidays and special hours).

use clap::Subcommand;
use repairdesk_core::clock::parse_hhmm;
use repairdesk_core::{CalendarException, Config, ExceptionKind};

use super::{open_database, parse_date, today};

#[derive(Subcommand)]
pub enum ExceptionAction {
    /// List exceptions from today onwards
    List {
        /// Include past dates
        #[arg(long)]
        all: bool,
        #[arg(long)]
        json: bool,
    },
    /// Close the shop or set special hours on one date
    Add {
        /// Date, YYYY-MM-DD
        #[arg(value_parser = parse_date)]
        date: chrono::NaiveDate,
        /// Opening time for special hours; omit to close all day
        #[arg(long, requires = "close")]
        open: Option<String>,
        /// Closing time for special hours
        #[arg(long, requires = "open")]
        close: Option<String>,
        #[arg(long, requires = "break_end")]
        break_start: Option<String>,
        #[arg(long, requires = "break_start")]
        break_end: Option<String>,
        /// Free-text note, e.g. the holiday name
        #[arg(long)]
        note: Option<String>,
    },
    /// Remove the exception on a date
    Remove {
        #[arg(value_parser = parse_date)]
        date: chrono::NaiveDate,
    },
}

pub fn run(action: ExceptionAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_database(config)?;

    match action {
        ExceptionAction::List { all, json } => {
            let from = if all { None } else { Some(today()) };
            let exceptions = db.list_exceptions(from)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&exceptions)?);
                return Ok(());
            }
            if exceptions.is_empty() {
                println!("no calendar exceptions");
            }
            for exception in &exceptions {
                println!("{}", describe(exception));
            }
        }
        ExceptionAction::Add {
            date,
            open,
            close,
            break_start,
            break_end,
            note,
        } => {
            let kind = match (open, close) {
                (Some(open), Some(close)) => ExceptionKind::SpecialHours {
                    open_time: parse_hhmm("open_time", &open)?,
                    close_time: parse_hhmm("close_time", &close)?,
                    break_start: break_start
                        .map(|v| parse_hhmm("break_start", &v))
                        .transpose()?,
                    break_end: break_end.map(|v| parse_hhmm("break_end", &v)).transpose()?,
                },
                _ => ExceptionKind::Closed,
            };
            let exception = CalendarException { date, kind, note };
            db.set_exception(&exception)?;
            println!("{}", describe(&exception));
        }
        ExceptionAction::Remove { date } => {
            if db.remove_exception(date)? {
                println!("removed exception on {date}");
            } else {
                println!("no exception on {date}");
            }
        }
    }
    Ok(())
}

fn describe(exception: &CalendarException) -> String {
    let mut line = match &exception.kind {
        ExceptionKind::Closed => format!("{}: closed", exception.date),
        ExceptionKind::SpecialHours {
            open_time,
            close_time,
            ..
        } => format!(
            "{}: {}-{}",
            exception.date,
            open_time.format("%H:%M"),
            close_time.format("%H:%M")
        ),
    };
    if let Some(note) = &exception.note {
        line.push_str(&format!(" ({note})"));
    }
    line
}
