//! Weekly business-hours commands.

use clap::Subcommand;
use repairdesk_core::clock::parse_hhmm;
use repairdesk_core::hours::{parse_weekday, weekday_name};
use repairdesk_core::{BusinessDay, Config};

use super::open_database;

#[derive(Subcommand)]
pub enum HoursAction {
    /// Show the configured week
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Set opening hours for a weekday
    Set {
        /// Weekday name or index (0 = Monday)
        weekday: String,
        /// Opening time, HH:MM
        open: String,
        /// Closing time, HH:MM
        close: String,
        /// Start of the daily break, HH:MM
        #[arg(long, requires = "break_end")]
        break_start: Option<String>,
        /// End of the daily break, HH:MM
        #[arg(long, requires = "break_start")]
        break_end: Option<String>,
    },
    /// Mark a weekday as closed
    Close {
        /// Weekday name or index (0 = Monday)
        weekday: String,
    },
    /// Seed Monday-Saturday 09:00-18:00 when no hours are configured
    Init,
}

pub fn run(action: HoursAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_database(config)?;

    match action {
        HoursAction::List { json } => {
            let days = db.list_day_configs()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&days)?);
                return Ok(());
            }
            if days.is_empty() {
                println!("no business hours configured (run `hours init`)");
            }
            for day in &days {
                println!("{}", describe(day));
            }
        }
        HoursAction::Set {
            weekday,
            open,
            close,
            break_start,
            break_end,
        } => {
            let weekday = parse_weekday(&weekday)?;
            let mut day = BusinessDay::open(
                weekday,
                parse_hhmm("open_time", &open)?,
                parse_hhmm("close_time", &close)?,
            );
            if let (Some(start), Some(end)) = (break_start, break_end) {
                day = day.with_break(
                    parse_hhmm("break_start", &start)?,
                    parse_hhmm("break_end", &end)?,
                );
            }
            db.set_day_config(&day)?;
            println!("{}", describe(&day));
        }
        HoursAction::Close { weekday } => {
            let weekday = parse_weekday(&weekday)?;
            db.set_day_config(&BusinessDay::closed(weekday))?;
            println!("{}: closed", weekday_name(weekday));
        }
        HoursAction::Init => {
            if db.seed_standard_week()? {
                println!("seeded standard week");
            } else {
                println!("business hours already configured");
            }
        }
    }
    Ok(())
}

fn describe(day: &BusinessDay) -> String {
    let name = weekday_name(day.weekday);
    if !day.is_active {
        return format!("{name}: closed");
    }
    let mut line = format!(
        "{name}: {}-{}",
        day.open_time.format("%H:%M"),
        day.close_time.format("%H:%M")
    );
    if let (Some(start), Some(end)) = (day.break_start, day.break_end) {
        line.push_str(&format!(
            " (break {}-{})",
            start.format("%H:%M"),
            end.format("%H:%M")
        ));
    }
    line
}
