//! Slot inventory commands: batch generation, status, listing, booking.

use chrono::NaiveDate;
use clap::Subcommand;
use repairdesk_core::clock::parse_hhmm;
use repairdesk_core::slots::SlotInventoryStore;
use repairdesk_core::{BatchScheduler, Config, DayOutcome, GenerateRequest, SkipReason};

use super::{open_database, parse_date, today};

#[derive(Subcommand)]
pub enum SlotsAction {
    /// Generate slots over a date range
    Generate {
        /// First date, YYYY-MM-DD (default: today)
        #[arg(long, value_parser = parse_date)]
        start: Option<NaiveDate>,
        /// Last date, YYYY-MM-DD
        #[arg(long, value_parser = parse_date)]
        end: Option<NaiveDate>,
        /// Days past the start date when --end is omitted
        #[arg(long)]
        days_ahead: Option<u32>,
        /// Slot length in minutes (15-120)
        #[arg(long)]
        duration: Option<u32>,
        /// Replace available slots on dates that already have inventory
        #[arg(long)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// Show which upcoming dates have slots
    Status {
        /// Number of days to report, starting today (1-366)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=366))]
        days: Option<u32>,
        #[arg(long)]
        json: bool,
    },
    /// List the slots of one date
    List {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
        #[arg(long)]
        json: bool,
    },
    /// Mark an available slot as booked
    Book {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
        /// Slot start time, HH:MM
        start: String,
    },
}

pub fn run(action: SlotsAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_database(config)?;

    match action {
        SlotsAction::Generate {
            start,
            end,
            days_ahead,
            duration,
            force,
            json,
        } => {
            let request = GenerateRequest {
                start_date: start,
                end_date: end,
                days_ahead: days_ahead.unwrap_or(config.scheduling.days_ahead),
                slot_duration_minutes: duration.unwrap_or(config.scheduling.slot_duration_minutes),
                force,
            };
            let scheduler = BatchScheduler::new(&db, &db);
            let report = scheduler.run(&request, today())?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for day in &report.per_day {
                    let detail = match &day.outcome {
                        DayOutcome::Success { slots_created } => format!("{slots_created} slots"),
                        DayOutcome::Skipped {
                            reason: SkipReason::SlotsExist,
                            existing_slots,
                        } => format!("{existing_slots} slots already exist"),
                        DayOutcome::Skipped {
                            reason: SkipReason::Closed,
                            ..
                        } => "closed".to_string(),
                        DayOutcome::Failed { error } => error.clone(),
                    };
                    println!("{}  {:<8} {detail}", day.date, day.outcome.label());
                }
                println!("{}", report.summary());
            }

            if !report.is_success() {
                return Err(format!("{} of {} dates failed", report.failed, report.total_days).into());
            }
        }
        SlotsAction::Status { days, json } => {
            let window = days.unwrap_or(config.scheduling.status_window_days);
            let scheduler = BatchScheduler::new(&db, &db);
            let status = scheduler.status(today(), window)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
                return Ok(());
            }
            for day in &status.days {
                let state = match (&day.error, day.is_open) {
                    (Some(error), _) => format!("error: {error}"),
                    (None, false) => "closed".to_string(),
                    (None, true) if day.needs_generation => "needs generation".to_string(),
                    (None, true) => format!("{} slots, {} booked", day.slot_count, day.booked_count),
                };
                println!("{}  {:<9} {state}", day.date, day.weekday);
            }
            println!(
                "{} open days, {} need generation",
                status.open_days, status.days_needing_generation
            );
        }
        SlotsAction::List { date, json } => {
            let slots = db.get_slots(date)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&slots)?);
                return Ok(());
            }
            if slots.is_empty() {
                println!("no slots on {date}");
            }
            for slot in &slots {
                println!(
                    "{}-{}  {}",
                    slot.start_time.format("%H:%M"),
                    slot.end_time.format("%H:%M"),
                    slot.status.as_str()
                );
            }
        }
        SlotsAction::Book { date, start } => {
            let start_time = parse_hhmm("start_time", &start)?;
            if db.mark_booked(date, start_time)? {
                println!("booked {date} {}", start_time.format("%H:%M"));
            } else {
                return Err(format!("no available slot at {date} {start}").into());
            }
        }
    }
    Ok(())
}
