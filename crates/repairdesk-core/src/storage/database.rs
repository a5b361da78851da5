//! SQLite-backed business hours and slot inventory.
//!
//! Provides persistent storage for:
//! - Weekly business hours (one row per weekday)
//! - Calendar exceptions (one row per date)
//! - Appointment slots, unique per `(slot_date, start_time)`

use std::path::Path;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

use crate::clock::{format_hhmm, parse_hhmm};
use crate::error::{CoreError, DatabaseError, HoursError, Result};
use crate::hours::{BusinessDay, BusinessHoursStore, CalendarException, ExceptionKind};
use crate::slots::{Slot, SlotInventoryStore, SlotStatus};

use super::migrations;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

fn parse_date(table: &str, value: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| DatabaseError::CorruptRow {
        table: table.to_string(),
        message: format!("bad date '{value}': {e}"),
    })
}

fn parse_opt_time(field: &str, value: Option<String>) -> Result<Option<NaiveTime>, HoursError> {
    value.map(|v| parse_hhmm(field, &v)).transpose()
}

fn fmt_opt_time(time: Option<NaiveTime>) -> Option<String> {
    time.map(format_hhmm)
}

/// Raw `business_hours` row, decoded after the query so that malformed text
/// surfaces as an [`HoursError`] rather than a SQLite error.
struct HoursRow {
    weekday: u8,
    open_time: String,
    close_time: String,
    break_start: Option<String>,
    break_end: Option<String>,
    is_active: bool,
}

impl HoursRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            weekday: row.get(0)?,
            open_time: row.get(1)?,
            close_time: row.get(2)?,
            break_start: row.get(3)?,
            break_end: row.get(4)?,
            is_active: row.get(5)?,
        })
    }

    fn decode(self) -> Result<BusinessDay, HoursError> {
        Ok(BusinessDay {
            weekday: self.weekday,
            open_time: parse_hhmm("open_time", &self.open_time)?,
            close_time: parse_hhmm("close_time", &self.close_time)?,
            break_start: parse_opt_time("break_start", self.break_start)?,
            break_end: parse_opt_time("break_end", self.break_end)?,
            is_active: self.is_active,
        })
    }
}

struct ExceptionRow {
    date: String,
    kind: String,
    open_time: Option<String>,
    close_time: Option<String>,
    break_start: Option<String>,
    break_end: Option<String>,
    note: Option<String>,
}

impl ExceptionRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            date: row.get(0)?,
            kind: row.get(1)?,
            open_time: row.get(2)?,
            close_time: row.get(3)?,
            break_start: row.get(4)?,
            break_end: row.get(5)?,
            note: row.get(6)?,
        })
    }

    fn decode(self) -> Result<CalendarException> {
        let date = parse_date("calendar_exceptions", &self.date)?;
        let kind = match self.kind.as_str() {
            "closed" => ExceptionKind::Closed,
            _ => {
                let required = |field: &str, value: Option<String>| {
                    value
                        .ok_or_else(|| HoursError::InvalidTime {
                            field: field.to_string(),
                            value: String::new(),
                        })
                        .and_then(|v| parse_hhmm(field, &v))
                };
                ExceptionKind::SpecialHours {
                    open_time: required("open_time", self.open_time)?,
                    close_time: required("close_time", self.close_time)?,
                    break_start: parse_opt_time("break_start", self.break_start)?,
                    break_end: parse_opt_time("break_end", self.break_end)?,
                }
            }
        };
        Ok(CalendarException {
            date,
            kind,
            note: self.note,
        })
    }
}

fn row_to_slot(row: &Row) -> rusqlite::Result<(String, String, String, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn decode_slot(raw: (String, String, String, String)) -> Result<Slot, DatabaseError> {
    let (date, start, end, status) = raw;
    let corrupt = |message: String| DatabaseError::CorruptRow {
        table: "appointment_slots".to_string(),
        message,
    };
    Ok(Slot {
        date: parse_date("appointment_slots", &date)?,
        start_time: parse_hhmm("start_time", &start).map_err(|e| corrupt(e.to_string()))?,
        end_time: parse_hhmm("end_time", &end).map_err(|e| corrupt(e.to_string()))?,
        status: SlotStatus::parse(&status)
            .ok_or_else(|| corrupt(format!("unknown status '{status}'")))?,
    })
}

/// SQLite database for scheduling data.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open (creating if needed) the database at `path` and migrate it.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Self::from_connection(conn)
    }

    /// Open the database at the default location, `<data_dir>/repairdesk.db`.
    ///
    /// # Errors
    /// Returns an error if the data directory or database cannot be opened.
    pub fn open_default() -> Result<Self> {
        let path = super::data_dir()?.join("repairdesk.db");
        Ok(Self::open(&path)?)
    }

    /// Open an in-memory database.
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, DatabaseError> {
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    // === Business hours ===

    /// Validate and upsert a weekday's hours.
    pub fn set_day_config(&self, day: &BusinessDay) -> Result<()> {
        day.validate()?;
        self.conn.execute(
            "INSERT INTO business_hours (weekday, open_time, close_time, break_start, break_end, is_active, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(weekday) DO UPDATE SET
                open_time = excluded.open_time,
                close_time = excluded.close_time,
                break_start = excluded.break_start,
                break_end = excluded.break_end,
                is_active = excluded.is_active,
                updated_at = excluded.updated_at",
            params![
                day.weekday,
                format_hhmm(day.open_time),
                format_hhmm(day.close_time),
                fmt_opt_time(day.break_start),
                fmt_opt_time(day.break_end),
                day.is_active,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// All configured weekdays, Monday first.
    pub fn list_day_configs(&self) -> Result<Vec<BusinessDay>> {
        let mut stmt = self.conn.prepare(
            "SELECT weekday, open_time, close_time, break_start, break_end, is_active
             FROM business_hours ORDER BY weekday",
        )?;
        let rows = stmt.query_map([], HoursRow::from_row)?;
        let mut days = Vec::new();
        for row in rows {
            days.push(row?.decode()?);
        }
        Ok(days)
    }

    /// Seed the standard week when no hours are configured yet.
    /// Returns `true` if rows were written.
    pub fn seed_standard_week(&self) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM business_hours", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(false);
        }
        for day in BusinessDay::standard_week() {
            self.set_day_config(&day)?;
        }
        Ok(true)
    }

    // === Calendar exceptions ===

    /// Validate and upsert a date exception.
    pub fn set_exception(&self, exception: &CalendarException) -> Result<()> {
        exception.validate()?;
        let (kind, open, close, brk_start, brk_end) = match &exception.kind {
            ExceptionKind::Closed => ("closed", None, None, None, None),
            ExceptionKind::SpecialHours {
                open_time,
                close_time,
                break_start,
                break_end,
            } => (
                "special_hours",
                Some(format_hhmm(*open_time)),
                Some(format_hhmm(*close_time)),
                fmt_opt_time(*break_start),
                fmt_opt_time(*break_end),
            ),
        };
        self.conn.execute(
            "INSERT OR REPLACE INTO calendar_exceptions
                (exception_date, kind, open_time, close_time, break_start, break_end, note, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                exception.date.to_string(),
                kind,
                open,
                close,
                brk_start,
                brk_end,
                exception.note,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Delete a date exception. Returns `true` if one existed.
    pub fn remove_exception(&self, date: NaiveDate) -> Result<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM calendar_exceptions WHERE exception_date = ?1",
            params![date.to_string()],
        )?;
        Ok(deleted > 0)
    }

    /// Exceptions on or after `from`, ordered by date.
    pub fn list_exceptions(&self, from: Option<NaiveDate>) -> Result<Vec<CalendarException>> {
        let mut stmt = self.conn.prepare(
            "SELECT exception_date, kind, open_time, close_time, break_start, break_end, note
             FROM calendar_exceptions
             WHERE exception_date >= ?1
             ORDER BY exception_date",
        )?;
        let floor = from.map(|d| d.to_string()).unwrap_or_default();
        let rows = stmt.query_map(params![floor], ExceptionRow::from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?.decode()?);
        }
        Ok(out)
    }

    fn slots_on(conn: &Connection, date: NaiveDate) -> Result<Vec<Slot>, DatabaseError> {
        let mut stmt = conn.prepare_cached(
            "SELECT slot_date, start_time, end_time, status
             FROM appointment_slots WHERE slot_date = ?1
             ORDER BY start_time",
        )?;
        let rows = stmt.query_map(params![date.to_string()], row_to_slot)?;
        let mut slots = Vec::new();
        for row in rows {
            slots.push(decode_slot(row?)?);
        }
        Ok(slots)
    }

    /// Insert the slots of `date` that overlap nothing already stored.
    /// Must run inside a write transaction so the check and the insert see
    /// the same rows.
    fn insert_with(conn: &Connection, date: NaiveDate, slots: &[Slot]) -> Result<usize, DatabaseError> {
        let mut occupied: Vec<_> = Self::slots_on(conn, date)?
            .iter()
            .map(Slot::interval)
            .collect();
        let mut stmt = conn.prepare_cached(
            "INSERT OR IGNORE INTO appointment_slots (slot_date, start_time, end_time, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        let created_at = Utc::now().to_rfc3339();
        let day = date.to_string();
        let mut inserted = 0;
        for slot in slots.iter().filter(|s| s.date == date) {
            let interval = slot.interval();
            if occupied.iter().any(|o| o.overlaps(&interval)) {
                continue;
            }
            inserted += stmt.execute(params![
                day,
                format_hhmm(slot.start_time),
                format_hhmm(slot.end_time),
                slot.status.as_str(),
                created_at,
            ])?;
            occupied.push(interval);
        }
        Ok(inserted)
    }

    /// `BEGIN IMMEDIATE`: take the write lock before the first read.
    fn write_transaction(&self) -> Result<Transaction<'_>, DatabaseError> {
        Ok(Transaction::new_unchecked(
            &self.conn,
            TransactionBehavior::Immediate,
        )?)
    }
}

impl BusinessHoursStore for Database {
    fn get_day_config(&self, weekday: u8) -> Result<Option<BusinessDay>> {
        let row = self
            .conn
            .query_row(
                "SELECT weekday, open_time, close_time, break_start, break_end, is_active
                 FROM business_hours WHERE weekday = ?1",
                params![weekday],
                HoursRow::from_row,
            )
            .optional()?;
        row.map(|r| r.decode().map_err(CoreError::from)).transpose()
    }

    fn get_exception(&self, date: NaiveDate) -> Result<Option<CalendarException>> {
        let row = self
            .conn
            .query_row(
                "SELECT exception_date, kind, open_time, close_time, break_start, break_end, note
                 FROM calendar_exceptions WHERE exception_date = ?1",
                params![date.to_string()],
                ExceptionRow::from_row,
            )
            .optional()?;
        row.map(ExceptionRow::decode).transpose()
    }
}

impl SlotInventoryStore for Database {
    fn get_slots(&self, date: NaiveDate) -> Result<Vec<Slot>, DatabaseError> {
        Self::slots_on(&self.conn, date)
    }

    fn insert_slots(&self, date: NaiveDate, slots: &[Slot]) -> Result<usize, DatabaseError> {
        let tx = self.write_transaction()?;
        let inserted = Self::insert_with(&tx, date, slots)?;
        tx.commit()?;
        Ok(inserted)
    }

    fn replace_available_slots(
        &self,
        date: NaiveDate,
        slots: &[Slot],
    ) -> Result<usize, DatabaseError> {
        let tx = self.write_transaction()?;
        tx.execute(
            "DELETE FROM appointment_slots WHERE slot_date = ?1 AND status = 'available'",
            params![date.to_string()],
        )?;
        let inserted = Self::insert_with(&tx, date, slots)?;
        tx.commit()?;
        Ok(inserted)
    }

    fn mark_booked(&self, date: NaiveDate, start_time: NaiveTime) -> Result<bool, DatabaseError> {
        let changed = self.conn.execute(
            "UPDATE appointment_slots SET status = 'booked'
             WHERE slot_date = ?1 AND start_time = ?2 AND status = 'available'",
            params![date.to_string(), format_hhmm(start_time)],
        )?;
        Ok(changed == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TimeInterval;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn hours_roundtrip_through_sqlite() {
        let db = Database::open_in_memory().unwrap();
        let monday = BusinessDay::open(0, t(9, 0), t(18, 0)).with_break(t(12, 0), t(13, 0));
        db.set_day_config(&monday).unwrap();
        assert_eq!(db.get_day_config(0).unwrap(), Some(monday));
        assert_eq!(db.get_day_config(1).unwrap(), None);
    }

    #[test]
    fn seeding_happens_once() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.seed_standard_week().unwrap());
        assert!(!db.seed_standard_week().unwrap());
        assert_eq!(db.list_day_configs().unwrap().len(), 7);
    }

    #[test]
    fn malformed_hours_row_is_an_hours_error() {
        let db = Database::open_in_memory().unwrap();
        db.conn()
            .execute(
                "INSERT INTO business_hours (weekday, open_time, close_time, is_active, updated_at)
                 VALUES (2, 'nine', '18:00', 1, '')",
                [],
            )
            .unwrap();
        let err = db.get_day_config(2).unwrap_err();
        assert!(matches!(err, CoreError::Hours(HoursError::InvalidTime { .. })));
    }

    #[test]
    fn exceptions_roundtrip() {
        let db = Database::open_in_memory().unwrap();
        let special = CalendarException::special_hours(d("2025-12-24"), t(9, 0), t(13, 0))
            .with_note("Christmas Eve");
        db.set_exception(&special).unwrap();
        db.set_exception(&CalendarException::closed(d("2025-12-25"))).unwrap();

        assert_eq!(db.get_exception(d("2025-12-24")).unwrap(), Some(special));
        assert_eq!(db.list_exceptions(Some(d("2025-12-25"))).unwrap().len(), 1);
        assert!(db.remove_exception(d("2025-12-25")).unwrap());
        assert_eq!(db.list_exceptions(None).unwrap().len(), 1);
    }

    #[test]
    fn slot_writes_are_insert_or_ignore() {
        let db = Database::open_in_memory().unwrap();
        let date = d("2025-03-03");
        let a = Slot::available(date, TimeInterval::new(t(9, 0), t(9, 30)));
        let b = Slot::available(date, TimeInterval::new(t(9, 30), t(10, 0)));
        assert_eq!(db.insert_slots(date, &[a.clone(), b.clone()]).unwrap(), 2);
        assert_eq!(db.insert_slots(date, &[a.clone()]).unwrap(), 0);
        assert_eq!(db.get_slots(date).unwrap(), vec![a, b]);
    }

    #[test]
    fn booking_is_compare_and_set() {
        let db = Database::open_in_memory().unwrap();
        let date = d("2025-03-03");
        let a = Slot::available(date, TimeInterval::new(t(9, 0), t(9, 30)));
        db.insert_slots(date, &[a]).unwrap();
        assert!(db.mark_booked(date, t(9, 0)).unwrap());
        assert!(!db.mark_booked(date, t(9, 0)).unwrap());
        assert!(!db.mark_booked(date, t(11, 0)).unwrap());

        db.replace_available_slots(date, &[]).unwrap();
        let slots = db.get_slots(date).unwrap();
        assert_eq!(slots.len(), 1);
        assert!(slots[0].is_booked());
    }

    fn grid(date: NaiveDate, minutes: u32) -> Vec<Slot> {
        (0..)
            .map(|i| i * minutes)
            .take_while(|offset| offset + minutes <= 180)
            .map(|offset| {
                let start = t(9 + offset / 60, offset % 60);
                let end = t(9 + (offset + minutes) / 60, (offset + minutes) % 60);
                Slot::available(date, TimeInterval::new(start, end))
            })
            .collect()
    }

    fn assert_disjoint(slots: &[Slot]) {
        for pair in slots.windows(2) {
            assert!(pair[0].end_time <= pair[1].start_time, "{pair:?}");
        }
    }

    #[test]
    fn insert_skips_candidates_overlapping_stored_slots() {
        let db = Database::open_in_memory().unwrap();
        let date = d("2025-03-03");
        assert_eq!(db.insert_slots(date, &grid(date, 30)).unwrap(), 6);
        // 45 minute grid: only 09:00 and 10:30 share a start, and both overlap
        assert_eq!(db.insert_slots(date, &grid(date, 45)).unwrap(), 0);

        let slots = db.get_slots(date).unwrap();
        assert_eq!(slots.len(), 6);
        assert_disjoint(&slots);
    }

    #[test]
    fn replace_respects_booking_from_another_connection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shop.db");
        let db = Database::open(&path).unwrap();
        let date = d("2025-03-03");
        db.insert_slots(date, &grid(date, 30)).unwrap();

        // The scheduler read the inventory before this booking landed.
        let stale = db.get_slots(date).unwrap();
        assert!(stale.iter().all(|s| !s.is_booked()));
        let other = Database::open(&path).unwrap();
        assert!(other.mark_booked(date, t(9, 30)).unwrap());

        let inserted = db.replace_available_slots(date, &grid(date, 45)).unwrap();
        // 09:00-09:45 and 09:45-10:30 both overlap the booked 09:30-10:00
        assert_eq!(inserted, 2);
        let slots = db.get_slots(date).unwrap();
        assert_disjoint(&slots);
        let starts: Vec<_> = slots.iter().map(|s| s.start_time).collect();
        assert_eq!(starts, vec![t(9, 30), t(10, 30), t(11, 15)]);
        assert!(slots[0].is_booked());
    }
}
