//! Read/write interface over the persisted slot inventory.

use chrono::{NaiveDate, NaiveTime};

use crate::error::DatabaseError;

use super::Slot;

/// Persisted slot inventory.
///
/// Slots of one date never overlap. A write skips every candidate whose
/// interval overlaps a slot already stored for the date (which covers an
/// identical `(date, start_time)`), and the overlap check runs in the same
/// atomic step as the insert, so a booking or a concurrent writer landing
/// after `get_slots` cannot produce overlapping rows.
pub trait SlotInventoryStore {
    /// All slots of a date, ordered by start time.
    fn get_slots(&self, date: NaiveDate) -> Result<Vec<Slot>, DatabaseError>;

    /// Insert the candidates that overlap nothing stored. Returns the number
    /// of rows actually inserted.
    fn insert_slots(&self, date: NaiveDate, slots: &[Slot]) -> Result<usize, DatabaseError>;

    /// Delete the date's available slots, then insert `slots` as
    /// `insert_slots` does.
    /// Booked slots are never touched. Returns the number of rows inserted.
    fn replace_available_slots(
        &self,
        date: NaiveDate,
        slots: &[Slot],
    ) -> Result<usize, DatabaseError>;

    /// Compare-and-set `available -> booked`. Returns `false` when the slot
    /// does not exist or is already booked.
    fn mark_booked(&self, date: NaiveDate, start_time: NaiveTime) -> Result<bool, DatabaseError>;
}

impl<T: SlotInventoryStore + ?Sized> SlotInventoryStore for &T {
    fn get_slots(&self, date: NaiveDate) -> Result<Vec<Slot>, DatabaseError> {
        (**self).get_slots(date)
    }

    fn insert_slots(&self, date: NaiveDate, slots: &[Slot]) -> Result<usize, DatabaseError> {
        (**self).insert_slots(date, slots)
    }

    fn replace_available_slots(
        &self,
        date: NaiveDate,
        slots: &[Slot],
    ) -> Result<usize, DatabaseError> {
        (**self).replace_available_slots(date, slots)
    }

    fn mark_booked(&self, date: NaiveDate, start_time: NaiveTime) -> Result<bool, DatabaseError> {
        (**self).mark_booked(date, start_time)
    }
}
