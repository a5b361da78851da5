//! In-process store implementing both scheduling traits.
//!
//! Useful for tests and for embedding the engine without SQLite. All state
//! sits behind one mutex, so every trait call is atomic.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{NaiveDate, NaiveTime};

use crate::error::{DatabaseError, HoursError, Result};
use crate::hours::{BusinessDay, BusinessHoursStore, CalendarException};
use crate::slots::{Slot, SlotInventoryStore, SlotStatus};

#[derive(Debug, Default)]
struct MemoryState {
    hours: BTreeMap<u8, BusinessDay>,
    exceptions: BTreeMap<NaiveDate, CalendarException>,
    slots: BTreeMap<(NaiveDate, NaiveTime), Slot>,
}

/// Mutex-guarded in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Validate and store a weekday's hours, replacing any previous entry.
    pub fn set_day_config(&self, day: BusinessDay) -> Result<(), HoursError> {
        day.validate()?;
        self.set_day_config_unchecked(day);
        Ok(())
    }

    /// Store a weekday's hours as-is, like a row written by another tool.
    pub fn set_day_config_unchecked(&self, day: BusinessDay) {
        self.lock().hours.insert(day.weekday, day);
    }

    pub fn list_day_configs(&self) -> Vec<BusinessDay> {
        self.lock().hours.values().cloned().collect()
    }

    /// Validate and store a date exception, replacing any previous entry.
    pub fn set_exception(&self, exception: CalendarException) -> Result<(), HoursError> {
        exception.validate()?;
        self.set_exception_unchecked(exception);
        Ok(())
    }

    /// Store an exception as-is, like a row written by another tool.
    pub fn set_exception_unchecked(&self, exception: CalendarException) {
        self.lock().exceptions.insert(exception.date, exception);
    }

    pub fn remove_exception(&self, date: NaiveDate) -> bool {
        self.lock().exceptions.remove(&date).is_some()
    }

    pub fn list_exceptions(&self) -> Vec<CalendarException> {
        self.lock().exceptions.values().cloned().collect()
    }
}

impl BusinessHoursStore for MemoryStore {
    fn get_day_config(&self, weekday: u8) -> Result<Option<BusinessDay>> {
        Ok(self.lock().hours.get(&weekday).cloned())
    }

    fn get_exception(&self, date: NaiveDate) -> Result<Option<CalendarException>> {
        Ok(self.lock().exceptions.get(&date).cloned())
    }
}

fn insert_non_overlapping(state: &mut MemoryState, date: NaiveDate, slots: &[Slot]) -> usize {
    let mut inserted = 0;
    for slot in slots.iter().filter(|s| s.date == date) {
        let interval = slot.interval();
        let clashes = state
            .slots
            .range((date, NaiveTime::default())..)
            .take_while(|((d, _), _)| *d == date)
            .any(|(_, existing)| existing.interval().overlaps(&interval));
        if !clashes {
            state.slots.insert((date, slot.start_time), slot.clone());
            inserted += 1;
        }
    }
    inserted
}

impl SlotInventoryStore for MemoryStore {
    fn get_slots(&self, date: NaiveDate) -> Result<Vec<Slot>, DatabaseError> {
        Ok(self
            .lock()
            .slots
            .range((date, NaiveTime::default())..)
            .take_while(|((d, _), _)| *d == date)
            .map(|(_, slot)| slot.clone())
            .collect())
    }

    fn insert_slots(&self, date: NaiveDate, slots: &[Slot]) -> Result<usize, DatabaseError> {
        Ok(insert_non_overlapping(&mut self.lock(), date, slots))
    }

    fn replace_available_slots(
        &self,
        date: NaiveDate,
        slots: &[Slot],
    ) -> Result<usize, DatabaseError> {
        let mut state = self.lock();
        state
            .slots
            .retain(|(d, _), slot| *d != date || slot.status == SlotStatus::Booked);
        Ok(insert_non_overlapping(&mut state, date, slots))
    }

    fn mark_booked(&self, date: NaiveDate, start_time: NaiveTime) -> Result<bool, DatabaseError> {
        let mut state = self.lock();
        match state.slots.get_mut(&(date, start_time)) {
            Some(slot) if slot.status == SlotStatus::Available => {
                slot.status = SlotStatus::Booked;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
