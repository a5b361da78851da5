//! Slot inventory: slot records, the generator, and the store interface.

mod generator;
mod store;
mod types;

pub use generator::{Generation, SlotGenerator};
pub use store::SlotInventoryStore;
pub use types::{Slot, SlotDuration, SlotStatus};
