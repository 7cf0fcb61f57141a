pub mod availability;
pub mod calendar;
pub mod conflicts;
pub mod lifecycle;
pub mod scheduling;
pub mod slot_cache;
