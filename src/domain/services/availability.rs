use crate::domain::models::availability::{AvailabilitySlot, WeeklyAvailability};
use chrono::{NaiveDate, NaiveTime, Timelike};

fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

fn time_at(minute: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(minute / 60, minute % 60, 0)
}

/// Expands the template for `date` into candidate slots.
///
/// Returns an empty list when the trainer has no active config for the
/// weekday. A trailing interval shorter than the slot duration is dropped.
pub fn resolve_candidates(weekly: &WeeklyAvailability, date: NaiveDate) -> Vec<AvailabilitySlot> {
    let Some(config) = weekly.for_date(date) else {
        return Vec::new();
    };

    let duration = config.slot_duration_minutes;
    if duration <= 0 {
        return Vec::new();
    }
    let duration = duration as u32;

    let window_start = minute_of_day(config.start_time);
    let window_end = minute_of_day(config.end_time);

    let mut slots = Vec::new();
    let mut cursor = window_start;
    while cursor + duration <= window_end {
        if let (Some(start_time), Some(end_time)) = (time_at(cursor), time_at(cursor + duration)) {
            slots.push(AvailabilitySlot {
                date,
                start_time,
                end_time,
                available: true,
            });
        }
        cursor += duration;
    }

    slots
}
