use crate::domain::models::{
    appointment::{Appointment, AppointmentPeriod, ClassifiedAppointments},
    availability::AvailabilitySlot,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::HashSet;

/// Marks candidates that are booked or already started as unavailable.
///
/// Booking matches are exact on the `(start, end)` window; overlapping but
/// different windows do not block. Duplicate windows keep the first entry.
pub fn apply_conflicts(
    candidates: Vec<AvailabilitySlot>,
    booked: &[Appointment],
    now: NaiveDateTime,
) -> Vec<AvailabilitySlot> {
    let today = now.date();
    let time_of_day = now.time();

    let taken: HashSet<(NaiveDate, NaiveTime, NaiveTime)> = booked
        .iter()
        .filter(|a| a.status.holds_slot())
        .map(|a| (a.date, a.start_time, a.end_time))
        .collect();

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|slot| seen.insert(slot.window()))
        .map(|mut slot| {
            if taken.contains(&(slot.date, slot.start_time, slot.end_time)) {
                slot.available = false;
            }
            if slot.date == today && slot.start_time < time_of_day {
                slot.available = false;
            }
            slot
        })
        .collect()
}

/// Calendar-day comparison only; time of day and stored status are ignored.
pub fn classify(appointment: &Appointment, today: NaiveDate) -> AppointmentPeriod {
    if appointment.date >= today {
        AppointmentPeriod::Upcoming
    } else {
        AppointmentPeriod::Past
    }
}

pub fn split_by_period(appointments: Vec<Appointment>, today: NaiveDate) -> ClassifiedAppointments {
    let mut result = ClassifiedAppointments::default();
    for appointment in appointments {
        match classify(&appointment, today) {
            AppointmentPeriod::Upcoming => result.upcoming.push(appointment),
            AppointmentPeriod::Past => result.past.push(appointment),
        }
    }
    result.upcoming.sort_by_key(|a| (a.date, a.start_time));
    result.past.sort_by(|a, b| (b.date, b.start_time).cmp(&(a.date, a.start_time)));
    result
}
