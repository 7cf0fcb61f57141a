use crate::domain::models::{
    appointment::Appointment,
    availability::WeeklyAvailability,
    calendar::{CalendarCell, CalendarDay},
};
use crate::error::AppError;
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::HashSet;

pub const GRID_CELLS: usize = 42;

/// Moves `(year, month)` by `delta` months, rolling over year boundaries.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let total = year * 12 + (month as i32 - 1) + delta;
    (total.div_euclid(12), total.rem_euclid(12) as u32 + 1)
}

pub fn days_in_month(year: i32, month: u32) -> Result<u32, AppError> {
    let first = first_of_month(year, month)?;
    let (next_year, next_month) = shift_month(year, month, 1);
    let next_first = first_of_month(next_year, next_month)?;
    Ok((next_first - first).num_days() as u32)
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, AppError> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::Validation(format!("Invalid month {}-{}", year, month)))
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Six weeks of seven days, Sunday first. Cells before day 1 are empty,
/// cells after the last day carry dates of the following month.
pub fn build_month_grid(year: i32, month: u32) -> Result<Vec<CalendarCell>, AppError> {
    let first = first_of_month(year, month)?;
    let start_day = first.weekday().num_days_from_sunday() as usize;
    let day_count = days_in_month(year, month)?;

    let mut cells = Vec::with_capacity(GRID_CELLS);
    cells.extend(std::iter::repeat_n(CalendarCell::padding(), start_day));

    for day in 1..=day_count {
        let date = first + Duration::days((day - 1) as i64);
        cells.push(CalendarCell {
            day: Some(day),
            is_current_month: true,
            date: Some(iso(date)),
        });
    }

    let next_first = first + Duration::days(day_count as i64);
    let mut offset = 0;
    while cells.len() < GRID_CELLS {
        let date = next_first + Duration::days(offset);
        cells.push(CalendarCell {
            day: Some(date.day()),
            is_current_month: false,
            date: Some(iso(date)),
        });
        offset += 1;
    }

    Ok(cells)
}

pub fn annotate_month(
    grid: Vec<CalendarCell>,
    weekly: &WeeklyAvailability,
    appointments: &[Appointment],
    today: NaiveDate,
) -> Vec<CalendarDay> {
    let booked_dates: HashSet<NaiveDate> = appointments
        .iter()
        .filter(|a| a.status.holds_slot())
        .map(|a| a.date)
        .collect();

    grid.into_iter()
        .map(|cell| {
            let date = cell
                .date
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

            match date {
                Some(date) => CalendarDay {
                    has_appointment: booked_dates.contains(&date),
                    is_past: date < today,
                    is_inactive_day: weekly.is_inactive(date),
                    cell,
                },
                None => CalendarDay {
                    cell,
                    has_appointment: false,
                    is_past: false,
                    is_inactive_day: false,
                },
            }
        })
        .collect()
}
