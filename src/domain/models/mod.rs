pub mod appointment;
pub mod availability;
pub mod calendar;
pub mod time_format;
pub mod user;
