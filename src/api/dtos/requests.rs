use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateAppointmentRequest {
    pub trainer_id: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: Option<String>,
}

/// Defaults to the current month when either field is missing.
#[derive(Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}
