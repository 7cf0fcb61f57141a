use crate::domain::models::availability::{AvailabilitySlot, WeeklyAvailabilityConfig};
use serde::Serialize;

#[derive(Serialize)]
pub struct SlotsResponse {
    pub trainer_id: String,
    pub date: String,
    pub slots: Vec<AvailabilitySlot>,
}

#[derive(Serialize)]
pub struct WeeklyAvailabilityResponse {
    pub trainer_id: String,
    pub days: Vec<WeeklyAvailabilityConfig>,
}
