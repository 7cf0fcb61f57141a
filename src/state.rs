use std::sync::Arc;
use crate::domain::ports::{AppointmentRepository, AvailabilityRepository};
use crate::domain::services::scheduling::SchedulingService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub availability_repo: Arc<dyn AvailabilityRepository>,
    pub appointment_repo: Arc<dyn AppointmentRepository>,
    pub scheduling: Arc<SchedulingService>,
}
