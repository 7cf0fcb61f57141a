use crate::domain::models::{
    appointment::{Appointment, AppointmentStatus},
    availability::WeeklyAvailabilityConfig,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};

/// Source of the recurring weekly template.
#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    async fn get_weekly_availability(&self, trainer_id: &str) -> Result<Vec<WeeklyAvailabilityConfig>, AppError>;
    async fn upsert(&self, config: &WeeklyAvailabilityConfig) -> Result<WeeklyAvailabilityConfig, AppError>;
}

/// Authoritative appointment store.
///
/// `create` must reject a second pending/confirmed appointment for the same
/// `(trainer_id, date, start_time, end_time)` with `AppError::Conflict`.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError>;
    async fn list_by_trainer(&self, trainer_id: &str) -> Result<Vec<Appointment>, AppError>;
    async fn list_by_client(&self, client_id: &str) -> Result<Vec<Appointment>, AppError>;
    async fn list_active_by_trainer_and_date(&self, trainer_id: &str, date: NaiveDate) -> Result<Vec<Appointment>, AppError>;
    async fn list_active_by_trainer_and_range(&self, trainer_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<Appointment>, AppError>;
    /// Moves the appointment to `status` only while it is still in one of
    /// `from`. `None` means no row matched: missing, or changed underneath.
    async fn update_status(
        &self,
        id: &str,
        from: &[AppointmentStatus],
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>, AppError>;
}

/// Wall clock in the single implicit local timezone.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }

    /// `now()` as an absolute instant, for record timestamps.
    fn timestamp(&self) -> DateTime<Utc> {
        let now = self.now();
        now.and_local_timezone(Local)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
            .unwrap_or_else(|| now.and_utc())
    }
}
