use crate::domain::{models::appointment::{Appointment, AppointmentStatus}, ports::AppointmentRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use chrono::NaiveDate;

pub struct PostgresAppointmentRepo {
    pool: PgPool,
}

impl PostgresAppointmentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for PostgresAppointmentRepo {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        sqlx::query_as::<_, Appointment>(
            "INSERT INTO appointments (id, trainer_id, client_id, date, start_time, end_time, status, notes, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *"
        )
            .bind(&appointment.id).bind(&appointment.trainer_id).bind(&appointment.client_id)
            .bind(appointment.date).bind(appointment.start_time).bind(appointment.end_time)
            .bind(appointment.status.as_str()).bind(&appointment.notes).bind(appointment.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::from_store)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_trainer(&self, trainer_id: &str) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE trainer_id = $1 ORDER BY date ASC, start_time ASC").bind(trainer_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_client(&self, client_id: &str) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE client_id = $1 ORDER BY date ASC, start_time ASC").bind(client_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_active_by_trainer_and_date(&self, trainer_id: &str, date: NaiveDate) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE trainer_id = $1 AND date = $2 AND status IN ('pending', 'confirmed') ORDER BY start_time ASC").bind(trainer_id).bind(date).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_active_by_trainer_and_range(&self, trainer_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE trainer_id = $1 AND date >= $2 AND date < $3 AND status IN ('pending', 'confirmed') ORDER BY date ASC, start_time ASC").bind(trainer_id).bind(start).bind(end).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn update_status(&self, id: &str, from: &[AppointmentStatus], status: AppointmentStatus) -> Result<Option<Appointment>, AppError> {
        let expected: Vec<String> = from.iter().map(|s| s.as_str().to_string()).collect();
        sqlx::query_as::<_, Appointment>("UPDATE appointments SET status = $1 WHERE id = $2 AND status = ANY($3) RETURNING *")
            .bind(status.as_str()).bind(id).bind(expected)
            .fetch_optional(&self.pool).await.map_err(AppError::from_store)
    }
}
