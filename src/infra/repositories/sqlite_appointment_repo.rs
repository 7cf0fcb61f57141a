use crate::domain::{models::appointment::{Appointment, AppointmentStatus}, ports::AppointmentRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use chrono::NaiveDate;

pub struct SqliteAppointmentRepo {
    pool: SqlitePool,
}

impl SqliteAppointmentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for SqliteAppointmentRepo {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        sqlx::query_as::<_, Appointment>(
            "INSERT INTO appointments (id, trainer_id, client_id, date, start_time, end_time, status, notes, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&appointment.id).bind(&appointment.trainer_id).bind(&appointment.client_id)
            .bind(appointment.date).bind(appointment.start_time).bind(appointment.end_time)
            .bind(appointment.status.as_str()).bind(&appointment.notes).bind(appointment.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::from_store)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_trainer(&self, trainer_id: &str) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE trainer_id = ? ORDER BY date ASC, start_time ASC").bind(trainer_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_client(&self, client_id: &str) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE client_id = ? ORDER BY date ASC, start_time ASC").bind(client_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_active_by_trainer_and_date(&self, trainer_id: &str, date: NaiveDate) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE trainer_id = ? AND date = ? AND status IN ('pending', 'confirmed') ORDER BY start_time ASC").bind(trainer_id).bind(date).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_active_by_trainer_and_range(&self, trainer_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE trainer_id = ? AND date >= ? AND date < ? AND status IN ('pending', 'confirmed') ORDER BY date ASC, start_time ASC").bind(trainer_id).bind(start).bind(end).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn update_status(&self, id: &str, from: &[AppointmentStatus], status: AppointmentStatus) -> Result<Option<Appointment>, AppError> {
        if from.is_empty() {
            return Ok(None);
        }
        let placeholders = vec!["?"; from.len()].join(", ");
        let sql = format!("UPDATE appointments SET status = ? WHERE id = ? AND status IN ({}) RETURNING *", placeholders);

        let mut query = sqlx::query_as::<_, Appointment>(&sql).bind(status.as_str()).bind(id);
        for expected in from {
            query = query.bind(expected.as_str());
        }
        query.fetch_optional(&self.pool).await.map_err(AppError::from_store)
    }
}
