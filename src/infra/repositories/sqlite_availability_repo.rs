use crate::domain::{models::availability::WeeklyAvailabilityConfig, ports::AvailabilityRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteAvailabilityRepo {
    pool: SqlitePool,
}

impl SqliteAvailabilityRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AvailabilityRepository for SqliteAvailabilityRepo {
    async fn get_weekly_availability(&self, trainer_id: &str) -> Result<Vec<WeeklyAvailabilityConfig>, AppError> {
        sqlx::query_as::<_, WeeklyAvailabilityConfig>("SELECT * FROM weekly_availability WHERE trainer_id = ? ORDER BY day_of_week ASC")
            .bind(trainer_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn upsert(&self, config: &WeeklyAvailabilityConfig) -> Result<WeeklyAvailabilityConfig, AppError> {
        config.validate().map_err(AppError::Validation)?;
        sqlx::query_as::<_, WeeklyAvailabilityConfig>(
            "INSERT INTO weekly_availability (trainer_id, day_of_week, active, start_time, end_time, slot_duration_minutes)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT (trainer_id, day_of_week) DO UPDATE SET
                active = excluded.active,
                start_time = excluded.start_time,
                end_time = excluded.end_time,
                slot_duration_minutes = excluded.slot_duration_minutes
             RETURNING *"
        )
            .bind(&config.trainer_id).bind(config.day_of_week).bind(config.active)
            .bind(config.start_time).bind(config.end_time).bind(config.slot_duration_minutes)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
