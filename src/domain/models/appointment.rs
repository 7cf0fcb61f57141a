use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::time_format;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Completed => "completed",
        }
    }

    /// Pending and confirmed appointments occupy their slot.
    pub fn holds_slot(&self) -> bool {
        matches!(self, AppointmentStatus::Pending | AppointmentStatus::Confirmed)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown appointment status '{0}'")]
pub struct UnknownStatus(pub String);

impl TryFrom<String> for AppointmentStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            "completed" => Ok(AppointmentStatus::Completed),
            _ => Err(UnknownStatus(value)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq, Eq)]
pub struct Appointment {
    pub id: String,
    pub trainer_id: String,
    pub client_id: String,
    pub date: NaiveDate,
    #[serde(with = "time_format::hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "time_format::hhmm")]
    pub end_time: NaiveTime,
    #[sqlx(try_from = "String")]
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewAppointmentParams {
    pub trainer_id: String,
    pub client_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    pub fn new(params: NewAppointmentParams, status: AppointmentStatus) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            trainer_id: params.trainer_id,
            client_id: params.client_id,
            date: params.date,
            start_time: params.start_time,
            end_time: params.end_time,
            status,
            notes: params.notes,
            created_at: params.created_at,
        }
    }

    pub fn is_participant(&self, user_id: &str) -> bool {
        self.trainer_id == user_id || self.client_id == user_id
    }

    pub fn window(&self) -> (NaiveTime, NaiveTime) {
        (self.start_time, self.end_time)
    }
}

/// Read-time display bucket. Independent of the stored status.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentPeriod {
    Upcoming,
    Past,
}

#[derive(Debug, Serialize, Default)]
pub struct ClassifiedAppointments {
    pub upcoming: Vec<Appointment>,
    pub past: Vec<Appointment>,
}
