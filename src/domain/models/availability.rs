use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::warn;

use crate::domain::models::time_format;

/// One row of a trainer's recurring template. `day_of_week` is 0 for Sunday.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq, Eq)]
pub struct WeeklyAvailabilityConfig {
    pub trainer_id: String,
    pub day_of_week: i32,
    pub active: bool,
    #[serde(with = "time_format::hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "time_format::hhmm")]
    pub end_time: NaiveTime,
    pub slot_duration_minutes: i32,
}

impl WeeklyAvailabilityConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(0..7).contains(&self.day_of_week) {
            return Err(format!("day_of_week must be 0-6, got {}", self.day_of_week));
        }
        if self.start_time >= self.end_time {
            return Err("start_time must be before end_time".to_string());
        }
        if self.slot_duration_minutes <= 0 {
            return Err("slot_duration_minutes must be positive".to_string());
        }
        Ok(())
    }
}

/// Weekday-indexed view of a trainer's template, Sunday first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklyAvailability {
    days: [Option<WeeklyAvailabilityConfig>; 7],
}

impl WeeklyAvailability {
    pub fn from_configs(configs: Vec<WeeklyAvailabilityConfig>) -> Self {
        let mut days: [Option<WeeklyAvailabilityConfig>; 7] = Default::default();

        for config in configs {
            if let Err(reason) = config.validate() {
                warn!(trainer_id = %config.trainer_id, "Skipping invalid availability row: {}", reason);
                continue;
            }
            let idx = config.day_of_week as usize;
            match &days[idx] {
                Some(existing) if existing.active => {
                    warn!(
                        trainer_id = %config.trainer_id,
                        day_of_week = config.day_of_week,
                        "Duplicate availability row ignored"
                    );
                }
                _ => days[idx] = Some(config),
            }
        }

        Self { days }
    }

    /// The active config governing `date`, if the trainer works that weekday.
    pub fn for_date(&self, date: NaiveDate) -> Option<&WeeklyAvailabilityConfig> {
        let idx = date.weekday().num_days_from_sunday() as usize;
        self.days[idx].as_ref().filter(|c| c.active)
    }

    pub fn is_inactive(&self, date: NaiveDate) -> bool {
        self.for_date(date).is_none()
    }

    pub fn configs(&self) -> impl Iterator<Item = &WeeklyAvailabilityConfig> {
        self.days.iter().flatten()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AvailabilitySlot {
    pub date: NaiveDate,
    #[serde(with = "time_format::hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "time_format::hhmm")]
    pub end_time: NaiveTime,
    pub available: bool,
}

impl AvailabilitySlot {
    pub fn window(&self) -> (NaiveTime, NaiveTime) {
        (self.start_time, self.end_time)
    }
}
