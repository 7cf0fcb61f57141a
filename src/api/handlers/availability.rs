use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{
    requests::{CalendarQuery, SlotsQuery},
    responses::{SlotsResponse, WeeklyAvailabilityResponse},
};
use crate::error::AppError;
use std::sync::Arc;
use chrono::{Datelike, NaiveDate};

pub fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format (YYYY-MM-DD)".into()))
}

pub async fn get_weekly_availability(
    State(state): State<Arc<AppState>>,
    Path(trainer_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let weekly = state.scheduling.weekly_availability(&trainer_id).await?;

    Ok(Json(WeeklyAvailabilityResponse {
        days: weekly.configs().cloned().collect(),
        trainer_id,
    }))
}

pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Path(trainer_id): Path<String>,
    Query(params): Query<SlotsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let date_str = params.date.ok_or(AppError::Validation("Date required".into()))?;
    let date = parse_date(&date_str)?;

    let slots = state.scheduling.get_bookable_slots(&trainer_id, date).await?;

    Ok(Json(SlotsResponse {
        trainer_id,
        date: date_str,
        slots,
    }))
}

pub async fn get_calendar(
    State(state): State<Arc<AppState>>,
    Path(trainer_id): Path<String>,
    Query(params): Query<CalendarQuery>,
) -> Result<impl IntoResponse, AppError> {
    let today = state.scheduling.today();
    let year = params.year.unwrap_or(today.year());
    let month = params.month.unwrap_or(today.month());

    let view = state.scheduling.month_view(&trainer_id, year, month).await?;
    Ok(Json(view))
}
