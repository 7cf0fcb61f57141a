use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::CreateAppointmentRequest;
use crate::api::handlers::availability::parse_date;
use crate::domain::models::time_format::parse_time;
use crate::domain::services::lifecycle::BookingRequest;
use crate::error::AppError;
use std::sync::Arc;
use axum::http::StatusCode;
use tracing::info;

pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("create_appointment: trainer {} on {} at {}", payload.trainer_id, payload.date, payload.start_time);

    let date = parse_date(&payload.date)?;
    let start_time = parse_time(&payload.start_time)
        .ok_or(AppError::Validation("Invalid start_time format (HH:MM)".into()))?;
    let end_time = parse_time(&payload.end_time)
        .ok_or(AppError::Validation("Invalid end_time format (HH:MM)".into()))?;

    let request = BookingRequest {
        trainer_id: payload.trainer_id,
        client_id: user.id.clone(),
        date,
        start_time,
        end_time,
        notes: payload.notes.filter(|n| !n.trim().is_empty()),
    };

    let created = state.scheduling.book(&user, request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let classified = state.scheduling.list_appointments(&user).await?;
    Ok(Json(classified))
}

pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(appointment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let appointment = state.scheduling.get_appointment(&appointment_id, &user).await?;
    Ok(Json(appointment))
}

pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(appointment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let cancelled = state.scheduling.cancel(&appointment_id, &user).await?;
    Ok(Json(cancelled))
}

pub async fn confirm_appointment(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(appointment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let confirmed = state.scheduling.confirm(&appointment_id, &user).await?;
    Ok(Json(confirmed))
}

pub async fn complete_appointment(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(appointment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let completed = state.scheduling.complete(&appointment_id, &user).await?;
    Ok(Json(completed))
}
