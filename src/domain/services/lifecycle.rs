use crate::domain::models::{
    appointment::{Appointment, AppointmentStatus},
    availability::AvailabilitySlot,
    user::{Role, User},
};
use crate::error::AppError;
use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, warn};

/// Statuses reachable from `current` in one step.
pub fn valid_transitions(current: AppointmentStatus) -> &'static [AppointmentStatus] {
    match current {
        AppointmentStatus::Pending => &[AppointmentStatus::Confirmed, AppointmentStatus::Cancelled],
        AppointmentStatus::Confirmed => &[AppointmentStatus::Cancelled, AppointmentStatus::Completed],
        AppointmentStatus::Cancelled | AppointmentStatus::Completed => &[],
    }
}

const ALL_STATUSES: [AppointmentStatus; 4] = [
    AppointmentStatus::Pending,
    AppointmentStatus::Confirmed,
    AppointmentStatus::Cancelled,
    AppointmentStatus::Completed,
];

/// Statuses from which `target` is reachable; the store only writes from these.
pub fn transition_sources(target: AppointmentStatus) -> Vec<AppointmentStatus> {
    ALL_STATUSES
        .into_iter()
        .filter(|from| valid_transitions(*from).contains(&target))
        .collect()
}

pub fn validate_transition(current: AppointmentStatus, target: AppointmentStatus) -> Result<(), AppError> {
    if valid_transitions(current).contains(&target) {
        debug!("Status transition validated: {} -> {}", current, target);
        Ok(())
    } else {
        warn!("Invalid status transition attempted: {} -> {}", current, target);
        Err(AppError::Validation(format!(
            "Cannot move appointment from {} to {}",
            current, target
        )))
    }
}

pub fn initial_status(auto_confirm: bool) -> AppointmentStatus {
    if auto_confirm {
        AppointmentStatus::Confirmed
    } else {
        AppointmentStatus::Pending
    }
}

#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub trainer_id: String,
    pub client_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub notes: Option<String>,
}

/// Checks made before the store is asked to persist a booking.
pub fn validate_booking(
    request: &BookingRequest,
    requester: &User,
    today: NaiveDate,
    bookable: &[AvailabilitySlot],
) -> Result<(), AppError> {
    if requester.role != Role::Client || requester.id != request.client_id {
        return Err(AppError::Forbidden("Only the client can book for themselves".into()));
    }
    if request.trainer_id.trim().is_empty() {
        return Err(AppError::Validation("trainer_id is required".into()));
    }
    if request.start_time >= request.end_time {
        return Err(AppError::Validation("start_time must be before end_time".into()));
    }
    if request.date < today {
        return Err(AppError::Validation("Cannot book a date in the past".into()));
    }

    let slot = bookable
        .iter()
        .find(|slot| slot.start_time == request.start_time && slot.end_time == request.end_time);
    match slot {
        None => Err(AppError::Validation("Selected time is not one of the trainer's slots".into())),
        Some(slot) if !slot.available => Err(AppError::Conflict("Selected time slot is not available".into())),
        Some(_) => Ok(()),
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum CancelPlan {
    AlreadyCancelled,
    Cancel,
}

pub fn plan_cancel(appointment: &Appointment, requester_id: &str) -> Result<CancelPlan, AppError> {
    if !appointment.is_participant(requester_id) {
        return Err(AppError::Forbidden("Only the trainer or client can cancel this appointment".into()));
    }
    if appointment.status == AppointmentStatus::Cancelled {
        return Ok(CancelPlan::AlreadyCancelled);
    }
    validate_transition(appointment.status, AppointmentStatus::Cancelled)?;
    Ok(CancelPlan::Cancel)
}

/// Trainer-side transitions: accepting a pending request, closing out a session.
pub fn authorize_trainer_transition(
    appointment: &Appointment,
    requester_id: &str,
    target: AppointmentStatus,
) -> Result<(), AppError> {
    if appointment.trainer_id != requester_id {
        return Err(AppError::Forbidden("Only the trainer can change this appointment".into()));
    }
    validate_transition(appointment.status, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::appointment::NewAppointmentParams;
    use chrono::Utc;

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 1, day).unwrap()
    }

    fn client() -> User {
        User { id: "client-1".into(), role: Role::Client }
    }

    fn request() -> BookingRequest {
        BookingRequest {
            trainer_id: "trainer-1".into(),
            client_id: "client-1".into(),
            date: d(7),
            start_time: t(9),
            end_time: t(10),
            notes: None,
        }
    }

    fn offered(available: bool) -> Vec<AvailabilitySlot> {
        vec![AvailabilitySlot { date: d(7), start_time: t(9), end_time: t(10), available }]
    }

    fn appointment(status: AppointmentStatus) -> Appointment {
        Appointment::new(NewAppointmentParams {
            trainer_id: "trainer-1".into(),
            client_id: "client-1".into(),
            date: d(7),
            start_time: t(9),
            end_time: t(10),
            notes: None,
            created_at: Utc::now(),
        }, status)
    }

    #[test]
    fn test_transition_table() {
        assert!(validate_transition(AppointmentStatus::Pending, AppointmentStatus::Confirmed).is_ok());
        assert!(validate_transition(AppointmentStatus::Pending, AppointmentStatus::Cancelled).is_ok());
        assert!(validate_transition(AppointmentStatus::Confirmed, AppointmentStatus::Completed).is_ok());
        assert!(validate_transition(AppointmentStatus::Pending, AppointmentStatus::Completed).is_err());
        assert!(validate_transition(AppointmentStatus::Completed, AppointmentStatus::Cancelled).is_err());
        assert!(valid_transitions(AppointmentStatus::Cancelled).is_empty());
    }

    #[test]
    fn test_transition_sources_exclude_terminal_states() {
        assert_eq!(
            transition_sources(AppointmentStatus::Cancelled),
            vec![AppointmentStatus::Pending, AppointmentStatus::Confirmed]
        );
        assert_eq!(transition_sources(AppointmentStatus::Confirmed), vec![AppointmentStatus::Pending]);
        assert_eq!(transition_sources(AppointmentStatus::Completed), vec![AppointmentStatus::Confirmed]);
    }

    #[test]
    fn test_booking_requires_offered_slot() {
        assert!(validate_booking(&request(), &client(), d(6), &offered(true)).is_ok());
        assert!(matches!(
            validate_booking(&request(), &client(), d(6), &offered(false)),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn test_booking_outside_template_is_invalid() {
        assert!(matches!(
            validate_booking(&request(), &client(), d(6), &[]),
            Err(AppError::Validation(_))
        ));

        let mut shifted = request();
        shifted.start_time = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        shifted.end_time = NaiveTime::from_hms_opt(10, 30, 0).unwrap();
        assert!(matches!(
            validate_booking(&shifted, &client(), d(6), &offered(true)),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_booking_rejects_past_date_and_bad_window() {
        assert!(matches!(
            validate_booking(&request(), &client(), d(8), &offered(true)),
            Err(AppError::Validation(_))
        ));

        let mut inverted = request();
        inverted.start_time = t(10);
        inverted.end_time = t(9);
        assert!(matches!(
            validate_booking(&inverted, &client(), d(6), &offered(true)),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_booking_only_by_the_client() {
        let trainer = User { id: "trainer-1".into(), role: Role::Trainer };
        assert!(matches!(
            validate_booking(&request(), &trainer, d(6), &offered(true)),
            Err(AppError::Forbidden(_))
        ));
        let other = User { id: "client-2".into(), role: Role::Client };
        assert!(matches!(
            validate_booking(&request(), &other, d(6), &offered(true)),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_cancel_plan() {
        assert_eq!(plan_cancel(&appointment(AppointmentStatus::Pending), "client-1").unwrap(), CancelPlan::Cancel);
        assert_eq!(plan_cancel(&appointment(AppointmentStatus::Confirmed), "trainer-1").unwrap(), CancelPlan::Cancel);
        assert_eq!(
            plan_cancel(&appointment(AppointmentStatus::Cancelled), "client-1").unwrap(),
            CancelPlan::AlreadyCancelled
        );
        assert!(matches!(
            plan_cancel(&appointment(AppointmentStatus::Completed), "client-1"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            plan_cancel(&appointment(AppointmentStatus::Pending), "stranger"),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_trainer_transitions() {
        let pending = appointment(AppointmentStatus::Pending);
        assert!(authorize_trainer_transition(&pending, "trainer-1", AppointmentStatus::Confirmed).is_ok());
        assert!(matches!(
            authorize_trainer_transition(&pending, "client-1", AppointmentStatus::Confirmed),
            Err(AppError::Forbidden(_))
        ));
        assert!(authorize_trainer_transition(&pending, "trainer-1", AppointmentStatus::Completed).is_err());
    }

    #[test]
    fn test_initial_status_policy() {
        assert_eq!(initial_status(false), AppointmentStatus::Pending);
        assert_eq!(initial_status(true), AppointmentStatus::Confirmed);
    }
}
