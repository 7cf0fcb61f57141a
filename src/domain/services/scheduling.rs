use crate::domain::models::{
    appointment::{Appointment, AppointmentStatus, ClassifiedAppointments, NewAppointmentParams},
    availability::{AvailabilitySlot, WeeklyAvailability},
    calendar::MonthView,
    user::{Role, User},
};
use crate::domain::ports::{AppointmentRepository, AvailabilityRepository, Clock};
use crate::domain::services::{
    availability::resolve_candidates,
    calendar::{annotate_month, build_month_grid, GRID_CELLS},
    conflicts::{apply_conflicts, split_by_period},
    lifecycle::{self, BookingRequest, CancelPlan},
    slot_cache::{DayInputs, SlotCache},
};
use crate::error::AppError;
use chrono::{Duration, NaiveDate};
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tracing::{info, warn};

// A lost race re-reads the row; the transition table bounds how often that can repeat.
const MAX_TRANSITION_ATTEMPTS: usize = 3;

pub struct SchedulingService {
    availability_repo: Arc<dyn AvailabilityRepository>,
    appointment_repo: Arc<dyn AppointmentRepository>,
    clock: Arc<dyn Clock>,
    cache: SlotCache,
    auto_confirm: bool,
}

impl SchedulingService {
    pub fn new(
        availability_repo: Arc<dyn AvailabilityRepository>,
        appointment_repo: Arc<dyn AppointmentRepository>,
        clock: Arc<dyn Clock>,
        cache_ttl: StdDuration,
        auto_confirm: bool,
    ) -> Self {
        Self {
            availability_repo,
            appointment_repo,
            clock,
            cache: SlotCache::new(cache_ttl),
            auto_confirm,
        }
    }

    pub fn cache(&self) -> &SlotCache {
        &self.cache
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub async fn weekly_availability(&self, trainer_id: &str) -> Result<WeeklyAvailability, AppError> {
        let configs = self.availability_repo.get_weekly_availability(trainer_id).await?;
        Ok(WeeklyAvailability::from_configs(configs))
    }

    /// Candidate windows for the date, ignoring bookings and the clock.
    pub async fn resolve_candidates(&self, trainer_id: &str, date: NaiveDate) -> Result<Vec<AvailabilitySlot>, AppError> {
        let weekly = self.weekly_availability(trainer_id).await?;
        Ok(resolve_candidates(&weekly, date))
    }

    async fn day_inputs(&self, trainer_id: &str, date: NaiveDate) -> Result<DayInputs, AppError> {
        if let Some(inputs) = self.cache.get(trainer_id, date) {
            return Ok(inputs);
        }
        let generation = self.cache.generation(trainer_id, date);

        let weekly = self.weekly_availability(trainer_id).await?;
        let booked = if weekly.is_inactive(date) {
            Vec::new()
        } else {
            self.appointment_repo.list_active_by_trainer_and_date(trainer_id, date).await?
        };

        let inputs = DayInputs { weekly, booked };
        self.cache.insert(trainer_id, date, generation, inputs.clone());
        Ok(inputs)
    }

    /// Slots for the date with booked and elapsed windows marked unavailable.
    /// Past dates and days the trainer does not work yield an empty list.
    pub async fn get_bookable_slots(&self, trainer_id: &str, date: NaiveDate) -> Result<Vec<AvailabilitySlot>, AppError> {
        let now = self.clock.now();
        if date < now.date() {
            return Ok(Vec::new());
        }

        let inputs = self.day_inputs(trainer_id, date).await?;
        let candidates = resolve_candidates(&inputs.weekly, date);
        if candidates.is_empty() {
            return Ok(candidates);
        }

        Ok(apply_conflicts(candidates, &inputs.booked, now))
    }

    pub async fn book(&self, requester: &User, request: BookingRequest) -> Result<Appointment, AppError> {
        let today = self.clock.today();
        let bookable = if request.date < today {
            Vec::new()
        } else {
            self.get_bookable_slots(&request.trainer_id, request.date).await?
        };

        if let Err(e) = lifecycle::validate_booking(&request, requester, today, &bookable) {
            if matches!(e, AppError::Conflict(_)) {
                self.cache.invalidate(&request.trainer_id, request.date);
            }
            warn!(
                trainer_id = %request.trainer_id,
                date = %request.date,
                start = %request.start_time,
                "Booking rejected: {}", e
            );
            return Err(e);
        }

        let trainer_id = request.trainer_id.clone();
        let date = request.date;
        let appointment = Appointment::new(
            NewAppointmentParams {
                trainer_id: request.trainer_id,
                client_id: request.client_id,
                date: request.date,
                start_time: request.start_time,
                end_time: request.end_time,
                notes: request.notes,
                created_at: self.clock.timestamp(),
            },
            lifecycle::initial_status(self.auto_confirm),
        );

        let result = self.appointment_repo.create(&appointment).await;
        self.cache.invalidate(&trainer_id, date);

        match result {
            Ok(created) => {
                info!(appointment_id = %created.id, status = %created.status, "Appointment booked");
                Ok(created)
            }
            Err(AppError::Conflict(msg)) => {
                warn!(trainer_id = %trainer_id, date = %date, "Booking lost to a concurrent request: {}", msg);
                Err(AppError::Conflict(msg))
            }
            Err(e) => Err(e),
        }
    }

    async fn load(&self, appointment_id: &str) -> Result<Appointment, AppError> {
        self.appointment_repo.find_by_id(appointment_id).await?
            .ok_or_else(|| AppError::NotFound("Appointment not found".into()))
    }

    /// Writes `target` only if the row still holds a status it may leave from.
    /// `None` means another writer moved the row first.
    async fn write_transition(
        &self,
        appointment: &Appointment,
        target: AppointmentStatus,
    ) -> Result<Option<Appointment>, AppError> {
        let sources = lifecycle::transition_sources(target);
        let result = self.appointment_repo.update_status(&appointment.id, &sources, target).await;
        self.cache.invalidate(&appointment.trainer_id, appointment.date);
        result
    }

    /// Cancelling an already cancelled appointment returns it unchanged.
    pub async fn cancel(&self, appointment_id: &str, requester: &User) -> Result<Appointment, AppError> {
        for _ in 0..MAX_TRANSITION_ATTEMPTS {
            let appointment = self.load(appointment_id).await?;

            match lifecycle::plan_cancel(&appointment, &requester.id)? {
                CancelPlan::AlreadyCancelled => {
                    info!(appointment_id, "Cancel requested for an already cancelled appointment");
                    return Ok(appointment);
                }
                CancelPlan::Cancel => {
                    if let Some(cancelled) = self.write_transition(&appointment, AppointmentStatus::Cancelled).await? {
                        info!(appointment_id, user_id = %requester.id, "Appointment cancelled");
                        return Ok(cancelled);
                    }
                    warn!(appointment_id, from = %appointment.status, "Cancel raced another status change, re-reading");
                }
            }
        }
        Err(AppError::Conflict("Appointment is being changed concurrently, try again".into()))
    }

    pub async fn confirm(&self, appointment_id: &str, requester: &User) -> Result<Appointment, AppError> {
        self.trainer_transition(appointment_id, requester, AppointmentStatus::Confirmed).await
    }

    pub async fn complete(&self, appointment_id: &str, requester: &User) -> Result<Appointment, AppError> {
        self.trainer_transition(appointment_id, requester, AppointmentStatus::Completed).await
    }

    async fn trainer_transition(
        &self,
        appointment_id: &str,
        requester: &User,
        target: AppointmentStatus,
    ) -> Result<Appointment, AppError> {
        for _ in 0..MAX_TRANSITION_ATTEMPTS {
            let appointment = self.load(appointment_id).await?;
            lifecycle::authorize_trainer_transition(&appointment, &requester.id, target)?;

            if let Some(updated) = self.write_transition(&appointment, target).await? {
                info!(appointment_id, status = %target, "Appointment status updated");
                return Ok(updated);
            }
            warn!(appointment_id, from = %appointment.status, to = %target, "Transition raced another status change, re-reading");
        }
        Err(AppError::Conflict("Appointment is being changed concurrently, try again".into()))
    }

    pub async fn get_appointment(&self, appointment_id: &str, requester: &User) -> Result<Appointment, AppError> {
        let appointment = self.load(appointment_id).await?;
        if !appointment.is_participant(&requester.id) {
            return Err(AppError::Forbidden("Not a participant of this appointment".into()));
        }
        Ok(appointment)
    }

    pub async fn list_appointments(&self, requester: &User) -> Result<ClassifiedAppointments, AppError> {
        let appointments = match requester.role {
            Role::Trainer => self.appointment_repo.list_by_trainer(&requester.id).await?,
            Role::Client => self.appointment_repo.list_by_client(&requester.id).await?,
        };
        Ok(split_by_period(appointments, self.clock.today()))
    }

    pub async fn month_view(&self, trainer_id: &str, year: i32, month: u32) -> Result<MonthView, AppError> {
        let grid = build_month_grid(year, month)?;
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(AppError::Internal)?;
        let last = first + Duration::days(GRID_CELLS as i64);

        let weekly = self.weekly_availability(trainer_id).await?;
        let appointments = self.appointment_repo
            .list_active_by_trainer_and_range(trainer_id, first, last)
            .await?;

        Ok(MonthView {
            year,
            month,
            days: annotate_month(grid, &weekly, &appointments, self.clock.today()),
        })
    }
}
