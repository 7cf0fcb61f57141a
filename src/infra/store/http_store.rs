use crate::domain::models::{
    appointment::{Appointment, AppointmentStatus},
    availability::WeeklyAvailabilityConfig,
};
use crate::domain::ports::{AppointmentRepository, AvailabilityRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{error, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Remote appointment store speaking JSON over HTTP. Every call carries the
/// configured bearer credential; nothing is retried here.
pub struct HttpSchedulingStore {
    client: Client,
    base_url: Url,
    api_token: String,
}

/// The remote store answers 409 when the row is no longer in `expected`.
#[derive(Serialize)]
struct StatusPayload<'a> {
    status: AppointmentStatus,
    expected: &'a [AppointmentStatus],
}

impl HttpSchedulingStore {
    pub fn new(base_url: String, api_token: String) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = Url::parse(&base_url)
            .map_err(|e| AppError::Transport(format!("Invalid store URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Transport(format!("Store URL '{}' cannot carry a path", base_url)));
        }

        Ok(Self {
            client,
            base_url,
            api_token,
        })
    }

    /// Appends each segment percent-encoded, so ids cannot escape their slot in the path.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, AppError> {
        let res = request
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Appointment store connection error: {}", e);
                error!("{}", msg);
                AppError::Transport(msg)
            })?;

        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        let text = res.text().await.unwrap_or_default();
        match status {
            StatusCode::CONFLICT => {
                warn!("Appointment store reported conflict: {}", text);
                Err(AppError::Conflict(if text.is_empty() { "Slot is already booked".into() } else { text }))
            }
            StatusCode::NOT_FOUND => Err(AppError::NotFound(text)),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Err(AppError::Validation(text)),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                error!("Appointment store rejected credentials: {}", status);
                Err(AppError::Transport(format!("Store rejected credentials ({})", status)))
            }
            _ => {
                let msg = format!("Appointment store failed. Status: {}, Body: {}", status, text);
                error!("{}", msg);
                Err(AppError::Transport(msg))
            }
        }
    }

    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AppError> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| AppError::Transport(format!("Invalid store response: {}", e)))
    }

    async fn list(&self, query: &[(&str, String)]) -> Result<Vec<Appointment>, AppError> {
        self.json(self.client.get(self.url(&["appointments"])).query(query)).await
    }
}

#[async_trait]
impl AvailabilityRepository for HttpSchedulingStore {
    async fn get_weekly_availability(&self, trainer_id: &str) -> Result<Vec<WeeklyAvailabilityConfig>, AppError> {
        let url = self.url(&["trainers", trainer_id, "availability"]);
        self.json(self.client.get(url)).await
    }

    async fn upsert(&self, config: &WeeklyAvailabilityConfig) -> Result<WeeklyAvailabilityConfig, AppError> {
        config.validate().map_err(AppError::Validation)?;
        let day = config.day_of_week.to_string();
        let url = self.url(&["trainers", config.trainer_id.as_str(), "availability", day.as_str()]);
        self.json(self.client.put(url).json(config)).await
    }
}

#[async_trait]
impl AppointmentRepository for HttpSchedulingStore {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        self.json(self.client.post(self.url(&["appointments"])).json(appointment)).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError> {
        match self.json(self.client.get(self.url(&["appointments", id]))).await {
            Ok(appointment) => Ok(Some(appointment)),
            Err(AppError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn list_by_trainer(&self, trainer_id: &str) -> Result<Vec<Appointment>, AppError> {
        self.list(&[("trainer_id", trainer_id.to_string())]).await
    }

    async fn list_by_client(&self, client_id: &str) -> Result<Vec<Appointment>, AppError> {
        self.list(&[("client_id", client_id.to_string())]).await
    }

    async fn list_active_by_trainer_and_date(&self, trainer_id: &str, date: NaiveDate) -> Result<Vec<Appointment>, AppError> {
        let all = self.list(&[
            ("trainer_id", trainer_id.to_string()),
            ("date", date.to_string()),
        ]).await?;
        Ok(all.into_iter().filter(|a| a.status.holds_slot() && a.date == date).collect())
    }

    async fn list_active_by_trainer_and_range(&self, trainer_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<Appointment>, AppError> {
        let all = self.list(&[
            ("trainer_id", trainer_id.to_string()),
            ("from", start.to_string()),
            ("to", end.to_string()),
        ]).await?;
        Ok(all.into_iter().filter(|a| a.status.holds_slot() && a.date >= start && a.date < end).collect())
    }

    async fn update_status(&self, id: &str, from: &[AppointmentStatus], status: AppointmentStatus) -> Result<Option<Appointment>, AppError> {
        let url = self.url(&["appointments", id]);
        let payload = StatusPayload { status, expected: from };
        match self.json(self.client.patch(url).json(&payload)).await {
            Ok(appointment) => Ok(Some(appointment)),
            Err(AppError::Conflict(_)) | Err(AppError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
