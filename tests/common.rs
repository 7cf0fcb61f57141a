use scheduling_backend::{
    api::{extractors::auth::TOKEN_AUDIENCE, router::create_router},
    config::Config,
    domain::models::{
        availability::WeeklyAvailabilityConfig,
        user::{Claims, Role},
    },
    domain::ports::AppointmentRepository,
    infra::{
        clock::FixedClock,
        factory::{build_state, run_sqlite_migrations},
        repositories::{
            sqlite_appointment_repo::SqliteAppointmentRepo,
            sqlite_availability_repo::SqliteAvailabilityRepo,
        },
    },
    state::AppState,
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret";
pub const TRAINER: &str = "trainer-1";
pub const CLIENT: &str = "client-1";
pub const OTHER_CLIENT: &str = "client-2";

/// 2030-01-07 is a Monday.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 1, 7).unwrap()
}

pub fn at(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
    date.and_hms_opt(h, m, 0).unwrap()
}

pub fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub clock: Arc<FixedClock>,
}

impl TestApp {
    /// Clock starts on Sunday 2030-01-06 at noon.
    pub async fn new() -> Self {
        Self::with_policy(false).await
    }

    pub async fn with_policy(auto_confirm_bookings: bool) -> Self {
        Self::with_appointment_store(auto_confirm_bookings, |repo| Arc::new(repo)).await
    }

    /// Lets a test wrap the SQLite appointment store, e.g. to pause or skew its reads.
    pub async fn with_appointment_store<F>(auto_confirm_bookings: bool, wrap: F) -> Self
    where
        F: FnOnce(SqliteAppointmentRepo) -> Arc<dyn AppointmentRepository>,
    {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        run_sqlite_migrations(&pool).await;

        let config = Config {
            database_url: db_url,
            port: 0,
            jwt_secret: JWT_SECRET.to_string(),
            store_api_token: String::new(),
            auto_confirm_bookings,
            slot_cache_ttl: Duration::from_secs(300),
            log_dir: "./logs".to_string(),
        };

        let clock = Arc::new(FixedClock::new(at(monday().pred_opt().unwrap(), 12, 0)));

        let state = Arc::new(build_state(
            config,
            Arc::new(SqliteAvailabilityRepo::new(pool.clone())),
            wrap(SqliteAppointmentRepo::new(pool.clone())),
            clock.clone(),
        ));

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            clock,
        }
    }

    pub async fn seed_day(&self, trainer_id: &str, day_of_week: i32, active: bool, start: NaiveTime, end: NaiveTime, slot_minutes: i32) {
        self.state.availability_repo.upsert(&WeeklyAvailabilityConfig {
            trainer_id: trainer_id.to_string(),
            day_of_week,
            active,
            start_time: start,
            end_time: end,
            slot_duration_minutes: slot_minutes,
        }).await.expect("Failed to seed availability");
    }

    /// Monday 08:00-10:00 in 60 minute slots.
    pub async fn seed_monday_trainer(&self) {
        self.seed_day(TRAINER, 1, true, t(8, 0), t(10, 0), 60).await;
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    pub async fn slots(&self, date: &str) -> Vec<Value> {
        let (status, body) = self.get(&format!("/api/v1/trainers/{}/slots?date={}", TRAINER, date), None).await;
        assert_eq!(status, StatusCode::OK, "slots request failed: {}", body);
        body["slots"].as_array().unwrap().clone()
    }

    pub async fn book(&self, token: &str, date: &str, start: &str, end: &str) -> (StatusCode, Value) {
        self.post("/api/v1/appointments", Some(token), serde_json::json!({
            "trainer_id": TRAINER,
            "date": date,
            "start_time": start,
            "end_time": end,
            "notes": "leg day"
        })).await
    }
}

pub fn token_for(user_id: &str, role: Role) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        aud: TOKEN_AUDIENCE.to_string(),
        exp: 4_102_444_800, // 2100-01-01
        role,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(JWT_SECRET.as_bytes())).unwrap()
}

pub fn trainer_token() -> String {
    token_for(TRAINER, Role::Trainer)
}

pub fn client_token() -> String {
    token_for(CLIENT, Role::Client)
}

pub fn other_client_token() -> String {
    token_for(OTHER_CLIENT, Role::Client)
}

/// `(start, end, available)` triples for compact assertions.
pub fn windows(slots: &[Value]) -> Vec<(String, String, bool)> {
    slots.iter()
        .map(|s| (
            s["start_time"].as_str().unwrap().to_string(),
            s["end_time"].as_str().unwrap().to_string(),
            s["available"].as_bool().unwrap(),
        ))
        .collect()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
