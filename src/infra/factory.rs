use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::domain::ports::{AppointmentRepository, AvailabilityRepository, Clock};
use crate::domain::services::scheduling::SchedulingService;
use crate::infra::clock::SystemClock;
use crate::infra::store::http_store::HttpSchedulingStore;
use crate::infra::repositories::{
    postgres_appointment_repo::PostgresAppointmentRepo, postgres_availability_repo::PostgresAvailabilityRepo,
    sqlite_appointment_repo::SqliteAppointmentRepo, sqlite_availability_repo::SqliteAvailabilityRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let (availability_repo, appointment_repo): (Arc<dyn AvailabilityRepository>, Arc<dyn AppointmentRepository>) =
        if database_url.starts_with("http://") || database_url.starts_with("https://") {
            info!("Using remote appointment store at {}", database_url);

            let store = Arc::new(
                HttpSchedulingStore::new(database_url.clone(), config.store_api_token.clone())
                    .expect("Failed to initialize appointment store client"),
            );
            (store.clone(), store)
        } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
            info!("Initializing PostgreSQL connection...");

            let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
            opts = opts.log_statements(LevelFilter::Debug)
                .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect_with(opts)
                .await
                .expect("Failed to connect to Postgres");

            run_postgres_migrations(&pool).await;

            (
                Arc::new(PostgresAvailabilityRepo::new(pool.clone())),
                Arc::new(PostgresAppointmentRepo::new(pool)),
            )
        } else {
            info!("Initializing SQLite connection with WAL Mode...");

            let opts = SqliteConnectOptions::from_str(database_url)
                .expect("Invalid SQLite connection string")
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .busy_timeout(Duration::from_secs(5))
                .log_statements(LevelFilter::Debug)
                .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

            let pool = SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(opts)
                .await
                .expect("Failed to connect to SQLite");

            run_sqlite_migrations(&pool).await;

            (
                Arc::new(SqliteAvailabilityRepo::new(pool.clone())),
                Arc::new(SqliteAppointmentRepo::new(pool)),
            )
        };

    build_state(config.clone(), availability_repo, appointment_repo, Arc::new(SystemClock))
}

pub fn build_state(
    config: Config,
    availability_repo: Arc<dyn AvailabilityRepository>,
    appointment_repo: Arc<dyn AppointmentRepository>,
    clock: Arc<dyn Clock>,
) -> AppState {
    let scheduling = Arc::new(SchedulingService::new(
        availability_repo.clone(),
        appointment_repo.clone(),
        clock,
        config.slot_cache_ttl,
        config.auto_confirm_bookings,
    ));

    AppState {
        config,
        availability_repo,
        appointment_repo,
        scheduling,
    }
}

pub async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
