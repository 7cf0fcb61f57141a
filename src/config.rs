use std::env;
use std::time::Duration;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub store_api_token: String,
    pub auto_confirm_bookings: bool, // new bookings start confirmed instead of pending
    pub slot_cache_ttl: Duration,
    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            store_api_token: env::var("STORE_API_TOKEN").unwrap_or_default(),
            auto_confirm_bookings: env::var("AUTO_CONFIRM_BOOKINGS")
                .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "yes"))
                .unwrap_or(false),
            slot_cache_ttl: Duration::from_secs(
                env::var("SLOT_CACHE_TTL_SECS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse()
                    .expect("SLOT_CACHE_TTL_SECS must be a number"),
            ),
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "./logs".to_string()),
        }
    }
}
