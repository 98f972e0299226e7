use crate::utils::error::{AppError, AppResult};
use dotenv::dotenv;
use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3500/api";
pub const DEFAULT_USER_ID: i64 = 1;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for talking to the remote booking API
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_id: i64,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_id: DEFAULT_USER_ID,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        ClientConfig {
            base_url: normalize_base_url(base_url.into()),
            ..Default::default()
        }
    }

    /// Load settings from `.env` and the process environment
    pub fn from_env() -> AppResult<Self> {
        dotenv().ok();

        let base_url = env::var("BOOKING_API_BASE_URL")
            .map(normalize_base_url)
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let user_id = match env::var("BOOKING_USER_ID") {
            Ok(value) => value
                .trim()
                .parse::<i64>()
                .map_err(|_| AppError::Config(format!("BOOKING_USER_ID is not a number: {}", value)))?,
            Err(_) => DEFAULT_USER_ID,
        };

        let timeout_secs = match env::var("BOOKING_API_TIMEOUT_SECS") {
            Ok(value) => value.trim().parse::<u64>().map_err(|_| {
                AppError::Config(format!("BOOKING_API_TIMEOUT_SECS is not a number: {}", value))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "BOOKING_API_BASE_URL must be an http(s) URL: {}",
                base_url
            )));
        }

        Ok(ClientConfig {
            base_url,
            user_id,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn with_user_id(mut self, user_id: i64) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Join an endpoint path onto the base URL
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn normalize_base_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}
