use std::env;

const DEFAULT_EXCHANGE_RATE_URL: &str = "https://openexchangerates.org/";
const DEFAULT_TRACKING_URL: &str = "https://izimport.com/";

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct Config {
    /// Open Exchange Rates app id; the lookup falls back to 3.68 without it
    pub exchange_rate_app_id: Option<String>,
    pub exchange_rate_url: String,
    pub tracking_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Config {
            exchange_rate_app_id: env::var("OPENEXCHANGERATES_APP_ID")
                .ok()
                .filter(|id| !id.trim().is_empty()),
            exchange_rate_url: env::var("IZIMPORT_EXCHANGE_RATE_URL")
                .unwrap_or_else(|_| DEFAULT_EXCHANGE_RATE_URL.to_string()),
            tracking_url: env::var("IZIMPORT_TRACKING_URL")
                .unwrap_or_else(|_| DEFAULT_TRACKING_URL.to_string()),
        }
    }
}
