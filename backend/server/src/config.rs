use std::{env, fmt::Display, str::FromStr, time::Duration};

use anyhow::{Result, anyhow};
use tracing::{info, warn};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_UPSTREAM_URL: &str = "http://localhost:4000";
const DEFAULT_UPSTREAM_TIMEOUT_MS: u64 = 5000;
const DEFAULT_STATIC_DIR: &str = "public";
const DEFAULT_MAX_BOOKINGS: usize = 105;
const DEFAULT_BOOKING_WINDOW_DAYS: u32 = 7;

pub struct Config {
    pub port: u16,
    pub upstream_url: String,
    pub upstream_timeout: Duration,
    pub static_dir: String,
    pub max_bookings: usize,
    pub booking_window_days: u32,
    pub secure_cookies: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(Self {
            port: try_load("RUST_PORT", DEFAULT_PORT)?,
            upstream_url: try_load("UPSTREAM_URL", DEFAULT_UPSTREAM_URL.to_string())?,
            upstream_timeout: Duration::from_millis(try_load(
                "UPSTREAM_TIMEOUT_MS",
                DEFAULT_UPSTREAM_TIMEOUT_MS,
            )?),
            static_dir: try_load("STATIC_DIR", DEFAULT_STATIC_DIR.to_string())?,
            max_bookings: try_load("MAX_BOOKINGS", DEFAULT_MAX_BOOKINGS)?,
            booking_window_days: try_load("BOOKING_WINDOW_DAYS", DEFAULT_BOOKING_WINDOW_DAYS)?,
            secure_cookies: try_load("SECURE_COOKIES", false)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            upstream_timeout: Duration::from_millis(DEFAULT_UPSTREAM_TIMEOUT_MS),
            static_dir: DEFAULT_STATIC_DIR.to_string(),
            max_bookings: DEFAULT_MAX_BOOKINGS,
            booking_window_days: DEFAULT_BOOKING_WINDOW_DAYS,
            secure_cookies: false,
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn try_load<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = var(key) else {
        info!("{key} not set, using default: {default}");
        return Ok(default);
    };

    raw.trim().parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        anyhow!("Environment misconfigured: {key}={raw}")
    })
}
