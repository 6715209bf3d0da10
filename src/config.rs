// config.rs
use std::env;
use std::time::Duration;

use crate::errors::{AppError, Result};

pub const DEFAULT_SCOREBOARD_URL: &str = "https://www.espn.com/soccer/scoreboard";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mongo_uri: String,
    pub mongo_database: String,
    pub scoreboard_url: String,
    pub scrape_interval_secs: u64,
    pub http_timeout_secs: u64,
    pub port: u16,
    pub host: String,
}

impl AppConfig {
    /// Reads the process environment. Call `dotenvy::dotenv()` first if a `.env` file
    /// should be honoured.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mongo_uri = var("MONGO_URI")
            .ok_or_else(|| AppError::configuration("MONGO_URI must be set"))?;

        Ok(AppConfig {
            mongo_uri,
            mongo_database: var("MONGO_DATABASE").unwrap_or_else(|| "live_dashboard".to_string()),
            scoreboard_url: var("SCOREBOARD_URL")
                .unwrap_or_else(|| DEFAULT_SCOREBOARD_URL.to_string()),
            scrape_interval_secs: positive(var("SCRAPE_INTERVAL_SECS"), "SCRAPE_INTERVAL_SECS", 300)?,
            http_timeout_secs: positive(var("HTTP_TIMEOUT_SECS"), "HTTP_TIMEOUT_SECS", 20)?,
            port: match var("PORT") {
                Some(raw) => raw
                    .parse()
                    .map_err(|_| AppError::configuration(format!("PORT must be a number, got '{}'", raw)))?,
                None => 10000,
            },
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
        })
    }

    pub fn scrape_interval(&self) -> Duration {
        Duration::from_secs(self.scrape_interval_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn positive(raw: Option<String>, key: &str, default: u64) -> Result<u64> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.parse::<u64>() {
        Ok(0) => Err(AppError::configuration(format!("{} must be greater than zero", key))),
        Ok(value) => Ok(value),
        Err(_) => Err(AppError::configuration(format!("{} must be a number, got '{}'", key, raw))),
    }
}
