use std::env;
use std::str::FromStr;

use anyhow::{bail, Context};

use crate::models::entry::MAX_WINDOW_DAYS;

/// Upper bound for trial and paid periods. Keeps `now + period` far inside
/// chrono's representable range.
pub const MAX_PERIOD_DAYS: i64 = 3650;

#[derive(Debug, Clone)]
pub struct Config {
    /// Unset selects the in-memory store.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,

    pub frontend_url: Option<String>,
    pub cors_extra_origins: Vec<String>,

    pub default_window_days: i64,
    pub trial_days: i64,
    pub subscription_days: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Self {
            database_url: non_empty("DATABASE_URL"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_or("PORT", 8080)?,

            frontend_url: non_empty("FRONTEND_URL"),
            cors_extra_origins: env::var("CORS_EXTRA_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),

            default_window_days: parse_or("DEFAULT_WINDOW_DAYS", 30)?,
            trial_days: parse_or("TRIAL_DAYS", 2)?,
            subscription_days: parse_or("SUBSCRIPTION_DAYS", 30)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects day counts that would make every request fail or overflow.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(1..=MAX_WINDOW_DAYS).contains(&self.default_window_days) {
            bail!("DEFAULT_WINDOW_DAYS must be between 1 and {MAX_WINDOW_DAYS}");
        }
        if !(1..=MAX_PERIOD_DAYS).contains(&self.trial_days) {
            bail!("TRIAL_DAYS must be between 1 and {MAX_PERIOD_DAYS}");
        }
        if !(1..=MAX_PERIOD_DAYS).contains(&self.subscription_days) {
            bail!("SUBSCRIPTION_DAYS must be between 1 and {MAX_PERIOD_DAYS}");
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            host: "0.0.0.0".into(),
            port: 8080,
            frontend_url: None,
            cors_extra_origins: Vec::new(),
            default_window_days: 30,
            trial_days: 2,
            subscription_days: 30,
        }
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a number")),
        Err(_) => Ok(default),
    }
}
