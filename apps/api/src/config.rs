use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; a value that does not parse is a startup error.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Request body limit, applied to document uploads.
    pub max_upload_bytes: usize,
    pub review_session_ttl_minutes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
            review_session_ttl_minutes: 120,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            port: env_or("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            review_session_ttl_minutes: env_or(
                "REVIEW_SESSION_TTL_MINUTES",
                defaults.review_session_ttl_minutes,
            )?,
        })
    }

    pub fn review_session_ttl(&self) -> Duration {
        Duration::from_secs(self.review_session_ttl_minutes.saturating_mul(60))
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_parses_and_defaults() {
        std::env::set_var("RESUME_API_TEST_PORT", " 9090 ");
        assert_eq!(env_or::<u16>("RESUME_API_TEST_PORT", 1).unwrap(), 9090);

        std::env::set_var("RESUME_API_TEST_BAD", "lots");
        assert!(env_or::<u64>("RESUME_API_TEST_BAD", 1).is_err());

        assert_eq!(env_or::<u64>("RESUME_API_TEST_UNSET", 7).unwrap(), 7);
    }

    #[test]
    fn test_session_ttl_in_minutes() {
        let config = Config {
            review_session_ttl_minutes: 2,
            ..Config::default()
        };
        assert_eq!(config.review_session_ttl(), Duration::from_secs(120));
    }
}
