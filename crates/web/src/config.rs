use anyhow::{Context, Result};
use storage::services::progress::DEFAULT_EXPECTED_PARTICIPANTS;

const DEFAULT_POLL_INTERVAL_SECS: u64 = 3;
const DEFAULT_SESSION_TTL_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub api_keys: String,
    pub expected_participants: usize,
    pub poll_interval_secs: u64,
    /// Idle sessions and drafts older than this are dropped
    pub session_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            api_keys: std::env::var("API_KEYS").unwrap_or_default(),
            expected_participants: at_least_one(
                "EXPECTED_PARTICIPANTS",
                parse_or("EXPECTED_PARTICIPANTS", DEFAULT_EXPECTED_PARTICIPANTS)?,
            )?,
            poll_interval_secs: parse_or("POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?,
            session_ttl_secs: at_least_one(
                "SESSION_TTL_SECS",
                parse_or("SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?,
            )?,
        })
    }
}

fn parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number", name)),
        _ => Ok(default),
    }
}

fn at_least_one<T>(name: &str, value: T) -> Result<T>
where
    T: PartialOrd + From<u8>,
{
    anyhow::ensure!(value >= T::from(1), "{} must be at least 1", name);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_expected_participants_is_rejected() {
        let err = at_least_one("EXPECTED_PARTICIPANTS", 0usize).unwrap_err();
        assert_eq!(err.to_string(), "EXPECTED_PARTICIPANTS must be at least 1");
        assert_eq!(at_least_one("EXPECTED_PARTICIPANTS", 1usize).unwrap(), 1);
        assert_eq!(at_least_one("EXPECTED_PARTICIPANTS", 3usize).unwrap(), 3);
        assert!(at_least_one("SESSION_TTL_SECS", 0u64).is_err());
    }
}
