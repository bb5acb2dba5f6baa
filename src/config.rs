use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use anyhow::{Context, Result};

/// The deployment environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parses an environment name. Anything other than `production` is development.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }
}

/// The application's configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// The URL of the PostgreSQL database.
    pub database_url: String,
    /// The address the HTTP server binds to.
    pub server_addr: SocketAddr,
    /// The deployment environment; decides the `Secure` cookie attribute.
    pub environment: Environment,
    /// The absolute lifetime of a session.
    pub session_ttl: chrono::Duration,
    /// How often expired sessions are swept.
    pub session_sweep_interval: Duration,
    /// Seconds needed to replenish one login/registration attempt.
    pub rate_limit_replenish_secs: u64,
    /// Login/registration attempts allowed in a burst.
    pub rate_limit_burst: u32,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let environment = env::var("APP_ENV")
            .or_else(|_| env::var("ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let session_hours: i64 = env::var("SESSION_DURATION_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse()
            .context("Invalid SESSION_DURATION_HOURS")?;

        if session_hours <= 0 {
            anyhow::bail!("SESSION_DURATION_HOURS must be positive");
        }

        let sweep_secs: u64 = env::var("SESSION_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .context("Invalid SESSION_SWEEP_INTERVAL_SECS")?;

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            server_addr: env::var("SERVER_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:8888".to_string())
                .parse()
                .context("Invalid SERVER_ADDR")?,
            environment: Environment::parse(&environment),
            session_ttl: chrono::Duration::hours(session_hours),
            session_sweep_interval: Duration::from_secs(sweep_secs.max(1)),
            rate_limit_replenish_secs: env::var("RATE_LIMIT_REPLENISH_SECS")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .context("Invalid RATE_LIMIT_REPLENISH_SECS")?,
            rate_limit_burst: env::var("RATE_LIMIT_BURST")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("Invalid RATE_LIMIT_BURST")?,
        })
    }

    /// Whether cookies must carry the `Secure` attribute.
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_production_is_production() {
        assert_eq!(Environment::parse("production"), Environment::Production);
        assert_eq!(Environment::parse(" Production "), Environment::Production);
        assert_eq!(Environment::parse("prod"), Environment::Development);
        assert_eq!(Environment::parse(""), Environment::Development);
    }
}
