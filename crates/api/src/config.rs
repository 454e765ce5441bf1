use std::str::FromStr;

use lexi_core::streak::{DayBoundary, DEFAULT_DAY_BOUNDARY_UTC_OFFSET_HOURS};
use lexi_db::repositories::{DEFAULT_LEADERBOARD_LIMIT, MAX_LEADERBOARD_LIMIT};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration.
    pub jwt: JwtConfig,
    /// Grading and ranking knobs.
    pub grading: GradingConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    ///
    /// # Panics
    ///
    /// Panics on unparseable values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = env_or("PORT", 3000);

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", 30);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            grading: GradingConfig::from_env(),
        }
    }
}

/// Settings of the grading engine and the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradingConfig {
    /// Fixed offset that cuts calendar days for streaks.
    pub day_boundary: DayBoundary,
    pub leaderboard_default_limit: i64,
    pub leaderboard_max_limit: i64,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            day_boundary: DayBoundary::default(),
            leaderboard_default_limit: DEFAULT_LEADERBOARD_LIMIT,
            leaderboard_max_limit: MAX_LEADERBOARD_LIMIT,
        }
    }
}

impl GradingConfig {
    /// | Env Var                          | Default |
    /// |----------------------------------|---------|
    /// | `DAY_BOUNDARY_UTC_OFFSET_HOURS`  | `5`     |
    /// | `LEADERBOARD_DEFAULT_LIMIT`      | `50`    |
    /// | `LEADERBOARD_MAX_LIMIT`          | `200`   |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
            .unwrap_or_else(|msg| panic!("Invalid grading configuration: {msg}"))
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let offset_hours: i32 = parse_or(
            &lookup,
            "DAY_BOUNDARY_UTC_OFFSET_HOURS",
            DEFAULT_DAY_BOUNDARY_UTC_OFFSET_HOURS,
        )?;
        let day_boundary = DayBoundary::from_utc_offset_hours(offset_hours).ok_or_else(|| {
            format!("DAY_BOUNDARY_UTC_OFFSET_HOURS must be within -23..=23, got {offset_hours}")
        })?;

        let leaderboard_default_limit: i64 =
            parse_or(&lookup, "LEADERBOARD_DEFAULT_LIMIT", DEFAULT_LEADERBOARD_LIMIT)?;
        let leaderboard_max_limit: i64 =
            parse_or(&lookup, "LEADERBOARD_MAX_LIMIT", MAX_LEADERBOARD_LIMIT)?;
        if leaderboard_default_limit < 1 || leaderboard_max_limit < leaderboard_default_limit {
            return Err(format!(
                "leaderboard limits must satisfy 1 <= default ({leaderboard_default_limit}) \
                 <= max ({leaderboard_max_limit})"
            ));
        }

        Ok(Self {
            day_boundary,
            leaderboard_default_limit,
            leaderboard_max_limit,
        })
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, String>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| format!("{key} has invalid value '{raw}'")),
        None => Ok(default),
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    parse_or(&|k: &str| std::env::var(k).ok(), key, default)
        .unwrap_or_else(|msg| panic!("{msg}"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::{TimeZone, Utc};

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = GradingConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, GradingConfig::default());
        assert_eq!(config.leaderboard_default_limit, 50);
        assert_eq!(config.leaderboard_max_limit, 200);
    }

    #[test]
    fn day_boundary_offset_is_configurable() {
        let config =
            GradingConfig::from_lookup(lookup(&[("DAY_BOUNDARY_UTC_OFFSET_HOURS", "0")])).unwrap();
        let late_evening = Utc.with_ymd_and_hms(2026, 3, 10, 21, 0, 0).unwrap();
        assert_eq!(
            config.day_boundary.day_key(late_evening).to_string(),
            "2026-03-10"
        );
        assert_eq!(
            GradingConfig::default()
                .day_boundary
                .day_key(late_evening)
                .to_string(),
            "2026-03-11"
        );
    }

    #[test]
    fn invalid_values_are_reported() {
        for offset in ["x", "30"] {
            let vars = lookup(&[("DAY_BOUNDARY_UTC_OFFSET_HOURS", offset)]);
            assert!(GradingConfig::from_lookup(vars).is_err(), "{offset}");
        }
        assert!(GradingConfig::from_lookup(lookup(&[
            ("LEADERBOARD_DEFAULT_LIMIT", "100"),
            ("LEADERBOARD_MAX_LIMIT", "10"),
        ]))
        .is_err());
    }
}
