use chrono::Duration;
use strum_macros::{Display, EnumString};
use thiserror::Error;
use tracing::{info, warn};

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_PORTFOLIO_URL: &str = "https://vipul-attri-portfolio.netlify.app";
const DEFAULT_DASHBOARD_URL: &str = "http://localhost:5173";
const DEFAULT_COOKIE_EXPIRE_DAYS: i64 = 7;
const MAX_COOKIE_EXPIRE_DAYS: i64 = 3650;
const DEFAULT_JWT_EXPIRES: &str = "7d";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("Invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Deployment environment, read from `NODE_ENV`. Only an explicit
/// `development` exposes error stacks.
#[derive(Debug, Clone, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
    #[strum(default)]
    Other(String),
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Application configuration, built once at startup and shared through `AppState`
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: Environment,
    pub portfolio_url: String,
    pub dashboard_url: String,
    pub cookie_expire_days: i64,
    pub jwt_secret: String,
    pub jwt_ttl: Duration,
    pub database_url: Option<String>,
}

impl Config {
    /// Loads configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(raw) => raw.trim().parse().map_err(|e| ConfigError::Invalid {
                key: "PORT",
                value: raw.clone(),
                reason: format!("{e}"),
            })?,
            None => {
                info!("PORT not set, using default: {DEFAULT_PORT}");
                DEFAULT_PORT
            }
        };

        let environment = var("NODE_ENV")
            .map(|raw| {
                raw.trim()
                    .to_lowercase()
                    .parse()
                    .unwrap_or(Environment::Other(raw))
            })
            .unwrap_or_else(|| {
                info!("NODE_ENV not set, running without development diagnostics");
                Environment::Other(String::new())
            });

        let cookie_expire_days = match var("COOKIE_EXPIRE") {
            Some(raw) => parse_cookie_expire(&raw).map_err(|reason| ConfigError::Invalid {
                key: "COOKIE_EXPIRE",
                value: raw.clone(),
                reason,
            })?,
            None => {
                info!("COOKIE_EXPIRE not set, using default: {DEFAULT_COOKIE_EXPIRE_DAYS}");
                DEFAULT_COOKIE_EXPIRE_DAYS
            }
        };

        let jwt_secret = var("JWT_SECRET_KEY").ok_or_else(|| {
            warn!("JWT_SECRET_KEY is not set, tokens cannot be signed");
            ConfigError::Missing("JWT_SECRET_KEY")
        })?;

        let jwt_expires = var("JWT_EXPIRES").unwrap_or_else(|| DEFAULT_JWT_EXPIRES.to_string());
        let jwt_ttl = parse_duration(&jwt_expires).map_err(|reason| ConfigError::Invalid {
            key: "JWT_EXPIRES",
            value: jwt_expires.clone(),
            reason,
        })?;

        Ok(Self {
            port,
            environment,
            portfolio_url: var("PORTFOLIO_URL").unwrap_or_else(|| DEFAULT_PORTFOLIO_URL.to_string()),
            dashboard_url: var("DASHBOARD_URL").unwrap_or_else(|| DEFAULT_DASHBOARD_URL.to_string()),
            cookie_expire_days,
            jwt_secret,
            jwt_ttl,
            database_url: var("DATABASE_URL"),
        })
    }

    /// Origins allowed to make credentialed cross-origin requests
    pub fn allowed_origins(&self) -> Vec<String> {
        vec![self.portfolio_url.clone(), self.dashboard_url.clone()]
    }
}

/// Whole days, at least one and at most ten years
fn parse_cookie_expire(raw: &str) -> Result<i64, String> {
    let days: i64 = raw.trim().parse().map_err(|e| format!("{e}"))?;
    if !(1..=MAX_COOKIE_EXPIRE_DAYS).contains(&days) {
        return Err(format!("must be between 1 and {MAX_COOKIE_EXPIRE_DAYS} days"));
    }
    Ok(days)
}

/// Parses `7d`, `12h`, `30m`, `45s` or a bare number of seconds
fn parse_duration(raw: &str) -> Result<Duration, String> {
    let raw = raw.trim();
    let (digits, unit) = match raw.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => (&raw[..idx], Some(c)),
        Some(_) => (raw, None),
        None => return Err("empty duration".to_string()),
    };

    let amount: i64 = digits
        .parse()
        .map_err(|_| format!("expected a number followed by d, h, m or s, got {raw:?}"))?;
    if amount <= 0 {
        return Err("duration must be positive".to_string());
    }

    let duration = match unit {
        Some('d') => Duration::try_days(amount),
        Some('h') => Duration::try_hours(amount),
        Some('m') => Duration::try_minutes(amount),
        Some('s') | None => Duration::try_seconds(amount),
        Some(other) => return Err(format!("unknown duration unit {other:?}")),
    };
    duration.ok_or_else(|| format!("duration {raw:?} is out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(lookup_from(&[("JWT_SECRET_KEY", "secret")])).unwrap();

        assert_eq!(config.port, 4000);
        assert_eq!(config.environment, Environment::Other(String::new()));
        assert!(!config.environment.is_development());
        assert!(!config.environment.is_production());
        assert_eq!(config.cookie_expire_days, 7);
        assert_eq!(config.jwt_ttl, Duration::days(7));
        assert_eq!(
            config.allowed_origins(),
            vec![
                "https://vipul-attri-portfolio.netlify.app".to_string(),
                "http://localhost:5173".to_string()
            ]
        );
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        let result = Config::from_lookup(lookup_from(&[("PORT", "5000")]));
        assert_eq!(result.unwrap_err(), ConfigError::Missing("JWT_SECRET_KEY"));
    }

    #[test]
    fn test_blank_secret_counts_as_missing() {
        let result = Config::from_lookup(lookup_from(&[("JWT_SECRET_KEY", "  ")]));
        assert!(matches!(result, Err(ConfigError::Missing(_))));
    }

    #[test]
    fn test_invalid_cookie_expire() {
        let result = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET_KEY", "secret"),
            ("COOKIE_EXPIRE", "five"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                key: "COOKIE_EXPIRE",
                ..
            })
        ));
    }

    #[rstest]
    #[case("0")]
    #[case("-5")]
    #[case("3651")]
    #[case("1000000000")]
    fn test_cookie_expire_out_of_range(#[case] raw: &str) {
        let result = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET_KEY", "secret"),
            ("COOKIE_EXPIRE", raw),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                key: "COOKIE_EXPIRE",
                ..
            })
        ));
    }

    #[test]
    fn test_jwt_expires_out_of_range() {
        let result = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET_KEY", "secret"),
            ("JWT_EXPIRES", "99999999999999d"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                key: "JWT_EXPIRES",
                ..
            })
        ));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET_KEY", "secret"),
            ("NODE_ENV", "production"),
            ("COOKIE_EXPIRE", "5"),
            ("DASHBOARD_URL", "https://dashboard.example"),
            ("DATABASE_URL", "postgres://localhost/portfolio"),
        ]))
        .unwrap();

        assert!(config.environment.is_production());
        assert_eq!(config.cookie_expire_days, 5);
        assert_eq!(config.dashboard_url, "https://dashboard.example");
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/portfolio")
        );
    }

    #[rstest]
    #[case("development", Environment::Development)]
    #[case("Production", Environment::Production)]
    #[case("staging", Environment::Other("staging".to_string()))]
    fn test_environment_parsing(#[case] raw: &str, #[case] expected: Environment) {
        let config = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET_KEY", "secret"),
            ("NODE_ENV", raw),
        ]))
        .unwrap();
        assert_eq!(config.environment, expected);
    }

    #[rstest]
    #[case("7d", Duration::days(7))]
    #[case("12h", Duration::hours(12))]
    #[case("30m", Duration::minutes(30))]
    #[case("45s", Duration::seconds(45))]
    #[case("3600", Duration::seconds(3600))]
    fn test_parse_duration(#[case] raw: &str, #[case] expected: Duration) {
        assert_eq!(parse_duration(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("d")]
    #[case("0d")]
    #[case("7w")]
    #[case("-1h")]
    #[case("99999999999999d")]
    #[case("9223372036854775807s")]
    fn test_parse_duration_rejects(#[case] raw: &str) {
        assert!(parse_duration(raw).is_err());
    }
}
