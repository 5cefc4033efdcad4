use std::str::FromStr;

use jsonwebtoken::Algorithm;
use serde::Deserialize;

/// Upper bound for access token lifetime: one year.
pub const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;

/// Startup configuration failures. All of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DemoUserConfig {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub log_level: String,
    pub demo_user: DemoUserConfig,
}

impl JwtConfig {
    /// Parses the configured algorithm, accepting only the HMAC family.
    pub fn algorithm(&self) -> Result<Algorithm, ConfigError> {
        let alg = Algorithm::from_str(self.algorithm.trim()).map_err(|_| ConfigError::Invalid {
            key: "ALGORITHM",
            reason: format!("unknown algorithm {:?}", self.algorithm),
        })?;
        match alg {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(alg),
            other => Err(ConfigError::Invalid {
                key: "ALGORITHM",
                reason: format!("{other:?} is not a symmetric MAC algorithm"),
            }),
        }
    }

    /// Access token lifetime; must be positive and at most `MAX_TTL_MINUTES`.
    pub fn ttl(&self) -> Result<time::Duration, ConfigError> {
        if self.ttl_minutes <= 0 || self.ttl_minutes > MAX_TTL_MINUTES {
            return Err(ConfigError::Invalid {
                key: "ACCESS_TOKEN_EXPIRE_MINUTES",
                reason: format!(
                    "{} is outside 1..={MAX_TTL_MINUTES} minutes",
                    self.ttl_minutes
                ),
            });
        }
        Ok(time::Duration::minutes(self.ttl_minutes))
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let database_url = required("DATABASE_URL")?;
        let ttl_minutes = match lookup("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Some(raw) => raw.trim().parse::<i64>().map_err(|e| ConfigError::Invalid {
                key: "ACCESS_TOKEN_EXPIRE_MINUTES",
                reason: e.to_string(),
            })?,
            None => 30,
        };
        let jwt = JwtConfig {
            secret: required("SECRET_KEY")?,
            algorithm: lookup("ALGORITHM").unwrap_or_else(|| "HS256".into()),
            ttl_minutes,
        };
        jwt.algorithm()?;
        jwt.ttl()?;

        Ok(Self {
            database_url,
            jwt,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            demo_user: DemoUserConfig {
                email: lookup("DEMO_EMAIL").unwrap_or_else(|| "demo@example.com".into()),
                password: lookup("DEMO_PASSWORD").unwrap_or_else(|| "demopass".into()),
            },
        })
    }
}
