//! Application Configuration
//!
//! Built once at startup and shared behind an `Arc`. Nothing here is read
//! from globals; [`AuthConfig::from_lookup`] takes the key source as a closure.

use std::fmt;

use chrono::TimeDelta;
use platform::password::DEFAULT_HASH_COST;
use platform::rate_limit::RateLimitConfig;
use rand::Rng;
use rand::distr::Alphanumeric;
use thiserror::Error;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

pub const ACCESS_TOKEN_TTL_VAR: &str = "ACCESS_TOKEN_TTL_MINUTES";
pub const REFRESH_TOKEN_TTL_VAR: &str = "REFRESH_TOKEN_TTL_MINUTES";
pub const SIGNING_KEY_VAR: &str = "SIGNING_KEY";
pub const PASSWORD_HASH_COST_VAR: &str = "PASSWORD_HASH_COST";
pub const COOKIE_SECURE_VAR: &str = "COOKIE_SECURE";
pub const REGISTER_RATE_LIMIT_VAR: &str = "REGISTER_RATE_LIMIT_PER_MINUTE";
pub const TRUST_FORWARDED_FOR_VAR: &str = "TRUST_FORWARDED_FOR";

/// Below this many bytes an HS256 key is accepted with a warning
pub const RECOMMENDED_KEY_BYTES: usize = 32;

const DEFAULT_ACCESS_TTL_MINUTES: i64 = 60;
const DEFAULT_REFRESH_TTL_MINUTES: i64 = 144_000;
const DEFAULT_REGISTER_RATE_LIMIT: u32 = 100;
/// Ten years
const MAX_TOKEN_TTL_MINUTES: i64 = 10 * 365 * 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value `{value}`: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// HMAC secret. `Debug` never prints it.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningKey([REDACTED; {} bytes])", self.0.len())
    }
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub access_token_ttl: TimeDelta,
    pub refresh_token_ttl: TimeDelta,
    pub signing_key: SigningKey,
    /// bcrypt work factor (4..=31)
    pub password_hash_cost: u32,
    pub access_cookie_name: String,
    pub refresh_cookie_name: String,
    /// Whether token cookies carry `Secure`
    pub cookie_secure: bool,
    pub cookie_same_site: SameSite,
    /// Registrations allowed per client IP
    pub register_rate_limit: RateLimitConfig,
    /// Key the rate limiter on `X-Forwarded-For` instead of the peer
    /// address. Only safe behind a proxy that overwrites the header.
    pub trust_forwarded_for: bool,
}

impl AuthConfig {
    /// Defaults for everything but the key
    pub fn new(signing_key: SigningKey) -> Self {
        Self {
            access_token_ttl: TimeDelta::minutes(DEFAULT_ACCESS_TTL_MINUTES),
            refresh_token_ttl: TimeDelta::minutes(DEFAULT_REFRESH_TTL_MINUTES),
            signing_key,
            password_hash_cost: DEFAULT_HASH_COST,
            access_cookie_name: "access_token".to_string(),
            refresh_cookie_name: "refresh_token".to_string(),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            register_rate_limit: RateLimitConfig::per_minute(DEFAULT_REGISTER_RATE_LIMIT),
            trust_forwarded_for: false,
        }
    }

    /// Random key, insecure cookies
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::new(SigningKey::new(generate_signing_key()))
        }
    }

    /// Read every setting through `lookup`, falling back to defaults for
    /// all keys except [`SIGNING_KEY_VAR`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = lookup(SIGNING_KEY_VAR).ok_or(ConfigError::Missing(SIGNING_KEY_VAR))?;
        if key.is_empty() {
            return Err(ConfigError::Invalid {
                key: SIGNING_KEY_VAR,
                value: String::new(),
                reason: "must not be empty",
            });
        }
        if key.len() < RECOMMENDED_KEY_BYTES {
            tracing::warn!(
                key_bytes = key.len(),
                recommended = RECOMMENDED_KEY_BYTES,
                "Signing key is shorter than recommended"
            );
        }

        let mut config = Self::new(SigningKey::new(key));

        if let Some(minutes) = parse_positive_minutes(&lookup, ACCESS_TOKEN_TTL_VAR)? {
            config.access_token_ttl = minutes;
        }
        if let Some(minutes) = parse_positive_minutes(&lookup, REFRESH_TOKEN_TTL_VAR)? {
            config.refresh_token_ttl = minutes;
        }

        if let Some(raw) = lookup(PASSWORD_HASH_COST_VAR) {
            config.password_hash_cost = match raw.trim().parse::<u32>() {
                Ok(cost) if (4..=31).contains(&cost) => cost,
                _ => return Err(invalid(PASSWORD_HASH_COST_VAR, raw, "expected 4..=31")),
            };
        }

        if let Some(secure) = parse_bool(&lookup, COOKIE_SECURE_VAR)? {
            config.cookie_secure = secure;
        }
        if let Some(trust) = parse_bool(&lookup, TRUST_FORWARDED_FOR_VAR)? {
            config.trust_forwarded_for = trust;
        }

        if let Some(raw) = lookup(REGISTER_RATE_LIMIT_VAR) {
            let limit = raw
                .trim()
                .parse::<u32>()
                .map_err(|_| invalid(REGISTER_RATE_LIMIT_VAR, raw, "expected an integer"))?;
            config.register_rate_limit = RateLimitConfig::per_minute(limit);
        }

        Ok(config)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

/// 48 random alphanumeric characters
pub fn generate_signing_key() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect()
}

fn invalid(key: &'static str, value: String, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { key, value, reason }
}

fn parse_bool<F>(lookup: &F, key: &'static str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(Some(true)),
        "false" | "0" | "no" => Ok(Some(false)),
        _ => Err(invalid(key, raw, "expected true or false")),
    }
}

fn parse_positive_minutes<F>(lookup: &F, key: &'static str) -> Result<Option<TimeDelta>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };

    match raw.trim().parse::<i64>() {
        Ok(minutes) if minutes > MAX_TOKEN_TTL_MINUTES => {
            Err(invalid(key, raw, "must be at most ten years"))
        }
        Ok(minutes) if minutes > 0 => Ok(Some(TimeDelta::minutes(minutes))),
        _ => Err(invalid(key, raw, "expected a positive number of minutes")),
    }
}
