//! Service configuration parsed from environment variables.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::services::browser::DEFAULT_SESSION_TTL;
use crate::services::password::HashParams;

pub const DEFAULT_PORT: u16 = 3000;

/// Longest accepted browser-session lifetime: 30 days.
pub const MAX_SESSION_TTL_SECS: u64 = 30 * 24 * 60 * 60;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    /// Upper bound on each session-store call. `None` waits indefinitely.
    pub store_timeout: Option<Duration>,
    pub cookie_secure: bool,
    /// Fixed lifetime of a browser session from login.
    pub session_ttl: Duration,
    /// JSON file of hashed accounts. `None` uses the built-in seed accounts.
    pub accounts_file: Option<PathBuf>,
    pub hash_params: HashParams,
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `STORE_TIMEOUT_MS`: unset or `0` disables the timeout
    /// - `COOKIE_SECURE`: `true`/`false`, default false
    /// - `SESSION_TTL_SECS`: browser-session lifetime, default 8 hours,
    ///   accepted range 1 to `MAX_SESSION_TTL_SECS`
    /// - `ACCOUNTS_FILE`: path to a JSON account list
    /// - `ARGON2_MEMORY_KIB`, `ARGON2_ITERATIONS`, `ARGON2_PARALLELISM`:
    ///   argon2 defaults when absent
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = HashParams::default();
        let store_timeout_ms: u64 = env_parse("STORE_TIMEOUT_MS", 0)?;
        let session_ttl_secs: u64 = env_parse("SESSION_TTL_SECS", DEFAULT_SESSION_TTL.as_secs())?;
        if session_ttl_secs == 0 || session_ttl_secs > MAX_SESSION_TTL_SECS {
            return Err(ConfigError::Invalid { key: "SESSION_TTL_SECS".to_owned(), value: session_ttl_secs.to_string() });
        }

        Ok(Self {
            port: env_parse("PORT", DEFAULT_PORT)?,
            store_timeout: (store_timeout_ms > 0).then(|| Duration::from_millis(store_timeout_ms)),
            cookie_secure: env_bool("COOKIE_SECURE").unwrap_or(false),
            session_ttl: Duration::from_secs(session_ttl_secs),
            accounts_file: std::env::var("ACCOUNTS_FILE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            hash_params: HashParams {
                memory_kib: env_parse("ARGON2_MEMORY_KIB", defaults.memory_kib)?,
                iterations: env_parse("ARGON2_ITERATIONS", defaults.iterations)?,
                parallelism: env_parse("ARGON2_PARALLELISM", defaults.parallelism)?,
            },
        })
    }
}

/// Parse `key` if set, else return `default`. A set-but-invalid value is an error.
pub(crate) fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key: key.to_owned(), value: raw.clone() }),
        Err(_) => Ok(default),
    }
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
