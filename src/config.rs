use crate::error::{CodebinError, Result};
use std::env;
use std::str::FromStr;

pub const ENV_HOST: &str = "CODEBIN_HOST";
pub const ENV_PORT: &str = "CODEBIN_PORT";
pub const ENV_RETENTION_SECS: &str = "CODEBIN_RETENTION_SECS";
pub const ENV_VERBOSE: &str = "CODEBIN_VERBOSE";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_RETENTION_SECS: i64 = 86_400;
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

/// Service configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Seconds a saved snippet is advertised to live; feeds the
    /// `timeExpired` stamp on every saved snippet.
    pub retention_secs: i64,
    pub verbose: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            host: env::var(ENV_HOST).unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: parse_env(ENV_PORT, DEFAULT_PORT)?,
            retention_secs: parse_env(ENV_RETENTION_SECS, DEFAULT_RETENTION_SECS)?,
            verbose: parse_env(ENV_VERBOSE, false)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            retention_secs: DEFAULT_RETENTION_SECS,
            verbose: false,
        }
    }
}

/// Read an environment variable, falling back to `default` when unset.
fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| {
            CodebinError::InvalidConfig(format!("{} has invalid value '{}'", key, raw))
        }),
        Err(_) => Ok(default),
    }
}
