use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::storage::DEFAULT_SESSION_PATH;

const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("BACKEND_URL is not a valid http(s) URL: {0}")]
    InvalidBackendUrl(String),

    #[error("BACKEND_TIMEOUT_SECS must be a positive integer, got '{0}'")]
    InvalidTimeout(String),
}

/// Settings read from the environment.
///
/// | Env Var                | Default             |
/// |------------------------|---------------------|
/// | `PORT`                 | `8080`              |
/// | `BACKEND_URL`          | unset (mock data)   |
/// | `BACKEND_TIMEOUT_SECS` | unset (no timeout)  |
/// | `GAMEHUB_SESSION_PATH` | `data/session.json` |
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub backend_url: Option<String>,
    pub backend_timeout: Option<Duration>,
    pub session_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(value) => value.trim().parse::<u16>().unwrap_or_else(|_| {
                warn!("ignoring invalid PORT '{value}', using {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let backend_url = lookup("BACKEND_URL")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(|value| validate_backend_url(&value).map(|()| value))
            .transpose()?;

        let backend_timeout = lookup("BACKEND_TIMEOUT_SECS")
            .map(|value| match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
                _ => Err(ConfigError::InvalidTimeout(value)),
            })
            .transpose()?;

        let session_path = lookup("GAMEHUB_SESSION_PATH")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_PATH));

        Ok(Self {
            port,
            backend_url,
            backend_timeout,
            session_path,
        })
    }
}

fn validate_backend_url(value: &str) -> Result<(), ConfigError> {
    let parsed =
        url::Url::parse(value).map_err(|err| ConfigError::InvalidBackendUrl(format!("{value}: {err}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(ConfigError::InvalidBackendUrl(value.to_string())),
    }
}
