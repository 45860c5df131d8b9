//! Client configuration.
//!
//! The build mode and base URLs are injected as a value rather than read from
//! globals, so the resolver can be exercised in isolation. `from_env` is the
//! production entry point.

use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Hardcoded production deployment, tried first in production builds.
pub const DEFAULT_PRIMARY_URL: &str = "https://clinic-backend.onrender.com/api";

/// API base used when `CLINIC_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Suffix removed from the API base to form the third candidate.
pub const API_PREFIX: &str = "/api";

pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);

/// Whether the client runs against a production deployment or a local
/// development backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    #[default]
    Production,
    Development,
}

impl FromStr for BuildMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(BuildMode::Production),
            "development" | "dev" => Ok(BuildMode::Development),
            other => Err(ConfigError::UnknownBuildMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub build_mode: BuildMode,
    pub primary_url: String,
    pub api_url: String,
    /// Upper bound on a single candidate attempt. `None` leaves the transport
    /// default in place.
    pub attempt_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            build_mode: BuildMode::default(),
            primary_url: DEFAULT_PRIMARY_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            attempt_timeout: Some(DEFAULT_ATTEMPT_TIMEOUT),
        }
    }
}

impl ClientConfig {
    /// Load configuration from the process environment.
    ///
    /// - `CLINIC_BUILD_MODE`: `production` (default) or `development`
    /// - `CLINIC_API_URL`: configured API base
    /// - `CLINIC_PRIMARY_URL`: overrides the production deployment URL
    /// - `CLINIC_ATTEMPT_TIMEOUT_SECS`: per-candidate timeout, `0` disables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(mode) = lookup("CLINIC_BUILD_MODE") {
            config.build_mode = mode.parse()?;
        }
        if let Some(url) = lookup("CLINIC_API_URL").filter(|u| !u.trim().is_empty()) {
            config.api_url = url.trim().to_string();
        }
        if let Some(url) = lookup("CLINIC_PRIMARY_URL").filter(|u| !u.trim().is_empty()) {
            config.primary_url = url.trim().to_string();
        }
        if let Some(raw) = lookup("CLINIC_ATTEMPT_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: "CLINIC_ATTEMPT_TIMEOUT_SECS",
                value: raw.clone(),
            })?;
            config.attempt_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(config)
    }

    pub fn with_build_mode(mut self, build_mode: BuildMode) -> Self {
        self.build_mode = build_mode;
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_primary_url(mut self, primary_url: impl Into<String>) -> Self {
        self.primary_url = primary_url.into();
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.attempt_timeout = timeout;
        self
    }
}
