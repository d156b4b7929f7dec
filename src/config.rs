//! Client configuration parsed from environment variables.

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_IDENTITY_PATH: &str = "/users/me";
pub const DEFAULT_SESSION_COOKIE: &str = "access_token";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors produced while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root without a trailing slash, e.g. `http://localhost:8000/api/v1`.
    pub base_url: String,
    /// Path of the "who am I" endpoint, e.g. `/users/me` or `/me`.
    pub identity_path: String,
    /// Name of the session cookie set by `POST /auth/google`.
    pub session_cookie: String,
    pub timeouts: Timeouts,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_owned(),
            identity_path: DEFAULT_IDENTITY_PATH.to_owned(),
            session_cookie: DEFAULT_SESSION_COOKIE.to_owned(),
            timeouts: Timeouts::default(),
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// All optional:
    /// - `CLASSROOM_API_BASE_URL`: default `http://localhost:8000/api/v1`
    /// - `CLASSROOM_IDENTITY_PATH`: default `/users/me`
    /// - `CLASSROOM_SESSION_COOKIE`: default `access_token`
    /// - `CLASSROOM_REQUEST_TIMEOUT_SECS`: default 30
    /// - `CLASSROOM_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not http(s) or a timeout is not
    /// a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("CLASSROOM_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_owned());
        let identity_path =
            std::env::var("CLASSROOM_IDENTITY_PATH").unwrap_or_else(|_| DEFAULT_IDENTITY_PATH.to_owned());
        let session_cookie =
            std::env::var("CLASSROOM_SESSION_COOKIE").unwrap_or_else(|_| DEFAULT_SESSION_COOKIE.to_owned());
        let timeouts = Timeouts {
            request_secs: env_parse_secs("CLASSROOM_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: env_parse_secs("CLASSROOM_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };

        Self { base_url, identity_path, session_cookie, timeouts }.normalized()
    }

    /// Replace the base URL, e.g. from a command-line flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not http(s).
    pub fn with_base_url(self, base_url: impl Into<String>) -> Result<Self, ConfigError> {
        Self { base_url: base_url.into(), ..self }.normalized()
    }

    /// Absolute URL for an API path such as `/courses`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn normalized(mut self) -> Result<Self, ConfigError> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.base_url));
        }
        self.base_url = trimmed.to_owned();
        if !self.identity_path.starts_with('/') {
            self.identity_path.insert(0, '/');
        }
        Ok(self)
    }
}

fn env_parse_secs(var: &'static str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(var) {
        Err(_) => Ok(default),
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(secs),
            _ => Err(ConfigError::InvalidValue { var, value: raw }),
        },
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
