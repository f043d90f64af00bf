//! Backend service configuration parsed from the build environment.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser bundle has no process environment, so the endpoint is baked in
//! at compile time and read once when the root component mounts.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Seconds between background identity revalidations.
pub const DEFAULT_REVALIDATE_SECS: u64 = 30;

/// Errors produced while building [`ServiceConfig`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// No endpoint was provided at build time.
    #[error("missing backend endpoint: set HOMENUVO_BACKEND_URL")]
    MissingEndpoint,

    /// The endpoint is not an absolute http(s) URL.
    #[error("invalid backend endpoint '{0}': expected http:// or https:// URL")]
    InvalidEndpoint(String),

    /// The revalidation interval is not a positive integer.
    #[error("invalid HOMENUVO_REVALIDATE_SECS '{0}'")]
    InvalidInterval(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Deployment base URL, without a trailing slash.
    pub endpoint_url: String,
    pub revalidate_secs: u64,
}

impl ServiceConfig {
    /// Build config from compile-time environment variables.
    ///
    /// Required:
    /// - `HOMENUVO_BACKEND_URL`
    ///
    /// Optional:
    /// - `HOMENUVO_REVALIDATE_SECS`: default 30
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::parse(option_env!("HOMENUVO_BACKEND_URL"), option_env!("HOMENUVO_REVALIDATE_SECS"))
    }

    /// Validate raw values into a config.
    pub fn parse(endpoint: Option<&str>, revalidate: Option<&str>) -> Result<Self, ConfigError> {
        let endpoint = endpoint.map(str::trim).filter(|v| !v.is_empty()).ok_or(ConfigError::MissingEndpoint)?;
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            return Err(ConfigError::InvalidEndpoint(endpoint.to_owned()));
        }
        let endpoint_url = endpoint.trim_end_matches('/').to_owned();
        if endpoint_url.ends_with(':') || endpoint_url.ends_with("//") {
            return Err(ConfigError::InvalidEndpoint(endpoint.to_owned()));
        }

        let revalidate_secs = match revalidate.map(str::trim).filter(|v| !v.is_empty()) {
            None => DEFAULT_REVALIDATE_SECS,
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(ConfigError::InvalidInterval(raw.to_owned())),
            },
        };

        Ok(Self { endpoint_url, revalidate_secs })
    }

    /// Absolute URL for a service path such as `/api/query`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint_url)
    }
}
