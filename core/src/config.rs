//! Client configuration.

use std::time::Duration;

use crate::auth::Credentials;
use crate::error::{ApiError, Result};

/// Default total timeout for a single exchange.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings shared by every call issued through one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Origin plus optional path prefix, e.g. `https://awx.example.com`.
    pub base_url: String,
    pub credentials: Credentials,
    /// Upper bound for one exchange when the caller's context has no
    /// earlier deadline.
    pub timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Read `AWX_URL`, `AWX_TOKEN` or `AWX_USERNAME`/`AWX_PASSWORD`, and the
    /// optional `AWX_TIMEOUT_SECS` from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let base_url =
            non_empty("AWX_URL").ok_or_else(|| ApiError::ConfigError("AWX_URL is not set".into()))?;

        let mut builder = Self::builder().base_url(base_url);
        builder = match (non_empty("AWX_TOKEN"), non_empty("AWX_USERNAME")) {
            (Some(token), _) => builder.token(token),
            (None, Some(username)) => {
                let password = non_empty("AWX_PASSWORD").ok_or_else(|| {
                    ApiError::ConfigError("AWX_PASSWORD is required with AWX_USERNAME".into())
                })?;
                builder.basic_auth(username, password)
            }
            (None, None) => {
                return Err(ApiError::ConfigError(
                    "set AWX_TOKEN or AWX_USERNAME/AWX_PASSWORD".into(),
                ))
            }
        };

        if let Some(raw) = non_empty("AWX_TIMEOUT_SECS") {
            let secs: u64 = raw.parse().map_err(|_| {
                ApiError::ConfigError(format!("AWX_TIMEOUT_SECS is not a number: {raw}"))
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }

        builder.build()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    credentials: Option<Credentials>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::basic(username, password));
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::token(token));
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> Result<ClientConfig> {
        let base_url = self
            .base_url
            .ok_or_else(|| ApiError::ConfigError("base URL is required".into()))?;
        let credentials = self
            .credentials
            .ok_or_else(|| ApiError::ConfigError("credentials are required".into()))?;
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(ApiError::ConfigError("timeout must be greater than zero".into()));
        }
        Ok(ClientConfig {
            base_url,
            credentials,
            timeout,
            user_agent: self
                .user_agent
                .unwrap_or_else(|| format!("awx-core/{}", env!("CARGO_PKG_VERSION"))),
        })
    }
}
