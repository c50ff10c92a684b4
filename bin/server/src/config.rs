//! Centralized server configuration.
//!
//! Loaded via the `config` crate from environment variables, with `__` as
//! the nesting separator (e.g. `HOSTED_AUTH__URL`, `GUARD__SESSION_TIMEOUT_MS`).
//!
//! See [`HostedAuthConfig`] for the identity backend settings and
//! [`GuardConfig`] for the route guard settings shared with the browser.

use serde::Deserialize;
use vibe_flow_platform_access::HostedAuthConfig;
use vibe_flow_route_guard::GuardConfig;

/// Server configuration composed from library configs.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Hosted identity backend configuration.
    pub hosted_auth: HostedAuthConfig,

    /// Session cookie configuration.
    #[serde(default)]
    pub session: SessionConfig,

    /// Route guard configuration.
    #[serde(default)]
    pub guard: GuardConfig,
}

/// Session cookie configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Whether to set the Secure flag on cookies (requires HTTPS).
    /// Set to false for local HTTP development.
    #[serde(default = "default_secure_cookies")]
    pub secure_cookies: bool,

    /// Upper bound on the session cookie lifetime, in minutes.
    #[serde(default = "default_cookie_max_age_minutes")]
    pub cookie_max_age_minutes: i64,
}

fn default_secure_cookies() -> bool {
    true
}

fn default_cookie_max_age_minutes() -> i64 {
    60
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secure_cookies: default_secure_cookies(),
            cookie_max_age_minutes: default_cookie_max_age_minutes(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_source(
            config::Environment::default()
                .separator("__")
                .try_parsing(true),
        )
    }

    fn from_source<S>(source: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()
    }
}
