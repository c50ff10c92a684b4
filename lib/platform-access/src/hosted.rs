//! Configuration for the hosted identity backend.
//!
//! The site delegates sign-in, sign-up and sign-out to a GoTrue-compatible
//! auth service exposed under `<url>/auth/v1`. Every request carries the
//! project's public `apikey`.
//!
//! Fields with defaults can be omitted when loading from environment variables.

use serde::{Deserialize, Serialize};

/// Configuration for the hosted identity backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostedAuthConfig {
    /// Base URL of the backend project (e.g., "https://abc123.supabase.co").
    url: String,
    /// Public anonymous API key sent as the `apikey` header.
    anon_key: String,
    /// Backend role name that grants access to the management pages.
    /// Default: "admin"
    #[serde(default = "default_admin_role")]
    admin_role: String,
    /// Key inside the account's `app_metadata` holding its role(s).
    /// Default: "role"
    #[serde(default = "default_role_claim")]
    role_claim: String,
    /// Timeout for backend requests, in seconds.
    /// Default: 10
    #[serde(default = "default_request_timeout_seconds")]
    request_timeout_seconds: u64,
}

fn default_admin_role() -> String {
    "admin".to_string()
}

fn default_role_claim() -> String {
    "role".to_string()
}

fn default_request_timeout_seconds() -> u64 {
    10
}

impl HostedAuthConfig {
    /// Creates a configuration with defaults for optional fields.
    #[must_use]
    pub fn new(url: String, anon_key: String) -> Self {
        Self::builder(url, anon_key).build()
    }

    /// Creates a configuration builder for more customization.
    #[must_use]
    pub fn builder(url: String, anon_key: String) -> HostedAuthConfigBuilder {
        HostedAuthConfigBuilder::new(url, anon_key)
    }

    /// Returns the backend base URL without a trailing slash.
    #[must_use]
    pub fn url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Returns the public API key.
    #[must_use]
    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }

    /// Returns the role name that grants admin access.
    #[must_use]
    pub fn admin_role(&self) -> &str {
        &self.admin_role
    }

    /// Returns the `app_metadata` key holding account roles.
    #[must_use]
    pub fn role_claim(&self) -> &str {
        &self.role_claim
    }

    /// Returns the backend request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_seconds)
    }

    /// Builds the full URL of an auth endpoint, e.g. `endpoint("user")`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.url(), path.trim_start_matches('/'))
    }
}

/// Builder for `HostedAuthConfig`.
#[derive(Debug)]
pub struct HostedAuthConfigBuilder {
    url: String,
    anon_key: String,
    admin_role: String,
    role_claim: String,
    request_timeout_seconds: u64,
}

impl HostedAuthConfigBuilder {
    /// Creates a new builder with required fields.
    #[must_use]
    pub fn new(url: String, anon_key: String) -> Self {
        Self {
            url,
            anon_key,
            admin_role: default_admin_role(),
            role_claim: default_role_claim(),
            request_timeout_seconds: default_request_timeout_seconds(),
        }
    }

    /// Sets the role name that grants admin access.
    #[must_use]
    pub fn admin_role(mut self, role: String) -> Self {
        self.admin_role = role;
        self
    }

    /// Sets the `app_metadata` key holding account roles.
    #[must_use]
    pub fn role_claim(mut self, claim: String) -> Self {
        self.role_claim = claim;
        self
    }

    /// Sets the backend request timeout in seconds.
    #[must_use]
    pub fn request_timeout_seconds(mut self, seconds: u64) -> Self {
        self.request_timeout_seconds = seconds;
        self
    }

    /// Builds the `HostedAuthConfig`.
    #[must_use]
    pub fn build(self) -> HostedAuthConfig {
        HostedAuthConfig {
            url: self.url,
            anon_key: self.anon_key,
            admin_role: self.admin_role,
            role_claim: self.role_claim,
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }
}
