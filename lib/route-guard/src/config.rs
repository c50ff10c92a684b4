//! Route guard configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings shared by every guard and the login completion handler.
///
/// Fields with defaults can be omitted when loading from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Path of the login view.
    /// Default: "/auth"
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Where to go after sign-in when there is no usable return URL, and
    /// where signed-in visitors without the required role are sent.
    /// Default: "/dashboard"
    #[serde(default = "default_destination")]
    pub default_destination: String,

    /// How long a guard waits for the identity check before failing closed,
    /// in milliseconds.
    /// Default: 2000
    #[serde(default = "default_session_timeout_ms")]
    pub session_timeout_ms: u64,
}

fn default_login_path() -> String {
    "/auth".to_string()
}

fn default_destination() -> String {
    "/dashboard".to_string()
}

fn default_session_timeout_ms() -> u64 {
    2000
}

impl GuardConfig {
    /// Returns the fail-closed timeout as a `Duration`.
    #[must_use]
    pub fn session_timeout(&self) -> Duration {
        Duration::from_millis(self.session_timeout_ms)
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            login_path: default_login_path(),
            default_destination: default_destination(),
            session_timeout_ms: default_session_timeout_ms(),
        }
    }
}
