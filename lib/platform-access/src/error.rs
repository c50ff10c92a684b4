//! Error types for the platform-access crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `AuthenticationError`: failures talking to the hosted identity backend
//! - `SessionCheckFailed`: the session could not be determined at all

use std::fmt;

/// Errors from identity backend operations (sign in, sign up, sign out,
/// current-account lookup).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationError {
    /// The backend rejected the submitted email/password pair.
    InvalidCredentials,
    /// The account exists but its email address is not confirmed yet.
    EmailNotConfirmed,
    /// The access token was rejected or has expired.
    TokenRejected,
    /// The backend could not be reached.
    BackendUnavailable { reason: String },
    /// The backend answered with something we could not interpret.
    UnexpectedResponse { status: u16, reason: String },
    /// Client-side configuration is missing or malformed.
    Configuration { reason: String },
}

impl fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "invalid email or password"),
            Self::EmailNotConfirmed => write!(f, "email address has not been confirmed"),
            Self::TokenRejected => write!(f, "access token was rejected"),
            Self::BackendUnavailable { reason } => {
                write!(f, "identity backend unavailable: {reason}")
            }
            Self::UnexpectedResponse { status, reason } => {
                write!(f, "unexpected identity backend response ({status}): {reason}")
            }
            Self::Configuration { reason } => {
                write!(f, "identity backend misconfigured: {reason}")
            }
        }
    }
}

impl std::error::Error for AuthenticationError {}

/// The identity source could not determine whether anyone is signed in.
///
/// Route guards treat this exactly like an unauthenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCheckFailed {
    reason: String,
}

impl SessionCheckFailed {
    /// Creates a failure report with a human-readable reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Returns the reason the check failed.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for SessionCheckFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session check failed: {}", self.reason)
    }
}

impl std::error::Error for SessionCheckFailed {}

impl From<AuthenticationError> for SessionCheckFailed {
    fn from(err: AuthenticationError) -> Self {
        Self::new(err.to_string())
    }
}
