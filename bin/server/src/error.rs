//! Domain error types for server operations.
//!
//! Server functions log the detailed variant and return a user-safe
//! [`ServerFnError`] via `into_server_error`.

use leptos::server_fn::error::ServerFnError;
use std::fmt;
use vibe_flow_platform_access::AuthenticationError;

/// Session-related errors.
#[derive(Debug)]
pub enum SessionError {
    /// No session cookie was sent.
    NotAuthenticated,
    /// The session could not be checked against the identity backend.
    CheckFailed { details: String },
    /// Server state was missing from the request.
    Unavailable { details: String },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAuthenticated => write!(f, "not authenticated"),
            Self::CheckFailed { details } => write!(f, "session check failed: {}", details),
            Self::Unavailable { details } => write!(f, "session state unavailable: {}", details),
        }
    }
}

impl SessionError {
    /// Convert to a user-safe ServerFnError.
    pub fn into_server_error(self) -> ServerFnError {
        match &self {
            SessionError::NotAuthenticated => ServerFnError::new("Not authenticated"),
            SessionError::CheckFailed { .. } => {
                ServerFnError::new("Could not verify your session")
            }
            SessionError::Unavailable { .. } => ServerFnError::new("Service unavailable"),
        }
    }
}

/// Errors from sign-in, sign-up and sign-out.
#[derive(Debug, PartialEq, Eq)]
pub enum AccountError {
    /// A submitted field failed validation.
    InvalidInput { field: &'static str, reason: String },
    /// Email and password did not match an account.
    InvalidCredentials,
    /// The account must confirm its email before signing in.
    EmailNotConfirmed,
    /// The backend refused the request with a message meant for the user.
    Rejected { reason: String },
    /// The backend could not be reached or misbehaved.
    BackendError { details: String },
}

impl fmt::Display for AccountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { field, reason } => write!(f, "invalid {}: {}", field, reason),
            Self::InvalidCredentials => write!(f, "invalid credentials"),
            Self::EmailNotConfirmed => write!(f, "email not confirmed"),
            Self::Rejected { reason } => write!(f, "request rejected: {}", reason),
            Self::BackendError { details } => write!(f, "identity backend error: {}", details),
        }
    }
}

impl From<AuthenticationError> for AccountError {
    fn from(error: AuthenticationError) -> Self {
        match error {
            AuthenticationError::InvalidCredentials => Self::InvalidCredentials,
            AuthenticationError::EmailNotConfirmed => Self::EmailNotConfirmed,
            AuthenticationError::UnexpectedResponse { status, reason }
                if (400..500).contains(&status) =>
            {
                Self::Rejected { reason }
            }
            other => Self::BackendError {
                details: other.to_string(),
            },
        }
    }
}

impl AccountError {
    /// Convert to a user-safe ServerFnError.
    pub fn into_server_error(self) -> ServerFnError {
        match self {
            AccountError::InvalidInput { reason, .. } => ServerFnError::new(reason),
            AccountError::InvalidCredentials => ServerFnError::new("Invalid email or password"),
            AccountError::EmailNotConfirmed => {
                ServerFnError::new("Please confirm your email address before signing in")
            }
            AccountError::Rejected { reason } => ServerFnError::new(reason),
            AccountError::BackendError { .. } => {
                ServerFnError::new("Sign-in is temporarily unavailable")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_rejections_keep_their_message() {
        let error = AccountError::from(AuthenticationError::UnexpectedResponse {
            status: 422,
            reason: "User already registered".to_string(),
        });
        assert_eq!(
            error,
            AccountError::Rejected {
                reason: "User already registered".to_string()
            }
        );
    }

    #[test]
    fn server_side_failures_are_hidden() {
        let error = AccountError::from(AuthenticationError::UnexpectedResponse {
            status: 502,
            reason: "upstream html".to_string(),
        });
        assert!(matches!(error, AccountError::BackendError { .. }));

        let message = error.into_server_error().to_string();
        assert!(!message.contains("upstream html"));
    }

    #[test]
    fn credential_errors_map_directly() {
        assert_eq!(
            AccountError::from(AuthenticationError::InvalidCredentials),
            AccountError::InvalidCredentials
        );
        assert_eq!(
            AccountError::from(AuthenticationError::EmailNotConfirmed),
            AccountError::EmailNotConfirmed
        );
    }
}
