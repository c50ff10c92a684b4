//! Error taxonomy for the guard and login completion protocol.
//!
//! None of these escape to the wrapped view. The guard and the completion
//! handler resolve each one locally; they exist so the resolution can be
//! logged and, in one case, shown.

use std::fmt;

use vibe_flow_platform_access::SessionCheckFailed;

use crate::location::NavigationError;
use crate::return_url::ReturnUrlRejection;

/// Failures the guard protocol resolves locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    /// The identity check did not leave `Pending` before the timeout.
    SessionIndeterminate { waited_ms: u64 },
    /// The identity source reported that it could not determine the session.
    SessionCheckFailed(SessionCheckFailed),
    /// A navigation call failed.
    RedirectNavigationFailed {
        destination: String,
        source: NavigationError,
    },
    /// A return URL failed validation.
    InvalidReturnUrl(ReturnUrlRejection),
}

impl fmt::Display for GuardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionIndeterminate { waited_ms } => {
                write!(f, "session still pending after {waited_ms}ms")
            }
            Self::SessionCheckFailed(failure) => write!(f, "{failure}"),
            Self::RedirectNavigationFailed {
                destination,
                source,
            } => write!(f, "redirect to '{destination}' failed: {source}"),
            Self::InvalidReturnUrl(reason) => write!(f, "invalid return url: {reason}"),
        }
    }
}

impl std::error::Error for GuardError {}
