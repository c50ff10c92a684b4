//! Session state as delivered by the identity source.
//!
//! A session observation is always exactly one of three variants. On first
//! load the state starts at `Pending` and resolves to one of the other two;
//! sign-in and sign-out may send it back through `Pending`.

use serde::{Deserialize, Serialize};

use crate::error::SessionCheckFailed;
use crate::identity::Identity;

/// What the identity source currently knows about the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "identity", rename_all = "snake_case")]
pub enum SessionState {
    /// The identity check is still in flight.
    Pending,
    /// A signed-in account.
    Authenticated(Identity),
    /// Nobody is signed in.
    Unauthenticated,
}

impl SessionState {
    /// Returns the discriminant without the identity payload.
    #[must_use]
    pub fn kind(&self) -> SessionKind {
        match self {
            Self::Pending => SessionKind::Pending,
            Self::Authenticated(_) => SessionKind::Authenticated,
            Self::Unauthenticated => SessionKind::Unauthenticated,
        }
    }

    /// Returns true while the check is in flight.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true for a signed-in account.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Returns the signed-in identity, if any.
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }
}

impl From<Option<Identity>> for SessionState {
    fn from(identity: Option<Identity>) -> Self {
        identity.map_or(Self::Unauthenticated, Self::Authenticated)
    }
}

/// Payload-free discriminant of a session observation, including failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    Pending,
    Authenticated,
    Unauthenticated,
    CheckFailed,
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Authenticated => "authenticated",
            Self::Unauthenticated => "unauthenticated",
            Self::CheckFailed => "check_failed",
        };
        write!(f, "{s}")
    }
}

/// One delivery from the identity source: a state, or a failed check.
pub type SessionReport = Result<SessionState, SessionCheckFailed>;

/// Returns the discriminant of a report, mapping failures to `CheckFailed`.
#[must_use]
pub fn report_kind(report: &SessionReport) -> SessionKind {
    report.as_ref().map_or(SessionKind::CheckFailed, SessionState::kind)
}
