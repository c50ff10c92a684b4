//! Server-side authentication for the Vibe Flow site.
//!
//! This module provides:
//! - The [`IdentityBackend`] seam used by the account server functions
//! - [`HostedAuthClient`], the implementation backed by the hosted auth service
//! - Session cookie construction
//!
//! # Session model
//!
//! The backend's access token is the session. It is stored in an HTTP-only
//! cookie and re-validated against the backend on every session check, so
//! revoking it upstream takes effect on the next page load. Roles come from
//! the account's `app_metadata` and are resolved into a
//! [`RoleSet`](vibe_flow_platform_access::RoleSet) per check.

pub mod cookie;
pub mod hosted;

use crate::config::SessionConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use vibe_flow_platform_access::{AuthenticationError, Identity};
use vibe_flow_route_guard::GuardConfig;

pub use cookie::{SESSION_COOKIE, removal_cookie, session_cookie};
pub use hosted::HostedAuthClient;

/// A signed-in session issued by the identity backend.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// Bearer token identifying the session upstream.
    pub access_token: String,
    /// When the backend stops honouring the token.
    pub expires_at: DateTime<Utc>,
    /// The account the session belongs to.
    pub identity: Identity,
}

/// Result of a sign-up request.
#[derive(Debug, Clone)]
pub enum SignUpOutcome {
    /// The account was created and signed in immediately.
    SignedIn(AuthSession),
    /// The account was created but must confirm its email first.
    ConfirmationRequired,
}

/// Operations the site needs from an identity backend.
#[async_trait]
pub trait IdentityBackend: Send + Sync {
    /// Exchanges email and password for a session.
    async fn sign_in(&self, email: &str, password: &str)
    -> Result<AuthSession, AuthenticationError>;

    /// Registers a new account.
    async fn sign_up(&self, email: &str, password: &str)
    -> Result<SignUpOutcome, AuthenticationError>;

    /// Revokes the session identified by `access_token`.
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthenticationError>;

    /// Resolves the account behind `access_token`.
    ///
    /// Returns `Ok(None)` when the backend no longer accepts the token.
    async fn current_identity(
        &self,
        access_token: &str,
    ) -> Result<Option<Identity>, AuthenticationError>;
}

/// Shared application state.
pub struct AppState {
    /// Identity backend used by the account server functions.
    pub backend: Arc<dyn IdentityBackend>,
    /// Session cookie configuration.
    pub session_config: SessionConfig,
    /// Route guard settings handed to the browser.
    pub guard_config: GuardConfig,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        backend: Arc<dyn IdentityBackend>,
        session_config: SessionConfig,
        guard_config: GuardConfig,
    ) -> Self {
        Self {
            backend,
            session_config,
            guard_config,
        }
    }
}
