//! Account server functions: session checks, sign-in, sign-up and sign-out.

use crate::types::SignUpResult;
use leptos::prelude::*;
use vibe_flow_platform_access::Identity;
use vibe_flow_route_guard::GuardConfig;

/// Server function to get the signed-in account, if any.
///
/// A missing cookie or a token the backend no longer accepts yields
/// `Ok(None)`. An unreachable backend is an error, which the browser treats
/// as a failed session check.
#[server]
pub async fn get_current_user() -> Result<Option<Identity>, ServerFnError> {
    use crate::error::SessionError;
    use crate::server_helpers::{get_app_state, get_session_token};

    let state = get_app_state()
        .await
        .map_err(SessionError::into_server_error)?;
    let Some(token) = get_session_token()
        .await
        .map_err(SessionError::into_server_error)?
    else {
        return Ok(None);
    };

    state.backend.current_identity(&token).await.map_err(|e| {
        tracing::warn!(error = %e, "session check failed");
        SessionError::CheckFailed {
            details: e.to_string(),
        }
        .into_server_error()
    })
}

/// Server function to sign in with email and password.
#[server]
pub async fn sign_in(email: String, password: String) -> Result<Identity, ServerFnError> {
    use crate::auth::session_cookie;
    use crate::error::{AccountError, SessionError};
    use crate::server_helpers::{get_app_state, set_response_cookie, validate_credentials};

    validate_credentials(&email, &password, 1).map_err(AccountError::into_server_error)?;
    let state = get_app_state()
        .await
        .map_err(SessionError::into_server_error)?;

    let session = state
        .backend
        .sign_in(email.trim(), &password)
        .await
        .map_err(|e| {
            tracing::info!(error = %e, "sign-in rejected");
            AccountError::from(e).into_server_error()
        })?;

    let expires_in = time::Duration::seconds(
        (session.expires_at - chrono::Utc::now()).num_seconds(),
    );
    set_response_cookie(session_cookie(
        session.access_token,
        expires_in,
        &state.session_config,
    ))
    .map_err(SessionError::into_server_error)?;

    Ok(session.identity)
}

/// Server function to register a new account.
#[server]
pub async fn sign_up(email: String, password: String) -> Result<SignUpResult, ServerFnError> {
    use crate::auth::{SignUpOutcome, session_cookie};
    use crate::error::{AccountError, SessionError};
    use crate::server_helpers::{
        MIN_PASSWORD_LENGTH, get_app_state, set_response_cookie, validate_credentials,
    };

    validate_credentials(&email, &password, MIN_PASSWORD_LENGTH)
        .map_err(AccountError::into_server_error)?;
    let state = get_app_state()
        .await
        .map_err(SessionError::into_server_error)?;

    let outcome = state
        .backend
        .sign_up(email.trim(), &password)
        .await
        .map_err(|e| {
            tracing::info!(error = %e, "sign-up rejected");
            AccountError::from(e).into_server_error()
        })?;

    match outcome {
        SignUpOutcome::ConfirmationRequired => Ok(SignUpResult::ConfirmationRequired),
        SignUpOutcome::SignedIn(session) => {
            let expires_in = time::Duration::seconds(
                (session.expires_at - chrono::Utc::now()).num_seconds(),
            );
            set_response_cookie(session_cookie(
                session.access_token,
                expires_in,
                &state.session_config,
            ))
            .map_err(SessionError::into_server_error)?;
            Ok(SignUpResult::SignedIn(session.identity))
        }
    }
}

/// Server function to sign out.
///
/// The session cookie is cleared even if the backend cannot be reached.
#[server]
pub async fn sign_out() -> Result<(), ServerFnError> {
    use crate::auth::removal_cookie;
    use crate::error::SessionError;
    use crate::server_helpers::{get_app_state, get_session_token, set_response_cookie};

    let state = get_app_state()
        .await
        .map_err(SessionError::into_server_error)?;

    if let Some(token) = get_session_token()
        .await
        .map_err(SessionError::into_server_error)?
        && let Err(e) = state.backend.sign_out(&token).await
    {
        tracing::warn!(error = %e, "failed to revoke session upstream");
    }

    set_response_cookie(removal_cookie()).map_err(SessionError::into_server_error)
}

/// Server function to get the route guard settings.
#[server]
pub async fn get_guard_config() -> Result<GuardConfig, ServerFnError> {
    use crate::error::SessionError;
    use crate::server_helpers::get_app_state;

    let state = get_app_state()
        .await
        .map_err(SessionError::into_server_error)?;
    Ok(state.guard_config.clone())
}
