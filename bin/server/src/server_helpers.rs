//! Helper functions for server functions with proper error handling and logging.
//!
//! This module provides utilities for common patterns in server functions:
//! reaching shared state, reading the session cookie, writing cookies to the
//! response, and validating submitted credentials.

use crate::auth::{AppState, SESSION_COOKIE};
use crate::error::{AccountError, SessionError};
use axum::Extension;
use axum::http::{HeaderValue, header::SET_COOKIE};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::Cookie;
use leptos::prelude::*;
use std::sync::Arc;

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Gets the shared application state from the request extensions.
pub async fn get_app_state() -> Result<Arc<AppState>, SessionError> {
    let Extension(state): Extension<Arc<AppState>> =
        leptos_axum::extract().await.map_err(|e| {
            tracing::error!(error = %e, "application state missing from request");
            SessionError::Unavailable {
                details: e.to_string(),
            }
        })?;
    Ok(state)
}

/// Reads the session token from the request cookies.
pub async fn get_session_token() -> Result<Option<String>, SessionError> {
    let jar: CookieJar = leptos_axum::extract().await.map_err(|e| {
        tracing::debug!(error = %e, "Failed to extract cookie jar");
        SessionError::Unavailable {
            details: e.to_string(),
        }
    })?;

    Ok(jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|token| !token.is_empty()))
}

/// Appends a `Set-Cookie` header to the server function response.
pub fn set_response_cookie(cookie: Cookie<'static>) -> Result<(), SessionError> {
    let value = HeaderValue::from_str(&cookie.to_string()).map_err(|e| {
        tracing::error!(error = %e, cookie = cookie.name(), "cookie is not a valid header");
        SessionError::Unavailable {
            details: e.to_string(),
        }
    })?;

    let response = use_context::<leptos_axum::ResponseOptions>().ok_or_else(|| {
        SessionError::Unavailable {
            details: "response options missing".to_string(),
        }
    })?;
    response.append_header(SET_COOKIE, value);
    Ok(())
}

/// Validates a submitted email/password pair before it reaches the backend.
pub fn validate_credentials(
    email: &str,
    password: &str,
    min_password_length: usize,
) -> Result<(), AccountError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AccountError::InvalidInput {
            field: "email",
            reason: "Email is required".to_string(),
        });
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
        _ => {
            return Err(AccountError::InvalidInput {
                field: "email",
                reason: "Enter a valid email address".to_string(),
            });
        }
    }

    if password.is_empty() {
        return Err(AccountError::InvalidInput {
            field: "password",
            reason: "Password is required".to_string(),
        });
    }
    if password.chars().count() < min_password_length {
        return Err(AccountError::InvalidInput {
            field: "password",
            reason: format!("Password must be at least {} characters", min_password_length),
        });
    }

    Ok(())
}
