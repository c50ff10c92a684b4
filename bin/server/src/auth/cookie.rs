//! Session cookie construction.

use crate::config::SessionConfig;
use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration as TimeDuration;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "vf_session";

/// Builds the cookie carrying `access_token`.
///
/// The cookie lives for the configured maximum age or until the token
/// expires, whichever comes first.
pub fn session_cookie(
    access_token: String,
    expires_in: TimeDuration,
    config: &SessionConfig,
) -> Cookie<'static> {
    let max_age = TimeDuration::minutes(config.cookie_max_age_minutes).min(expires_in);

    Cookie::build((SESSION_COOKIE, access_token))
        .path("/")
        .http_only(true)
        .secure(config.secure_cookies)
        .same_site(SameSite::Lax)
        .max_age(max_age.max(TimeDuration::ZERO))
        .build()
}

/// Builds a cookie that clears the session.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .max_age(TimeDuration::ZERO)
        .build()
}
