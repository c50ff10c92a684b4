//! Client for the hosted GoTrue-compatible auth service.

use super::{AuthSession, IdentityBackend, SignUpOutcome};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use vibe_flow_core::UserId;
use vibe_flow_platform_access::{AuthenticationError, HostedAuthConfig, Identity, RoleSet};

/// HTTP client for the hosted auth service.
pub struct HostedAuthClient {
    http_client: reqwest::Client,
    config: HostedAuthConfig,
}

impl HostedAuthClient {
    /// Creates a new client.
    pub fn new(config: HostedAuthConfig) -> Result<Self, AuthenticationError> {
        if config.url().is_empty() || config.anon_key().is_empty() {
            return Err(AuthenticationError::Configuration {
                reason: "hosted auth url and anon key are required".to_string(),
            });
        }

        let http_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AuthenticationError::Configuration {
                reason: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Returns the backend configuration.
    pub fn config(&self) -> &HostedAuthConfig {
        &self.config
    }

    async fn post_credentials(
        &self,
        url: &str,
        email: &str,
        password: &str,
    ) -> Result<Value, AuthenticationError> {
        let response = self
            .http_client
            .post(url)
            .header("apikey", self.config.anon_key())
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| unavailable(url, e))?;

        read_json(response).await
    }
}

#[async_trait]
impl IdentityBackend for HostedAuthClient {
    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthenticationError> {
        let url = self.config.endpoint("token?grant_type=password");
        let body = self.post_credentials(&url, email, password).await?;
        let session = parse_session(body, &self.config)?;

        tracing::info!(user_id = %session.identity.user_id(), "signed in");
        Ok(session)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignUpOutcome, AuthenticationError> {
        let url = self.config.endpoint("signup");
        let body = self.post_credentials(&url, email, password).await?;

        if body.get("access_token").is_none() {
            tracing::info!("sign-up accepted, awaiting email confirmation");
            return Ok(SignUpOutcome::ConfirmationRequired);
        }

        let session = parse_session(body, &self.config)?;
        tracing::info!(user_id = %session.identity.user_id(), "signed up");
        Ok(SignUpOutcome::SignedIn(session))
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthenticationError> {
        let url = self.config.endpoint("logout");
        let response = self
            .http_client
            .post(&url)
            .header("apikey", self.config.anon_key())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| unavailable(&url, e))?;

        match response.status() {
            // An already-revoked token is as good as a revoked one.
            status if status.is_success() || is_token_rejection(status) => Ok(()),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(classify_error(status, &body))
            }
        }
    }

    async fn current_identity(
        &self,
        access_token: &str,
    ) -> Result<Option<Identity>, AuthenticationError> {
        let url = self.config.endpoint("user");
        let response = self
            .http_client
            .get(&url)
            .header("apikey", self.config.anon_key())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| unavailable(&url, e))?;

        if is_token_rejection(response.status()) {
            tracing::debug!(status = %response.status(), "session token rejected");
            return Ok(None);
        }

        let body = read_json(response).await?;
        let user: BackendUser =
            serde_json::from_value(body).map_err(|e| AuthenticationError::UnexpectedResponse {
                status: StatusCode::OK.as_u16(),
                reason: format!("malformed user: {}", e),
            })?;

        identity_from_user(user, &self.config).map(Some)
    }
}

/// Account record as returned by the backend.
#[derive(Debug, Deserialize)]
struct BackendUser {
    id: String,
    email: Option<String>,
    #[serde(default)]
    user_metadata: Value,
    #[serde(default)]
    app_metadata: Value,
}

/// Session payload from the token and sign-up endpoints.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    user: BackendUser,
}

/// Error payload; older and newer backends use different field names.
#[derive(Debug, Default, Deserialize)]
struct BackendErrorBody {
    error: Option<String>,
    error_code: Option<String>,
    error_description: Option<String>,
    msg: Option<String>,
}

impl BackendErrorBody {
    fn code(&self) -> Option<&str> {
        self.error_code.as_deref().or(self.error.as_deref())
    }

    fn message(&self) -> Option<&str> {
        self.msg.as_deref().or(self.error_description.as_deref())
    }
}

fn unavailable(url: &str, error: reqwest::Error) -> AuthenticationError {
    tracing::warn!(error = %error, endpoint = %url, "hosted auth request failed");
    AuthenticationError::BackendUnavailable {
        reason: if error.is_timeout() {
            "request timed out".to_string()
        } else {
            error.to_string()
        },
    }
}

fn is_token_rejection(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

async fn read_json(response: reqwest::Response) -> Result<Value, AuthenticationError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(classify_error(status, &body));
    }

    response
        .json()
        .await
        .map_err(|e| AuthenticationError::UnexpectedResponse {
            status: status.as_u16(),
            reason: format!("invalid JSON: {}", e),
        })
}

fn classify_error(status: StatusCode, body: &str) -> AuthenticationError {
    let parsed: BackendErrorBody = serde_json::from_str(body).unwrap_or_default();

    if status.is_server_error() {
        return AuthenticationError::BackendUnavailable {
            reason: format!("HTTP {}", status.as_u16()),
        };
    }

    match parsed.code() {
        Some("email_not_confirmed") => return AuthenticationError::EmailNotConfirmed,
        Some("invalid_grant" | "invalid_credentials") => {
            if parsed
                .message()
                .is_some_and(|m| m.to_ascii_lowercase().contains("not confirmed"))
            {
                return AuthenticationError::EmailNotConfirmed;
            }
            return AuthenticationError::InvalidCredentials;
        }
        _ => {}
    }

    if is_token_rejection(status) {
        return AuthenticationError::TokenRejected;
    }

    AuthenticationError::UnexpectedResponse {
        status: status.as_u16(),
        reason: parsed
            .message()
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
    }
}

fn parse_session(body: Value, config: &HostedAuthConfig) -> Result<AuthSession, AuthenticationError> {
    let token: TokenResponse =
        serde_json::from_value(body).map_err(|e| AuthenticationError::UnexpectedResponse {
            status: StatusCode::OK.as_u16(),
            reason: format!("malformed session: {}", e),
        })?;

    Ok(AuthSession {
        access_token: token.access_token,
        expires_at: Utc::now() + ChronoDuration::seconds(token.expires_in.max(0)),
        identity: identity_from_user(token.user, config)?,
    })
}

fn identity_from_user(
    user: BackendUser,
    config: &HostedAuthConfig,
) -> Result<Identity, AuthenticationError> {
    let user_id: UserId = user
        .id
        .parse()
        .map_err(|e| AuthenticationError::UnexpectedResponse {
            status: StatusCode::OK.as_u16(),
            reason: format!("invalid user id: {}", e),
        })?;

    let backend_roles = backend_roles(&user.app_metadata, config.role_claim());
    let roles = RoleSet::from_backend_roles(&backend_roles, config.admin_role());

    let display_name = ["full_name", "name", "display_name"]
        .iter()
        .find_map(|key| user.user_metadata.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string);

    Ok(Identity::new(user_id, roles)
        .with_email(user.email.filter(|email| !email.is_empty()))
        .with_display_name(display_name))
}

/// Reads role names from `app_metadata`, accepting a string or an array.
fn backend_roles(app_metadata: &Value, claim: &str) -> Vec<String> {
    match app_metadata.get(claim) {
        Some(Value::String(role)) => vec![role.clone()],
        Some(Value::Array(roles)) => roles
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> HostedAuthConfig {
        HostedAuthConfig::new(
            "https://project.example".to_string(),
            "anon-key".to_string(),
        )
    }

    fn user(app_metadata: Value) -> BackendUser {
        serde_json::from_value(json!({
            "id": "8d0c5f5e-1b2a-4c3d-9e8f-001122334455",
            "email": "ada@vibeflow.studio",
            "user_metadata": { "full_name": "Ada Lovelace" },
            "app_metadata": app_metadata,
        }))
        .expect("valid user")
    }

    #[test]
    fn identity_from_user_reads_profile() {
        let identity = identity_from_user(user(json!({})), &config()).expect("identity");

        assert_eq!(
            identity.user_id().as_str(),
            "8d0c5f5e-1b2a-4c3d-9e8f-001122334455"
        );
        assert_eq!(identity.email(), Some("ada@vibeflow.studio"));
        assert_eq!(identity.display_name(), Some("Ada Lovelace"));
        assert!(!identity.is_admin());
    }

    #[test]
    fn admin_role_from_string_claim() {
        let identity =
            identity_from_user(user(json!({ "role": "admin" })), &config()).expect("identity");
        assert!(identity.is_admin());
    }

    #[test]
    fn admin_role_from_array_claim() {
        let identity = identity_from_user(user(json!({ "role": ["editor", "Admin"] })), &config())
            .expect("identity");
        assert!(identity.is_admin());
    }

    #[test]
    fn custom_admin_role_and_claim() {
        let config = HostedAuthConfig::builder(
            "https://project.example".to_string(),
            "anon-key".to_string(),
        )
        .admin_role("owner".to_string())
        .role_claim("roles".to_string())
        .build();

        let owner = identity_from_user(user(json!({ "roles": ["owner"] })), &config)
            .expect("identity");
        assert!(owner.is_admin());

        let admin = identity_from_user(user(json!({ "role": "admin" })), &config)
            .expect("identity");
        assert!(!admin.is_admin());
    }

    #[test]
    fn blank_user_id_is_rejected() {
        let user: BackendUser = serde_json::from_value(json!({ "id": " " })).expect("user");
        let err = identity_from_user(user, &config()).expect_err("blank id");
        assert!(matches!(err, AuthenticationError::UnexpectedResponse { .. }));
    }

    #[test]
    fn parse_session_reads_token_and_expiry() {
        let before = Utc::now();
        let session = parse_session(
            json!({
                "access_token": "jwt",
                "token_type": "bearer",
                "expires_in": 3600,
                "refresh_token": "refresh",
                "user": { "id": "user-1", "email": "a@b.c" },
            }),
            &config(),
        )
        .expect("session");

        assert_eq!(session.access_token, "jwt");
        assert!(session.expires_at >= before + ChronoDuration::seconds(3600));
        assert_eq!(session.identity.user_id().as_str(), "user-1");
    }

    #[test]
    fn parse_session_rejects_missing_token() {
        let err = parse_session(json!({ "user": { "id": "user-1" } }), &config())
            .expect_err("no token");
        assert!(matches!(err, AuthenticationError::UnexpectedResponse { .. }));
    }

    #[test]
    fn classify_invalid_credentials() {
        let legacy = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        assert!(matches!(
            classify_error(StatusCode::BAD_REQUEST, legacy),
            AuthenticationError::InvalidCredentials
        ));

        let current = r#"{"code":400,"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#;
        assert!(matches!(
            classify_error(StatusCode::BAD_REQUEST, current),
            AuthenticationError::InvalidCredentials
        ));
    }

    #[test]
    fn classify_unconfirmed_email() {
        let current = r#"{"error_code":"email_not_confirmed","msg":"Email not confirmed"}"#;
        assert!(matches!(
            classify_error(StatusCode::BAD_REQUEST, current),
            AuthenticationError::EmailNotConfirmed
        ));

        let legacy = r#"{"error":"invalid_grant","error_description":"Email not confirmed"}"#;
        assert!(matches!(
            classify_error(StatusCode::BAD_REQUEST, legacy),
            AuthenticationError::EmailNotConfirmed
        ));
    }

    #[test]
    fn classify_server_errors_as_unavailable() {
        assert!(matches!(
            classify_error(StatusCode::BAD_GATEWAY, "<html>"),
            AuthenticationError::BackendUnavailable { .. }
        ));
    }

    #[test]
    fn classify_rejected_token() {
        assert!(matches!(
            classify_error(StatusCode::UNAUTHORIZED, ""),
            AuthenticationError::TokenRejected
        ));
    }

    #[test]
    fn classify_other_rejections_keep_backend_message() {
        let body = r#"{"code":422,"error_code":"user_already_exists","msg":"User already registered"}"#;
        match classify_error(StatusCode::UNPROCESSABLE_ENTITY, body) {
            AuthenticationError::UnexpectedResponse { status, reason } => {
                assert_eq!(status, 422);
                assert_eq!(reason, "User already registered");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn client_requires_url_and_key() {
        let config = HostedAuthConfig::new(String::new(), "anon-key".to_string());
        assert!(matches!(
            HostedAuthClient::new(config),
            Err(AuthenticationError::Configuration { .. })
        ));
    }
}
