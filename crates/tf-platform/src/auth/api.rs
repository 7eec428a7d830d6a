//! Auth API Endpoints
//!
//! Session endpoints for the stateless token scheme.
//! - POST /signup - Register a new account and open a session
//! - POST /signin - Password-based login
//! - POST /refresh - Exchange a valid bearer token for a fresh one
//! - POST /signout - Stateless logout acknowledgement

use axum::{extract::State, http::header::AUTHORIZATION, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::auth::authenticator::{AuthSession, Authenticator};
use crate::auth::token_service::{extract_bearer_token, TokenService};
use crate::shared::api_common::MessageResponse;
use crate::shared::error::TravelFlowError;
use crate::user::repository::UserStore;

/// Signup request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// Display name
    pub name: String,

    /// Email address (unique account identifier)
    pub email: String,

    /// Plaintext password, hashed before storage
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Email address
    pub email: String,

    /// Password
    pub password: String,
}

/// Session response returned by signup, signin, and refresh
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JwtResponse {
    /// Signed session token
    pub token: String,

    /// Token scheme (always "Bearer")
    #[serde(rename = "type")]
    pub token_type: String,

    /// User ID
    pub id: String,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Assigned role (USER or ADMIN)
    pub role: String,
}

impl JwtResponse {
    fn from_session(session: AuthSession) -> Self {
        Self {
            token: session.token,
            token_type: "Bearer".to_string(),
            id: session.principal.user_id,
            name: session.principal.name,
            email: session.principal.email,
            role: session.principal.role.as_str().to_string(),
        }
    }
}

/// Auth endpoint state
#[derive(Clone)]
pub struct AuthState {
    pub authenticator: Arc<Authenticator>,
    pub token_service: Arc<TokenService>,
    pub user_store: Arc<dyn UserStore>,
}

/// Register a new account
///
/// Creates a USER account and immediately opens a session for it, so a
/// fresh signup needs no separate login call.
#[utoipa::path(
    post,
    path = "/signup",
    tag = "auth",
    operation_id = "postAuthSignup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created and session opened", body = JwtResponse),
        (status = 400, description = "Invalid signup data"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn signup(
    State(state): State<AuthState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<JwtResponse>, TravelFlowError> {
    let session = state
        .authenticator
        .signup(&req.name, &req.email, &req.password)
        .await?;
    Ok(Json(JwtResponse::from_session(session)))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/signin",
    tag = "auth",
    operation_id = "postAuthSignin",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = JwtResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn signin(
    State(state): State<AuthState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<JwtResponse>, TravelFlowError> {
    let session = state
        .authenticator
        .authenticate(&req.email, &req.password)
        .await?;
    Ok(Json(JwtResponse::from_session(session)))
}

/// Refresh the session token
///
/// Exchanges the bearer token in the Authorization header for a new token
/// with a fresh expiry. The presented token must still be valid; there is
/// no refresh token rotation in the stateless scheme.
#[utoipa::path(
    post,
    path = "/refresh",
    tag = "auth",
    operation_id = "postAuthRefresh",
    responses(
        (status = 200, description = "Token refreshed", body = JwtResponse),
        (status = 401, description = "Missing, malformed, or expired token")
    )
)]
pub async fn refresh(
    State(state): State<AuthState>,
    headers: HeaderMap,
) -> Result<Json<JwtResponse>, TravelFlowError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(extract_bearer_token)
        .ok_or_else(|| TravelFlowError::invalid_token("Missing bearer token"))?;

    let new_token = state.token_service.refresh_token(token)?;

    // Re-read the user for the response fields; the account only has to
    // still exist, its enabled flag is not re-checked here.
    let validation = state.token_service.validate_token(&new_token);
    let email = validation
        .email
        .ok_or_else(|| TravelFlowError::invalid_token("Token has no subject"))?;
    let user = state
        .user_store
        .find_by_email(&email)
        .await?
        .ok_or_else(|| TravelFlowError::invalid_token("Account no longer exists"))?;

    Ok(Json(JwtResponse {
        token: new_token,
        token_type: "Bearer".to_string(),
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role.as_str().to_string(),
    }))
}

/// Logout
///
/// Sessions are stateless, so there is nothing to revoke server-side. The
/// endpoint exists so clients have a uniform logout call; they discard the
/// token locally.
#[utoipa::path(
    post,
    path = "/signout",
    tag = "auth",
    operation_id = "postAuthSignout",
    responses(
        (status = 200, description = "Logout acknowledged", body = MessageResponse)
    )
)]
pub async fn signout() -> Json<MessageResponse> {
    Json(MessageResponse::new("User logged out successfully!"))
}

/// Create the auth router
pub fn auth_router(state: AuthState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(signup))
        .routes(routes!(signin))
        .routes(routes!(refresh))
        .routes(routes!(signout))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_request_deserialization() {
        let json = r#"{"name":"Alice","email":"alice@example.com","password":"secret123"}"#;
        let req: SignupRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.name, "Alice");
        assert_eq!(req.email, "alice@example.com");
        assert_eq!(req.password, "secret123");
    }

    #[test]
    fn test_login_request_deserialization() {
        let json = r#"{"email":"test@example.com","password":"secret"}"#;
        let req: LoginRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.email, "test@example.com");
        assert_eq!(req.password, "secret");
    }

    #[test]
    fn test_jwt_response_serialization() {
        let response = JwtResponse {
            token: "header.payload.signature".to_string(),
            token_type: "Bearer".to_string(),
            id: "user-123".to_string(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            role: "USER".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""type":"Bearer""#));
        assert!(json.contains("user-123"));
        assert!(json.contains(r#""role":"USER""#));
    }
}
