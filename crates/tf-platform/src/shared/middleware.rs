//! API Middleware
//!
//! Bearer-token authentication for Axum. The `Authenticated` extractor
//! validates the session token and resolves the caller into a [`Principal`]
//! with a fresh user lookup on every request, so role changes take effect
//! immediately. Token expiry is the only thing that ends a session: the
//! `enabled` flag is deliberately not re-checked here (stateless tokens
//! carry no revocation).

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use crate::auth::principal::Principal;
use crate::auth::token_service::{extract_bearer_token, TokenService};
use crate::shared::api_common::ApiError;
use crate::user::repository::UserStore;

/// Application state containing shared auth services
#[derive(Clone)]
pub struct AppState {
    pub token_service: Arc<TokenService>,
    pub user_store: Arc<dyn UserStore>,
}

/// Authenticated caller extractor
///
/// Validates the bearer token and yields the resolved [`Principal`].
pub struct Authenticated(pub Principal);

impl std::ops::Deref for Authenticated {
    type Target = Principal;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Error response for authentication failures
pub struct AuthError {
    pub status: StatusCode,
    pub message: String,
}

impl AuthError {
    fn unauthenticated(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = ApiError {
            error: "UNAUTHORIZED".to_string(),
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // AppState is injected into extensions by the AuthLayer
        let app_state = parts.extensions.get::<AppState>().ok_or_else(|| AuthError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Auth services not configured".to_string(),
        })?;

        // Missing and malformed credentials are treated identically
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(extract_bearer_token)
            .ok_or_else(|| AuthError::unauthenticated("Missing authentication token"))?;

        let validation = app_state.token_service.validate_token(token);
        let email = validation
            .email
            .filter(|_| validation.valid)
            .ok_or_else(|| AuthError::unauthenticated("Invalid or expired token"))?;

        // Fresh lookup per request; never cached across calls
        let user = app_state
            .user_store
            .find_by_email(&email)
            .await
            .map_err(|e| AuthError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: e.to_string(),
            })?
            .ok_or_else(|| AuthError::unauthenticated("Invalid or expired token"))?;

        Ok(Authenticated(Principal::from_user(&user)))
    }
}

/// Middleware layer that injects AppState into request extensions,
/// enabling the `Authenticated` extractor on nested routers.
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower::{Layer, Service};

#[derive(Clone)]
pub struct AuthLayer {
    state: AppState,
}

impl AuthLayer {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            state: self.state.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    state: AppState,
}

impl<S, B> Service<axum::http::Request<B>> for AuthMiddleware<S>
where
    S: Service<axum::http::Request<B>, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        req.extensions_mut().insert(self.state.clone());

        let future = self.inner.call(req);
        Box::pin(async move { future.await })
    }
}
