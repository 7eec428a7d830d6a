//! Token Service
//!
//! Stateless session tokens: signed JWTs (HS256, process-wide secret) with
//! the user's email as subject. Possession plus signature/expiry validity is
//! the only proof of authenticity. There is no server-side session record
//! and no revocation list, so a token stays valid until its encoded expiry
//! regardless of later account changes.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::shared::error::{Result, TravelFlowError};

/// JWT claims for session tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user email)
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// HMAC secret key, read-only after startup
    pub secret_key: String,

    /// Token issuer claim
    pub issuer: String,

    /// Token time-to-live in seconds
    pub ttl_secs: i64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            issuer: "travelflow".to_string(),
            ttl_secs: 86_400, // 24 hours
        }
    }
}

/// Outcome of token validation. Validation never errors: any malformed,
/// unsigned, mis-issued, or expired token simply comes back invalid.
#[derive(Debug, Clone)]
pub struct TokenValidation {
    pub valid: bool,
    pub email: Option<String>,
}

impl TokenValidation {
    fn invalid() -> Self {
        Self {
            valid: false,
            email: None,
        }
    }
}

/// Issues, validates, and refreshes session tokens.
pub struct TokenService {
    config: TokenConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(config: TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret_key.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret_key.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issue a session token for the given subject email.
    pub fn issue_token(&self, email: &str) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.ttl_secs);

        let claims = SessionClaims {
            sub: email.to_string(),
            iss: self.config.issuer.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            TravelFlowError::internal(format!("Failed to encode session token: {}", e))
        })
    }

    /// Validate a token, failing closed.
    pub fn validate_token(&self, token: &str) -> TokenValidation {
        match self.decode_claims(token) {
            Some(claims) => TokenValidation {
                valid: true,
                email: Some(claims.sub),
            },
            None => TokenValidation::invalid(),
        }
    }

    /// Re-issue a token for the same subject with a fresh issued-at/expiry.
    ///
    /// Requires the presented token to validate; does not consult the user
    /// store (the caller re-reads the user only for response fields).
    pub fn refresh_token(&self, token: &str) -> Result<String> {
        let validation = self.validate_token(token);
        match validation.email.filter(|_| validation.valid) {
            Some(email) => self.issue_token(&email),
            None => Err(TravelFlowError::invalid_token(
                "Token is malformed or expired",
            )),
        }
    }

    fn decode_claims(&self, token: &str) -> Option<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.leeway = 0;

        let claims = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .ok()?;

        // The library accepts exp == now; reject the boundary second too so
        // exp <= now is invalid, exactly
        if claims.exp <= Utc::now().timestamp() {
            return None;
        }

        Some(claims)
    }
}

/// Extract bearer token from an Authorization header value
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_with_ttl(ttl_secs: i64) -> TokenService {
        TokenService::new(TokenConfig {
            secret_key: "test-secret".to_string(),
            issuer: "travelflow".to_string(),
            ttl_secs,
        })
    }

    #[test]
    fn issue_then_validate() {
        let service = service_with_ttl(3600);
        let token = service.issue_token("user@example.com").unwrap();

        let validation = service.validate_token(&token);
        assert!(validation.valid);
        assert_eq!(validation.email.as_deref(), Some("user@example.com"));
    }

    #[test]
    fn expired_token_is_invalid() {
        // Negative TTL simulates the expiry window having elapsed
        let service = service_with_ttl(-10);
        let token = service.issue_token("user@example.com").unwrap();

        let validation = service.validate_token(&token);
        assert!(!validation.valid);
        assert!(validation.email.is_none());
    }

    #[test]
    fn token_expiring_this_second_is_invalid() {
        // ttl 0 puts exp exactly at issue time
        let service = service_with_ttl(0);
        let token = service.issue_token("user@example.com").unwrap();

        let validation = service.validate_token(&token);
        assert!(!validation.valid);
    }

    #[test]
    fn malformed_tokens_fail_closed() {
        let service = service_with_ttl(3600);
        for garbage in ["", "not-a-jwt", "a.b.c", "Bearer xyz"] {
            let validation = service.validate_token(garbage);
            assert!(!validation.valid, "{garbage:?} should be invalid");
        }
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let issuing = service_with_ttl(3600);
        let verifying = TokenService::new(TokenConfig {
            secret_key: "different-secret".to_string(),
            ..TokenConfig::default()
        });

        let token = issuing.issue_token("user@example.com").unwrap();
        assert!(!verifying.validate_token(&token).valid);
    }

    #[test]
    fn refresh_reissues_for_same_subject() {
        let service = service_with_ttl(3600);
        let token = service.issue_token("user@example.com").unwrap();

        let refreshed = service.refresh_token(&token).unwrap();
        let validation = service.validate_token(&refreshed);
        assert!(validation.valid);
        assert_eq!(validation.email.as_deref(), Some("user@example.com"));
    }

    #[test]
    fn refresh_rejects_invalid_token() {
        let service = service_with_ttl(3600);
        let err = service.refresh_token("garbage").unwrap_err();
        assert!(matches!(err, TravelFlowError::InvalidToken { .. }));

        let expired = service_with_ttl(-10).issue_token("user@example.com").unwrap();
        let err = service.refresh_token(&expired).unwrap_err();
        assert!(matches!(err, TravelFlowError::InvalidToken { .. }));
    }

    #[test]
    fn bearer_extraction() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("bearer abc123"), None);
        assert_eq!(extract_bearer_token("Basic abc123"), None);
    }
}
