//! Authenticator
//!
//! Credential verification and account creation. Login failures collapse to
//! a single `InvalidCredentials` error whether the account is absent,
//! disabled, or the password is wrong, so responses never reveal which
//! emails are registered.

use std::sync::Arc;

use tracing::info;

use crate::auth::password_service::PasswordService;
use crate::auth::principal::Principal;
use crate::auth::token_service::TokenService;
use crate::shared::error::{Result, TravelFlowError};
use crate::user::entity::User;
use crate::user::repository::UserStore;

/// A freshly established session: the token plus the identity it encodes.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub principal: Principal,
}

pub struct Authenticator {
    user_store: Arc<dyn UserStore>,
    token_service: Arc<TokenService>,
    password_service: Arc<PasswordService>,
}

impl Authenticator {
    pub fn new(
        user_store: Arc<dyn UserStore>,
        token_service: Arc<TokenService>,
        password_service: Arc<PasswordService>,
    ) -> Self {
        Self {
            user_store,
            token_service,
            password_service,
        }
    }

    /// Verify credentials and open a session.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<AuthSession> {
        let user = self
            .user_store
            .find_by_email(email)
            .await?
            .ok_or(TravelFlowError::InvalidCredentials)?;

        if !user.enabled {
            return Err(TravelFlowError::InvalidCredentials);
        }

        let matches = self
            .password_service
            .verify_password(password, &user.password_hash)?;
        if !matches {
            return Err(TravelFlowError::InvalidCredentials);
        }

        let token = self.token_service.issue_token(&user.email)?;
        info!(user_id = %user.id, "User authenticated");

        Ok(AuthSession {
            token,
            principal: Principal::from_user(&user),
        })
    }

    /// Register a new account and immediately open a session for it.
    ///
    /// New accounts always get the USER role; administrators are seeded at
    /// startup, never created through signup.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<AuthSession> {
        if self.user_store.exists_by_email(email).await? {
            return Err(TravelFlowError::email_in_use(email));
        }

        let password_hash = self.password_service.hash_password(password)?;
        let user = User::new(name, email, password_hash);
        self.user_store.insert(&user).await?;
        info!(user_id = %user.id, "User registered");

        self.authenticate(email, password).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password_service::{Argon2Config, PasswordPolicy};
    use crate::auth::token_service::TokenConfig;
    use crate::user::entity::Role;
    use crate::user::repository::memory::InMemoryUserStore;

    fn authenticator(store: Arc<InMemoryUserStore>) -> Authenticator {
        let token_service = Arc::new(TokenService::new(TokenConfig {
            secret_key: "test-secret".to_string(),
            ..TokenConfig::default()
        }));
        let password_service = Arc::new(PasswordService::new(
            Argon2Config::testing(),
            PasswordPolicy::default(),
        ));
        Authenticator::new(store, token_service, password_service)
    }

    #[tokio::test]
    async fn signup_opens_a_valid_session() {
        let store = Arc::new(InMemoryUserStore::new());
        let auth = authenticator(store.clone());

        let session = auth
            .signup("Alice", "alice@example.com", "password123")
            .await
            .unwrap();

        assert_eq!(session.principal.email, "alice@example.com");
        assert_eq!(session.principal.role, Role::User);
        assert!(!session.token.is_empty());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn signup_rejects_duplicate_email_without_mutation() {
        let store = Arc::new(InMemoryUserStore::new());
        let auth = authenticator(store.clone());

        auth.signup("Alice", "alice@example.com", "password123")
            .await
            .unwrap();

        let err = auth
            .signup("Mallory", "alice@example.com", "different456")
            .await
            .unwrap_err();
        assert!(matches!(err, TravelFlowError::EmailInUse { .. }));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn login_with_wrong_password_fails() {
        let store = Arc::new(InMemoryUserStore::new());
        let auth = authenticator(store);

        auth.signup("Alice", "alice@example.com", "password123")
            .await
            .unwrap();

        let err = auth
            .authenticate("alice@example.com", "not-the-password")
            .await
            .unwrap_err();
        assert!(matches!(err, TravelFlowError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_for_unknown_email_fails_identically() {
        let store = Arc::new(InMemoryUserStore::new());
        let auth = authenticator(store);

        let err = auth
            .authenticate("nobody@example.com", "password123")
            .await
            .unwrap_err();
        assert!(matches!(err, TravelFlowError::InvalidCredentials));
    }

    #[tokio::test]
    async fn disabled_account_cannot_log_in() {
        let password_service =
            PasswordService::new(Argon2Config::testing(), PasswordPolicy::default());
        let hash = password_service.hash_password("password123").unwrap();
        let mut user = User::new("Alice", "alice@example.com", hash);
        user.disable();

        let store = Arc::new(InMemoryUserStore::with_users(vec![user]));
        let auth = authenticator(store);

        let err = auth
            .authenticate("alice@example.com", "password123")
            .await
            .unwrap_err();
        assert!(matches!(err, TravelFlowError::InvalidCredentials));
    }
}
