//! Admin account bootstrap.
//!
//! Signup can only mint USER accounts, so the first administrator has to be
//! seeded at startup. Idempotent: an existing account with the configured
//! email is left untouched.

use std::sync::Arc;

use tracing::info;

use crate::auth::password_service::PasswordService;
use crate::shared::error::Result;
use crate::user::entity::{Role, User};
use crate::user::repository::UserStore;

pub struct AdminSeeder {
    user_store: Arc<dyn UserStore>,
    password_service: Arc<PasswordService>,
}

impl AdminSeeder {
    pub fn new(user_store: Arc<dyn UserStore>, password_service: Arc<PasswordService>) -> Self {
        Self {
            user_store,
            password_service,
        }
    }

    /// Create the administrator account if it does not exist yet.
    pub async fn seed_admin(&self, name: &str, email: &str, password: &str) -> Result<()> {
        if self.user_store.exists_by_email(email).await? {
            info!(email, "Admin account already present, skipping seed");
            return Ok(());
        }

        let password_hash = self.password_service.hash_password(password)?;
        let admin = User::new(name, email, password_hash).with_role(Role::Admin);
        self.user_store.insert(&admin).await?;

        info!(email, user_id = %admin.id, "Seeded admin account");
        Ok(())
    }
}
