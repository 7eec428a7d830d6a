//! Request Principal
//!
//! The resolved identity attached to an authenticated request. Built per
//! request from validated token claims plus a fresh user lookup; never
//! persisted and never stored in shared state. Every engine operation
//! receives it as an explicit parameter.

use crate::user::entity::{Role, User};

#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Principal {
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
