//! Authentication: token issuance/validation, password hashing,
//! credential verification, and the `/api/auth` endpoints.

pub mod api;
pub mod authenticator;
pub mod password_service;
pub mod principal;
pub mod token_service;
