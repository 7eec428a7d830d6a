//! TravelFlow Platform
//!
//! Core platform providing:
//! - Stateless session tokens (signed JWTs, no server-side session store)
//! - Email/password authentication with Argon2id hashing
//! - Booking lifecycle management with per-resource ownership enforcement
//! - Administrative override endpoints (list all, force status)
//!
//! ## Module Organization (Aggregate-based)
//!
//! Each aggregate contains:
//! - `entity` - Domain entities
//! - `repository` - Store contract and MongoDB implementation
//! - `api` - REST endpoints

// Core aggregates
pub mod user;
pub mod booking;

// Authentication
pub mod auth;

// Shared infrastructure
pub mod shared;

// Re-export common types from shared
pub use shared::error::{Result, TravelFlowError};

// Re-export main entity types for convenience
pub use booking::entity::{Booking, BookingStatus};
pub use user::entity::{Role, User};

// Re-export store contracts and repositories
pub use booking::repository::{BookingStore, MongoBookingRepository};
pub use user::repository::{MongoUserRepository, UserStore};

// Re-export services
pub use auth::authenticator::{AuthSession, Authenticator};
pub use auth::password_service::{Argon2Config, PasswordPolicy, PasswordService};
pub use auth::principal::Principal;
pub use auth::token_service::{SessionClaims, TokenConfig, TokenService, TokenValidation};
pub use booking::service::{BookingDraft, BookingService};
pub use user::seed::AdminSeeder;

// Re-export API surface
pub use auth::api::{auth_router, AuthState};
pub use booking::api::{bookings_router, BookingsState};
pub use shared::middleware::{AppState, AuthLayer, Authenticated};
