//! User aggregate: registered account identities and their store.

pub mod entity;
pub mod repository;
pub mod seed;
