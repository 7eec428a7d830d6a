//! Bookings: the lifecycle engine, persistence, and the `/api/bookings`
//! endpoints.

pub mod api;
pub mod entity;
pub mod repository;
pub mod service;
