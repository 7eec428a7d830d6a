//! TravelFlow shared infrastructure.
//!
//! Currently holds the structured logging setup used by the server binary.

pub mod logging;
