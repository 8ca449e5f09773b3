//! Domain layer for the OnTheWay backend.
//!
//! This crate contains:
//! - Domain models (User, Circle, LocationUpdate, Contact, Trip, ...)
//! - Business logic services (ETA estimation, arrival notification)
//! - Domain error types

pub mod models;
pub mod services;
