//! HTTP route handlers.

pub mod auth;
pub mod circles;
pub mod contacts;
pub mod health;
pub mod locations;
pub mod notifications;
pub mod presence;
pub mod sos;
pub mod trips;
pub mod users;
