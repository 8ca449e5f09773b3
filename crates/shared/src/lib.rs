//! Shared utilities and common types for the OnTheWay backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Cryptographic utilities (phone-number hashing, invite codes)
//! - Password hashing with Argon2id
//! - JWT token generation and validation
//! - Common validation logic
//! - Cursor-based pagination helpers

pub mod crypto;
pub mod jwt;
pub mod pagination;
pub mod password;
pub mod validation;
