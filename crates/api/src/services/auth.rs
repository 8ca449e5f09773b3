//! Authentication service for user registration and login.

use domain::models::User;
use persistence::repositories::{ContactRepository, UserRepository};
use shared::crypto::hash_phone_number;
use shared::jwt::{JwtConfig, JwtError};
use shared::password::{hash_password, verify_password, PasswordError};
use sqlx::PgPool;
use thiserror::Error;

use crate::config::JwtAuthConfig;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Password does not meet requirements: {0}")]
    WeakPassword(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Result of a successful authentication.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub user: User,
    pub access_token: String,
    pub expires_in: i64,
}

/// Authentication service.
pub struct AuthService {
    users: UserRepository,
    contacts: ContactRepository,
    jwt_config: JwtConfig,
    access_token_expiry: i64,
}

impl AuthService {
    /// Creates a new AuthService over the given pool and JWT settings.
    pub fn new(pool: PgPool, jwt: &JwtAuthConfig) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            contacts: ContactRepository::new(pool),
            jwt_config: JwtConfig::with_leeway(
                &jwt.secret,
                jwt.access_token_expiry_secs,
                jwt.leeway_secs,
            ),
            access_token_expiry: jwt.access_token_expiry_secs,
        }
    }

    /// Register a new account and issue an access token.
    ///
    /// The phone number, when given, is stored alongside its digest so
    /// other users can discover this account without seeing the number.
    pub async fn register(
        &self,
        email: &str,
        name: &str,
        password: &str,
        phone_number: Option<&str>,
    ) -> Result<AuthResult, AuthError> {
        shared::password::check_password_strength(password)
            .map_err(AuthError::WeakPassword)?;

        if self.users.find_by_email(email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = hash_password(password)?;
        let phone_hash = phone_number.map(hash_phone_number);

        let entity = self
            .users
            .create(email, name, &password_hash, phone_number, phone_hash.as_deref())
            .await?;

        // Shares created before this account existed now get a recipient id.
        if let Err(e) = self.contacts.link_recipient(entity.id, email).await {
            tracing::warn!(error = %e, "Failed to link pending shares to new account");
        }

        let (access_token, _jti) = self.jwt_config.generate_access_token(entity.id)?;

        Ok(AuthResult {
            user: entity.into(),
            access_token,
            expires_in: self.access_token_expiry,
        })
    }

    /// Verify credentials and issue an access token.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResult, AuthError> {
        let entity = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &entity.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let (access_token, _jti) = self.jwt_config.generate_access_token(entity.id)?;

        Ok(AuthResult {
            user: entity.into(),
            access_token,
            expires_in: self.access_token_expiry,
        })
    }
}
