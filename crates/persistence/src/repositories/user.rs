//! User repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::UserEntity;
use crate::metrics::QueryTimer;

const USER_COLUMNS: &str =
    "id, email, name, password_hash, phone_number, phone_hash, fcm_token, created_at, updated_at";

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user account.
    pub async fn create(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
        phone_number: Option<&str>,
        phone_hash: Option<&str>,
    ) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_user");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            INSERT INTO users (email, name, password_hash, phone_number, phone_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .bind(phone_number)
        .bind(phone_hash)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_email");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)",
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Replace the FCM device token for a user.
    pub async fn update_fcm_token(
        &self,
        user_id: Uuid,
        fcm_token: &str,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("update_fcm_token");
        let result = sqlx::query(
            "UPDATE users SET fcm_token = $2, updated_at = now() WHERE id = $1",
        )
        .bind(user_id)
        .bind(fcm_token)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    /// Find registered users matching any of the given phone hashes.
    pub async fn find_by_phone_hashes(
        &self,
        phone_hashes: &[String],
    ) -> Result<Vec<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_users_by_phone_hashes");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE phone_hash = ANY($1)",
        ))
        .bind(phone_hashes)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
