//! Location repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{LatestLocationEntity, LocationEntity};
use crate::metrics::QueryTimer;

/// Repository for location-related database operations.
#[derive(Clone)]
pub struct LocationRepository {
    pool: PgPool,
}

impl LocationRepository {
    /// Creates a new LocationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Write the user's current location in one circle, overwriting any
    /// prior value for the (user, circle) pair.
    #[allow(clippy::too_many_arguments)]
    pub async fn upsert(
        &self,
        user_id: Uuid,
        circle_id: Uuid,
        latitude: f64,
        longitude: f64,
        speed: f64,
        accuracy: f64,
        battery_level: Option<i32>,
        is_charging: bool,
        captured_at: DateTime<Utc>,
    ) -> Result<LocationEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_location");
        let result = sqlx::query_as::<_, LocationEntity>(
            r#"
            INSERT INTO locations
                (user_id, circle_id, latitude, longitude, speed, accuracy,
                 battery_level, is_charging, captured_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (user_id, circle_id) DO UPDATE SET
                latitude = EXCLUDED.latitude,
                longitude = EXCLUDED.longitude,
                speed = EXCLUDED.speed,
                accuracy = EXCLUDED.accuracy,
                battery_level = EXCLUDED.battery_level,
                is_charging = EXCLUDED.is_charging,
                captured_at = EXCLUDED.captured_at
            RETURNING user_id, circle_id, latitude, longitude, speed, accuracy,
                      battery_level, is_charging, captured_at, created_at
            "#,
        )
        .bind(user_id)
        .bind(circle_id)
        .bind(latitude)
        .bind(longitude)
        .bind(speed)
        .bind(accuracy)
        .bind(battery_level)
        .bind(is_charging)
        .bind(captured_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// The user's freshest fix across all circles.
    pub async fn latest_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<LatestLocationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("latest_location_for_user");
        let result = sqlx::query_as::<_, LatestLocationEntity>(
            r#"
            SELECT user_id, latitude, longitude, speed, captured_at
            FROM locations
            WHERE user_id = $1
            ORDER BY captured_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete fixes captured before the cutoff. Returns the rows removed.
    pub async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_old_locations");
        let result = sqlx::query("DELETE FROM locations WHERE captured_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected())
    }

    /// Best-effort removal of a user's rows in one circle.
    pub async fn delete_for_user_in_circle(
        &self,
        user_id: Uuid,
        circle_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_user_circle_location");
        let result = sqlx::query(
            "DELETE FROM locations WHERE user_id = $1 AND circle_id = $2",
        )
        .bind(user_id)
        .bind(circle_id)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected())
    }
}
