//! Trip repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::TripEntity;
use crate::metrics::QueryTimer;

const TRIP_COLUMNS: &str = "id, owner_id, circle_id, destination_latitude, \
     destination_longitude, destination_name, shared_with, eta_minutes, \
     distance_meters, active, started_at, ended_at";

/// Repository for trip-related database operations.
#[derive(Clone)]
pub struct TripRepository {
    pool: PgPool,
}

impl TripRepository {
    /// Creates a new TripRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Start a trip toward a destination, visible to a circle.
    pub async fn create(
        &self,
        owner_id: Uuid,
        circle_id: Uuid,
        destination_latitude: f64,
        destination_longitude: f64,
        destination_name: Option<&str>,
        shared_with: &[Uuid],
    ) -> Result<TripEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_trip");
        let result = sqlx::query_as::<_, TripEntity>(&format!(
            r#"
            INSERT INTO trips
                (owner_id, circle_id, destination_latitude, destination_longitude,
                 destination_name, shared_with)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TRIP_COLUMNS}
            "#,
        ))
        .bind(owner_id)
        .bind(circle_id)
        .bind(destination_latitude)
        .bind(destination_longitude)
        .bind(destination_name)
        .bind(shared_with)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a trip by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<TripEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_trip_by_id");
        let result = sqlx::query_as::<_, TripEntity>(&format!(
            "SELECT {TRIP_COLUMNS} FROM trips WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Active trips in a circle, newest first. Visibility filtering
    /// happens in the handler.
    pub async fn list_active_for_circle(
        &self,
        circle_id: Uuid,
    ) -> Result<Vec<TripEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_circle_trips");
        let result = sqlx::query_as::<_, TripEntity>(&format!(
            r#"
            SELECT {TRIP_COLUMNS} FROM trips
            WHERE circle_id = $1 AND active
            ORDER BY started_at DESC
            "#,
        ))
        .bind(circle_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Active trips in the user's circles that the user may see: trips
    /// shared with them explicitly, or with the whole circle.
    pub async fn list_shared_with_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<TripEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_shared_trips");
        let result = sqlx::query_as::<_, TripEntity>(&format!(
            r#"
            SELECT {TRIP_COLUMNS} FROM trips t
            WHERE t.active
              AND t.owner_id <> $1
              AND EXISTS (
                  SELECT 1 FROM circle_memberships cm
                  WHERE cm.circle_id = t.circle_id AND cm.user_id = $1
              )
              AND (t.shared_with = '{{}}' OR $1 = ANY(t.shared_with))
            ORDER BY t.started_at DESC
            "#,
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// All active trips, for the periodic ETA refresh.
    pub async fn list_active(&self) -> Result<Vec<TripEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_active_trips");
        let result = sqlx::query_as::<_, TripEntity>(&format!(
            "SELECT {TRIP_COLUMNS} FROM trips WHERE active",
        ))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Store a refreshed estimate for an active trip.
    pub async fn update_estimate(
        &self,
        trip_id: Uuid,
        eta_minutes: i64,
        distance_meters: f64,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("update_trip_estimate");
        let result = sqlx::query(
            "UPDATE trips SET eta_minutes = $2, distance_meters = $3 WHERE id = $1 AND active",
        )
        .bind(trip_id)
        .bind(eta_minutes)
        .bind(distance_meters)
        .execute(&self.pool)
        .await;
        timer.record();
        result.map(|_| ())
    }

    /// End a trip. Returns false when it was already ended.
    pub async fn stop(&self, trip_id: Uuid, ended_at: DateTime<Utc>) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("stop_trip");
        let result = sqlx::query(
            "UPDATE trips SET active = false, ended_at = $2 WHERE id = $1 AND active",
        )
        .bind(trip_id)
        .bind(ended_at)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}
