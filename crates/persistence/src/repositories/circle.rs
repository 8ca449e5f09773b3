//! Circle repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{CircleEntity, CircleWithCountEntity, RosterMemberEntity};
use crate::metrics::QueryTimer;

/// Repository for circle-related database operations.
#[derive(Clone)]
pub struct CircleRepository {
    pool: PgPool,
}

impl CircleRepository {
    /// Creates a new CircleRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new circle and add the creator as its first member.
    pub async fn create_circle(
        &self,
        name: &str,
        invite_code: &str,
        created_by: Uuid,
    ) -> Result<CircleEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_circle");

        // Circle and creator membership are inserted atomically.
        let mut tx = self.pool.begin().await?;

        let circle = sqlx::query_as::<_, CircleEntity>(
            r#"
            INSERT INTO circles (name, invite_code, created_by)
            VALUES ($1, $2, $3)
            RETURNING id, name, invite_code, created_by, created_at
            "#,
        )
        .bind(name)
        .bind(invite_code)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO circle_memberships (circle_id, user_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(circle.id)
        .bind(created_by)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(circle)
    }

    /// Find a circle by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CircleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_circle_by_id");
        let result = sqlx::query_as::<_, CircleEntity>(
            r#"
            SELECT id, name, invite_code, created_by, created_at
            FROM circles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a circle by its invite code (exact match; codes are generated
    /// uppercase).
    pub async fn find_by_invite_code(
        &self,
        invite_code: &str,
    ) -> Result<Option<CircleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_circle_by_invite_code");
        let result = sqlx::query_as::<_, CircleEntity>(
            r#"
            SELECT id, name, invite_code, created_by, created_at
            FROM circles
            WHERE invite_code = $1
            "#,
        )
        .bind(invite_code)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Add a user to a circle. Returns false when they were already a member.
    pub async fn add_member(&self, circle_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("add_circle_member");
        let result = sqlx::query(
            r#"
            INSERT INTO circle_memberships (circle_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (circle_id, user_id) DO NOTHING
            "#,
        )
        .bind(circle_id)
        .bind(user_id)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    /// Whether the user belongs to the circle.
    pub async fn is_member(&self, circle_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("is_circle_member");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM circle_memberships
                WHERE circle_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(circle_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// All circles the user belongs to, with member counts.
    pub async fn list_user_circles(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<CircleWithCountEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_user_circles");
        let result = sqlx::query_as::<_, CircleWithCountEntity>(
            r#"
            SELECT
                c.id, c.name, c.invite_code, c.created_by, c.created_at,
                (SELECT COUNT(*) FROM circle_memberships WHERE circle_id = c.id) AS member_count
            FROM circles c
            JOIN circle_memberships cm ON c.id = cm.circle_id
            WHERE cm.user_id = $1
            ORDER BY cm.joined_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Ids of all circles the user belongs to.
    pub async fn user_circle_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("user_circle_ids");
        let result = sqlx::query_scalar::<_, Uuid>(
            "SELECT circle_id FROM circle_memberships WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Member ids of a circle, excluding one user (typically the caller).
    pub async fn member_ids_excluding(
        &self,
        circle_id: Uuid,
        excluded: Uuid,
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("circle_member_ids");
        let result = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT user_id FROM circle_memberships
            WHERE circle_id = $1 AND user_id <> $2
            "#,
        )
        .bind(circle_id)
        .bind(excluded)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Remove a user from a circle. Returns the number of members left.
    ///
    /// Deletes the circle when the last member leaves, in the same
    /// transaction so a concurrent join cannot see a memberless circle.
    pub async fn remove_member(
        &self,
        circle_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<i64>, sqlx::Error> {
        let timer = QueryTimer::new("remove_circle_member");

        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query(
            "DELETE FROM circle_memberships WHERE circle_id = $1 AND user_id = $2",
        )
        .bind(circle_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if removed == 0 {
            tx.rollback().await?;
            timer.record();
            return Ok(None);
        }

        let remaining = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM circle_memberships WHERE circle_id = $1",
        )
        .bind(circle_id)
        .fetch_one(&mut *tx)
        .await?;

        if remaining == 0 {
            sqlx::query("DELETE FROM circles WHERE id = $1")
                .bind(circle_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        timer.record();
        Ok(Some(remaining))
    }

    /// Delete a circle outright. Memberships and locations cascade.
    pub async fn delete_circle(&self, circle_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_circle");
        let result = sqlx::query("DELETE FROM circles WHERE id = $1")
            .bind(circle_id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    /// The full roster of a circle: every member joined with their current
    /// location in this circle and their presence heartbeat.
    pub async fn roster(&self, circle_id: Uuid) -> Result<Vec<RosterMemberEntity>, sqlx::Error> {
        let timer = QueryTimer::new("circle_roster");
        let result = sqlx::query_as::<_, RosterMemberEntity>(
            r#"
            SELECT
                u.id AS user_id, u.name, u.email,
                l.latitude, l.longitude, l.captured_at,
                l.battery_level, l.is_charging,
                p.connection_type, p.last_seen
            FROM circle_memberships cm
            JOIN users u ON u.id = cm.user_id
            LEFT JOIN locations l ON l.user_id = cm.user_id AND l.circle_id = cm.circle_id
            LEFT JOIN presence p ON p.user_id = cm.user_id
            WHERE cm.circle_id = $1
            ORDER BY u.name
            "#,
        )
        .bind(circle_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
