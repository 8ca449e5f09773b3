//! Notification feed handler.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use domain::models::notification::ListNotificationsResponse;
use domain::models::Notification;
use persistence::repositories::NotificationRepository;
use shared::pagination::{decode_cursor, encode_cursor};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotificationsQuery {
    pub cursor: Option<String>,
}

/// List the authenticated user's notifications, newest first.
///
/// Pagination is cursor-based: a full page carries a `nextCursor` the
/// client passes back to continue.
///
/// GET /api/v1/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: UserAuth,
    Query(query): Query<ListNotificationsQuery>,
) -> Result<Json<ListNotificationsResponse>, ApiError> {
    let before = match query.cursor.as_deref() {
        Some(cursor) => Some(
            decode_cursor(cursor)
                .map_err(|_| ApiError::Validation("Invalid cursor".to_string()))?,
        ),
        None => None,
    };

    let page_size = state.config.limits.notification_page_size;
    let repo = NotificationRepository::new(state.pool.clone());
    let entities = repo
        .list_for_recipient(auth.user_id, before, page_size)
        .await?;

    let next_cursor = if entities.len() as i64 == page_size {
        entities
            .last()
            .map(|last| encode_cursor(last.created_at, last.id))
    } else {
        None
    };

    let notifications = entities.into_iter().map(Notification::from).collect();

    Ok(Json(ListNotificationsResponse {
        notifications,
        next_cursor,
    }))
}
