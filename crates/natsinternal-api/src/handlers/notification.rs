//! Notification handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use natsinternal_core::types::{NotificationId, PageResponse};
use natsinternal_entity::notification::NotificationView;
use natsinternal_realtime::NotifyOutcome;

use crate::dto::request::NotificationEventRequest;
use crate::dto::response::{ApiResponse, CountResponse, MarkedResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<NotificationView>>>, ApiError> {
    let page = state
        .notification_service
        .list_notifications(&auth, params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/notifications/{id}
pub async fn get_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<NotificationView>>, ApiError> {
    let view = state
        .notification_service
        .get_single_for(&auth, NotificationId::new(id))
        .await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.notification_service.unread_count(&auth).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// PUT /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state
        .notification_service
        .mark_read(&auth, NotificationId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<MarkedResponse>>, ApiError> {
    let marked = state.notification_service.mark_all_read(&auth).await?;
    Ok(Json(ApiResponse::ok(MarkedResponse { marked })))
}

/// POST /api/notifications/events
///
/// Intake for domain events detected by the CRUD services. The caller is
/// recorded as the acting user. Responds once the notification is persisted
/// and pushed to live connections.
pub async fn create_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<NotificationEventRequest>,
) -> Result<(StatusCode, Json<ApiResponse<NotifyOutcome>>), ApiError> {
    let event = req.into_event()?.by(auth.user_id);
    let outcome = state.realtime.notifier.notify_event(&event).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(outcome))))
}
