/// WebSocket endpoints for real-time notifications
use crate::error::{AppError, Result as AppResult};
use crate::middleware::AuthenticatedUser;
use crate::state::AppState;
use crate::websocket::NotificationSession;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use serde_json::json;
use uuid::Uuid;

/// Upgrade to a live notification channel for the authenticated user
///
/// Endpoint: GET /ws/notifications
pub async fn notifications_ws(
    req: HttpRequest,
    stream: web::Payload,
    state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let user = AuthenticatedUser::from_request_headers(&req)?;

    let session = NotificationSession::new(user.0, state.presence.clone(), &state.realtime);
    ws::start(session, &req, stream)
}

/// Get WebSocket connection status for the caller
///
/// Endpoint: GET /api/v1/ws/status/{user_id}
///
/// Only the caller's own presence is visible.
pub async fn ws_status(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> AppResult<HttpResponse> {
    let user_id = path.into_inner();
    if user.0 != user_id {
        return Err(AppError::Forbidden(
            "Connection status is only visible to its owner".to_string(),
        ));
    }
    let connection_count = state.presence.connection_count(user_id);

    Ok(HttpResponse::Ok().json(json!({
        "user_id": user_id.to_string(),
        "connected": connection_count > 0,
        "connection_count": connection_count
    })))
}
