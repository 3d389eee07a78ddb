/// Notification fetch endpoint
use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::services::notifications::page_bounds;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

/// Endpoint: GET /api/v1/notifications?limit=&offset=
pub async fn list_notifications(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    let (limit, offset) = page_bounds(query.limit, query.offset);
    let notifications = state
        .notifications
        .list_for_recipient(user.0, limit, offset)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "notifications": notifications,
        "limit": limit,
        "offset": offset,
    })))
}
