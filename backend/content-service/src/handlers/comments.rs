/// Comment handlers
use super::decode_media;
use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::models::{CreateCommentRequest, UpdateCommentRequest};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateCommentBody {
    pub content: String,
    pub root_id: Option<Uuid>,
    #[serde(default)]
    pub media: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentBody {
    pub content: Option<String>,
    pub media: Option<Vec<String>>,
    pub expected_version: Option<i32>,
}

pub async fn create_comment(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<CreateCommentBody>,
) -> Result<HttpResponse> {
    let body = body.into_inner();
    let request = CreateCommentRequest {
        media: decode_media(&body.media)?,
        content: body.content,
        root_id: body.root_id,
    };

    let comment = state
        .comments
        .create_comment(user.0, path.into_inner(), request)
        .await?;
    Ok(HttpResponse::Created().json(comment))
}

pub async fn update_comment(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCommentBody>,
) -> Result<HttpResponse> {
    let body = body.into_inner();
    let request = UpdateCommentRequest {
        content: body.content,
        media: body.media.as_deref().map(decode_media).transpose()?,
        expected_version: body.expected_version,
    };

    let comment = state
        .comments
        .update_comment(user.0, path.into_inner(), request)
        .await?;
    Ok(HttpResponse::Ok().json(comment))
}

pub async fn delete_comment(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    state
        .comments
        .delete_comment(user.0, path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
