/// Post handlers - HTTP endpoints for post operations
use super::decode_media;
use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::models::{CreatePostRequest, MediaRef, Post, UpdatePostRequest};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreatePostBody {
    pub content: String,
    #[serde(default)]
    pub media: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostBody {
    pub content: Option<String>,
    pub media: Option<Vec<String>>,
    pub expected_version: Option<i32>,
}

/// Post plus its media split by kind
#[derive(Debug, Serialize)]
pub struct PostResponse {
    #[serde(flatten)]
    pub post: Post,
    pub images: Vec<MediaRef>,
    pub videos: Vec<MediaRef>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        let classified = post.classified_media();
        Self {
            post,
            images: classified.images,
            videos: classified.videos,
        }
    }
}

/// Create a new post
pub async fn create_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<CreatePostBody>,
) -> Result<HttpResponse> {
    let body = body.into_inner();
    let request = CreatePostRequest {
        media: decode_media(&body.media)?,
        content: body.content,
    };

    let post = state.posts.create_post(user.0, request).await?;
    Ok(HttpResponse::Created().json(PostResponse::from(post)))
}

/// Get a post by ID
pub async fn get_post(state: web::Data<AppState>, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let post = state.posts.get_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

/// Update content and/or replace the media of a post
pub async fn update_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostBody>,
) -> Result<HttpResponse> {
    let body = body.into_inner();
    let request = UpdatePostRequest {
        content: body.content,
        media: body.media.as_deref().map(decode_media).transpose()?,
        expected_version: body.expected_version,
    };

    let post = state
        .posts
        .update_post(user.0, path.into_inner(), request)
        .await?;
    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}
