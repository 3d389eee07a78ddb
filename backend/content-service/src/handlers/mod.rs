/// HTTP handlers for content-service
///
/// - Posts: create, read, update with media attachments
/// - Comments: threaded comments on posts
/// - Notifications: fetch persisted notifications
/// - WebSocket: live notification channels and their status
///
/// Media travels as base64 strings in JSON bodies and is decoded here before
/// it reaches the services.
pub mod comments;
pub mod notifications;
pub mod posts;
pub mod websocket;

pub use comments::{create_comment, delete_comment, update_comment};
pub use notifications::list_notifications;
pub use posts::{create_post, get_post, update_post};
pub use websocket::{notifications_ws, ws_status};

use crate::error::{AppError, Result};
use actix_web::web;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/ws/notifications", web::get().to(notifications_ws))
        .service(
            web::scope("/api/v1")
                .route("/posts", web::post().to(create_post))
                .service(
                    web::resource("/posts/{post_id}")
                        .route(web::get().to(get_post))
                        .route(web::patch().to(update_post)),
                )
                .route("/posts/{post_id}/comments", web::post().to(create_comment))
                .service(
                    web::resource("/comments/{comment_id}")
                        .route(web::patch().to(update_comment))
                        .route(web::delete().to(delete_comment)),
                )
                .route("/notifications", web::get().to(list_notifications))
                .route("/ws/status/{user_id}", web::get().to(ws_status)),
        );
}

pub(crate) fn decode_media(encoded: &[String]) -> Result<Vec<Bytes>> {
    encoded
        .iter()
        .enumerate()
        .map(|(index, value)| {
            STANDARD
                .decode(value.trim())
                .map(Bytes::from)
                .map_err(|e| {
                    AppError::Validation(format!("media attachment {} is not base64: {}", index + 1, e))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_media() {
        let decoded = decode_media(&["aGVsbG8=".to_string()]).unwrap();
        assert_eq!(decoded, vec![Bytes::from_static(b"hello")]);

        assert!(matches!(
            decode_media(&["***".to_string()]),
            Err(AppError::Validation(_))
        ));
    }
}
