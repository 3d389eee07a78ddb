//! HTTP surface over the in-memory pipeline

mod common;

use actix_web::{http::StatusCode, test, web, App};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use common::{png, Harness};
use content_service::handlers;
use content_service::websocket::ChannelHandle;
use serde_json::{json, Value};
use uuid::Uuid;

macro_rules! app {
    ($harness:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($harness.state.clone()))
                .configure(handlers::configure),
        )
        .await
    };
}

#[actix_rt::test]
async fn test_create_post_requires_user_header() {
    let harness = Harness::new();
    let app = app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/v1/posts")
        .set_json(json!({ "content": "hi" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(harness.posts.count(), 0);
}

#[actix_rt::test]
async fn test_create_and_fetch_post_with_image() {
    let harness = Harness::new();
    let app = app!(harness);
    let owner = Uuid::new_v4();

    let req = test::TestRequest::post()
        .uri("/api/v1/posts")
        .insert_header(("X-User-Id", owner.to_string()))
        .set_json(json!({
            "content": "sunset",
            "media": [STANDARD.encode(png())],
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["owner_id"], owner.to_string());
    assert_eq!(body["images"].as_array().unwrap().len(), 1);
    assert_eq!(body["videos"].as_array().unwrap().len(), 0);
    assert_eq!(body["media"][0]["kind"], "image");

    let post_id = body["id"].as_str().unwrap().to_string();
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/posts/{}", post_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_error_body_carries_code_and_status() {
    let harness = Harness::new();
    let app = app!(harness);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/posts/{}", Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["status"], 404);
}

#[actix_rt::test]
async fn test_blocked_comment_is_forbidden() {
    let harness = Harness::new();
    let owner = Uuid::new_v4();
    let author = Uuid::new_v4();
    let post = harness.seed_post(owner).await;
    harness.blocks.block(owner, author);
    let app = app!(harness);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/posts/{}/comments", post.id))
        .insert_header(("X-User-Id", author.to_string()))
        .set_json(json!({ "content": "let me in" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn test_comment_then_list_notifications() {
    let harness = Harness::new();
    let owner = Uuid::new_v4();
    let post = harness.seed_post(owner).await;
    let app = app!(harness);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/posts/{}/comments", post.id))
        .insert_header(("X-User-Id", Uuid::new_v4().to_string()))
        .set_json(json!({ "content": "first!" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/api/v1/notifications?limit=10")
        .insert_header(("X-User-Id", owner.to_string()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let notifications = body["notifications"].as_array().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["payload"]["type"], "comment");
    assert_eq!(notifications[0]["payload"]["post_id"], post.id.to_string());
}

#[actix_rt::test]
async fn test_notification_page_echoes_clamped_bounds() {
    let harness = Harness::new();
    let app = app!(harness);

    let req = test::TestRequest::get()
        .uri("/api/v1/notifications?limit=500&offset=-3")
        .insert_header(("X-User-Id", Uuid::new_v4().to_string()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["limit"], 100);
    assert_eq!(body["offset"], 0);
    assert_eq!(body["notifications"].as_array().unwrap().len(), 0);
}

#[actix_rt::test]
async fn test_invalid_base64_media_is_bad_request() {
    let harness = Harness::new();
    let app = app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/v1/posts")
        .insert_header(("X-User-Id", Uuid::new_v4().to_string()))
        .set_json(json!({ "content": "broken", "media": ["%%%"] }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(harness.storage.put_count(), 0);
}

#[actix_rt::test]
async fn test_ws_status_reports_live_channels() {
    let harness = Harness::new();
    let user = Uuid::new_v4();
    let (channel, _rx) = ChannelHandle::open(1);
    harness.state.presence.register(user, channel);
    let app = app!(harness);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/ws/status/{}", user))
        .insert_header(("X-User-Id", user.to_string()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["connected"], true);
    assert_eq!(body["connection_count"], 1);
}

#[actix_rt::test]
async fn test_ws_status_is_private_to_its_owner() {
    let harness = Harness::new();
    let user = Uuid::new_v4();
    let (channel, _rx) = ChannelHandle::open(1);
    harness.state.presence.register(user, channel);
    let app = app!(harness);

    let anonymous = test::TestRequest::get()
        .uri(&format!("/api/v1/ws/status/{}", user))
        .to_request();
    let resp = test::call_service(&app, anonymous).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let other = test::TestRequest::get()
        .uri(&format!("/api/v1/ws/status/{}", user))
        .insert_header(("X-User-Id", Uuid::new_v4().to_string()))
        .to_request();
    let resp = test::call_service(&app, other).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn test_ws_upgrade_without_user_is_unauthorized() {
    let harness = Harness::new();
    let app = app!(harness);

    let req = test::TestRequest::get()
        .uri("/ws/notifications")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
