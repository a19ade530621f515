//! End-to-end API tests over an in-memory database.
//!
//! Each test builds the full router and drives it with `tower::ServiceExt`,
//! so the identity middleware, guards, and quotas all run for real.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use loreforge_engine::infrastructure::clock::SystemClock;
use loreforge_engine::infrastructure::ports::{LlmError, LlmPort, LlmReply, LlmRequest};
use loreforge_engine::infrastructure::sqlite::ensure_schema;
use loreforge_engine::{api, App, AppConfig};

struct StubLlm;

#[async_trait::async_trait]
impl LlmPort for StubLlm {
    async fn generate(&self, request: LlmRequest) -> Result<LlmReply, LlmError> {
        Ok(LlmReply {
            text: format!("[{} bytes of prompt] A mysterious answer.", request.prompt.len()),
            usage: None,
        })
    }
}

async fn test_router() -> Router {
    // A single connection keeps the in-memory database alive and shared.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    ensure_schema(&pool).await.expect("schema");

    let app = Arc::new(App::new(
        pool,
        Arc::new(StubLlm),
        Arc::new(SystemClock),
        AppConfig::default(),
    ));
    api::http::routes(app)
}

async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router
        .clone()
        .oneshot(request)
        .await
        .expect("infallible service")
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request")
}

fn send_json(method: Method, uri: &str, cookie: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(serde_json::to_vec(body).expect("json")))
        .expect("request")
}

fn delete(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::DELETE).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request")
}

/// Extract `name=value` from the response's Set-Cookie header.
fn issued_cookie(response: &Response<Body>) -> Option<String> {
    let value = response.headers().get(header::SET_COOKIE)?;
    let value = value.to_str().ok()?;
    Some(value.split(';').next().unwrap_or(value).to_string())
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

/// First request for a fresh identity; returns the cookie to replay.
async fn establish_identity(router: &Router) -> String {
    let response = send(router, get("/api/worlds", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    issued_cookie(&response).expect("fresh identity gets a cookie")
}

async fn create_world(router: &Router, cookie: &str, name: &str) -> Value {
    let response = send(
        router,
        send_json(
            Method::POST,
            "/api/worlds",
            Some(cookie),
            &json!({ "name": name, "summary": "" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn health_is_open() {
    let router = test_router().await;
    let response = send(&router, get("/api/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn first_visit_issues_cookie_and_seeds_the_demo_world() {
    let router = test_router().await;

    let response = send(&router, get("/api/worlds", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = issued_cookie(&response).expect("cookie issued");
    assert!(cookie.starts_with("loreforge_user_id="));

    let worlds = body_json(response).await;
    let worlds = worlds.as_array().expect("array");
    assert_eq!(worlds.len(), 1);
    assert_eq!(worlds[0]["name"], "Mythworld (Demo)");
}

#[tokio::test]
async fn returning_visitor_keeps_their_identity() {
    let router = test_router().await;
    let cookie = establish_identity(&router).await;

    let response = send(&router, get("/api/worlds", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        issued_cookie(&response).is_none(),
        "no new cookie on a recognized visit"
    );

    let worlds = body_json(response).await;
    assert_eq!(worlds.as_array().expect("array").len(), 1, "no re-seed");
}

#[tokio::test]
async fn demo_world_detail_includes_characters_and_locations() {
    let router = test_router().await;
    let cookie = establish_identity(&router).await;

    let worlds = body_json(send(&router, get("/api/worlds", Some(&cookie))).await).await;
    let world_id = worlds[0]["id"].as_str().expect("id").to_string();

    let response = send(&router, get(&format!("/api/worlds/{world_id}"), Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let detail = body_json(response).await;

    assert_eq!(detail["name"], "Mythworld (Demo)");
    assert_eq!(detail["characters"].as_array().expect("characters").len(), 3);
    assert_eq!(detail["locations"].as_array().expect("locations").len(), 3);
}

#[tokio::test]
async fn fifth_world_is_rejected() {
    let router = test_router().await;
    let cookie = establish_identity(&router).await;

    // Demo world plus three more reaches the ceiling.
    for name in ["Aerth", "Borealia", "Cindervale"] {
        create_world(&router, &cookie, name).await;
    }

    let response = send(
        &router,
        send_json(
            Method::POST,
            "/api/worlds",
            Some(&cookie),
            &json!({ "name": "One Too Many" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(
        body["error"],
        "Maximum 4 worlds allowed. Delete a world to create a new one."
    );
}

#[tokio::test]
async fn eleventh_character_is_rejected() {
    let router = test_router().await;
    let cookie = establish_identity(&router).await;

    let worlds = body_json(send(&router, get("/api/worlds", Some(&cookie))).await).await;
    let world_id = worlds[0]["id"].as_str().expect("id").to_string();

    // The demo world seeds three characters; seven more reach ten.
    for i in 0..7 {
        let response = send(
            &router,
            send_json(
                Method::POST,
                "/api/characters",
                Some(&cookie),
                &json!({ "worldId": world_id, "name": format!("Extra {i}") }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = send(
        &router,
        send_json(
            Method::POST,
            "/api/characters",
            Some(&cookie),
            &json!({ "worldId": world_id, "name": "Eleventh" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(
        body["error"],
        "Maximum 10 characters per world. Delete a character to create a new one."
    );
}

#[tokio::test]
async fn foreign_worlds_are_invisible() {
    let router = test_router().await;
    let owner = establish_identity(&router).await;
    let stranger = establish_identity(&router).await;

    let worlds = body_json(send(&router, get("/api/worlds", Some(&owner))).await).await;
    let world_id = worlds[0]["id"].as_str().expect("id").to_string();

    // Direct read of someone else's world: denied, not leaked.
    let response = send(&router, get(&format!("/api/worlds/{world_id}"), Some(&stranger))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Listing children of someone else's world: denied too.
    let response = send(
        &router,
        get(&format!("/api/characters?worldId={world_id}"), Some(&stranger)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // A world that does not exist at all is a 404 for everyone.
    let response = send(
        &router,
        get(
            &format!("/api/worlds/{}", uuid::Uuid::new_v4()),
            Some(&stranger),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "World not found");
}

#[tokio::test]
async fn child_listing_requires_world_id() {
    let router = test_router().await;
    let cookie = establish_identity(&router).await;

    let response = send(&router, get("/api/characters", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "worldId is required");

    let response = send(
        &router,
        send_json(
            Method::POST,
            "/api/characters",
            Some(&cookie),
            &json!({ "name": "No World" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn character_crud_round_trip() {
    let router = test_router().await;
    let cookie = establish_identity(&router).await;

    let world = create_world(&router, &cookie, "Aerth").await;
    let world_id = world["id"].as_str().expect("id").to_string();

    let response = send(
        &router,
        send_json(
            Method::POST,
            "/api/characters",
            Some(&cookie),
            &json!({
                "worldId": world_id,
                "name": "Zephyr",
                "role": "Sky Courier",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let character = body_json(response).await;
    let character_id = character["id"].as_str().expect("id").to_string();
    assert_eq!(character["role"], "Sky Courier");

    // Full update: unset fields are cleared.
    let response = send(
        &router,
        send_json(
            Method::PUT,
            &format!("/api/characters/{character_id}"),
            Some(&cookie),
            &json!({ "name": "Zephyr the Grounded" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["name"], "Zephyr the Grounded");
    assert_eq!(updated["role"], "");
    assert_eq!(updated["id"], character_id.as_str());

    let response = send(
        &router,
        delete(&format!("/api/characters/{character_id}"), Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(
        &router,
        get(&format!("/api/characters/{character_id}"), Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Character not found");
}

#[tokio::test]
async fn event_routes_speak_titles() {
    let router = test_router().await;
    let cookie = establish_identity(&router).await;

    let world = create_world(&router, &cookie, "Aerth").await;
    let world_id = world["id"].as_str().expect("id").to_string();

    let response = send(
        &router,
        send_json(
            Method::POST,
            "/api/events",
            Some(&cookie),
            &json!({
                "worldId": world_id,
                "title": "The Long Eclipse",
                "charactersInvolved": "Everyone",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let event = body_json(response).await;
    assert_eq!(event["title"], "The Long Eclipse");
    assert_eq!(event["charactersInvolved"], "Everyone");

    let response = send(
        &router,
        get(&format!("/api/events/{}", uuid::Uuid::new_v4()), Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Event not found");
}

#[tokio::test]
async fn deleting_a_world_cascades_to_children() {
    let router = test_router().await;
    let cookie = establish_identity(&router).await;

    let worlds = body_json(send(&router, get("/api/worlds", Some(&cookie))).await).await;
    let world_id = worlds[0]["id"].as_str().expect("id").to_string();

    let detail =
        body_json(send(&router, get(&format!("/api/worlds/{world_id}"), Some(&cookie))).await)
            .await;
    let character_id = detail["characters"][0]["id"].as_str().expect("id").to_string();

    let response = send(&router, delete(&format!("/api/worlds/{world_id}"), Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&router, get(&format!("/api/worlds/{world_id}"), Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &router,
        get(&format!("/api/characters/{character_id}"), Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cleanup_reports_zero_for_active_users() {
    let router = test_router().await;
    let _cookie = establish_identity(&router).await;

    let response = send(
        &router,
        Request::builder()
            .method(Method::POST)
            .uri("/api/admin/cleanup")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["deletedCount"], 0);
    assert_eq!(
        body["message"],
        "Cleaned up 0 inactive user(s) (inactive for 7+ days)"
    );
}

#[tokio::test]
async fn cleanup_rejects_other_methods() {
    let router = test_router().await;
    let response = send(&router, get("/api/admin/cleanup", None)).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn ai_generation_round_trip() {
    let router = test_router().await;

    let response = send(
        &router,
        send_json(
            Method::POST,
            "/api/ai/generate",
            None,
            &json!({
                "prompt": "Describe a villain",
                "context": { "worldName": "Aerth" },
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert!(body["text"].as_str().expect("text").contains("mysterious"));

    let response = send(
        &router,
        send_json(Method::POST, "/api/ai/generate", None, &json!({ "prompt": "  " })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn blank_names_fail_validation() {
    let router = test_router().await;
    let cookie = establish_identity(&router).await;

    let response = send(
        &router,
        send_json(
            Method::POST,
            "/api/worlds",
            Some(&cookie),
            &json!({ "name": "   " }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Validation failed: name is required");

    let worlds = body_json(send(&router, get("/api/worlds", Some(&cookie))).await).await;
    let world_id = worlds[0]["id"].as_str().expect("id").to_string();

    let response = send(
        &router,
        send_json(
            Method::POST,
            "/api/events",
            Some(&cookie),
            &json!({ "worldId": world_id }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Validation failed: title is required");
}

#[tokio::test]
async fn world_update_changes_only_sent_fields() {
    let router = test_router().await;
    let cookie = establish_identity(&router).await;

    let world = create_world(&router, &cookie, "Aerth").await;
    let world_id = world["id"].as_str().expect("id").to_string();

    let response = send(
        &router,
        send_json(
            Method::PUT,
            &format!("/api/worlds/{world_id}"),
            Some(&cookie),
            &json!({ "summary": "A sky-locked archipelago." }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["name"], "Aerth", "name untouched");
    assert_eq!(updated["summary"], "A sky-locked archipelago.");
}
