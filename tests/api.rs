mod common;

use artemis_back::{config::AppConfig, routes, state::SharedState};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use common::{basic, seed_user, state, state_with};

async fn send(app: &Router, method: &str, uri: &str, auth: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn app(state: SharedState) -> Router {
    routes::router(state)
}

#[tokio::test]
async fn test_missing_credentials_are_challenged() {
    let app = app(state().await);
    let response = app
        .clone()
        .oneshot(Request::get("/api/v1/items").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));

    let (status, _) = send(&app, "GET", "/api/v1/users/me", Some(&basic("x@example.com", "nope")), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_inactive_users_are_refused() {
    let state = state().await;
    let user = seed_user(&state, "idle@example.com", "secret", false).await;
    let patch = artemis_back::dao::patch::Patch::new().set("is_active", false);
    state.users().update(user, patch).await.unwrap();

    let app = app(state);
    let (status, _) = send(&app, "GET", "/api/v1/users/me", Some(&basic("idle@example.com", "secret")), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_items_are_gated_by_ownership() {
    let state = state().await;
    seed_user(&state, "ana@example.com", "secret", false).await;
    seed_user(&state, "bob@example.com", "secret", false).await;
    seed_user(&state, "root@example.com", "secret", true).await;
    let app = app(state);
    let ana = basic("ana@example.com", "secret");
    let bob = basic("bob@example.com", "secret");
    let root = basic("root@example.com", "secret");

    let (status, created) = send(
        &app,
        "POST",
        "/api/v1/items",
        Some(&ana),
        Some(json!({ "title": "notes", "description": "private" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let uri = format!("/api/v1/items/{}", created["id"]);

    let (status, body) = send(&app, "GET", &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(!body["message"].as_str().unwrap().contains("ana"));

    let (status, _) = send(&app, "PUT", &uri, Some(&bob), Some(json!({ "title": "mine now" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, "DELETE", &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "GET", &uri, Some(&root), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "notes");

    let (status, body) = send(&app, "PUT", &uri, Some(&ana), Some(json!({ "description": "edited" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "notes");
    assert_eq!(body["description"], "edited");

    let (_, listed) = send(&app, "GET", "/api/v1/items", Some(&bob), None).await;
    assert_eq!(listed, json!([]));
    let (_, listed) = send(&app, "GET", "/api/v1/items", Some(&root), None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "PUT", &uri, Some(&root), Some(json!({ "title": "audited" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "audited");
    assert_eq!(body["description"], "edited");
    assert_eq!(body["owner_id"], created["owner_id"]);

    let (status, body) = send(&app, "DELETE", &uri, Some(&root), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "audited");
    let (status, _) = send(&app, "GET", &uri, Some(&ana), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", &uri, Some(&ana), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, second) = send(&app, "POST", "/api/v1/items", Some(&ana), Some(json!({ "title": "draft" }))).await;
    let uri = format!("/api/v1/items/{}", second["id"]);
    let (status, body) = send(&app, "DELETE", &uri, Some(&ana), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "draft");
}

#[tokio::test]
async fn test_malformed_and_unknown_identifiers() {
    let state = state().await;
    seed_user(&state, "ana@example.com", "secret", false).await;
    let app = app(state);
    let ana = basic("ana@example.com", "secret");

    let (status, _) = send(&app, "GET", "/api/v1/items/not-a-number", Some(&ana), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, "GET", "/api/v1/items/9999", Some(&ana), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", "/api/v1/games/xyz", Some(&ana), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, "GET", "/api/v1/kv_items/bad-key!", Some(&ana), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_blank_titles_fail_validation() {
    let state = state().await;
    seed_user(&state, "ana@example.com", "secret", false).await;
    let app = app(state);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/items",
        Some(&basic("ana@example.com", "secret")),
        Some(json!({ "title": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("title"));
}

#[tokio::test]
async fn test_account_management_requires_superuser() {
    let state = state().await;
    let ana_record = seed_user(&state, "ana@example.com", "secret", false).await;
    seed_user(&state, "root@example.com", "secret", true).await;
    let app = app(state);
    let ana = basic("ana@example.com", "secret");
    let root = basic("root@example.com", "secret");

    let payload = json!({ "email": "new@example.com", "password": "pw" });
    let (status, _) = send(&app, "POST", "/api/v1/users", Some(&ana), Some(payload.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, "GET", "/api/v1/users", Some(&ana), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = send(&app, "POST", "/api/v1/users", Some(&root), Some(payload.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["is_active"], true);
    assert!(created.get("hashed_password").is_none());

    let (status, _) = send(&app, "POST", "/api/v1/users", Some(&root), Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let other = format!("/api/v1/users/{}", created["id"]);
    let (status, _) = send(&app, "GET", &other, Some(&ana), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let own = format!("/api/v1/users/{}", ana_record.id);
    let (status, body) = send(&app, "GET", &own, Some(&ana), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "ana@example.com");

    let (status, body) = send(&app, "PUT", &other, Some(&root), Some(json!({ "full_name": "Newcomer" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["full_name"], "Newcomer");
    assert_eq!(body["email"], "new@example.com");
}

#[tokio::test]
async fn test_users_update_their_own_account() {
    let state = state().await;
    seed_user(&state, "ana@example.com", "secret", false).await;
    let app = app(state);

    let (status, body) = send(
        &app,
        "PUT",
        "/api/v1/users/me",
        Some(&basic("ana@example.com", "secret")),
        Some(json!({ "full_name": "Ana", "password": "rotated" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["full_name"], "Ana");
    assert_eq!(body["is_superuser"], false);

    let (status, _) = send(&app, "GET", "/api/v1/users/me", Some(&basic("ana@example.com", "secret")), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, body) = send(&app, "GET", "/api/v1/users/me", Some(&basic("ana@example.com", "rotated")), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["full_name"], "Ana");
}

#[tokio::test]
async fn test_open_registration_follows_configuration() {
    let payload = json!({ "email": "walk-in@example.com", "password": "pw" });

    let closed = app(state().await);
    let (status, _) = send(&closed, "POST", "/api/v1/users/open", None, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let open = app(state_with(AppConfig {
        users_open_registration: true,
        ..AppConfig::default()
    })
    .await);
    let (status, body) = send(&open, "POST", "/api/v1/users/open", None, Some(payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_superuser"], false);

    let (status, _) = send(&open, "GET", "/api/v1/users/me", Some(&basic("walk-in@example.com", "pw")), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_kv_items_over_http() {
    let state = state().await;
    seed_user(&state, "ana@example.com", "secret", false).await;
    let app = app(state);
    let ana = basic("ana@example.com", "secret");

    let (status, first) = send(&app, "POST", "/api/v1/kv_items", Some(&ana), Some(json!({ "name": "alpha" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(first["timestamp"].as_f64().unwrap() > 0.0);
    send(&app, "POST", "/api/v1/kv_items", Some(&ana), Some(json!({ "name": "beta" }))).await;

    let (_, named) = send(&app, "GET", "/api/v1/kv_items?name=alpha", Some(&ana), None).await;
    assert_eq!(named.as_array().unwrap().len(), 1);
    assert_eq!(named[0]["pk"], first["pk"]);

    let uri = format!("/api/v1/kv_items/{}", first["pk"].as_str().unwrap());
    let (status, unchanged) = send(&app, "PUT", &uri, Some(&ana), Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unchanged, first);

    let (status, removed) = send(&app, "DELETE", &uri, Some(&ana), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed["name"], "alpha");
    let (status, _) = send(&app, "GET", &uri, Some(&ana), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
