use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use blog_api::{
    AppState,
    config::Config,
    models::article::{Article, ArticlePatch, NewArticle},
    services::auth_gate::AuthGate,
    store::{ArticleStore, MemoryArticleStore, StoreError},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

/// Default admin password when ADMIN_PASSWORD is unset
const DEFAULT_PASSWORD: &str = "admin123";

fn spawn_app() -> Router {
    spawn_app_with_store(Arc::new(MemoryArticleStore::new()))
}

fn spawn_app_with_store(store: Arc<dyn ArticleStore>) -> Router {
    let gate = AuthGate::new(&Config::default());
    blog_api::router(AppState::new(store, gate))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };

    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

/// Like `send`, but with a raw `Authorization` header value.
async fn send_with_authorization(
    app: &Router,
    method: &str,
    uri: &str,
    authorization: &str,
) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, authorization)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

async fn login(app: &Router) -> String {
    let response = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "password": DEFAULT_PASSWORD })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], json!(true));
    body["token"].as_str().unwrap().to_string()
}

async fn create(app: &Router, token: &str, title: &str, content: &str) -> Value {
    let response = send(
        app,
        "POST",
        "/api/articles",
        Some(token),
        Some(json!({ "title": title, "content": content })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await
}

#[tokio::test]
async fn test_login_then_create_article() {
    let app = spawn_app();
    let token = login(&app).await;

    let article = create(&app, &token, "T", "C").await;

    assert_eq!(article["title"], "T");
    assert_eq!(article["content"], "C");
    assert!(!article["id"].as_str().unwrap().is_empty());
    assert!(article["createdAt"].is_string());
    assert_eq!(article["createdAt"], article["updatedAt"]);

    let id = article["id"].as_str().unwrap();
    let response = send(&app, "GET", &format!("/api/articles/{id}"), None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, article);
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = spawn_app();

    let response = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "password": "nope" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(response).await,
        json!({ "success": false, "error": "Invalid password" })
    );

    let response = send(&app, "POST", "/api/auth/login", None, Some(json!({}))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_require_a_valid_token() {
    let app = spawn_app();
    let body = json!({ "title": "T", "content": "C" });

    let response = send(&app, "POST", "/api/articles", None, Some(body.clone())).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "Access token required" })
    );

    let response = send(&app, "POST", "/api/articles", Some("garbage"), Some(body)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(response).await, json!({ "error": "Invalid token" }));

    let response = send(&app, "GET", "/api/auth/check", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, "GET", "/api/articles", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!([]));
}

#[tokio::test]
async fn test_auth_check() {
    let app = spawn_app();
    let token = login(&app).await;

    let response = send(&app, "GET", "/api/auth/check", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "authenticated": true }));

    let expired = AuthGate::new(&Config::default())
        .issue_at(chrono::Utc::now() - chrono::Duration::hours(25))
        .unwrap();
    let response = send(&app, "GET", "/api/auth/check", Some(&expired), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_tampered_token_is_forbidden() {
    let app = spawn_app();
    let token = login(&app).await;

    let (unsigned, signature) = token.rsplit_once('.').unwrap();
    let replacement = if signature.starts_with('A') { 'B' } else { 'A' };
    let tampered = format!("{unsigned}.{replacement}{}", &signature[1..]);

    let response = send(&app, "GET", "/api/auth/check", Some(&tampered), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let app = spawn_app();
    let token = login(&app).await;

    let first = create(&app, &token, "first", "1").await;
    let second = create(&app, &token, "second", "2").await;
    let third = create(&app, &token, "third", "3").await;

    let response = send(&app, "GET", "/api/articles", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let listed = json_body(response).await;
    let ids: Vec<&Value> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|a| &a["id"])
        .collect();
    assert_eq!(ids, vec![&third["id"], &second["id"], &first["id"]]);
}

#[tokio::test]
async fn test_create_rejects_missing_or_empty_fields() {
    let app = spawn_app();
    let token = login(&app).await;

    for body in [
        json!({ "title": "", "content": "C" }),
        json!({ "title": "T", "content": "" }),
        json!({ "title": "T" }),
        json!({}),
    ] {
        let response = send(&app, "POST", "/api/articles", Some(&token), Some(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Error creating article" })
        );
    }

    let request = Request::builder()
        .method("POST")
        .uri("/api/articles")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, "GET", "/api/articles", None, None).await;
    assert_eq!(json_body(response).await, json!([]));
}

#[tokio::test]
async fn test_update_applies_supplied_fields_only() {
    let app = spawn_app();
    let token = login(&app).await;
    let article = create(&app, &token, "T", "C").await;
    let uri = format!("/api/articles/{}", article["id"].as_str().unwrap());

    let response = send(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({ "title": "T2" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = json_body(response).await;
    assert_eq!(updated["id"], article["id"]);
    assert_eq!(updated["title"], "T2");
    assert_eq!(updated["content"], "C");
    assert_eq!(updated["createdAt"], article["createdAt"]);

    let response = send(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({ "content": "" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "Error updating article" })
    );

    let response = send(&app, "GET", &uri, None, None).await;
    let current = json_body(response).await;
    assert_eq!(current["title"], "T2");
    assert_eq!(current["content"], "C");
}

#[tokio::test]
async fn test_update_missing_or_malformed_id() {
    let app = spawn_app();
    let token = login(&app).await;
    let body = json!({ "title": "T" });

    let missing = format!("/api/articles/{}", Uuid::new_v4());
    let response = send(&app, "PUT", &missing, Some(&token), Some(body.clone())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "Article not found" })
    );

    let response = send(&app, "PUT", "/api/articles/xyz", Some(&token), Some(body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let app = spawn_app();
    let token = login(&app).await;
    let article = create(&app, &token, "T", "C").await;
    let uri = format!("/api/articles/{}", article["id"].as_str().unwrap());

    let response = send(&app, "DELETE", &uri, None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "message": "Article deleted successfully" })
    );

    let response = send(&app, "GET", &uri, None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_id_on_read_is_a_storage_error() {
    let app = spawn_app();

    let response = send(&app, "GET", "/api/articles/not-an-id", None, None).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "Error fetching article" })
    );
}

/// Store whose every operation fails as if the database were unreachable.
struct UnreachableStore;

#[async_trait]
impl ArticleStore for UnreachableStore {
    async fn list(&self) -> Result<Vec<Article>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn find(&self, _id: Uuid) -> Result<Option<Article>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn insert(&self, _article: NewArticle) -> Result<Article, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn update(
        &self,
        _id: Uuid,
        _patch: ArticlePatch,
    ) -> Result<Option<Article>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn delete(&self, _id: Uuid) -> Result<Option<Article>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }
}

#[tokio::test]
async fn test_store_failures_hide_details() {
    let app = spawn_app_with_store(Arc::new(UnreachableStore));

    let response = send(&app, "GET", "/api/articles", None, None).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "Error fetching articles" })
    );

    let response = send(&app, "GET", "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // Login never touches the store
    let token = login(&app).await;
    let response = send(
        &app,
        "POST",
        "/api/articles",
        Some(&token),
        Some(json!({ "title": "T", "content": "C" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "Error creating article" })
    );
}

#[tokio::test]
async fn test_health() {
    let app = spawn_app();

    let response = send(&app, "GET", "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_update_with_null_fields_is_rejected() {
    let app = spawn_app();
    let token = login(&app).await;
    let article = create(&app, &token, "T", "C").await;
    let uri = format!("/api/articles/{}", article["id"].as_str().unwrap());

    for body in [json!({ "title": null }), json!({ "content": null })] {
        let response = send(&app, "PUT", &uri, Some(&token), Some(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Error updating article" })
        );
    }

    let response = send(&app, "GET", &uri, None, None).await;
    assert_eq!(json_body(response).await, article);
}

#[tokio::test]
async fn test_update_with_empty_title_is_rejected() {
    let app = spawn_app();
    let token = login(&app).await;
    let article = create(&app, &token, "T", "C").await;
    let uri = format!("/api/articles/{}", article["id"].as_str().unwrap());

    let response = send(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({ "title": "", "content": "C2" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, "GET", &uri, None, None).await;
    assert_eq!(json_body(response).await, article);
}

#[tokio::test]
async fn test_login_with_unusable_body_is_an_invalid_password() {
    let app = spawn_app();
    let expected = json!({ "success": false, "error": "Invalid password" });

    let form = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("password={DEFAULT_PASSWORD}")))
        .unwrap();
    let response = app.clone().oneshot(form).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await, expected);

    let response = send(&app, "POST", "/api/auth/login", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await, expected);

    for body in [json!({ "password": 123 }), json!({ "password": null }), json!([])] {
        let response = send(&app, "POST", "/api/auth/login", None, Some(body)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await, expected);
    }
}

#[tokio::test]
async fn test_authorization_header_without_token_segment() {
    let app = spawn_app();

    for header_value in ["Bearer", "Bearer "] {
        let response =
            send_with_authorization(&app, "GET", "/api/auth/check", header_value).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Access token required" })
        );
    }

    let response =
        send_with_authorization(&app, "GET", "/api/auth/check", "Basic dXNlcjpwYXNz").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(response).await, json!({ "error": "Invalid token" }));
}

#[tokio::test]
async fn test_unsupported_method_is_not_an_auth_failure() {
    let app = spawn_app();

    let response = send(&app, "PATCH", "/api/articles/abc", None, None).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = send(&app, "PATCH", "/api/articles", None, None).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    // Methods that are served still pass through the guard
    let response = send(&app, "PUT", "/api/articles/abc", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
