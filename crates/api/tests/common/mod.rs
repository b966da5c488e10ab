//! Shared helpers for HTTP-level integration tests.
//!
//! Requests go straight into the router via `tower::ServiceExt::oneshot`;
//! no TCP listener is involved.
#![allow(dead_code)]

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use atelier_api::auth::jwt::{issue_token, JwtConfig};
use atelier_api::auth::{ROLE_ADMIN, ROLE_ARTIST};
use atelier_api::config::{ProcessingConfig, ServerConfig, StorageBackend, StorageConfig};
use atelier_api::router::build_app_router;
use atelier_api::state::AppState;
use atelier_cloud::{LocalObjectStore, NoopProcessingTrigger, ProcessingTrigger};
use atelier_core::language::LanguageCode;
use atelier_core::types::DbId;
use atelier_db::models::artist::CreateArtist;
use atelier_db::repositories::ArtistRepo;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use image::{DynamicImage, ImageFormat};
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";
pub const MULTIPART_BOUNDARY: &str = "atelier-test-boundary";

/// Build a test `ServerConfig` with safe defaults and a throwaway
/// storage directory.
pub fn test_config() -> ServerConfig {
    let root: PathBuf = std::env::temp_dir().join(format!("atelier-test-{}", uuid::Uuid::new_v4()));
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        default_language: LanguageCode::default(),
        max_upload_bytes: 1024 * 1024,
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            leeway_secs: 60,
        },
        storage: StorageConfig {
            backend: StorageBackend::Local { root },
            public_base_url: "/media".to_string(),
        },
        processing: ProcessingConfig {
            webhook_url: None,
            timeout_secs: 1,
        },
    }
}

/// The full application router with a no-op processing trigger.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, Arc::new(NoopProcessingTrigger))
}

/// The full application router with a caller-supplied processing trigger.
pub fn build_test_app_with(pool: PgPool, trigger: Arc<dyn ProcessingTrigger>) -> Router {
    let config = test_config();
    let root = match &config.storage.backend {
        StorageBackend::Local { root } => root.clone(),
        StorageBackend::S3(_) => unreachable!("tests use local storage"),
    };
    let store = Arc::new(LocalObjectStore::new(root, config.storage.public_base_url.clone()));
    build_app_router(AppState::new(pool, config, store, trigger))
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

pub fn token(subject: &str, role: &str) -> String {
    let config = JwtConfig {
        secret: TEST_SECRET.to_string(),
        leeway_secs: 60,
    };
    issue_token(subject, role, 3600, &config).expect("token")
}

pub fn artist_token(subject: &str) -> String {
    token(subject, ROLE_ARTIST)
}

pub fn admin_token() -> String {
    token("kc-admin", ROLE_ADMIN)
}

/// Register an artist whose token subject is `external_id`.
pub async fn seed_artist(pool: &PgPool, external_id: &str) -> DbId {
    ArtistRepo::create(
        pool,
        &CreateArtist {
            external_id: external_id.to_string(),
            username: external_id.to_string(),
            email: format!("{external_id}@example.com"),
            default_language: None,
        },
    )
    .await
    .expect("seed artist")
    .id
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("JSON body")
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(
        app,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        Request::builder()
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

async fn json_auth(
    app: Router,
    method: &str,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    json_auth(app, "POST", uri, token, body).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    json_auth(app, "PUT", uri, token, body).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

/// POST a multipart print: a JSON `data` part and an optional image part
/// given as `(content_type, bytes)`.
pub async fn post_print_multipart(
    app: Router,
    token: &str,
    data: serde_json::Value,
    image: Option<(&str, Vec<u8>)>,
) -> Response<Body> {
    let mut body: Vec<u8> = Vec::new();
    body.extend_from_slice(
        format!(
            "--{MULTIPART_BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"data\"\r\n\
             Content-Type: application/json\r\n\r\n\
             {data}\r\n"
        )
        .as_bytes(),
    );
    if let Some((content_type, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"image\"; filename=\"print\"\r\n\
                 Content-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(&bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    send(
        app,
        Request::builder()
            .method("POST")
            .uri("/api/v1/artist/prints")
            .header("authorization", format!("Bearer {token}"))
            .header(
                "content-type",
                format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap(),
    )
    .await
}

/// A small valid PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::new_rgb8(width, height)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("encode png");
    bytes
}

/// Create a gallery through the API and return its id.
pub async fn create_gallery(app: Router, token: &str, title: &str) -> DbId {
    let response = post_json_auth(
        app,
        "/api/v1/artist/galleries",
        token,
        serde_json::json!({ "title": title }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"]
        .as_i64()
        .expect("gallery id")
}

/// Create an image-less print through the API and return its id.
pub async fn create_print(app: Router, token: &str, title: &str) -> DbId {
    let response = post_print_multipart(app, token, serde_json::json!({ "title": title }), None).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"]
        .as_i64()
        .expect("print id")
}

/// Print ids of a gallery in order, as the artist sees them.
pub async fn gallery_order(pool: &PgPool, token: &str, gallery_id: DbId) -> Vec<DbId> {
    let response = get_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/artist/galleries/{gallery_id}/prints?limit=100"),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let items = json["data"]["items"].as_array().expect("items").clone();
    for (index, item) in items.iter().enumerate() {
        assert_eq!(item["order"].as_i64(), Some(index as i64 + 1), "dense order");
    }
    items.iter().map(|i| i["id"].as_i64().unwrap()).collect()
}
