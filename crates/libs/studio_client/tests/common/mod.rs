#![allow(dead_code)]

use app_state::{ApiSettings, StorageSettings, UploadSettings};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use studio_client::{Gateway, MemoryNotifier, MemorySessionStore, SessionStore, SessionTokens};
use tokio::net::TcpListener;
use url::Url;

pub const EMAIL: &str = "admin@studio.lk";
pub const PASSWORD: &str = "correct-horse";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePut {
    pub name: String,
    pub acl: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub size: usize,
}

/// Everything the fake backend saw, plus knobs to make it misbehave.
#[derive(Default)]
pub struct Recorded {
    pub access_token: Mutex<String>,
    pub refresh_calls: AtomicUsize,
    pub refresh_delay_ms: AtomicUsize,
    pub revoke_refresh: AtomicBool,
    pub auth_headers: Mutex<Vec<Option<String>>>,
    pub albums_created: Mutex<Vec<Value>>,
    pub existing_album: Mutex<Option<Value>>,
    pub presign_calls: Mutex<Vec<Vec<String>>>,
    pub images_saved: Mutex<Vec<Value>>,
    pub cover_patches: Mutex<Vec<(i64, Value)>>,
    pub storage_puts: Mutex<Vec<StoragePut>>,
    pub fail_put: Mutex<Option<String>>,
    pub fail_save: Mutex<Option<String>>,
    pub fail_cover: AtomicBool,
    /// Authorization header seen by login and refresh, per endpoint.
    pub auth_endpoint_headers: Mutex<Vec<(&'static str, Option<String>)>>,
}

impl Recorded {
    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn auth_headers(&self) -> Vec<Option<String>> {
        self.auth_headers.lock().unwrap().clone()
    }

    pub fn auth_endpoint_headers(&self) -> Vec<(&'static str, Option<String>)> {
        self.auth_endpoint_headers.lock().unwrap().clone()
    }

    pub fn set_access_token(&self, token: &str) {
        *self.access_token.lock().unwrap() = token.to_owned();
    }
}

pub struct TestBackend {
    pub base_url: Url,
    pub origin: String,
    pub recorded: Arc<Recorded>,
}

#[derive(Clone)]
struct AppState {
    origin: String,
    recorded: Arc<Recorded>,
}

fn envelope(data: Value) -> Json<Value> {
    Json(json!({ "success": true, "message": "", "data": data }))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Token expired" })),
    )
        .into_response()
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// Records the authorization header and checks it against the live token.
fn authorize(state: &AppState, headers: &HeaderMap) -> bool {
    let header = bearer(headers);
    state.recorded.auth_headers.lock().unwrap().push(header.clone());
    let expected = format!("Bearer {}", state.recorded.access_token.lock().unwrap());
    header.as_deref() == Some(expected.as_str())
}

async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state
        .recorded
        .auth_endpoint_headers
        .lock()
        .unwrap()
        .push(("login", bearer(&headers)));
    if body["email"] == EMAIL && body["password"] == PASSWORD {
        Json(json!({
            "success": true,
            "message": "Login successful",
            "data": {
                "access_token": "access-0",
                "refresh_token": "refresh-0",
                "user": { "id": 1, "name": "Studio Admin", "email": EMAIL, "role": "admin" }
            }
        }))
        .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid email or password" })),
        )
            .into_response()
    }
}

async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state
        .recorded
        .auth_endpoint_headers
        .lock()
        .unwrap()
        .push(("refresh", bearer(&headers)));
    let call = state.recorded.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;
    let delay = state.recorded.refresh_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay as u64)).await;
    }
    if state.recorded.revoke_refresh.load(Ordering::SeqCst) || body["refresh_token"].is_null() {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Refresh token revoked" })),
        )
            .into_response();
    }
    let token = format!("access-{call}");
    state.recorded.set_access_token(&token);
    envelope(json!({ "access_token": token })).into_response()
}

async fn logout() -> Json<Value> {
    envelope(Value::Null)
}

async fn packages(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if !authorize(&state, &headers) {
        return unauthorized();
    }
    envelope(json!([
        { "id": 1, "name": "Wedding Gold", "description": null, "price": 150000.0, "duration_hours": 8, "is_active": true },
        { "id": 2, "name": "Portrait", "description": "Studio session", "price": 20000.0, "duration_hours": 1, "is_active": false }
    ]))
    .into_response()
}

async fn locked(State(state): State<AppState>, headers: HeaderMap) -> Response {
    authorize(&state, &headers);
    unauthorized()
}

async fn unavailable(State(state): State<AppState>, headers: HeaderMap) -> Response {
    authorize(&state, &headers);
    Json(json!({ "success": false, "message": "Selected date is fully booked" })).into_response()
}

async fn malformed() -> Json<Value> {
    envelope(json!({ "unexpected": "shape" }))
}

async fn event_album(State(state): State<AppState>, Path(event_id): Path<i64>) -> Response {
    match state.recorded.existing_album.lock().unwrap().clone() {
        Some(album) if album["event_id"] == event_id => envelope(album).into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Album not found" })),
        )
            .into_response(),
    }
}

async fn create_album(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorize(&state, &headers) {
        return unauthorized();
    }
    let mut created = state.recorded.albums_created.lock().unwrap();
    created.push(body.clone());
    let id = 40 + created.len() as i64;
    Json(json!({
        "success": true,
        "message": "Album created",
        "data": { "id": id, "name": body["name"], "event_id": body["event_id"], "cover_photo": null }
    }))
    .into_response()
}

async fn update_album(
    State(state): State<AppState>,
    Path(album_id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if state.recorded.fail_cover.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Could not update album" })),
        )
            .into_response();
    }
    state
        .recorded
        .cover_patches
        .lock()
        .unwrap()
        .push((album_id, body.clone()));
    envelope(json!({ "id": album_id, "name": "album", "event_id": null, "cover_photo": body["cover_photo"] }))
        .into_response()
}

async fn presign(State(state): State<AppState>, Json(names): Json<Vec<String>>) -> Response {
    state.recorded.presign_calls.lock().unwrap().push(names.clone());
    let slots: Vec<Value> = names
        .iter()
        .map(|name| {
            json!({
                "objectKey": format!("uploads/{name}"),
                "presignedUrl": format!("{}/storage/bucket/{name}", state.origin),
                "viewUrl": format!("{}/storage/view/{name}", state.origin),
            })
        })
        .collect();
    envelope(Value::Array(slots)).into_response()
}

async fn save_image(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let failing = state.recorded.fail_save.lock().unwrap().clone();
    if failing.is_some_and(|key| body["image_id"] == key.as_str()) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "message": "Image metadata rejected" })),
        )
            .into_response();
    }
    let mut saved = state.recorded.images_saved.lock().unwrap();
    saved.push(body.clone());
    envelope(json!({
        "id": saved.len(),
        "image_id": body["image_id"],
        "path": body["path"],
        "album_id": body["album_id"],
        "order": body["order"],
    }))
    .into_response()
}

async fn storage_put(
    State(state): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let header = |key: &str| {
        headers
            .get(key)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    };
    if state.recorded.fail_put.lock().unwrap().as_deref() == Some(name.as_str()) {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    state.recorded.storage_puts.lock().unwrap().push(StoragePut {
        name,
        acl: header("x-amz-acl"),
        authorization: header("authorization"),
        content_type: header("content-type"),
        size: body.len(),
    });
    StatusCode::OK
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "studio_client=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

/// Starts the fake studio backend on an ephemeral port.
pub async fn spawn_backend() -> TestBackend {
    init_tracing();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let origin = format!("http://{}", listener.local_addr().unwrap());
    let recorded = Arc::new(Recorded::default());
    recorded.set_access_token("access-0");

    let state = AppState {
        origin: origin.clone(),
        recorded: recorded.clone(),
    };
    let app = Router::new()
        .route("/api/users/login", post(login))
        .route("/api/users/refresh", post(refresh))
        .route("/api/users/logout", post(logout))
        .route("/api/packages", get(packages))
        .route("/api/dashboard/stats", get(locked))
        .route("/api/reservations", post(unavailable))
        .route("/api/malformed", get(malformed))
        .route("/api/events/{event_id}/album", get(event_album))
        .route("/api/albums", post(create_album))
        .route("/api/albums/{album_id}", patch(update_album))
        .route("/api/upload/batch", post(presign))
        .route("/api/images", post(save_image))
        .route("/storage/bucket/{name}", put(storage_put))
        .with_state(state);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestBackend {
        base_url: Url::parse(&format!("{origin}/api/")).unwrap(),
        origin,
        recorded,
    }
}

pub fn api_settings(backend: &TestBackend) -> ApiSettings {
    ApiSettings {
        base_url: backend.base_url.clone(),
        connect_timeout: Duration::from_secs(2),
        timeout: Duration::from_secs(10),
        max_auth_retries: 1,
    }
}

pub fn storage_settings() -> StorageSettings {
    StorageSettings {
        exempt_hosts: vec!["amazonaws.com".to_owned()],
        acl: "public-read".to_owned(),
    }
}

pub fn upload_settings() -> UploadSettings {
    UploadSettings {
        jpeg_quality: 90,
        canonical_extension: "jpg".to_owned(),
        chunk_size: 1024,
    }
}

pub struct TestClient {
    pub gateway: Gateway,
    pub session: Arc<MemorySessionStore>,
    pub notifier: Arc<MemoryNotifier>,
}

/// A gateway wired to the fake backend, optionally already logged in.
pub fn client(backend: &TestBackend, tokens: Option<(&str, &str)>) -> TestClient {
    let session = Arc::new(MemorySessionStore::new());
    if let Some((access, refresh)) = tokens {
        session
            .set(SessionTokens {
                access_token: access.to_owned(),
                refresh_token: refresh.to_owned(),
            })
            .unwrap();
    }
    let notifier = Arc::new(MemoryNotifier::new());
    let gateway = Gateway::from_settings(&api_settings(backend), &storage_settings())
        .session(session.clone())
        .notifier(notifier.clone())
        .build()
        .unwrap();
    TestClient {
        gateway,
        session,
        notifier,
    }
}
