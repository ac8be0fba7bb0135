use std::path::Path;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Path as AxumPath, State};
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use content::{Collection, ContentError, ContentStore, Record};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::backend::Backend;
use crate::session::Sessions;

const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<Backend>,
    pub sessions: Arc<Sessions>,
}

impl AppState {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend: Arc::new(backend),
            sessions: Arc::new(Sessions::default()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("sign-in required")]
    Unauthorized,
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Content(#[from] ContentError),
}

fn api_error(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message.into() })))
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Content(err) => match err {
                ContentError::NotFound { .. } => StatusCode::NOT_FOUND,
                ContentError::UnknownCollection(_)
                | ContentError::Decode(_)
                | ContentError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
                ContentError::Unauthorized => StatusCode::UNAUTHORIZED,
                ContentError::Backend { .. } | ContentError::Transport(_) => {
                    StatusCode::BAD_GATEWAY
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(error = %self, "upstream failure");
        }
        api_error(status, self.to_string()).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

type MaybeBearer = Option<TypedHeader<Authorization<Bearer>>>;

fn require_session(state: &AppState, auth: &MaybeBearer) -> ApiResult<()> {
    match auth {
        Some(TypedHeader(Authorization(bearer))) if state.sessions.is_valid(bearer.token()) => {
            Ok(())
        }
        _ => Err(ApiError::Unauthorized),
    }
}

fn collection(raw: &str) -> ApiResult<Collection> {
    raw.parse::<Collection>().map_err(ApiError::from)
}

/// The public view counter may only touch `views` on a post.
pub fn is_view_bump(collection: Collection, patch: &Record) -> bool {
    collection == Collection::BlogPosts
        && patch.len() == 1
        && patch.get("views").is_some_and(Value::is_u64)
}

pub fn router(state: AppState, site_root: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]);

    let site = ServeDir::new(site_root).fallback(ServeFile::new(site_root.join("index.html")));

    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/session", post(sign_in).delete(sign_out))
        .route(
            "/api/content/:collection",
            get(list_records).post(insert_record),
        )
        .route(
            "/api/content/:collection/:id",
            patch(update_record).delete(delete_record),
        )
        .route(
            "/api/blobs/*path",
            put(upload_blob)
                .get(get_blob)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .fallback_service(site)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub password: String,
}

async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> ApiResult<Json<Value>> {
    if !state.backend.sign_in(&req.password).await? {
        warn!("admin sign-in rejected");
        return Err(ApiError::Unauthorized);
    }
    let token = state.sessions.issue();
    info!("admin signed in");
    Ok(Json(json!({ "token": token.to_string() })))
}

async fn sign_out(State(state): State<AppState>, auth: MaybeBearer) -> ApiResult<StatusCode> {
    if let Some(TypedHeader(Authorization(bearer))) = &auth {
        if let Ok(token) = uuid::Uuid::parse_str(bearer.token()) {
            state.sessions.revoke(&token);
        }
    }
    state.backend.sign_out().await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_records(
    State(state): State<AppState>,
    AxumPath(raw): AxumPath<String>,
) -> ApiResult<Json<Vec<Record>>> {
    let collection = collection(&raw)?;
    Ok(Json(state.backend.list(collection).await?))
}

async fn insert_record(
    State(state): State<AppState>,
    AxumPath(raw): AxumPath<String>,
    auth: MaybeBearer,
    Json(record): Json<Record>,
) -> ApiResult<(StatusCode, Json<Record>)> {
    require_session(&state, &auth)?;
    let collection = collection(&raw)?;
    let stored = state.backend.insert(collection, record).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

async fn update_record(
    State(state): State<AppState>,
    AxumPath((raw, id)): AxumPath<(String, String)>,
    auth: MaybeBearer,
    Json(patch): Json<Record>,
) -> ApiResult<Json<Record>> {
    let collection = collection(&raw)?;
    if !is_view_bump(collection, &patch) {
        require_session(&state, &auth)?;
    }
    Ok(Json(state.backend.update(collection, &id, patch).await?))
}

async fn delete_record(
    State(state): State<AppState>,
    AxumPath((raw, id)): AxumPath<(String, String)>,
    auth: MaybeBearer,
) -> ApiResult<StatusCode> {
    require_session(&state, &auth)?;
    let collection = collection(&raw)?;
    state.backend.delete(collection, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn upload_blob(
    State(state): State<AppState>,
    AxumPath(path): AxumPath<String>,
    auth: MaybeBearer,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    require_session(&state, &auth)?;
    let mime = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    if body.is_empty() {
        return Err(ApiError::BadRequest("empty upload".to_string()));
    }
    let url = state.backend.upload_blob(&path, body.to_vec(), &mime).await?;
    Ok(Json(json!({ "url": url })))
}

async fn get_blob(State(state): State<AppState>, AxumPath(path): AxumPath<String>) -> Response {
    let Some(blob) = state.backend.blob(&path) else {
        return api_error(StatusCode::NOT_FOUND, "blob not found").into_response();
    };
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&blob.mime)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );
    (StatusCode::OK, headers, blob.bytes).into_response()
}
