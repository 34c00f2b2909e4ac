//! HTTP service that answers every request with the curl command reproducing it.
//!
//! Requests arrive in origin form (`/path?query`), so the generated URL is
//! rebuilt from the `Host` header and the configured TLS flag. Captures are
//! kept in memory and can be listed under `/__captures`.

pub mod config;

use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header::HOST, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use curlify_core::{convert_with, Body, CurlOptions, HttpRequest};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};
use uuid::Uuid;

pub use config::{ConfigError, ServerConfig};

/// One converted request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Capture {
    pub id: Uuid,
    /// Arrival order, starting at 1.
    pub seq: u64,
    pub method: String,
    pub target: String,
    pub command: String,
    pub options: CurlOptions,
}

/// Body of a 422 response when a request cannot be converted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CaptureError {
    pub error: String,
    pub kind: String,
}

#[derive(Debug, Default)]
pub struct CaptureStore {
    next_seq: u64,
    captures: HashMap<Uuid, Capture>,
}

pub type Db = Arc<RwLock<CaptureStore>>;

#[derive(Clone)]
struct AppState {
    db: Db,
    config: ServerConfig,
}

pub fn app(config: ServerConfig) -> Router {
    let state = AppState {
        db: Db::default(),
        config,
    };
    Router::new()
        .route("/__captures", get(list_captures).delete(clear_captures))
        .route("/__captures/{id}", get(get_capture))
        .fallback(capture)
        .with_state(state)
}

pub async fn run(listener: TcpListener, config: ServerConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app(config)).await
}

async fn list_captures(State(state): State<AppState>) -> Json<Vec<Capture>> {
    let store = state.db.read().await;
    let mut captures: Vec<Capture> = store.captures.values().cloned().collect();
    captures.sort_by_key(|c| c.seq);
    Json(captures)
}

async fn get_capture(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Capture>, StatusCode> {
    let store = state.db.read().await;
    store.captures.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn clear_captures(State(state): State<AppState>) -> StatusCode {
    state.db.write().await.captures.clear();
    StatusCode::NO_CONTENT
}

async fn capture(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut request = to_http_request(&method, &uri, &headers, body, state.config.tls);
    let target = request.url.to_string();

    let command = match convert_with(&mut request, state.config.options) {
        Ok(command) => command,
        Err(err) => {
            warn!(%method, uri = %target, error = %err, "request could not be converted");
            let body = CaptureError {
                error: err.detail(),
                kind: err.kind().as_str().to_string(),
            };
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
        }
    };

    let mut store = state.db.write().await;
    store.next_seq += 1;
    let capture = Capture {
        id: Uuid::new_v4(),
        seq: store.next_seq,
        method: method.to_string(),
        target,
        command: command.into_string(),
        options: state.config.options,
    };
    store.captures.insert(capture.id, capture.clone());
    info!(id = %capture.id, seq = capture.seq, method = %capture.method, uri = %capture.target, "captured request");

    (StatusCode::CREATED, Json(capture)).into_response()
}

/// Map an incoming request onto the converter's plain-data request.
///
/// The `Host` header becomes the URL host and is not repeated as a header.
/// Absolute-form targets (proxy requests) keep their own scheme and host.
pub fn to_http_request(method: &Method, uri: &Uri, headers: &HeaderMap, body: Bytes, tls: bool) -> HttpRequest {
    let target = if uri.scheme().is_some() {
        uri.to_string()
    } else {
        uri.path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string())
    };

    let mut request = HttpRequest::new(method.as_str(), &target).with_tls(tls);
    if !request.url.has_scheme() {
        request.url.host = headers
            .get(HOST)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .unwrap_or_default();
    }

    for (name, value) in headers {
        if *name == HOST {
            continue;
        }
        request
            .headers
            .append(name.as_str(), &String::from_utf8_lossy(value.as_bytes()));
    }

    request.body = Some(Body::from_bytes(body.to_vec()));
    request
}
