//! HTTP surface: the block of the day page, its JSON endpoint, and static files.
//!
//! # Routes
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | GET | `{base}/` | HTML page for today's block |
//! | GET | `{base}/api` | `{"name": ..., "image": ...}` |
//! | GET | `{base}/*` | files from the static directory |
//!
//! Errors are reported as JSON `{"error": ...}`. Classified [`BlockError`]s
//! keep their status code and message; anything else becomes a 500 with a
//! generic message so internals do not leak.

use crate::cache::{BlockCache, Clock};
use crate::errors::BlockError;
use crate::models::Block;
use crate::outputs::html::render_index;
use crate::scrapers::BlockSource;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::{error, info};

/// Body message for errors that carry no status of their own.
pub const GENERIC_ERROR_MESSAGE: &str = "Unknown internal Server Error";

/// Shared state handed to every handler.
pub struct AppState<S, C> {
    cache: Arc<BlockCache<S, C>>,
    base_path: Arc<str>,
}

impl<S, C> Clone for AppState<S, C> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            base_path: Arc::clone(&self.base_path),
        }
    }
}

/// Error wrapper mapping [`BlockError`] onto HTTP responses.
#[derive(Debug)]
pub struct ApiError(BlockError);

impl From<BlockError> for ApiError {
    fn from(e: BlockError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        match err.code().and_then(|code| StatusCode::from_u16(code).ok()) {
            Some(status) => {
                error!(code = status.as_u16(), error = %err, "Request error");
                (status, Json(json!({ "error": err.to_string() }))).into_response()
            }
            None => {
                error!(error = %err, "Unclassified error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": GENERIC_ERROR_MESSAGE })),
                )
                    .into_response()
            }
        }
    }
}

/// Build the application router.
///
/// `base_path` must already be normalised (empty, or `/segment` without a
/// trailing slash). When non-empty every route is mounted under it.
pub fn router<S, C>(cache: Arc<BlockCache<S, C>>, static_dir: &Path, base_path: &str) -> Router
where
    S: BlockSource + 'static,
    C: Clock + 'static,
{
    let state = AppState {
        cache,
        base_path: Arc::from(base_path),
    };

    let routes = Router::new()
        .route("/", get(index::<S, C>))
        .route("/api", get(api::<S, C>))
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state.clone());

    if base_path.is_empty() {
        return routes;
    }

    // `nest` only matches `{base}` itself; proxies usually forward `{base}/`.
    Router::new()
        .route(&format!("{base_path}/"), get(index::<S, C>))
        .with_state(state)
        .nest(base_path, routes)
}

/// Serve `app` on `listener` until the server stops.
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!(address = %addr, "Server running");
    axum::serve(listener, app).await
}

async fn index<S, C>(State(state): State<AppState<S, C>>) -> Result<Html<String>, ApiError>
where
    S: BlockSource + 'static,
    C: Clock + 'static,
{
    let block = state.cache.todays_block().await?;
    Ok(Html(render_index(&block, &state.base_path)))
}

async fn api<S, C>(State(state): State<AppState<S, C>>) -> Result<Json<Block>, ApiError>
where
    S: BlockSource + 'static,
    C: Clock + 'static,
{
    Ok(Json(state.cache.todays_block().await?))
}
