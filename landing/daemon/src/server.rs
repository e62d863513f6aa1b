//! Daemon Server Implementation
//!
//! HTTP front of the landing page:
//! - `POST /api/waitlist` validates and stores a `{name, email}` submission
//! - every other path is served from the built landing page directory, with
//!   unknown paths falling back to `index.html`
//! - CORS is open to any origin so a separately hosted page can post
//! - shutdown is driven by a [`CancellationToken`] and drains open requests
//!
//! ```text
//!        Browser / landing-tui
//!                 │
//!          ┌──────┴───────┐
//!          │  CorsLayer   │
//!          └──────┬───────┘
//!        ┌────────┴─────────┐
//!  /api/waitlist        everything else
//!        │                  │
//!  WaitlistService      ServeDir ──(miss)──> index.html
//!        │
//!  WaitlistStore
//! ```

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use landing_core::{open_store, LandingConfig, Submission, WaitlistError, WaitlistService};

/// Route accepting waitlist submissions
pub const WAITLIST_ROUTE: &str = "/api/waitlist";

const SUCCESS_MESSAGE: &str = "Successfully added to waitlist";
const SERVER_ERROR_MESSAGE: &str = "Server error";
const BAD_BODY_MESSAGE: &str = "Invalid request body";

/// Shared handler state
#[derive(Clone, Debug)]
struct AppState {
    service: WaitlistService,
}

/// JSON body of every API response
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Whether the submission was stored
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
}

impl ApiResponse {
    fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Errors a handler can answer with
#[derive(Debug, Error)]
enum ApiError {
    /// Body missing, not JSON, or the wrong content type
    #[error("invalid request body: {0}")]
    Body(#[from] JsonRejection),

    /// Validation or storage failure
    #[error(transparent)]
    Waitlist(#[from] WaitlistError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Body(rejection) => {
                warn!(error = %rejection, "Rejected malformed waitlist request");
                (StatusCode::BAD_REQUEST, ApiResponse::failed(BAD_BODY_MESSAGE))
            }
            Self::Waitlist(e) if e.is_client_error() => {
                (StatusCode::BAD_REQUEST, ApiResponse::failed(e.to_string()))
            }
            Self::Waitlist(e) => {
                error!(error = %e, "Failed to save waitlist entry");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::failed(SERVER_ERROR_MESSAGE),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

async fn join_waitlist(
    State(state): State<AppState>,
    payload: Result<Json<Submission>, JsonRejection>,
) -> Result<Json<ApiResponse>, ApiError> {
    let Json(submission) = payload?;
    state.service.join(&submission).await?;
    Ok(Json(ApiResponse::ok(SUCCESS_MESSAGE)))
}

/// Build the application router
///
/// `static_dir` need not exist; without it only the API answers.
pub fn build_router(service: WaitlistService, static_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let static_files =
        ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route(WAITLIST_ROUTE, post(join_waitlist))
        .fallback_service(static_files)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { service })
}

/// Serve `router` on `listener` until `cancel` fires
///
/// # Errors
///
/// Returns an error if the server fails while accepting connections.
pub async fn serve(listener: TcpListener, router: Router, cancel: CancellationToken) -> Result<()> {
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
            info!("Shutdown requested, draining connections");
        })
        .await
        .context("HTTP server failed")?;

    info!("Shutdown complete");
    Ok(())
}

/// Open the configured store, bind, and serve until `cancel` fires
///
/// # Errors
///
/// Returns an error if the store cannot be opened, the address cannot be
/// bound, or the server fails.
pub async fn run(config: &LandingConfig, cancel: CancellationToken) -> Result<()> {
    let store = open_store(&config.storage)
        .await
        .context("Failed to open waitlist store")?;
    let service = WaitlistService::new(store);

    let addr: SocketAddr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}. Is another server running?"))?;

    let static_dir = &config.server.static_dir;
    if !static_dir.is_dir() {
        warn!(path = ?static_dir, "Static directory not found; only the API will respond");
    }

    info!(
        addr = %listener.local_addr()?,
        static_dir = ?static_dir,
        store = service.store_name(),
        "Listening for requests"
    );

    serve(listener, build_router(service, static_dir), cancel).await
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use landing_core::store::{MemoryStore, StoreError};
    use landing_core::{WaitlistRecord, WaitlistStore};
    use pretty_assertions::assert_eq;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tower::ServiceExt;

    /// A store whose writes always fail
    struct FailingStore;

    #[async_trait]
    impl WaitlistStore for FailingStore {
        fn name(&self) -> &str {
            "failing"
        }

        async fn append(&self, _record: &WaitlistRecord) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk full")))
        }

        async fn count(&self) -> Result<usize, StoreError> {
            Ok(0)
        }
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(WAITLIST_ROUTE)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_json(response: Response) -> ApiResponse {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn router_with(store: Arc<dyn WaitlistStore>) -> Router {
        build_router(WaitlistService::new(store), Path::new("/nonexistent"))
    }

    #[tokio::test]
    async fn test_join_success() {
        let store = Arc::new(MemoryStore::new());
        let app = router_with(store.clone());

        let response = app
            .oneshot(post_json(r#"{"name":"Ada","email":"ada@example.com"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await, ApiResponse::ok(SUCCESS_MESSAGE));
        assert_eq!(store.records().await.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_fields_rejected() {
        let store = Arc::new(MemoryStore::new());
        let app = router_with(store.clone());

        let response = app
            .oneshot(post_json(r#"{"name":"Ada"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            read_json(response).await,
            ApiResponse::failed("Name and email are required")
        );
        assert!(store.records().await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let app = router_with(Arc::new(MemoryStore::new()));
        let response = app
            .oneshot(post_json(r#"{"name":"Ada","email":"ada.example.com"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            read_json(response).await,
            ApiResponse::failed("Valid email is required")
        );
    }

    #[tokio::test]
    async fn test_malformed_body_rejected() {
        let app = router_with(Arc::new(MemoryStore::new()));
        let response = app.oneshot(post_json("{not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            read_json(response).await,
            ApiResponse::failed(BAD_BODY_MESSAGE)
        );
    }

    #[tokio::test]
    async fn test_store_failure_is_server_error() {
        let app = router_with(Arc::new(FailingStore));
        let response = app
            .oneshot(post_json(r#"{"name":"Ada","email":"ada@example.com"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            read_json(response).await,
            ApiResponse::failed(SERVER_ERROR_MESSAGE)
        );
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let app = router_with(Arc::new(MemoryStore::new()));
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri(WAITLIST_ROUTE)
            .header(header::ORIGIN, "https://finantic.example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        let methods = response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap()
            .to_string();
        assert!(methods.contains("POST"));
    }

    #[tokio::test]
    async fn test_static_files_with_spa_fallback() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>finantic</h1>").unwrap();
        std::fs::create_dir(dir.path().join("static")).unwrap();
        std::fs::write(dir.path().join("static").join("app.js"), "console.log(1)").unwrap();

        let app = build_router(
            WaitlistService::new(Arc::new(MemoryStore::new())),
            dir.path(),
        );

        let asset = app
            .clone()
            .oneshot(Request::get("/static/app.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(asset.status(), StatusCode::OK);
        let bytes = asset.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"console.log(1)");

        let deep_link = app
            .oneshot(Request::get("/pricing/team").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(deep_link.status(), StatusCode::OK);
        let bytes = deep_link.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"<h1>finantic</h1>");
    }

    #[tokio::test]
    async fn test_serve_stops_on_cancel() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let cancel = CancellationToken::new();
        let router = router_with(Arc::new(MemoryStore::new()));
        let server = tokio::spawn(serve(listener, router, cancel.clone()));

        let body = r#"{"name":"Ada","email":"ada@example.com"}"#;
        let request = format!(
            "POST {WAITLIST_ROUTE} HTTP/1.1\r\nHost: {addr}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains(SUCCESS_MESSAGE));

        cancel.cancel();
        server.await.unwrap().unwrap();
    }
}
