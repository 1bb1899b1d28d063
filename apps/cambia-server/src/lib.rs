//! Cambia Server Library
//!
//! A self-hosted file conversion server. Uploads arrive as multipart form
//! data, a routing table maps (input kind, file count, target format) to a
//! conversion operation, and the converted file is served back from the
//! download directory.
//!
//! The server binary is in main.rs; the router is exposed here so
//! integration tests can drive it directly.

pub mod config;
pub mod convert;
pub mod error;
pub mod routes;
pub mod state;
pub mod storage;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use config::Config;
use state::AppState;

/// Cap multipart bodies well above typical document sizes.
const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Build the application router.
pub fn app(config: Config) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let downloads = ServeDir::new(config.storage.download_dir.clone());
    let state = AppState::new(config);

    Router::new()
        .route("/ping", get(routes::health::ping))
        .route("/convert", post(routes::convert::convert))
        .nest_service("/downloads", downloads)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
