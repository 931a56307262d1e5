//! HTTP routing: WebSocket signaling, uploads, static assets.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::Config;
use crate::session;
use crate::state::RoomRegistry;
use crate::upload;

/// State shared by every handler: the room registry and runtime config.
///
/// Constructed once at startup and passed explicitly; nothing reaches it
/// except through the router.
#[derive(Debug)]
pub struct AppState {
    pub registry: RoomRegistry,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            registry: RoomRegistry::new(),
            config,
        }
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let index = ServeFile::new(state.config.static_dir.join("index.html"));
    let assets = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/health", get(health))
        .route("/ws/{room_id}", get(session::ws_handler))
        .route("/upload/{room_id}", post(upload::upload_file))
        .route_service("/", index)
        .nest_service("/static", assets)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}
