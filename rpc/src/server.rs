//! Axum-based API server.

use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/signup", post(handlers::signup))
        .route("/api/auth/signin", post(handlers::signin))
        .route("/api/auth/logout", post(handlers::logout))
        .route(
            "/api/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route("/api/profile/link-wallet", post(handlers::link_wallet))
        .route(
            "/api/settings",
            get(handlers::get_settings).put(handlers::update_settings),
        )
        .route("/api/verify", post(handlers::verify))
        .route("/api/qr-check", get(handlers::qr_check))
        .route("/api/qr-verify-signature", post(handlers::qr_verify_signature))
        .route("/api/stats", get(handlers::stats))
        .route("/api/contact", post(handlers::contact))
        .route("/healthz", get(handlers::healthz))
        .route("/metrics", get(handlers::metrics))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// The API server, configured with a port and shared state.
pub struct ApiServer {
    pub port: u16,
    pub state: AppState,
}

impl ApiServer {
    pub fn new(port: u16, state: AppState) -> Self {
        Self { port, state }
    }

    /// Start serving. Runs until the process is shut down.
    pub async fn start(&self) -> std::io::Result<()> {
        let app = router(self.state.clone());
        let addr = format!("0.0.0.0:{}", self.port);
        info!("API server listening on {}", addr);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await
    }
}
