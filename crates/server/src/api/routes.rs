use axum::{
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{credentials, handlers, pipeline};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Pipeline
        .route("/pipeline", get(pipeline::get_pipeline))
        .route("/pipeline/download", post(pipeline::download))
        .route("/pipeline/translate", post(pipeline::translate))
        .route("/pipeline/synthesize", post(pipeline::synthesize))
        .route("/pipeline/compose", post(pipeline::compose))
        .route("/pipeline/navigate", post(pipeline::navigate))
        .route("/pipeline/script", put(pipeline::set_script))
        .route("/pipeline/cleanup", post(pipeline::cleanup))
        // Credential pools
        .route("/credentials/{provider}", get(credentials::list_credentials))
        .route("/credentials/{provider}", post(credentials::add_credential))
        .route("/credentials/{provider}/active", get(credentials::get_active))
        .route(
            "/credentials/{provider}/{id}",
            patch(credentials::update_credential),
        )
        .route(
            "/credentials/{provider}/{id}",
            delete(credentials::remove_credential),
        )
        .with_state(state.clone());

    Router::new()
        .nest("/api/v1", api_routes)
        // Prometheus scrape endpoint, outside the API prefix
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
        .layer(middleware::from_fn(super::middleware::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
