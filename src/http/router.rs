//! Router configuration for the HTTP API.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);
    let body_limit = state.config.server.max_upload_bytes;

    Router::new()
        .route("/health", get(handlers::health_check))
        // Single-shot operations
        .route("/preview", post(handlers::preview))
        .route("/impute", post(handlers::impute))
        .route("/encode", post(handlers::encode))
        .route("/scale", post(handlers::scale))
        .route("/drop_columns", post(handlers::drop_columns))
        .route("/filter_rows", post(handlers::filter_rows))
        .route("/rename_columns", post(handlers::rename_columns))
        .route("/change_dtypes", post(handlers::change_dtypes))
        .route("/drop_duplicates", post(handlers::drop_duplicates))
        // Dropped-column cache
        .route("/drop_columns_with_cache", post(handlers::drop_columns_with_cache))
        .route("/restore_dropped_columns", post(handlers::restore_dropped_columns))
        // Sessions
        .route("/create_session", post(handlers::create_session))
        .route("/apply_transformation", post(handlers::apply_transformation))
        .route("/undo", post(handlers::undo))
        .route("/close_session", post(handlers::close_session))
        .route("/column_stats", post(handlers::column_stats))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin {}: {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
