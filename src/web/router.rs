//! Web application router and middleware setup.

use crate::metrics::MetricsProvider;
use crate::web::config::WebConfig;
use crate::web::handlers::{self, AppState};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Path of the snapshot endpoint.
pub const SYSTEM_INFO_PATH: &str = "/api/system-info";

/// Path of the health endpoint.
pub const HEALTH_PATH: &str = "/api/health";

/// Create the axum application with all routes and middleware.
pub fn create_app(config: &WebConfig, provider: Arc<dyn MetricsProvider>) -> Router {
    let mut app = Router::new()
        .route(SYSTEM_INFO_PATH, get(handlers::get_system_info))
        .route(HEALTH_PATH, get(handlers::health_check))
        .with_state(AppState::new(provider));

    // The dashboard pages are served from another origin.
    if config.enable_cors {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
