//! HTTP router for the command interpreter.
//!
//! Middleware stack (outermost → innermost):
//! 1. CORS → 2. Audit logger → Handler

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the router with CORS restricted to `allowed_origins`.
pub fn comando_router(ctx: ApiContext, allowed_origins: Vec<HeaderValue>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    // ServiceBuilder applies top to bottom: CORS wraps the audit logger.
    Router::new()
        .route("/", get(endpoints::health::check))
        .route("/comando", post(endpoints::comando::interpret))
        .with_state(ctx)
        .layer(
            ServiceBuilder::new()
                .layer(cors)
                .layer(axum::middleware::from_fn(middleware::audit::log_access)),
        )
}
