//! Application wiring: services, routers, shared request extensions.

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use crate::config::ErrorCodes;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full application router over the given services.
pub fn build_app(services: AppServices, error_codes: ErrorCodes) -> Router {
    Router::new().nest("/api", routes::router()).layer(
        ServiceBuilder::new()
            .layer(Extension(Arc::new(services)))
            .layer(Extension(error_codes)),
    )
}
