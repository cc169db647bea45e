use axum::Router;

pub mod common;
pub mod inventory;
pub mod items;
pub mod orders;

/// Router for all entity endpoints, nested under `/api` by the app builder.
pub fn router() -> Router {
    Router::new()
        .nest("/items", items::router())
        .nest("/inventory", inventory::router())
        .nest("/order", orders::router())
}
