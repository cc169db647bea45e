use std::sync::Arc;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use backshop_catalog::ItemDraft;
use backshop_core::ItemId;

use crate::app::dto::{self, Envelope, ItemRequest, PageParams};
use crate::app::errors;
use crate::app::routes::common::parse_paging;
use crate::app::services::AppServices;
use crate::config::ErrorCodes;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/:id", get(get_item).put(update_item).delete(delete_item))
}

fn parse_id(codes: &ErrorCodes, raw: &str) -> Result<ItemId, axum::response::Response> {
    raw.parse::<ItemId>()
        .map_err(|e| errors::domain_error_to_response(codes, e))
}

fn parse_draft(
    codes: &ErrorCodes,
    body: Result<Json<Envelope<ItemRequest>>, JsonRejection>,
) -> Result<ItemDraft, axum::response::Response> {
    let Json(envelope) = body.map_err(|e| errors::validation_error(codes, e.body_text()))?;
    ItemDraft::new(envelope.data.name, envelope.data.price)
        .map_err(|e| errors::domain_error_to_response(codes, e))
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(codes): Extension<ErrorCodes>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> axum::response::Response {
    let (page, size) = match parse_paging(&codes, params) {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    match services.catalog.list(page, size).await {
        Ok(page) => (StatusCode::OK, Json(dto::item_page_to_json(&page))).into_response(),
        Err(e) => errors::store_error_to_response(&codes, e),
    }
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(codes): Extension<ErrorCodes>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&codes, &id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.catalog.get(id).await {
        Ok(read) => (StatusCode::OK, Json(dto::item_with_stock_to_json(&read))).into_response(),
        Err(e) => errors::store_error_to_response(&codes, e),
    }
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(codes): Extension<ErrorCodes>,
    body: Result<Json<Envelope<ItemRequest>>, JsonRejection>,
) -> axum::response::Response {
    let draft = match parse_draft(&codes, body) {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    match services.catalog.create(draft).await {
        Ok(item) => (StatusCode::OK, Json(dto::item_to_json(&item))).into_response(),
        Err(e) => errors::store_error_to_response(&codes, e),
    }
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(codes): Extension<ErrorCodes>,
    Path(id): Path<String>,
    body: Result<Json<Envelope<ItemRequest>>, JsonRejection>,
) -> axum::response::Response {
    let id = match parse_id(&codes, &id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let draft = match parse_draft(&codes, body) {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    match services.catalog.update(id, draft).await {
        Ok(item) => (StatusCode::OK, Json(dto::item_to_json(&item))).into_response(),
        Err(e) => errors::store_error_to_response(&codes, e),
    }
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(codes): Extension<ErrorCodes>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&codes, &id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.catalog.delete(id).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => errors::store_error_to_response(&codes, e),
    }
}
