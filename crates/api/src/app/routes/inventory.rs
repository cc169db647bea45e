use std::sync::Arc;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use backshop_core::{ItemId, MovementId};
use backshop_inventory::{Direction, MovementDraft};

use crate::app::dto::{self, Envelope, InventoryRequest, PageParams};
use crate::app::errors;
use crate::app::routes::common::parse_paging;
use crate::app::services::AppServices;
use crate::config::ErrorCodes;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_inventory).post(create_movement))
        .route(
            "/:id",
            get(get_movement).put(update_movement).delete(delete_movement),
        )
}

fn parse_id(codes: &ErrorCodes, raw: &str) -> Result<MovementId, axum::response::Response> {
    raw.parse::<MovementId>()
        .map_err(|e| errors::domain_error_to_response(codes, e))
}

fn parse_draft(
    codes: &ErrorCodes,
    body: Result<Json<Envelope<InventoryRequest>>, JsonRejection>,
) -> Result<MovementDraft, axum::response::Response> {
    let Json(envelope) = body.map_err(|e| errors::validation_error(codes, e.body_text()))?;
    let direction = envelope
        .data
        .direction
        .parse::<Direction>()
        .map_err(|e| errors::domain_error_to_response(codes, e))?;

    Ok(MovementDraft::new(
        ItemId::new(envelope.data.item_id),
        envelope.data.qty,
        direction,
    ))
}

pub async fn list_inventory(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(codes): Extension<ErrorCodes>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> axum::response::Response {
    let (page, size) = match parse_paging(&codes, params) {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    match services.ledger.list(page, size).await {
        Ok(page) => (StatusCode::OK, Json(dto::movement_page_to_json(&page))).into_response(),
        Err(e) => errors::store_error_to_response(&codes, e),
    }
}

pub async fn get_movement(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(codes): Extension<ErrorCodes>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&codes, &id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.ledger.get(id).await {
        Ok(movement) => (StatusCode::OK, Json(dto::movement_to_json(&movement))).into_response(),
        Err(e) => errors::store_error_to_response(&codes, e),
    }
}

pub async fn create_movement(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(codes): Extension<ErrorCodes>,
    body: Result<Json<Envelope<InventoryRequest>>, JsonRejection>,
) -> axum::response::Response {
    let draft = match parse_draft(&codes, body) {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    match services.ledger.record(draft).await {
        Ok(movement) => (StatusCode::OK, Json(dto::movement_to_json(&movement))).into_response(),
        Err(e) => errors::store_error_to_response(&codes, e),
    }
}

pub async fn update_movement(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(codes): Extension<ErrorCodes>,
    Path(id): Path<String>,
    body: Result<Json<Envelope<InventoryRequest>>, JsonRejection>,
) -> axum::response::Response {
    let id = match parse_id(&codes, &id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let draft = match parse_draft(&codes, body) {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    match services.ledger.replace(id, draft).await {
        Ok(movement) => (StatusCode::OK, Json(dto::movement_to_json(&movement))).into_response(),
        Err(e) => errors::store_error_to_response(&codes, e),
    }
}

pub async fn delete_movement(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(codes): Extension<ErrorCodes>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&codes, &id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.ledger.remove(id).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => errors::store_error_to_response(&codes, e),
    }
}
