use std::sync::Arc;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use backshop_core::ItemId;

use crate::app::dto::{self, Envelope, OrdersRequest, PageParams};
use crate::app::errors;
use crate::app::routes::common::parse_paging;
use crate::app::services::AppServices;
use crate::config::ErrorCodes;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route(
            "/:order_no",
            get(get_order).put(update_order).delete(delete_order),
        )
}

fn parse_request(
    codes: &ErrorCodes,
    body: Result<Json<Envelope<OrdersRequest>>, JsonRejection>,
) -> Result<(ItemId, u32), axum::response::Response> {
    let Json(envelope) = body.map_err(|e| errors::validation_error(codes, e.body_text()))?;
    Ok((ItemId::new(envelope.data.item_id), envelope.data.qty))
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(codes): Extension<ErrorCodes>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> axum::response::Response {
    let (page, size) = match parse_paging(&codes, params) {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    match services.issuance.list(page, size).await {
        Ok(page) => (StatusCode::OK, Json(dto::order_page_to_json(&page))).into_response(),
        Err(e) => errors::store_error_to_response(&codes, e),
    }
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(codes): Extension<ErrorCodes>,
    Path(order_no): Path<String>,
) -> axum::response::Response {
    match services.issuance.get(&order_no).await {
        Ok(order) => (StatusCode::OK, Json(dto::order_to_json(&order))).into_response(),
        Err(e) => errors::store_error_to_response(&codes, e),
    }
}

pub async fn create_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(codes): Extension<ErrorCodes>,
    body: Result<Json<Envelope<OrdersRequest>>, JsonRejection>,
) -> axum::response::Response {
    let (item_id, qty) = match parse_request(&codes, body) {
        Ok(r) => r,
        Err(resp) => return resp,
    };

    match services.issuance.create(item_id, qty).await {
        Ok(order) => (StatusCode::OK, Json(dto::order_to_json(&order))).into_response(),
        Err(e) => errors::store_error_to_response(&codes, e),
    }
}

pub async fn update_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(codes): Extension<ErrorCodes>,
    Path(order_no): Path<String>,
    body: Result<Json<Envelope<OrdersRequest>>, JsonRejection>,
) -> axum::response::Response {
    let (item_id, qty) = match parse_request(&codes, body) {
        Ok(r) => r,
        Err(resp) => return resp,
    };

    match services.issuance.update(&order_no, item_id, qty).await {
        Ok(order) => (StatusCode::OK, Json(dto::order_to_json(&order))).into_response(),
        Err(e) => errors::store_error_to_response(&codes, e),
    }
}

pub async fn delete_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(codes): Extension<ErrorCodes>,
    Path(order_no): Path<String>,
) -> axum::response::Response {
    match services.issuance.delete(&order_no).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => errors::store_error_to_response(&codes, e),
    }
}
