//! Translation of internal failures to wire-level error responses.
//!
//! Every failure body has the same shape (unwrapped, unlike the `data`
//! envelope successful bodies use):
//! `{"errorCode": "<PREFIX>-<NNN>-<suffix>", "errorDesc": ..., "timestamp": ...}`.
//! Storage faults and corruption fall through to the catch-all code and never
//! leak internal detail.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use serde_json::json;

use backshop_core::DomainError;
use backshop_infra::StoreError;

use crate::config::ErrorCodes;

pub const SUFFIX_NOT_FOUND: u16 = 991;
pub const SUFFIX_INSUFFICIENT_STOCK: u16 = 992;
pub const SUFFIX_VALIDATION: u16 = 993;
pub const SUFFIX_GENERAL: u16 = 999;

pub fn store_error_to_response(codes: &ErrorCodes, err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Domain(e) => domain_error_to_response(codes, e),
        StoreError::Database(e) => {
            tracing::error!(error = %e, "storage failure");
            general_error(codes)
        }
    }
}

pub fn domain_error_to_response(codes: &ErrorCodes, err: DomainError) -> axum::response::Response {
    match &err {
        DomainError::NotFound(_) => error_response(
            StatusCode::NOT_FOUND,
            codes.code(SUFFIX_NOT_FOUND),
            err.to_string(),
        ),
        DomainError::InsufficientStock { .. } => error_response(
            StatusCode::CONFLICT,
            codes.code(SUFFIX_INSUFFICIENT_STOCK),
            err.to_string(),
        ),
        DomainError::Validation(_) => validation_error(codes, err.to_string()),
        DomainError::Corruption(msg) => {
            tracing::error!(detail = %msg, "corrupt state");
            general_error(codes)
        }
    }
}

pub fn validation_error(codes: &ErrorCodes, desc: impl Into<String>) -> axum::response::Response {
    error_response(
        StatusCode::BAD_REQUEST,
        codes.code(SUFFIX_VALIDATION),
        desc.into(),
    )
}

/// Catch-all: generic code, generic description, nothing internal.
pub fn general_error(codes: &ErrorCodes) -> axum::response::Response {
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        codes.common_code(SUFFIX_GENERAL),
        "GENERAL_ERROR",
    )
}

fn error_response(
    status: StatusCode,
    error_code: String,
    error_desc: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "errorCode": error_code,
            "errorDesc": error_desc.into(),
            "timestamp": Utc::now().to_rfc3339(),
        })),
    )
        .into_response()
}
