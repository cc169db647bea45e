//! Helpers shared by the entity routers.

use axum::extract::rejection::QueryRejection;
use axum::extract::Query;

use crate::app::dto::PageParams;
use crate::app::errors;
use crate::config::ErrorCodes;

/// Resolve paging parameters, rejecting malformed queries and zero sizes
/// before they reach storage.
pub fn parse_paging(
    codes: &ErrorCodes,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<(u32, u32), axum::response::Response> {
    let Query(params) = params.map_err(|e| errors::validation_error(codes, e.body_text()))?;
    if params.size() == 0 {
        return Err(errors::validation_error(codes, "size must be positive"));
    }
    Ok((params.page(), params.size()))
}
